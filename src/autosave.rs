/// Periodic auto-save: change-detected, never destructive
///
/// A tick snapshots the open tabs only when their URL set differs from the
/// most recent active group's, so an idle browser does not pile up identical
/// stashes. Auto-save never closes tabs, whatever `closeAfterSave` says.
use crate::error::SaveOutcome;
use crate::repository::{eligible_tabs, SaveOrigin, StashRepository};
use crate::stash_data::{Settings, TabSnapshot};

const MS_PER_MINUTE: f64 = 60.0 * 1000.0;

/// Whether enough time has passed since the last tick.
pub fn autosave_due(last_run_ms: f64, interval_minutes: u32, now_ms: f64) -> bool {
    now_ms - last_run_ms >= f64::from(interval_minutes) * MS_PER_MINUTE
}

/// Run one auto-save tick against the repository. Returns what happened so
/// the shell can log or notify.
pub fn autosave_tick(
    repo: &mut StashRepository,
    open_tabs: &[TabSnapshot],
    settings: &Settings,
    now_ms: f64,
) -> SaveOutcome {
    if !settings.auto_save {
        return SaveOutcome::NothingToSave;
    }

    let eligible = eligible_tabs(open_tabs, settings);
    if eligible.is_empty() {
        return SaveOutcome::NothingToSave;
    }

    // Most recently created, not first in display order: a user reorder
    // must not change which snapshot the tick compares against.
    let latest = repo
        .groups()
        .iter()
        .filter(|g| !g.is_trashed())
        .max_by(|a, b| a.created_at.total_cmp(&b.created_at));
    if let Some(latest) = latest {
        let mut current: Vec<&str> = eligible.iter().map(|t| t.url.as_str()).collect();
        current.sort_unstable();
        current.dedup();

        let mut last: Vec<&str> = latest.tabs.iter().map(|t| t.url.as_str()).collect();
        last.sort_unstable();
        last.dedup();

        if current == last {
            return SaveOutcome::NothingToSave;
        }
    }

    repo.create_from_tabs(open_tabs, settings, SaveOrigin::Auto, now_ms)
}
