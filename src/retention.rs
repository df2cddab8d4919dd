/// Trash retention: expired soft-deleted groups are gone for good
use crate::stash_data::StashGroup;

pub const RETENTION_DAYS: f64 = 30.0;
const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Drop every group whose `deletedAt` is past the retention window. Runs at
/// startup before the first render so the trash view never shows expired
/// entries. Returns how many were removed.
pub fn sweep_expired(groups: &mut Vec<StashGroup>, now_ms: f64) -> usize {
    let cutoff = now_ms - RETENTION_DAYS * MS_PER_DAY;
    let before = groups.len();
    groups.retain(|g| g.deleted_at.is_none_or(|deleted| deleted >= cutoff));
    before - groups.len()
}
