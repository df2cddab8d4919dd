/// Stash - tab stashing core for the browser extension
/// Built with Rust + WASM; the JS shell renders, this crate owns the data.

mod autosave;
mod browser;
mod codec;
mod domain;
mod error;
mod repository;
mod retention;
mod stash_data;
mod storage;
mod tab_ops;

pub use autosave::{autosave_due, autosave_tick};
pub use codec::{export, export_filename, import, ExportDocument, EXPORT_VERSION};
pub use error::{SaveOutcome, StashError};
pub use repository::{DedupeKeep, SaveOrigin, StashRepository, ViewFilter};
pub use retention::sweep_expired;
pub use stash_data::{Settings, StashGroup, TabItem, TabSnapshot, SUGGESTED_TAGS};
pub use storage::StoreSnapshot;

use wasm_bindgen::prelude::*;

// Set up panic hook and logging for the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

fn err_js(e: StashError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&format!("{e:?}")))
}

fn parse_view(view: &str) -> ViewFilter {
    match view {
        "recent" => ViewFilter::Recent,
        "favorites" => ViewFilter::Favorites,
        "trash" => ViewFilter::Trash,
        _ => ViewFilter::All,
    }
}

/// Snapshot all eligible tabs of the current window into a new group.
/// Honors `closeAfterSave` by opening a fresh newtab page first, then
/// closing the saved handles (the window must not end up empty).
#[wasm_bindgen]
pub async fn save_all_tabs() -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let tabs = browser::open_tabs(true).await.map_err(|e| JsValue::from_str(&e))?;

    let mut repo = StashRepository::new(snapshot.groups);
    let outcome = repo.create_from_tabs(&tabs, &snapshot.settings, SaveOrigin::Manual, browser::now_ms());
    if let SaveOutcome::Saved { group_id, tab_count } = &outcome {
        storage::save_groups(repo.groups()).await.map_err(err_js)?;
        log::info!("saved {tab_count} tabs");

        if snapshot.settings.close_after_save {
            let handles = repo
                .find(group_id)
                .map(|saved| repository::closable_handles(&tabs, &snapshot.settings, saved))
                .unwrap_or_default();
            browser::open_url("chrome://newtab").await.map_err(|e| JsValue::from_str(&e))?;
            browser::close_tab_handles(&handles).await.map_err(|e| JsValue::from_str(&e))?;
        }
    }

    to_js(&outcome)
}

/// Save a single tab (context-menu flow). Pinned state does not matter
/// here: the user pointed at this exact tab.
#[wasm_bindgen]
pub async fn save_current_tab(tab_js: JsValue) -> Result<JsValue, JsValue> {
    let tab: TabSnapshot = serde_wasm_bindgen::from_value(tab_js)
        .map_err(|e| JsValue::from_str(&format!("invalid tab: {e:?}")))?;
    let snapshot = storage::load().await.map_err(err_js)?;

    let mut repo = StashRepository::new(snapshot.groups);
    let pin_blind = Settings {
        include_pinned: true,
        ..snapshot.settings.clone()
    };
    let handle = tab.id;
    let outcome = repo.create_from_tabs(
        std::slice::from_ref(&tab),
        &pin_blind,
        SaveOrigin::Manual,
        browser::now_ms(),
    );
    if matches!(outcome, SaveOutcome::Saved { .. }) {
        storage::save_groups(repo.groups()).await.map_err(err_js)?;
        if snapshot.settings.close_after_save {
            browser::close_tab_handles(&[handle]).await.map_err(|e| JsValue::from_str(&e))?;
        }
    }

    to_js(&outcome)
}

/// Run one auto-save tick: change-detected, never closes tabs.
#[wasm_bindgen]
pub async fn run_autosave_tick() -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    if !snapshot.settings.auto_save {
        return to_js(&SaveOutcome::NothingToSave);
    }
    let tabs = browser::open_tabs(true).await.map_err(|e| JsValue::from_str(&e))?;

    let mut repo = StashRepository::new(snapshot.groups);
    let outcome = autosave_tick(&mut repo, &tabs, &snapshot.settings, browser::now_ms());
    if let SaveOutcome::Saved { tab_count, .. } = &outcome {
        storage::save_groups(repo.groups()).await.map_err(err_js)?;
        log::info!("auto-saved {tab_count} tabs");
    }

    to_js(&outcome)
}

/// Open every tab of a group, then move the group to trash (trash is the
/// undo path for a restore-to-browser).
#[wasm_bindgen]
pub async fn open_group(group_id: &str) -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let mut repo = StashRepository::new(snapshot.groups);

    let Some(urls) = repo.group_urls(group_id) else {
        return to_js(&0usize);
    };
    for url in &urls {
        browser::open_url(url).await.map_err(|e| JsValue::from_str(&e))?;
    }

    repo.soft_delete(group_id, browser::now_ms());
    storage::save_groups(repo.groups()).await.map_err(err_js)?;
    to_js(&urls.len())
}

#[wasm_bindgen]
pub async fn soft_delete_group(group_id: &str) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.soft_delete(group_id, browser::now_ms())).await
}

#[wasm_bindgen]
pub async fn restore_group(group_id: &str) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.restore(group_id)).await
}

#[wasm_bindgen]
pub async fn purge_group(group_id: &str) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.purge(group_id)).await
}

#[wasm_bindgen]
pub async fn empty_trash() -> Result<usize, JsValue> {
    mutate_groups(|repo| repo.empty_trash()).await
}

#[wasm_bindgen]
pub async fn clear_all_groups() -> Result<usize, JsValue> {
    mutate_groups(|repo| repo.clear_all()).await
}

#[wasm_bindgen]
pub async fn toggle_group_favorite(group_id: &str) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.toggle_favorite(group_id)).await
}

#[wasm_bindgen]
pub async fn toggle_group_tag(group_id: &str, tag: &str) -> Result<JsValue, JsValue> {
    let toggled = mutate_groups(|repo| repo.toggle_tag(group_id, tag)).await?;
    to_js(&toggled)
}

#[wasm_bindgen]
pub async fn reorder_group(group_id: &str, target_index: usize) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.reorder(group_id, target_index)).await
}

#[wasm_bindgen]
pub async fn delete_tab_item(group_id: &str, tab_id: &str) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.delete_tab(group_id, tab_id, browser::now_ms())).await
}

#[wasm_bindgen]
pub async fn move_tab_item(
    from_group_id: &str,
    to_group_id: &str,
    tab_id: &str,
    before_tab_id: Option<String>,
) -> Result<bool, JsValue> {
    mutate_groups(|repo| repo.move_tab(from_group_id, to_group_id, tab_id, before_tab_id.as_deref()))
        .await
}

#[wasm_bindgen]
pub async fn scan_duplicate_tabs() -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let repo = StashRepository::new(snapshot.groups);
    to_js(&repo.scan_duplicates())
}

/// `keep` is "newest" (default) or "oldest".
#[wasm_bindgen]
pub async fn remove_duplicate_tabs(keep: &str) -> Result<usize, JsValue> {
    let policy = if keep == "oldest" { DedupeKeep::Oldest } else { DedupeKeep::Newest };
    let removed = mutate_groups(|repo| repo.remove_duplicates(policy, browser::now_ms())).await?;
    log::info!("removed {removed} duplicate tabs");
    Ok(removed)
}

/// Expire trashed groups past the retention window. Call at startup,
/// before the first render.
#[wasm_bindgen]
pub async fn run_retention_sweep() -> Result<usize, JsValue> {
    let removed = mutate_groups(|repo| sweep_expired(repo.groups_mut(), browser::now_ms())).await?;
    if removed > 0 {
        log::info!("retention sweep removed {removed} expired groups");
    }
    Ok(removed)
}

/// Current list for a view ("all" | "recent" | "favorites" | "trash"),
/// optionally narrowed by tag and free-text/domain query.
#[wasm_bindgen]
pub async fn query_view(
    view: &str,
    tag: Option<String>,
    query: Option<String>,
) -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let repo = StashRepository::new(snapshot.groups);
    let groups = repo.view(parse_view(view), tag.as_deref(), query.as_deref(), browser::now_ms());
    to_js(&groups)
}

#[wasm_bindgen]
pub async fn stash_stats() -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let repo = StashRepository::new(snapshot.groups);
    to_js(&repo.stats())
}

#[wasm_bindgen]
pub async fn used_tags() -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let repo = StashRepository::new(snapshot.groups);
    to_js(&repo.used_tags())
}

/// Export the full list, trash included, as the versioned JSON document.
#[wasm_bindgen]
pub async fn export_groups() -> Result<String, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    codec::export(&snapshot.groups, &browser::now_iso()).map_err(err_js)
}

#[wasm_bindgen]
pub fn export_file_name() -> String {
    codec::export_filename(&browser::now_iso())
}

/// Import a document and prepend its groups. Structural failures reject the
/// whole document; the stored list is untouched.
#[wasm_bindgen]
pub async fn import_groups(raw: &str) -> Result<usize, JsValue> {
    let imported = codec::import(raw).map_err(err_js)?;
    let count = mutate_groups(|repo| repo.merge_imported(imported)).await?;
    log::info!("imported {count} groups");
    Ok(count)
}

#[wasm_bindgen]
pub async fn get_settings() -> Result<JsValue, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    to_js(&snapshot.settings)
}

#[wasm_bindgen]
pub async fn update_settings(settings_js: JsValue) -> Result<(), JsValue> {
    let settings: Settings = serde_wasm_bindgen::from_value(settings_js)
        .map_err(|e| JsValue::from_str(&format!("invalid settings: {e:?}")))?;
    storage::save_settings(&settings).await.map_err(err_js)
}

/// One load-mutate-save round against the group list. Every mutating export
/// funnels through here so the store always holds a fully-applied state
/// before the call returns.
async fn mutate_groups<T>(op: impl FnOnce(&mut StashRepository) -> T) -> Result<T, JsValue> {
    let snapshot = storage::load().await.map_err(err_js)?;
    let mut repo = StashRepository::new(snapshot.groups);
    let result = op(&mut repo);
    storage::save_groups(repo.groups()).await.map_err(err_js)?;
    Ok(result)
}
