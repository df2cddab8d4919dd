/// Stash group repository: create, trash, restore, merge, dedupe, views
use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::browser::is_internal_url;
use crate::domain::extract_domain;
use crate::error::SaveOutcome;
use crate::stash_data::{Settings, StashGroup, TabItem, TabSnapshot};

/// Distinguishes manual saves from timer-driven snapshots.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SaveOrigin {
    Manual,
    Auto,
}

/// Which copy `remove_duplicates` keeps per URL. The active list is scanned
/// most-recent-first, so `Newest` keeps the first occurrence encountered.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DedupeKeep {
    Newest,
    Oldest,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ViewFilter {
    All,
    Recent,
    Favorites,
    Trash,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabRef {
    pub group_id: String,
    pub tab_id: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateSet {
    pub url: String,
    pub occurrences: Vec<TabRef>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StashStats {
    pub group_count: usize,
    pub tab_count: usize,
    pub trash_count: usize,
}

const RECENT_WINDOW_MS: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// In-memory working copy of the group list, most-recent-first. Owned state
/// is loaded from and flushed back to the store around every operation.
#[derive(Debug, Clone, Default)]
pub struct StashRepository {
    groups: Vec<StashGroup>,
}

impl StashRepository {
    pub fn new(groups: Vec<StashGroup>) -> StashRepository {
        StashRepository { groups }
    }

    pub fn groups(&self) -> &[StashGroup] {
        &self.groups
    }

    pub fn groups_mut(&mut self) -> &mut Vec<StashGroup> {
        &mut self.groups
    }

    pub fn into_groups(self) -> Vec<StashGroup> {
        self.groups
    }

    pub fn find(&self, group_id: &str) -> Option<&StashGroup> {
        self.groups.iter().find(|g| g.id == group_id)
    }

    fn find_mut(&mut self, group_id: &str) -> Option<&mut StashGroup> {
        self.groups.iter_mut().find(|g| g.id == group_id)
    }

    fn position(&self, group_id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == group_id)
    }

    /// Snapshot the eligible open tabs into a new group at the head of the
    /// list. Internal pages are always excluded; pinned tabs only when
    /// `includePinned` is off. An empty filter result is a no-op signal.
    pub fn create_from_tabs(
        &mut self,
        open_tabs: &[TabSnapshot],
        settings: &Settings,
        origin: SaveOrigin,
        now_ms: f64,
    ) -> SaveOutcome {
        let mut eligible = eligible_tabs(open_tabs, settings);

        if settings.prevent_duplicates {
            let known = self.active_urls();
            eligible.retain(|tab| !known.contains(tab.url.as_str()));
        }

        if eligible.is_empty() {
            return SaveOutcome::NothingToSave;
        }

        let tabs: Vec<TabItem> = eligible.into_iter().map(TabItem::from_snapshot).collect();
        let tab_count = tabs.len();
        let mut group = StashGroup::new(tabs, now_ms);
        group.auto_saved = origin == SaveOrigin::Auto;

        let group_id = group.id.clone();
        self.groups.insert(0, group);

        SaveOutcome::Saved { group_id, tab_count }
    }

    /// Move a group to trash. Returns false when the id is gone.
    pub fn soft_delete(&mut self, group_id: &str, now_ms: f64) -> bool {
        match self.find_mut(group_id) {
            Some(group) => {
                group.deleted_at = Some(now_ms);
                true
            }
            None => false,
        }
    }

    /// Bring a trashed group back to the active list.
    pub fn restore(&mut self, group_id: &str) -> bool {
        match self.find_mut(group_id) {
            Some(group) => {
                group.deleted_at = None;
                group.source_group_id = None;
                true
            }
            None => false,
        }
    }

    /// Remove a group unconditionally. Irreversible.
    pub fn purge(&mut self, group_id: &str) -> bool {
        let before = self.groups.len();
        self.groups.retain(|g| g.id != group_id);
        self.groups.len() < before
    }

    pub fn empty_trash(&mut self) -> usize {
        let before = self.groups.len();
        self.groups.retain(|g| !g.is_trashed());
        before - self.groups.len()
    }

    pub fn clear_all(&mut self) -> usize {
        let count = self.groups.len();
        self.groups.clear();
        count
    }

    pub fn toggle_favorite(&mut self, group_id: &str) -> bool {
        match self.find_mut(group_id) {
            Some(group) => {
                group.favorite = !group.favorite;
                true
            }
            None => false,
        }
    }

    /// Add the tag if absent, remove it if present. Returns whether the tag
    /// ended up set, or None when the group is gone.
    pub fn toggle_tag(&mut self, group_id: &str, tag: &str) -> Option<bool> {
        let group = self.find_mut(group_id)?;
        match group.tags.iter().position(|t| t == tag) {
            Some(idx) => {
                group.tags.remove(idx);
                Some(false)
            }
            None => {
                group.tags.push(tag.to_string());
                Some(true)
            }
        }
    }

    /// Move a group to `target_index`, clamped to the list. A forward move
    /// compacts by one to account for the removal shift, matching what a
    /// drop gesture over the rendered list means.
    pub fn reorder(&mut self, group_id: &str, target_index: usize) -> bool {
        let Some(current) = self.position(group_id) else {
            return false;
        };
        if self.groups.is_empty() {
            return false;
        }

        let target = target_index.min(self.groups.len() - 1);
        if target == current {
            return true;
        }

        let group = self.groups.remove(current);
        let insert_at = if target > current { target - 1 } else { target };
        self.groups.insert(insert_at.min(self.groups.len()), group);
        true
    }

    /// Prepend imported groups verbatim. Structural validation happened at
    /// the codec boundary; ids are taken as-is.
    pub fn merge_imported(&mut self, imported: Vec<StashGroup>) -> usize {
        let count = imported.len();
        self.groups.splice(0..0, imported);
        count
    }

    /// URL → every (group, tab) referencing it across active groups, in
    /// display order. Only URLs with more than one occurrence are reported.
    pub fn scan_duplicates(&self) -> Vec<DuplicateSet> {
        let mut order: Vec<String> = Vec::new();
        let mut by_url: HashMap<String, Vec<TabRef>> = HashMap::new();

        for group in self.groups.iter().filter(|g| !g.is_trashed()) {
            for tab in &group.tabs {
                let refs = by_url.entry(tab.url.clone()).or_insert_with(|| {
                    order.push(tab.url.clone());
                    Vec::new()
                });
                refs.push(TabRef {
                    group_id: group.id.clone(),
                    tab_id: tab.id.clone(),
                });
            }
        }

        order
            .into_iter()
            .filter_map(|url| {
                let occurrences = by_url.remove(&url)?;
                (occurrences.len() > 1).then_some(DuplicateSet { url, occurrences })
            })
            .collect()
    }

    /// Keep one live copy per duplicated URL and drop the rest through the
    /// per-tab delete policy. Returns the number of tabs removed.
    pub fn remove_duplicates(&mut self, keep: DedupeKeep, now_ms: f64) -> usize {
        let sets = self.scan_duplicates();
        let mut removed = 0;

        for set in sets {
            let keeper = match keep {
                DedupeKeep::Newest => 0,
                DedupeKeep::Oldest => set.occurrences.len() - 1,
            };
            for (idx, occurrence) in set.occurrences.iter().enumerate() {
                if idx == keeper {
                    continue;
                }
                if self.delete_tab(&occurrence.group_id, &occurrence.tab_id, now_ms) {
                    removed += 1;
                }
            }
        }

        removed
    }

    /// Current list filtered by view, tag, and free-text/domain query.
    /// Groups whose tabs all fail the query drop out entirely.
    pub fn view(
        &self,
        filter: ViewFilter,
        tag: Option<&str>,
        query: Option<&str>,
        now_ms: f64,
    ) -> Vec<StashGroup> {
        let query = query.map(|q| q.trim().to_lowercase()).filter(|q| !q.is_empty());

        self.groups
            .iter()
            .filter(|group| match filter {
                ViewFilter::All => !group.is_trashed(),
                ViewFilter::Recent => {
                    !group.is_trashed() && now_ms - group.created_at < RECENT_WINDOW_MS
                }
                ViewFilter::Favorites => !group.is_trashed() && group.favorite,
                ViewFilter::Trash => group.is_trashed(),
            })
            .filter(|group| tag.is_none_or(|t| group.tags.iter().any(|g| g == t)))
            .filter_map(|group| match &query {
                None => Some(group.clone()),
                Some(q) => {
                    let tabs: Vec<TabItem> = group
                        .tabs
                        .iter()
                        .filter(|tab| tab_matches(tab, q))
                        .cloned()
                        .collect();
                    if tabs.is_empty() {
                        None
                    } else {
                        Some(StashGroup { tabs, ..group.clone() })
                    }
                }
            })
            .collect()
    }

    /// Tag → usage count across all groups, for the tag-filter strip.
    pub fn used_tags(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for group in &self.groups {
            for tag in &group.tags {
                *counts.entry(tag.clone()).or_insert(0) += 1;
            }
        }
        counts
    }

    pub fn stats(&self) -> StashStats {
        let trash_count = self.groups.iter().filter(|g| g.is_trashed()).count();
        let active: Vec<&StashGroup> = self.groups.iter().filter(|g| !g.is_trashed()).collect();
        StashStats {
            group_count: active.len(),
            tab_count: active.iter().map(|g| g.tabs.len()).sum(),
            trash_count,
        }
    }

    pub fn group_urls(&self, group_id: &str) -> Option<Vec<String>> {
        self.find(group_id).map(|g| g.urls())
    }

    fn active_urls(&self) -> HashSet<&str> {
        self.groups
            .iter()
            .filter(|g| !g.is_trashed())
            .flat_map(|g| g.tabs.iter().map(|t| t.url.as_str()))
            .collect()
    }
}

/// The inclusion rules shared by manual save and the auto-save tick.
pub fn eligible_tabs<'a>(open_tabs: &'a [TabSnapshot], settings: &Settings) -> Vec<&'a TabSnapshot> {
    open_tabs
        .iter()
        .filter(|tab| !tab.url.is_empty() && !is_internal_url(&tab.url))
        .filter(|tab| settings.include_pinned || !tab.pinned)
        .collect()
}

/// Handles of the open tabs whose URLs actually landed in the saved group.
/// Only these may be closed after a save: with `preventDuplicates`, eligible
/// tabs dropped as already-stashed stay open.
pub fn closable_handles(
    open_tabs: &[TabSnapshot],
    settings: &Settings,
    saved: &StashGroup,
) -> Vec<i32> {
    let saved_urls: HashSet<&str> = saved.tabs.iter().map(|t| t.url.as_str()).collect();
    eligible_tabs(open_tabs, settings)
        .into_iter()
        .filter(|t| saved_urls.contains(t.url.as_str()))
        .map(|t| t.id)
        .collect()
}

fn tab_matches(tab: &TabItem, query: &str) -> bool {
    if tab.title.to_lowercase().contains(query) || tab.url.to_lowercase().contains(query) {
        return true;
    }
    extract_domain(&tab.url).is_some_and(|d| d.contains(query))
}
