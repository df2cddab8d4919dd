/// Data structures for Stash
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const UNTITLED: &str = "Untitled";

pub fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

/// Information about an open browser tab, as reported by the bridge
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabSnapshot {
    pub id: i32,
    pub url: String,
    pub title: String,
    pub pinned: bool,
    #[serde(default)]
    pub fav_icon_url: Option<String>,
}

impl TabSnapshot {
    pub fn new(id: i32, url: String, title: String, pinned: bool) -> TabSnapshot {
        TabSnapshot {
            id,
            url,
            title,
            pinned,
            fav_icon_url: None,
        }
    }
}

/// One saved tab within a stash group
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabItem {
    #[serde(default = "fresh_id")]
    pub id: String,
    #[serde(default = "default_title")]
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub favicon: Option<String>,
}

fn default_title() -> String {
    UNTITLED.to_string()
}

impl TabItem {
    /// Build a saved tab from an open-tab snapshot. Blank titles fall back to
    /// the untitled placeholder.
    pub fn from_snapshot(snapshot: &TabSnapshot) -> TabItem {
        let title = if snapshot.title.trim().is_empty() {
            UNTITLED.to_string()
        } else {
            snapshot.title.clone()
        };
        TabItem {
            id: fresh_id(),
            title,
            url: snapshot.url.clone(),
            favicon: snapshot.fav_icon_url.clone(),
        }
    }
}

/// A saved snapshot of browser tabs.
///
/// `deletedAt` present means the group sits in trash until restored, purged,
/// or expired by the retention sweep. `sourceGroupId` is set only on groups
/// synthesized to coalesce tabs deleted one-by-one from another group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StashGroup {
    #[serde(default = "fresh_id")]
    pub id: String,
    #[serde(default)]
    pub created_at: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<f64>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_group_id: Option<String>,
    #[serde(default)]
    pub auto_saved: bool,
    pub tabs: Vec<TabItem>,
}

impl StashGroup {
    pub fn new(tabs: Vec<TabItem>, now_ms: f64) -> StashGroup {
        StashGroup {
            id: fresh_id(),
            created_at: now_ms,
            deleted_at: None,
            favorite: false,
            tags: Vec::new(),
            source_group_id: None,
            auto_saved: false,
            tabs,
        }
    }

    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn urls(&self) -> Vec<String> {
        self.tabs.iter().map(|t| t.url.clone()).collect()
    }
}

/// User settings, merged over these defaults on load. Keys this version does
/// not know about survive a load/save round trip via `extra`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub close_after_save: bool,
    pub include_pinned: bool,
    pub prevent_duplicates: bool,
    pub auto_save: bool,
    pub auto_save_interval: u32,
    pub theme_mode: String,
    pub language: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            close_after_save: true,
            include_pinned: false,
            prevent_duplicates: false,
            auto_save: false,
            auto_save_interval: 30,
            theme_mode: "system".to_string(),
            language: "en".to_string(),
            extra: serde_json::Map::new(),
        }
    }
}

/// Tag keys the UI offers out of the box; `toggle_tag` accepts any key.
pub const SUGGESTED_TAGS: [&str; 5] = ["work", "personal", "research", "shopping", "reading"];
