/// Persistence over chrome.storage.local: the `tabGroups` and `settings`
/// records, loaded and flushed as one snapshot around every operation.
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::error::StashError;
use crate::stash_data::{Settings, StashGroup};

pub const GROUPS_KEY: &str = "tabGroups";
pub const SETTINGS_KEY: &str = "settings";

#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// One logical copy of everything the extension persists.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct StoreSnapshot {
    pub groups: Vec<StashGroup>,
    pub settings: Settings,
}

impl StoreSnapshot {
    pub fn new(groups: Vec<StashGroup>, settings: Settings) -> StoreSnapshot {
        StoreSnapshot { groups, settings }
    }
}

/// Load both records. A never-initialized store yields an empty list and
/// default settings; stored settings merge over defaults field by field.
pub async fn load() -> Result<StoreSnapshot, StashError> {
    let groups_js = getStorage(GROUPS_KEY)
        .await
        .map_err(|e| StashError::Storage(format!("{e:?}")))?;
    let groups: Vec<StashGroup> = if groups_js.is_null() || groups_js.is_undefined() {
        Vec::new()
    } else {
        serde_wasm_bindgen::from_value(groups_js)
            .map_err(|e| StashError::Storage(format!("corrupt tabGroups record: {e:?}")))?
    };

    let settings_js = getStorage(SETTINGS_KEY)
        .await
        .map_err(|e| StashError::Storage(format!("{e:?}")))?;
    let settings: Settings = if settings_js.is_null() || settings_js.is_undefined() {
        Settings::default()
    } else {
        serde_wasm_bindgen::from_value(settings_js)
            .map_err(|e| StashError::Storage(format!("corrupt settings record: {e:?}")))?
    };

    Ok(StoreSnapshot { groups, settings })
}

pub async fn save_groups(groups: &[StashGroup]) -> Result<(), StashError> {
    let value = serde_wasm_bindgen::to_value(groups)
        .map_err(|e| StashError::Storage(format!("{e:?}")))?;
    setStorage(GROUPS_KEY, value)
        .await
        .map_err(|e| StashError::Storage(format!("{e:?}")))
}

pub async fn save_settings(settings: &Settings) -> Result<(), StashError> {
    let value = serde_wasm_bindgen::to_value(settings)
        .map_err(|e| StashError::Storage(format!("{e:?}")))?;
    setStorage(SETTINGS_KEY, value)
        .await
        .map_err(|e| StashError::Storage(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stash_data::TabItem;

    #[test]
    fn test_snapshot_default_is_empty() {
        let snapshot = StoreSnapshot::default();
        assert!(snapshot.groups.is_empty());
        assert_eq!(snapshot.settings, Settings::default());
    }

    #[test]
    fn test_snapshot_serialization_round_trip() {
        let snapshot = StoreSnapshot::new(
            vec![StashGroup::new(
                vec![TabItem {
                    id: "t1".to_string(),
                    title: "Example".to_string(),
                    url: "https://example.com".to_string(),
                    favicon: None,
                }],
                1_700_000_000_000.0,
            )],
            Settings {
                language: "tr".to_string(),
                ..Settings::default()
            },
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let back: StoreSnapshot = serde_json::from_str(&json).unwrap();

        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_groups_record_tolerates_legacy_shape() {
        // Records written before trash/tags existed still load.
        let json = r#"[{"id":"g1","createdAt":1.0,"favorite":true,
            "tabs":[{"id":"t1","title":"Old","url":"https://old"}]}]"#;
        let groups: Vec<StashGroup> = serde_json::from_str(json).unwrap();

        assert_eq!(groups[0].deleted_at, None);
        assert!(groups[0].tags.is_empty());
        assert!(!groups[0].auto_saved);
    }
}
