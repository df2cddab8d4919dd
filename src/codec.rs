/// Import/export codec for the portable stash document
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::StashError;
use crate::stash_data::StashGroup;

pub const EXPORT_VERSION: &str = "1.1";

/// The exported document: version tag, timestamp, and the full group list
/// (trash included, verbatim).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    pub version: String,
    pub exported_at: String,
    pub groups: Vec<StashGroup>,
}

pub fn export(groups: &[StashGroup], exported_at_iso: &str) -> Result<String, StashError> {
    let document = ExportDocument {
        version: EXPORT_VERSION.to_string(),
        exported_at: exported_at_iso.to_string(),
        groups: groups.to_vec(),
    };
    serde_json::to_string_pretty(&document).map_err(|e| StashError::Storage(e.to_string()))
}

/// Suggested download name, e.g. `stash-export-2026-08-25.json`.
pub fn export_filename(date_iso: &str) -> String {
    let date = date_iso.split('T').next().unwrap_or(date_iso);
    format!("stash-export-{date}.json")
}

/// Parse an import document. Accepts the versioned wrapper or, as a
/// historical fallback, a bare array of groups. Any record without a
/// non-empty `tabs` array fails the whole document; nothing is partially
/// imported. A zero-tab group could never have been exported, and letting
/// one through would persist an empty active group.
pub fn import(raw: &str) -> Result<Vec<StashGroup>, StashError> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| StashError::InvalidFormat(format!("not valid JSON: {e}")))?;

    let groups_value = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut fields) => fields
            .remove("groups")
            .ok_or_else(|| StashError::InvalidFormat("missing groups array".to_string()))?,
        _ => return Err(StashError::InvalidFormat("expected object or array".to_string())),
    };

    if !groups_value.is_array() {
        return Err(StashError::InvalidFormat("groups is not an array".to_string()));
    }

    let groups: Vec<StashGroup> = serde_json::from_value(groups_value)
        .map_err(|e| StashError::InvalidFormat(format!("malformed group record: {e}")))?;

    if groups.iter().any(|g| g.tabs.is_empty()) {
        return Err(StashError::InvalidFormat("group record with empty tabs".to_string()));
    }

    Ok(groups)
}
