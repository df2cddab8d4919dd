/// Bridge to the host browser: tab enumeration, open/close, wall clock
use wasm_bindgen::prelude::*;

use crate::stash_data::TabSnapshot;

// Import JS bridge functions
#[wasm_bindgen(module = "/bridge.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn enumerateOpenTabs(current_window_only: bool) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn closeTabs(tab_ids: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    fn nowIso() -> Result<JsValue, JsValue>;
}

/// Schemes the host flags as non-content; pages behind them are never
/// eligible for stashing.
const INTERNAL_SCHEMES: [&str; 7] = [
    "chrome",
    "chrome-extension",
    "about",
    "edge",
    "moz-extension",
    "view-source",
    "devtools",
];

pub fn is_internal_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => INTERNAL_SCHEMES.contains(&parsed.scheme()),
        // Unparseable strings are not restorable tabs either
        Err(_) => true,
    }
}

pub async fn open_tabs(current_window_only: bool) -> Result<Vec<TabSnapshot>, String> {
    let tabs_js = enumerateOpenTabs(current_window_only)
        .await
        .map_err(|e| format!("Failed to get tabs: {e:?}"))?;
    serde_wasm_bindgen::from_value(tabs_js).map_err(|e| format!("Failed to parse tabs: {e:?}"))
}

pub async fn open_url(url: &str) -> Result<(), String> {
    openTab(url).await.map_err(|e| format!("Failed to open tab: {e:?}"))
}

pub async fn close_tab_handles(tab_ids: &[i32]) -> Result<(), String> {
    let ids_js =
        serde_wasm_bindgen::to_value(tab_ids).map_err(|e| format!("Failed to serialize: {e:?}"))?;
    closeTabs(ids_js).await.map_err(|e| format!("Failed to close tabs: {e:?}"))
}

pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

pub fn now_iso() -> String {
    nowIso()
        .ok()
        .and_then(|v| v.as_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_urls_rejected() {
        assert!(is_internal_url("chrome://settings"));
        assert!(is_internal_url("chrome-extension://abcdef/popup.html"));
        assert!(is_internal_url("about:blank"));
        assert!(is_internal_url("edge://flags"));
        assert!(is_internal_url("moz-extension://abcdef/page.html"));
        assert!(is_internal_url("view-source:https://example.com"));
        assert!(is_internal_url("devtools://devtools/bundled/inspector.html"));
    }

    #[test]
    fn test_content_urls_accepted() {
        assert!(!is_internal_url("https://example.com"));
        assert!(!is_internal_url("http://localhost:3000/app"));
        assert!(!is_internal_url("ftp://files.example.com"));
        assert!(!is_internal_url("file:///home/user/notes.html"));
    }

    #[test]
    fn test_unparseable_urls_rejected() {
        assert!(is_internal_url(""));
        assert!(is_internal_url("not a url"));
    }
}
