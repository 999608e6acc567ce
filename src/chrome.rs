/// Bridge to the `chrome.*` extension APIs (see popup.js)

use crate::page::PageInfo;
use crate::storage::{KeyValueStore, StoreError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn getPageInfo(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn collectPageLinks(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn openTab(url: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;
}

/// The tab the popup was opened on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveTab {
    pub id: i32,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
}

pub async fn active_tab() -> Result<ActiveTab, String> {
    let tab_js = getActiveTab()
        .await
        .map_err(|e| format!("Failed to query active tab: {:?}", e))?;
    serde_wasm_bindgen::from_value(tab_js).map_err(|e| format!("Failed to parse tab: {:?}", e))
}

/// Metadata of the page in `tab_id`; pages the bridge cannot script yield an empty record
pub async fn page_info(tab_id: i32) -> PageInfo {
    match getPageInfo(tab_id).await {
        Ok(info_js) => serde_wasm_bindgen::from_value(info_js).unwrap_or_else(|e| {
            log::warn!("Failed to parse page info: {:?}", e);
            PageInfo::default()
        }),
        Err(e) => {
            log::warn!("Failed to read page info: {:?}", e);
            PageInfo::default()
        }
    }
}

/// Every anchor href on the page in `tab_id`
pub async fn page_links(tab_id: i32) -> Result<Vec<String>, String> {
    let links_js = collectPageLinks(tab_id)
        .await
        .map_err(|e| format!("Failed to scan page: {:?}", e))?;
    serde_wasm_bindgen::from_value(links_js).map_err(|e| format!("Failed to parse links: {:?}", e))
}

pub async fn open_tab(url: &str) -> Result<(), String> {
    openTab(url).await.map_err(|e| format!("Failed to open tab: {:?}", e))
}

/// `chrome.storage.local` as a [`KeyValueStore`]
#[derive(Debug, Default, Clone, Copy)]
pub struct ChromeStorage;

#[async_trait(?Send)]
impl KeyValueStore for ChromeStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let value_js = getStorage(key)
            .await
            .map_err(|e| StoreError::Backend(format!("{:?}", e)))?;

        if value_js.is_null() || value_js.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| StoreError::malformed(format!("{:?}", e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let value_js = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StoreError::Backend(format!("Failed to convert value: {:?}", e)))?;

        setStorage(key, value_js)
            .await
            .map_err(|e| StoreError::Backend(format!("{:?}", e)))
    }
}
