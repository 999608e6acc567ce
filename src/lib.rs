/// Tingly Deepwiki - Chrome Extension for switching between GitHub and DeepWiki
/// Built with Rust + WASM + Yew

pub mod canonical;
pub mod chrome;
pub mod classify;
pub mod config;
pub mod message;
pub mod page;
pub mod saved_item;
pub mod scan;
pub mod storage;
pub mod ui;

use wasm_bindgen::prelude::*;

pub use canonical::to_canonical_target;
pub use classify::{classify, RepositoryIdentity, UrlCategory};
pub use config::HostConfig;
pub use saved_item::{SavePayload, SaveRequest, SavedItem};
pub use storage::{KeyValueStore, MemoryStore, SavedItemStore, StoreError};

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export core URL functions for JavaScript access
#[wasm_bindgen]
pub fn classify_url(url: &str) -> JsValue {
    let category = classify::classify(url, &HostConfig::default());
    serde_wasm_bindgen::to_value(&category).unwrap_or(JsValue::NULL)
}

#[wasm_bindgen(js_name = toCanonicalTarget)]
pub fn canonical_target(url: &str) -> String {
    canonical::to_canonical_target(url, &HostConfig::default())
}

// Start the Yew app for the popup
#[wasm_bindgen]
pub fn start_popup() {
    yew::Renderer::<ui::popup::App>::new().render();
}
