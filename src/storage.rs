/// Persistence of the saved-item collection over a key-value backend

use crate::config::{HostConfig, STORAGE_KEY};
use crate::saved_item::{SavePayload, SaveRequest, SavedItem};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend rejected the request: {0}")]
    Backend(String),
    #[error("stored collection is malformed: {0}")]
    Malformed(String),
}

impl StoreError {
    /// A stored value that cannot be read back as a collection, whichever layer noticed
    pub fn malformed(detail: impl std::fmt::Display) -> Self {
        StoreError::Malformed(detail.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::malformed(e)
    }
}

/// `get`/`set` over whole JSON values, one key per collection
#[async_trait(?Send)]
pub trait KeyValueStore {
    /// `None` when the key was never written
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError>;
}

#[async_trait(?Send)]
impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        (**self).set(key, value).await
    }
}

/// In-process backend, used by tests and anything embedding the store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}

/// The persisted collection: a JSON array of items in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedCollection {
    pub items: Vec<SavedItem>,
}

impl SavedCollection {
    pub fn new() -> Self {
        SavedCollection { items: Vec::new() }
    }

    pub fn add_item(&mut self, item: SavedItem) {
        self.items.push(item);
    }

    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() < original_len
    }
}

/// Saved items over a [`KeyValueStore`]
///
/// Every write is a read-modify-write of the whole collection with no lock
/// or version check: two overlapping writes resolve last-writer-wins.
pub struct SavedItemStore<B> {
    backend: B,
    key: String,
    hosts: HostConfig,
}

impl<B: KeyValueStore> SavedItemStore<B> {
    pub fn new(backend: B) -> Self {
        SavedItemStore {
            backend,
            key: STORAGE_KEY.to_string(),
            hosts: HostConfig::default(),
        }
    }

    pub fn with_hosts(mut self, hosts: HostConfig) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn with_key(mut self, key: &str) -> Self {
        self.key = key.to_string();
        self
    }

    pub fn hosts(&self) -> &HostConfig {
        &self.hosts
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// All saved items in storage order; empty when nothing was saved yet
    pub async fn list(&self) -> Result<Vec<SavedItem>, StoreError> {
        Ok(self.load().await?.items)
    }

    /// Append a new item for `request` and write the collection back
    pub async fn save(&self, request: SaveRequest) -> Result<SavedItem, StoreError> {
        let mut collection = self.load().await?;
        let item = SavedItem::create(request, &self.hosts, Utc::now());

        collection.add_item(item.clone());
        self.write(&collection).await?;

        log::info!("Saved {} ({}), total: {}", item.url, item.id, collection.items.len());
        Ok(item)
    }

    pub async fn save_payload(&self, payload: SavePayload) -> Result<SavedItem, StoreError> {
        let request = SaveRequest::from_payload(payload, &self.hosts);
        self.save(request).await
    }

    /// Remove the item with `id`; an unknown id is not an error
    pub async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let mut collection = self.load().await?;

        if !collection.remove_item(id) {
            log::debug!("No saved item with id {}", id);
        }
        self.write(&collection).await?;

        log::info!("Deleted {}, remaining: {}", id, collection.items.len());
        Ok(())
    }

    async fn load(&self) -> Result<SavedCollection, StoreError> {
        match self.backend.get(&self.key).await? {
            None | Some(Value::Null) => Ok(SavedCollection::new()),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    async fn write(&self, collection: &SavedCollection) -> Result<(), StoreError> {
        let value = serde_json::to_value(collection)?;
        self.backend.set(&self.key, value).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::Cell;

    /// Backend whose reads or writes can be switched to reject
    #[derive(Default)]
    pub(crate) struct FlakyStore {
        pub inner: MemoryStore,
        pub fail_reads: Cell<bool>,
        pub fail_writes: Cell<bool>,
    }

    #[async_trait(?Send)]
    impl KeyValueStore for FlakyStore {
        async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
            if self.fail_reads.get() {
                return Err(StoreError::Backend("read rejected".to_string()));
            }
            self.inner.get(key).await
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
            if self.fail_writes.get() {
                return Err(StoreError::Backend("quota exceeded".to_string()));
            }
            self.inner.set(key, value).await
        }
    }

    fn store() -> SavedItemStore<MemoryStore> {
        SavedItemStore::new(MemoryStore::new())
    }

    fn scan(url: &str) -> SaveRequest {
        SaveRequest::scan_result(url)
    }

    #[test]
    fn test_collection_new() {
        let collection = SavedCollection::new();
        assert_eq!(collection.items.len(), 0);
    }

    #[test]
    fn test_collection_remove_nonexistent_item() {
        let mut collection = SavedCollection::new();
        collection.add_item(SavedItem::create(scan("https://github.com/a/b"), &HostConfig::default(), Utc::now()));

        assert!(!collection.remove_item("nonexistent"));
        assert_eq!(collection.items.len(), 1);
    }

    #[test]
    fn test_collection_serializes_as_array() {
        let mut collection = SavedCollection::new();
        let item = SavedItem::create(scan("https://github.com/a/b"), &HostConfig::default(), Utc::now());
        let id = item.id.clone();
        collection.add_item(item);

        let json = serde_json::to_value(&collection).unwrap();
        assert!(json.is_array());

        let restored: SavedCollection = serde_json::from_value(json).unwrap();
        assert!(restored.items.iter().any(|item| item.id == id));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let store = store();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_treats_null_as_empty() {
        let store = store();
        store.backend().set(STORAGE_KEY, Value::Null).await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_repository_page_then_list() {
        let store = store();
        let before = Utc::now();

        let request = SaveRequest::repository_page("https://github.com/openai/whisper", None, store.hosts()).unwrap();
        let saved = store.save(request).await.unwrap();
        let items = store.list().await.unwrap();

        let last = items.last().unwrap();
        assert_eq!(last, &saved);
        assert!(!last.id.is_empty());
        assert_eq!(last.url, "https://deepwiki.com/openai/whisper");
        assert_eq!(last.display_url, "https://github.com/openai/whisper");
        assert_eq!(last.title, "https://github.com/openai/whisper");
        assert_eq!(last.description.as_deref(), Some("openai/whisper"));
        assert!(last.saved_at >= before);
    }

    #[tokio::test]
    async fn test_save_payload_uses_legacy_rules() {
        let store = store();

        let item = store
            .save_payload(SavePayload {
                url: "https://deepwiki.com/openai/whisper".to_string(),
                title: "https://github.com/openai/whisper".to_string(),
                description: Some(String::new()),
            })
            .await
            .unwrap();

        assert_eq!(item.url, "https://deepwiki.com/openai/whisper");
        assert_eq!(item.display_url, "https://github.com/openai/whisper");
        assert_eq!(item.description.as_deref(), Some("openai/whisper"));
    }

    #[tokio::test]
    async fn test_save_appends_in_order_without_dedupe() {
        let store = store();

        let first = store.save(scan("https://github.com/openai/whisper")).await.unwrap();
        let second = store
            .save(SaveRequest::wiki_page("https://deepwiki.com/example.com", "Example", None))
            .await
            .unwrap();
        let third = store.save(scan("https://github.com/openai/whisper")).await.unwrap();

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![first.id.clone(), second.id, third.id.clone()]);
        assert_ne!(first.id, third.id);
        assert_eq!(first.url, third.url);
    }

    #[tokio::test]
    async fn test_scan_flow_matches_repository_page_target() {
        let store = store();
        let links = vec!["https://github.com/openai/whisper".to_string()];
        let reduced = crate::scan::collect_repository_links(&links, store.hosts());

        let from_scan = store.save(scan(&reduced[0])).await.unwrap();
        let from_page = store
            .save(SaveRequest::repository_page("https://github.com/openai/whisper/tree/main/tests", None, store.hosts()).unwrap())
            .await
            .unwrap();

        assert_eq!(from_scan.url, from_page.url);
        assert_eq!(from_scan.description, from_page.description);
    }

    #[tokio::test]
    async fn test_delete_keeps_others_in_order() {
        let store = store();
        let a = store.save(scan("https://github.com/a/one")).await.unwrap();
        let b = store.save(scan("https://github.com/b/two")).await.unwrap();
        let c = store.save(scan("https://github.com/c/three")).await.unwrap();

        store.delete_by_id(&b.id).await.unwrap();

        let items = store.list().await.unwrap();
        assert_eq!(items, vec![a, c]);
        assert!(items.iter().all(|i| i.id != b.id));
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_noop() {
        let store = store();
        store.save(scan("https://github.com/a/one")).await.unwrap();
        let before = store.list().await.unwrap();

        store.delete_by_id("does-not-exist").await.unwrap();

        assert_eq!(store.list().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_delete_on_empty_store() {
        let store = store();
        store.delete_by_id("anything").await.unwrap();
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_collection_survives_new_store_instance() {
        let backend = MemoryStore::new();
        let id = {
            let store = SavedItemStore::new(&backend);
            store.save(scan("https://github.com/a/one")).await.unwrap().id
        };

        let reopened = SavedItemStore::new(&backend);
        let items = reopened.list().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, id);
    }

    #[tokio::test]
    async fn test_custom_key_isolated() {
        let backend = MemoryStore::new();
        let store = SavedItemStore::new(&backend).with_key("other");
        store.save(scan("https://github.com/a/one")).await.unwrap();

        assert!(SavedItemStore::new(&backend).list().await.unwrap().is_empty());
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_write_failure_is_reported_and_leaves_collection() {
        let store = SavedItemStore::new(FlakyStore::default());
        let kept = store.save(scan("https://github.com/a/one")).await.unwrap();

        store.backend().fail_writes.set(true);
        let result = store.save(scan("https://github.com/b/two")).await;
        assert!(matches!(result, Err(StoreError::Backend(_))));
        assert!(store.delete_by_id(&kept.id).await.is_err());

        store.backend().fail_writes.set(false);
        assert_eq!(store.list().await.unwrap(), vec![kept]);
    }

    #[tokio::test]
    async fn test_read_failure_is_reported() {
        let store = SavedItemStore::new(FlakyStore::default());
        store.backend().fail_reads.set(true);

        assert!(store.list().await.is_err());
        assert!(store.save(scan("https://github.com/a/one")).await.is_err());

        store.backend().fail_reads.set(false);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_collection_is_an_error() {
        let store = store();
        store
            .backend()
            .set(STORAGE_KEY, serde_json::json!({"not": "an array"}))
            .await
            .unwrap();

        assert!(matches!(store.list().await, Err(StoreError::Malformed(_))));
    }

    #[test]
    fn test_conversion_failures_share_malformed_variant() {
        let from_json: StoreError = serde_json::from_str::<SavedCollection>("{}").unwrap_err().into();
        let from_bridge = StoreError::malformed("invalid type: map, expected a sequence");

        assert!(matches!(from_json, StoreError::Malformed(_)));
        assert!(matches!(from_bridge, StoreError::Malformed(_)));
        assert!(from_bridge.to_string().starts_with("stored collection is malformed"));
    }

    #[tokio::test]
    async fn test_custom_hosts_flow_into_saved_items() {
        let hosts = HostConfig {
            wiki_host: "wiki.internal".to_string(),
            ..HostConfig::default()
        };
        let store = store().with_hosts(hosts);

        let item = store.save(scan("https://github.com/openai/whisper")).await.unwrap();
        assert_eq!(item.url, "https://wiki.internal/openai/whisper");
    }
}
