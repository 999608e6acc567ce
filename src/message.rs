/// Typed requests between the popup and the saved-item store

use crate::canonical::to_canonical_target;
use crate::saved_item::{SaveRequest, SavedItem};
use crate::scan::collect_repository_links;
use crate::storage::{KeyValueStore, SavedItemStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Resolve the wiki page for `url`
    Switch { url: String },
    /// Reduce raw anchor hrefs to repository URLs
    Scan { links: Vec<String> },
    Save(SaveRequest),
    List,
    Delete { id: String },
}

impl Request {
    pub fn name(&self) -> &'static str {
        match self {
            Request::Switch { .. } => "SWITCH",
            Request::Scan { .. } => "SCAN",
            Request::Save(_) => "SAVE",
            Request::List => "LIST",
            Request::Delete { .. } => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Response {
    Navigate { url: String },
    Urls { urls: Vec<String> },
    Saved { item: SavedItem },
    Items { items: Vec<SavedItem> },
    Deleted,
    /// Any storage failure; callers only get a message
    Failure { message: String },
}

/// Execute `request` against `store`
pub async fn dispatch<B: KeyValueStore>(store: &SavedItemStore<B>, request: Request) -> Response {
    log::debug!("Dispatching {}", request.name());

    let result = match request {
        Request::Switch { url } => Ok(Response::Navigate {
            url: to_canonical_target(&url, store.hosts()),
        }),
        Request::Scan { links } => Ok(Response::Urls {
            urls: collect_repository_links(&links, store.hosts()),
        }),
        Request::Save(save) => store.save(save).await.map(|item| Response::Saved { item }),
        Request::List => store.list().await.map(|items| Response::Items { items }),
        Request::Delete { id } => store.delete_by_id(&id).await.map(|_| Response::Deleted),
    };

    result.unwrap_or_else(|e| {
        log::error!("Request failed: {}", e);
        Response::Failure { message: e.to_string() }
    })
}
