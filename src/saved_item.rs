/// Data structures for saved wiki bookmarks
use crate::canonical::to_canonical_target;
use crate::classify::{classify, RepositoryIdentity};
use crate::config::HostConfig;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A saved bookmark, as persisted in the collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavedItem {
    pub id: String,
    /// Canonical navigation target
    pub url: String,
    /// URL shown in the saved list
    pub display_url: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub saved_at: DateTime<Utc>,
}

/// Legacy save payload: `{ url, title, description? }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavePayload {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// What the caller was looking at when it asked to save
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "source", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum SaveRequest {
    /// Saving while on a repository page. `wiki_url` is a target the caller
    /// already resolved and is stored untouched.
    RepositoryPage {
        identity: RepositoryIdentity,
        page_url: String,
        #[serde(default)]
        wiki_url: Option<String>,
        #[serde(default)]
        description: Option<String>,
    },
    /// Saving a repository found by the link scanner
    ScanResult { repository_url: String },
    /// Saving while on a wiki page, or any page that is not a repository
    WikiPage {
        url: String,
        title: String,
        #[serde(default)]
        description: Option<String>,
    },
}

/// Field values of an item before it gets its id and timestamp
#[derive(Debug, Clone, PartialEq)]
struct ItemFields {
    url: String,
    display_url: String,
    title: String,
    description: Option<String>,
}

impl SaveRequest {
    /// Save request for a repository page; `None` unless `page_url` is one
    pub fn repository_page(page_url: &str, description: Option<String>, hosts: &HostConfig) -> Option<SaveRequest> {
        classify(page_url, hosts).identity().map(|identity| SaveRequest::RepositoryPage {
            identity: identity.clone(),
            page_url: page_url.to_string(),
            wiki_url: None,
            description,
        })
    }

    pub fn scan_result(repository_url: &str) -> SaveRequest {
        SaveRequest::ScanResult {
            repository_url: repository_url.to_string(),
        }
    }

    pub fn wiki_page(url: &str, title: &str, description: Option<String>) -> SaveRequest {
        SaveRequest::WikiPage {
            url: url.to_string(),
            title: title.to_string(),
            description,
        }
    }

    /// Reconstruct the caller's intent from a legacy payload
    ///
    /// A repository URL may arrive in either field:
    /// - `url` is already a wiki URL → the repository page is in `title`
    /// - otherwise `url` is the page being saved and gets canonicalized
    ///
    /// Payloads with no repository URL in either field are wiki pages.
    pub fn from_payload(payload: SavePayload, hosts: &HostConfig) -> SaveRequest {
        let url_category = classify(&payload.url, hosts);
        let identity = url_category
            .identity()
            .or(classify(&payload.title, hosts).identity())
            .cloned();

        match identity {
            Some(identity) if url_category.is_wiki() => SaveRequest::RepositoryPage {
                identity,
                page_url: payload.title,
                wiki_url: Some(payload.url),
                description: payload.description,
            },
            Some(identity) => SaveRequest::RepositoryPage {
                identity,
                page_url: payload.url,
                wiki_url: None,
                description: payload.description,
            },
            None => SaveRequest::WikiPage {
                url: payload.url,
                title: payload.title,
                description: payload.description,
            },
        }
    }

    fn into_fields(self, hosts: &HostConfig) -> ItemFields {
        match self {
            SaveRequest::RepositoryPage {
                identity,
                page_url,
                wiki_url,
                description,
            } => ItemFields {
                url: wiki_url.unwrap_or_else(|| to_canonical_target(&page_url, hosts)),
                display_url: page_url.clone(),
                title: page_url,
                description: non_empty(description).or_else(|| Some(identity.label())),
            },
            SaveRequest::ScanResult { repository_url } => ItemFields {
                url: to_canonical_target(&repository_url, hosts),
                display_url: repository_url.clone(),
                description: classify(&repository_url, hosts).identity().map(|i| i.label()),
                title: repository_url,
            },
            SaveRequest::WikiPage { url, title, description } => ItemFields {
                display_url: url.clone(),
                url,
                title,
                description: non_empty(description),
            },
        }
    }
}

impl SavedItem {
    /// Build a new item with a fresh id, stamped `saved_at`
    pub fn create(request: SaveRequest, hosts: &HostConfig, saved_at: DateTime<Utc>) -> SavedItem {
        let fields = request.into_fields(hosts);
        SavedItem {
            id: uuid::Uuid::new_v4().to_string(),
            url: fields.url,
            display_url: fields.display_url,
            title: fields.title,
            description: fields.description,
            saved_at,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
