/// URL classification for repository and wiki pages
use crate::config::HostConfig;
use serde::{Deserialize, Serialize};
use url::Url;

/// Owner/name pair identifying a repository
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryIdentity {
    pub owner: String,
    pub name: String,
}

impl RepositoryIdentity {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        RepositoryIdentity {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// `owner/name`, used as the fallback description of a saved repository
    pub fn label(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// What kind of page a URL points at
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "camelCase")]
pub enum UrlCategory {
    RepositoryOrigin {
        identity: RepositoryIdentity,
        #[serde(rename = "isExactRepoPage")]
        exact_repo_page: bool,
    },
    DerivedWiki(String),
    Other(String),
}

impl UrlCategory {
    pub fn identity(&self) -> Option<&RepositoryIdentity> {
        match self {
            UrlCategory::RepositoryOrigin { identity, .. } => Some(identity),
            _ => None,
        }
    }

    pub fn is_repository(&self) -> bool {
        matches!(self, UrlCategory::RepositoryOrigin { .. })
    }

    pub fn is_exact_repo_page(&self) -> bool {
        matches!(self, UrlCategory::RepositoryOrigin { exact_repo_page: true, .. })
    }

    pub fn is_wiki(&self) -> bool {
        matches!(self, UrlCategory::DerivedWiki(_))
    }
}

/// Classify a URL against the configured repository and wiki hosts
///
/// Algorithm:
/// 1. Parse the URL; anything unparsable is `Other`
/// 2. Repository host (case-insensitive, `www.` ignored):
///    → first two non-empty path segments become the identity
///    → exactly two segments marks the repository root page
///    → fewer than two segments is `Other`
/// 3. Host containing the wiki marker → `DerivedWiki`
/// 4. Anything else → `Other`
///
/// Scheme, query string and fragment never influence the result.
///
/// Examples:
/// - https://github.com/openai/whisper → RepositoryOrigin (exact)
/// - https://www.github.com/openai/whisper/tree/main → RepositoryOrigin (sub-page)
/// - https://deepwiki.com/openai/whisper → DerivedWiki
/// - https://github.com/ → Other
pub fn classify(url: &str, hosts: &HostConfig) -> UrlCategory {
    match Url::parse(url) {
        Ok(parsed) => classify_parsed(url, &parsed, hosts),
        Err(_) => UrlCategory::Other(url.to_string()),
    }
}

pub(crate) fn classify_parsed(raw: &str, parsed: &Url, hosts: &HostConfig) -> UrlCategory {
    let Some(host) = parsed.host_str() else {
        return UrlCategory::Other(raw.to_string());
    };

    if hosts.is_repository_host(host) {
        let segments = path_segments(parsed);
        if segments.len() < 2 {
            return UrlCategory::Other(raw.to_string());
        }
        return UrlCategory::RepositoryOrigin {
            identity: RepositoryIdentity::new(segments[0], segments[1]),
            exact_repo_page: segments.len() == 2,
        };
    }

    if hosts.has_wiki_marker(host) {
        UrlCategory::DerivedWiki(raw.to_string())
    } else {
        UrlCategory::Other(raw.to_string())
    }
}

/// Non-empty path segments of a parsed URL
pub(crate) fn path_segments(parsed: &Url) -> Vec<&str> {
    parsed
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}
