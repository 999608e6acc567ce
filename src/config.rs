/// Host configuration for URL classification and canonicalization
use serde::Deserialize;
use url::Url;

/// Storage key holding the whole saved-item collection
pub const STORAGE_KEY: &str = "savedDeepwikis";

/// The designated hosts the classifier and canonicalizer work against.
///
/// - `repository_host`: the code-hosting domain (`www.` is always ignored)
/// - `wiki_host`: the domain canonical targets are built on
/// - `wiki_marker`: substring identifying any wiki-generation host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostConfig {
    pub repository_host: String,
    pub wiki_host: String,
    pub wiki_marker: String,
}

impl HostConfig {
    /// Build a wiki URL from path segments: `https://<wiki_host>/<a>/<b>`
    ///
    /// The result is re-serialized by the URL parser, so characters a host
    /// may carry but a path may not (`{`, `}`, `"`) come out percent-encoded.
    /// Segments that are already encoded are left alone.
    pub fn wiki_url(&self, segments: &[&str]) -> String {
        let raw = format!("https://{}/{}", self.wiki_host, segments.join("/"));
        Url::parse(&raw).map(|url| url.to_string()).unwrap_or(raw)
    }

    /// Clean repository URL: `https://<repository_host>/<owner>/<name>`
    pub fn repository_url(&self, owner: &str, name: &str) -> String {
        format!("https://{}/{}/{}", self.repository_host, owner, name)
    }

    pub fn is_repository_host(&self, host: &str) -> bool {
        normalize_host(host) == self.repository_host
    }

    pub fn is_wiki_host(&self, host: &str) -> bool {
        normalize_host(host) == self.wiki_host
    }

    pub fn has_wiki_marker(&self, host: &str) -> bool {
        host.to_lowercase().contains(&self.wiki_marker)
    }
}

impl Default for HostConfig {
    fn default() -> Self {
        HostConfig {
            repository_host: "github.com".to_string(),
            wiki_host: "deepwiki.com".to_string(),
            wiki_marker: "deepwiki".to_string(),
        }
    }
}

/// Lowercase a hostname and drop a leading `www.`
fn normalize_host(host: &str) -> String {
    let host = host.to_lowercase();
    match host.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => host,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_hosts() {
        let hosts = HostConfig::default();
        assert_eq!(hosts.repository_host, "github.com");
        assert_eq!(hosts.wiki_host, "deepwiki.com");
        assert_eq!(hosts.wiki_marker, "deepwiki");
    }

    #[test]
    fn test_repository_host_ignores_www_and_case() {
        let hosts = HostConfig::default();
        assert!(hosts.is_repository_host("github.com"));
        assert!(hosts.is_repository_host("www.github.com"));
        assert!(hosts.is_repository_host("WWW.GitHub.com"));
        assert!(!hosts.is_repository_host("gist.github.com"));
        assert!(!hosts.is_repository_host("github.com.evil.io"));
    }

    #[test]
    fn test_wiki_marker_is_substring_match() {
        let hosts = HostConfig::default();
        assert!(hosts.has_wiki_marker("deepwiki.com"));
        assert!(hosts.has_wiki_marker("deepwiki.example.com"));
        assert!(!hosts.has_wiki_marker("wiki.example.com"));
    }

    #[test]
    fn test_url_builders() {
        let hosts = HostConfig::default();
        assert_eq!(hosts.wiki_url(&["openai", "whisper"]), "https://deepwiki.com/openai/whisper");
        assert_eq!(hosts.wiki_url(&["example.com"]), "https://deepwiki.com/example.com");
        assert_eq!(hosts.repository_url("openai", "whisper"), "https://github.com/openai/whisper");
    }

    #[test]
    fn test_wiki_url_encodes_host_only_characters() {
        let hosts = HostConfig::default();
        assert_eq!(hosts.wiki_url(&["a{b.com"]), "https://deepwiki.com/a%7Bb.com");
        assert_eq!(hosts.wiki_url(&["a%7Bb.com"]), "https://deepwiki.com/a%7Bb.com");
        assert_eq!(hosts.wiki_url(&["a%20b", "c"]), "https://deepwiki.com/a%20b/c");
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let hosts: HostConfig = serde_json::from_str(r#"{"wikiHost":"wiki.internal"}"#).unwrap();
        assert_eq!(hosts.wiki_host, "wiki.internal");
        assert_eq!(hosts.repository_host, "github.com");
    }
}
