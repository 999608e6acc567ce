/// Canonical wiki targets for arbitrary URLs
use crate::classify::{classify_parsed, path_segments, UrlCategory};
use crate::config::HostConfig;
use url::Url;

/// Map a URL to the single wiki URL it navigates to
///
/// - Repository pages (root or any sub-page) → `https://<wiki>/<owner>/<name>`
/// - Pages already on the wiki host → their first two path segments, unchanged
/// - Any other page with a host → `https://<wiki>/<hostname>`
/// - Unparsable input, or a URL without a host → returned as-is
///
/// The mapping is idempotent: every target it produces is a wiki-host URL
/// with at most two path segments, which maps to itself.
///
/// Examples:
/// - https://github.com/openai/whisper/tree/main → https://deepwiki.com/openai/whisper
/// - https://example.com/some/page → https://deepwiki.com/example.com
pub fn to_canonical_target(url: &str, hosts: &HostConfig) -> String {
    let parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(_) => return url.to_string(),
    };

    if let UrlCategory::RepositoryOrigin { identity, .. } = classify_parsed(url, &parsed, hosts) {
        return hosts.wiki_url(&[identity.owner.as_str(), identity.name.as_str()]);
    }

    let Some(host) = parsed.host_str() else {
        return url.to_string();
    };

    if hosts.is_wiki_host(host) {
        let segments = path_segments(&parsed);
        if !segments.is_empty() {
            let keep = segments.len().min(2);
            return hosts.wiki_url(&segments[..keep]);
        }
    }

    hosts.wiki_url(&[host])
}
