/// Reduction of scanned page links to repository URLs

use crate::classify::{classify, UrlCategory};
use crate::config::HostConfig;
use std::collections::HashSet;

/// Reduce raw anchor hrefs to unique repository root URLs (keep first occurrence)
///
/// Only links pointing at a repository root page (`/owner/name`, nothing
/// deeper) are kept. Each survivor is rewritten to
/// `https://<repository_host>/<owner>/<name>`, dropping `www.`, query string
/// and fragment, so two anchors differing only in those collapse into one.
pub fn collect_repository_links(hrefs: &[String], hosts: &HostConfig) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut urls = Vec::new();

    for href in hrefs {
        if let UrlCategory::RepositoryOrigin { identity, exact_repo_page: true } = classify(href, hosts) {
            let clean = hosts.repository_url(&identity.owner, &identity.name);
            if seen.insert(clean.clone()) {
                urls.push(clean);
            }
        }
    }

    log::debug!("Reduced {} links to {} repositories", hrefs.len(), urls.len());
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links(hrefs: &[&str]) -> Vec<String> {
        hrefs.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_keeps_repository_roots_only() {
        let hrefs = links(&[
            "https://github.com/openai/whisper",
            "https://github.com/openai/whisper/tree/main/tests",
            "https://github.com/openai",
            "https://github.com/",
            "https://example.com/openai/whisper",
            "https://deepwiki.com/openai/whisper",
            "javascript:void(0)",
            "#readme",
        ]);

        let urls = collect_repository_links(&hrefs, &HostConfig::default());

        assert_eq!(urls, vec!["https://github.com/openai/whisper".to_string()]);
    }

    #[test]
    fn test_cleans_query_fragment_and_www() {
        let hrefs = links(&[
            "https://www.github.com/rust-lang/rust?tab=readme#top",
            "http://github.com/yewstack/yew/",
        ]);

        let urls = collect_repository_links(&hrefs, &HostConfig::default());

        assert_eq!(
            urls,
            vec![
                "https://github.com/rust-lang/rust".to_string(),
                "https://github.com/yewstack/yew".to_string(),
            ]
        );
    }

    #[test]
    fn test_deduplicates_keeping_first_seen_order() {
        let hrefs = links(&[
            "https://github.com/b/two",
            "https://github.com/a/one",
            "https://github.com/b/two#anchor",
            "https://www.github.com/a/one",
            "https://github.com/c/three",
        ]);

        let urls = collect_repository_links(&hrefs, &HostConfig::default());

        assert_eq!(
            urls,
            vec![
                "https://github.com/b/two".to_string(),
                "https://github.com/a/one".to_string(),
                "https://github.com/c/three".to_string(),
            ]
        );
    }

    #[test]
    fn test_no_links() {
        assert!(collect_repository_links(&[], &HostConfig::default()).is_empty());
    }
}
