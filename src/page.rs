/// Page metadata scraped from the active tab
use crate::config::HostConfig;
use serde::{Deserialize, Serialize};
use url::Url;

/// Metadata the page-info bridge reads out of the active tab's DOM
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageInfo {
    pub url: String,
    pub title: String,
    /// `<meta name="description">`
    pub meta_description: Option<String>,
    /// `<meta property="og:description">`
    pub og_description: Option<String>,
    /// Repository sidebar "about" text, only present on repository pages
    pub repository_about: Option<String>,
}

impl PageInfo {
    /// Best-effort description for a saved item
    ///
    /// Meta description wins over the Open Graph one. On repository-host pages
    /// a non-blank "about" text overrides both.
    pub fn description(&self, hosts: &HostConfig) -> Option<String> {
        let from_meta = non_empty(self.meta_description.as_deref())
            .or_else(|| non_empty(self.og_description.as_deref()));

        if self.is_repository_host(hosts) {
            if let Some(about) = non_empty(self.repository_about.as_deref().map(str::trim)) {
                return Some(about);
            }
        }

        from_meta
    }

    fn is_repository_host(&self, hosts: &HostConfig) -> bool {
        Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.contains(hosts.repository_host.as_str())))
            .unwrap_or(false)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}
