//! First-match-wins lookup of the site configuration for a URL.

use favorites_core_types::SiteConfig;
use tracing::debug;

use crate::pattern::matches;

/// Returns the first configuration, in stored order, whose pattern matches
/// `url`. Later, more specific patterns never override an earlier match.
pub fn resolve<'a>(configs: &'a [SiteConfig], url: &str) -> Option<&'a SiteConfig> {
    if configs.is_empty() || url.is_empty() {
        return None;
    }
    let found = configs
        .iter()
        .find(|config| matches(&config.url_pattern, url));
    match found {
        Some(config) => debug!(
            target: "site-matcher",
            site = %config.id,
            pattern = %config.url_pattern,
            "resolved site configuration"
        ),
        None => debug!(target: "site-matcher", url, "no site configuration matches"),
    }
    found
}
