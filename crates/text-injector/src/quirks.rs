use serde::{Deserialize, Serialize};
use url::Url;

/// Hosts whose rich editors only pick up programmatic edits after the field
/// loses and regains focus.
pub const DEFAULT_RICH_EDITOR_HOSTS: &[&str] = &[
    "chatgpt.com",
    "chat.openai.com",
    "claude.ai",
    "gemini.google.com",
];

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EditorQuirks {
    pub rich_editor_hosts: Vec<String>,
}

impl Default for EditorQuirks {
    fn default() -> Self {
        Self {
            rich_editor_hosts: DEFAULT_RICH_EDITOR_HOSTS
                .iter()
                .map(|host| host.to_string())
                .collect(),
        }
    }
}

impl EditorQuirks {
    pub fn none() -> Self {
        Self {
            rich_editor_hosts: Vec::new(),
        }
    }

    /// Exact host or any subdomain of a listed host.
    pub fn needs_focus_cycle(&self, page_url: &str) -> bool {
        let Ok(parsed) = Url::parse(page_url) else {
            return false;
        };
        let Some(host) = parsed.host_str() else {
            return false;
        };
        self.rich_editor_hosts.iter().any(|known| {
            host == known
                || host
                    .strip_suffix(known.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.'))
        })
    }
}
