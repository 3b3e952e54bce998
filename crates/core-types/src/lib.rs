//! Shared primitives for the prompt favorites crates.
//!
//! Prompts and site configurations are persisted as camelCase JSON arrays, so
//! every type here keeps the wire names the storage records already use.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// Builds an id of the form `<prefix>_<unix millis>_<7 random chars>`.
pub fn generate_id(prefix: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let suffix: String = Uuid::new_v4().simple().to_string().chars().take(7).collect();
    format!("{prefix}_{millis}_{suffix}")
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(pub String);

impl PromptId {
    pub fn new() -> Self {
        Self(generate_id("prompt"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PromptId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn new() -> Self {
        Self(generate_id("config"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// How injected text is combined with what the field already holds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InsertMode {
    #[default]
    Replace,
    InsertBefore,
    InsertAfter,
}

impl InsertMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertMode::Replace => "replace",
            InsertMode::InsertBefore => "insertBefore",
            InsertMode::InsertAfter => "insertAfter",
        }
    }

    /// Unknown or missing values fall back to `Replace`.
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "insertBefore" => InsertMode::InsertBefore,
            "insertAfter" => InsertMode::InsertAfter,
            _ => InsertMode::Replace,
        }
    }

    pub fn compose(&self, text: &str, current: &str) -> String {
        match self {
            InsertMode::Replace => text.to_string(),
            InsertMode::InsertBefore => format!("{text}{current}"),
            InsertMode::InsertAfter => format!("{current}{text}"),
        }
    }
}

impl fmt::Display for InsertMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lenient_insert_mode<'de, D>(deserializer: D) -> Result<InsertMode, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().map(InsertMode::from_wire).unwrap_or_default())
}

fn lenient_enabled_sites<'de, D>(deserializer: D) -> Result<BTreeMap<SiteId, bool>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<SiteId, bool>>::deserialize(deserializer)?;
    Ok(raw.unwrap_or_default())
}

/// A saved snippet shown in the context menu.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    #[serde(default)]
    pub id: PromptId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default, deserialize_with = "lenient_insert_mode")]
    pub insert_mode: InsertMode,
    #[serde(default, deserialize_with = "lenient_enabled_sites")]
    pub enabled_sites: BTreeMap<SiteId, bool>,
}

impl Prompt {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: PromptId::new(),
            title: title.into(),
            content: content.into(),
            insert_mode: InsertMode::Replace,
            enabled_sites: BTreeMap::new(),
        }
    }

    /// Missing entries count as enabled so that prompts saved before a site
    /// existed still show up for it.
    pub fn is_enabled_for(&self, site: &SiteId) -> bool {
        self.enabled_sites.get(site).copied() != Some(false)
    }

    /// Menu identity; legacy records without an id get a positional one.
    pub fn menu_id(&self, index: usize) -> String {
        if self.id.is_empty() {
            format!("prompt-{index}")
        } else {
            self.id.0.clone()
        }
    }

    pub fn display_title(&self, index: usize) -> String {
        if self.title.is_empty() {
            format!("Prompt {}", index + 1)
        } else {
            self.title.clone()
        }
    }
}

/// Maps a URL pattern to the element that receives injected text.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteConfig {
    #[serde(default)]
    pub id: SiteId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url_pattern: String,
    #[serde(default)]
    pub xpath: String,
}

impl SiteConfig {
    pub fn new(
        name: impl Into<String>,
        url_pattern: impl Into<String>,
        xpath: impl Into<String>,
    ) -> Self {
        Self {
            id: SiteId::new(),
            name: name.into(),
            url_pattern: url_pattern.into(),
            xpath: xpath.into(),
        }
    }

    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.url_pattern
        } else {
            &self.name
        }
    }
}

/// Browser tab identifier.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i64);

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frame inside a tab; `0` is the top-level document.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FrameId(pub i64);

impl FrameId {
    pub const MAIN: FrameId = FrameId(0);
}
