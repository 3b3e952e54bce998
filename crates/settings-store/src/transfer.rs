//! Export and import of both records as a single settings document.

use chrono::{SecondsFormat, Utc};
use favorites_core_types::{Prompt, SiteConfig};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::store::SettingsStore;
use crate::StoreError;

pub const DOCUMENT_VERSION: u32 = 1;

const PROMPT_KEYS: &[&str] = &["prompts", "promptList"];
const SITE_KEYS: &[&str] = &["siteConfigs", "configs", "site_configs"];

/// `{ version, createdAt, prompts, siteConfigs }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsDocument {
    pub version: u32,
    pub created_at: String,
    pub prompts: Vec<Prompt>,
    pub site_configs: Vec<SiteConfig>,
}

impl SettingsDocument {
    pub fn new(prompts: Vec<Prompt>, site_configs: Vec<SiteConfig>) -> Self {
        Self {
            version: DOCUMENT_VERSION,
            created_at: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            prompts,
            site_configs,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ImportSummary {
    pub prompts: usize,
    pub sites: usize,
}

pub async fn export_settings(store: &SettingsStore) -> Result<SettingsDocument, StoreError> {
    let prompts = store.prompts().await?;
    let sites = store.site_configs().await?;
    Ok(SettingsDocument::new(prompts, sites))
}

/// Parses an exported document. JSON is tried first, then YAML for
/// hand-edited files. Both arrays must be present; legacy key names are
/// accepted.
pub fn parse_document(raw: &str) -> Result<SettingsDocument, StoreError> {
    let value: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(json_err) => serde_yaml::from_str(raw).map_err(|yaml_err| {
            StoreError::Codec(format!(
                "json error: {}; yaml error: {}",
                json_err, yaml_err
            ))
        })?,
    };

    let Value::Object(mut root) = value else {
        return Err(StoreError::Validation(
            "Invalid file format: expected an object".into(),
        ));
    };

    let prompts = take_array(&mut root, PROMPT_KEYS).ok_or_else(|| {
        StoreError::Validation("Invalid file format: missing prompts array".into())
    })?;
    let sites = take_array(&mut root, SITE_KEYS).ok_or_else(|| {
        StoreError::Validation("Invalid file format: missing siteConfigs array".into())
    })?;

    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .map(|v| v as u32)
        .unwrap_or(DOCUMENT_VERSION);
    if version != DOCUMENT_VERSION {
        warn!(version, "importing settings document with unexpected version");
    }
    let created_at = root
        .get("createdAt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(SettingsDocument {
        version,
        created_at,
        prompts: serde_json::from_value(prompts)
            .map_err(|err| StoreError::Codec(format!("prompts: {err}")))?,
        site_configs: serde_json::from_value(sites)
            .map_err(|err| StoreError::Codec(format!("siteConfigs: {err}")))?,
    })
}

/// Overwrites both records with the document's contents.
pub async fn import_settings(
    store: &SettingsStore,
    document: &SettingsDocument,
) -> Result<ImportSummary, StoreError> {
    store
        .replace_all(&document.prompts, &document.site_configs)
        .await?;
    let summary = ImportSummary {
        prompts: document.prompts.len(),
        sites: document.site_configs.len(),
    };
    info!(
        prompts = summary.prompts,
        sites = summary.sites,
        "settings imported"
    );
    Ok(summary)
}

fn take_array(root: &mut serde_json::Map<String, Value>, keys: &[&str]) -> Option<Value> {
    let key = keys
        .iter()
        .find(|key| matches!(root.get(**key), Some(Value::Array(_))))?;
    root.remove(*key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_key_names_are_accepted() {
        let raw = r#"{
            "promptList": [{"id": "p1", "title": "T", "content": "C"}],
            "configs": [{"id": "c1", "urlPattern": "*://a.com/*", "xpath": "//textarea"}]
        }"#;
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.version, DOCUMENT_VERSION);
        assert_eq!(doc.prompts[0].id.as_str(), "p1");
        assert_eq!(doc.site_configs[0].id.as_str(), "c1");
    }

    #[test]
    fn missing_arrays_are_rejected() {
        let err = parse_document(r#"{"prompts": []}"#).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = parse_document(r#"{"prompts": {}, "siteConfigs": []}"#).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        let err = parse_document("[]").unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn yaml_documents_parse() {
        let raw = "version: 1\nprompts:\n  - id: p1\n    title: T\n    content: \"C\\n\"\nsiteConfigs: []\n";
        let doc = parse_document(raw).unwrap();
        assert_eq!(doc.prompts[0].content, "C\n");
        assert!(doc.site_configs.is_empty());
    }

    #[test]
    fn exported_document_has_wire_names() {
        let doc = SettingsDocument::new(Vec::new(), Vec::new());
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["version"], 1);
        assert!(value["createdAt"].as_str().unwrap().ends_with('Z'));
        assert!(value["siteConfigs"].is_array());
    }
}
