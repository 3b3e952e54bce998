//! Persisted prompt favorites settings.
//!
//! Two records live in a key-value storage port: `prompts` and
//! `siteConfigs`, both ordered arrays. [`SettingsStore`] performs the edits a
//! settings surface needs while keeping every prompt's `enabledSites` map in
//! step with the existing site configurations.

pub mod cache;
pub mod storage;
pub mod store;
pub mod transfer;

pub use cache::SettingsCache;
pub use storage::{InMemoryStorage, JsonFileStorage, KeyValueStore};
pub use store::{
    ChangeNotifier, PromptDraft, SettingsStore, SiteDraft, CONFIGS_KEY, PROMPTS_KEY,
};
pub use transfer::{
    export_settings, import_settings, parse_document, ImportSummary, SettingsDocument,
    DOCUMENT_VERSION,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("codec error: {0}")]
    Codec(String),
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Codec(err.to_string())
    }
}
