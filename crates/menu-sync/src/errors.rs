use settings_store::StoreError;
use thiserror::Error;

/// Errors surfaced while rebuilding menus or dispatching browser events.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("context menu port: {0}")]
    Menus(String),
    #[error("tabs port: {0}")]
    Tabs(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
