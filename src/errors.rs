//! Errors surfaced by the application layer.

use menu_sync::MenuError;
use settings_store::StoreError;
use text_injector::InjectError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Menu(#[from] MenuError),
    #[error(transparent)]
    Inject(#[from] InjectError),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Rejected(String),
}

impl AppError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        AppError::NotFound(resource.into())
    }
}
