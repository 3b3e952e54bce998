use favorites_core_types::TabId;
use thiserror::Error;

/// Failure raised by a single DOM operation.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum DomError {
    #[error("invalid locator: {0}")]
    InvalidLocator(String),
    #[error("dom exception: {0}")]
    Exception(String),
}

/// Failure to run an injection at all, as opposed to a step inside it.
#[derive(Clone, Debug, Error)]
pub enum InjectError {
    #[error("no document loaded in tab {0}")]
    NoDocument(TabId),
    #[error("script execution failed: {0}")]
    Script(String),
    #[error("unexpected script result: {0}")]
    Decode(String),
}
