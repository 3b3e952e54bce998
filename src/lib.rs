//! Prompt favorites application layer
//!
//! Exposes configuration and wiring for hosts and integration tests

pub mod app_context;
pub mod cli;
pub mod config;
pub mod errors;

pub use app_context::{AppContext, Background, MenuPreview};
pub use config::AppConfig;
pub use errors::AppError;
