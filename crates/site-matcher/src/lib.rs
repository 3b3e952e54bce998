//! URL pattern matching and site configuration resolution.

pub mod pattern;
pub mod resolver;

pub use pattern::{compile, looks_like_match_pattern, matches, to_regex_source};
pub use resolver::resolve;

use thiserror::Error;

/// Errors produced while compiling patterns.
#[derive(Clone, Debug, Error)]
pub enum MatchError {
    #[error("pattern is empty")]
    EmptyPattern,
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
