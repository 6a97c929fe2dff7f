//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers what the
//! primitives in this crate can fail on.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `fleet-core`.
pub type CoreResult<T> = Result<T, CoreError>;
