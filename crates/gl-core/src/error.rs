//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `GlError` as one variant
//! where they need it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GlError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `gl-core`.
pub type GlResult<T> = Result<T, GlError>;
