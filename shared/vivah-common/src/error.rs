//! Common Error Types

use thiserror::Error;

/// Errors raised while parsing shared wire types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A string did not name any variant of the enum.
    #[error("invalid {kind} value '{value}'. Allowed values are: {allowed}")]
    UnknownVariant {
        kind: &'static str,
        value: String,
        allowed: String,
    },
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;
