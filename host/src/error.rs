//! Error types for tool scope operations.
//!
//! Covers configuration file I/O and YAML, strict-mode validation failures,
//! and registrations refused by a sink. Extraction and compilation never
//! fail, so they have no variants here.

use thiserror::Error;
use tool_schema_core::ValidationError;

/// Errors that can occur while configuring, computing, or publishing a tool.
#[derive(Debug, Error)]
pub enum HostError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Strict-mode validation found an issue in the merged fields.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The registration sink refused the tool.
    #[error("registration rejected: {0}")]
    Rejected(String),
}

/// Convenience alias for results with [`HostError`].
pub type Result<T> = std::result::Result<T, HostError>;
