use thiserror::Error;

use crate::validation::ValidationIssue;

/// Error types for loading and saving particle documents
#[derive(Error, Debug)]
pub enum ParticleIoError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or unserialisable JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed or unserialisable YAML
    #[cfg(feature = "yaml")]
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The file extension or requested format is not supported
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The document contains error-level validation issues
    #[error("Validation failed with {} error(s): {}", .0.len(), first_message(.0))]
    Validation(Vec<ValidationIssue>),
}

fn first_message(issues: &[ValidationIssue]) -> String {
    issues
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}

/// Result type using ParticleIoError
pub type Result<T> = std::result::Result<T, ParticleIoError>;
