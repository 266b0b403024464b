//! Custom error types for bkp
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::validation::ValidationError;

/// The main error type for bkp operations
#[derive(Error, Debug)]
pub enum BkpError {
    /// A manifest field failed validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The config file does not exist and was not created
    #[error("Config file {} does not exist.", .0.display())]
    ConfigMissing(PathBuf),

    /// The manifest source file does not exist
    #[error("Backup File {} does not exist.", .0.display())]
    SourceMissing(PathBuf),

    /// An external tool exited unsuccessfully
    #[error("Command `{command}` failed ({status}): {output}")]
    ExternalTool {
        command: String,
        status: String,
        output: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// YAML serialization/deserialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Template rendering errors
    #[error("Template error: {0}")]
    Template(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl BkpError {
    /// Create a "not found" error for backups
    pub fn backup_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Backup",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from an external tool
    pub fn is_external(&self) -> bool {
        matches!(self, Self::ExternalTool { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for BkpError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BkpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<serde_yaml::Error> for BkpError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Yaml(err.to_string())
    }
}

/// Result type alias for bkp operations
pub type BkpResult<T> = Result<T, BkpError>;
