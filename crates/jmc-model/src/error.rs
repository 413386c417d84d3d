//! Error types for the data model
//!
//! Covers load-time rejection of malformed schemas and layout documents.

/// Errors while loading or saving model files
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// Input is not valid JSON or does not match the model
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Input is not valid YAML or does not match the model
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Serialization failed
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// Schema-level constraint violated
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    /// File extension maps to no supported format
    #[error("unsupported file format: '{0}'")]
    UnsupportedFormat(String),
}

/// Option schema constraint violations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// Top-level option without a name
    #[error("option at position {index} has no name")]
    UnnamedOption {
        /// Position in the schema
        index: usize,
    },

    /// Two options share a name
    #[error("duplicate option name: '{0}'")]
    DuplicateOption(String),
}

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;
