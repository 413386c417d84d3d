//! On-disk formats for layout documents

use std::path::Path;

use crate::error::ModelError;

/// Serialization format, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentFormat {
    /// `.yaml` / `.yml`
    #[default]
    Yaml,
    /// `.json`
    Json,
}

impl DocumentFormat {
    /// Format for a file path
    ///
    /// # Errors
    /// Returns error for extensions other than yaml, yml and json
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");

        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            other => Err(ModelError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Canonical file extension
    #[inline]
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Json => "json",
        }
    }
}
