//! Synchronization configuration

use serde::{Deserialize, Serialize};

/// Synchronization settings
///
/// Read from the `[sync]` table of `jmc.toml`; every key is optional.
/// Layouts are always migrated to the current version before they are
/// reconciled, so there is no version setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SyncConfig {
    /// Validate the reconciled layout before it is returned
    pub validate: bool,
    /// Treat option types without a constructor as errors
    pub strict_types: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            validate: true,
            strict_types: false,
        }
    }
}

impl SyncConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With validation on or off
    #[inline]
    #[must_use]
    pub fn with_validate(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    /// With strict option type handling
    #[inline]
    #[must_use]
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SyncConfig::new();
        assert!(config.validate);
        assert!(!config.strict_types);
    }

    #[test]
    fn builder() {
        let config = SyncConfig::new().with_validate(false).with_strict_types(true);
        assert!(!config.validate);
        assert!(config.strict_types);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let config: SyncConfig = serde_json::from_str(r#"{ "strict-types": true }"#).unwrap();
        assert!(config.validate);
        assert!(config.strict_types);
    }

    #[test]
    fn version_setting_is_rejected() {
        let result = serde_json::from_str::<SyncConfig>(r#"{ "target-version": "1.0" }"#);
        assert!(result.is_err());
    }
}
