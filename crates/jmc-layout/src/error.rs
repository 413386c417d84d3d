//! Error types for layout synchronization
//!
//! Provides error handling for:
//! - Control construction (registry lookups)
//! - Document version migration
//! - Structural validation
//! - The combined synchronization run

use std::fmt::{self, Display, Formatter};

use jmc_model::{JusVersion, OptionType, PathError, VersionParseError};

/// Registry lookup failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// No constructor registered for the option type
    #[error("no constructor for option type '{0}'")]
    NoConstructor(OptionType),

    /// The type is deliberately given no control
    #[error("option type '{0}' has no visual control")]
    Unrepresented(OptionType),
}

/// Unsupported or malformed document versions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    /// `jus` is not `"major.minor"`
    #[error("layout '{document}': {source}")]
    Malformed {
        /// Document name
        document: String,
        /// Parse failure
        #[source]
        source: VersionParseError,
    },

    /// `jus` is newer than this tool understands
    #[error("layout '{document}': version {found} is newer than supported {supported}")]
    Newer {
        /// Document name
        document: String,
        /// Version found
        found: JusVersion,
        /// Newest supported version
        supported: JusVersion,
    },

    /// `jus` is older than current but no migration starts there
    #[error("layout '{document}': unknown version {found}")]
    Unknown {
        /// Document name
        document: String,
        /// Version found
        found: JusVersion,
    },
}

/// One failed attribute contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Location, e.g. `children[0].columns[1].template`
    pub path: String,
    /// Offending control, e.g. `CheckBox 'alpha'`
    pub control: String,
    /// Violated constraint
    pub constraint: String,
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}): {}", self.path, self.control, self.constraint)
    }
}

/// Reconciled document failed validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("layout '{document}' failed validation:\n{}", render_violations(.violations))]
pub struct ValidationError {
    /// Document name
    pub document: String,
    /// All violations, in traversal order
    pub violations: Vec<Violation>,
}

fn render_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| format!("  - {v}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Combined synchronization error
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("version error: {0}")]
    Version(#[from] VersionError),

    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unknown option type under strict type handling
    #[error("option '{option}' has unknown type '{kind}'")]
    UnknownOptionType { option: String, kind: String },

    #[error("tree error: {0}")]
    Path(#[from] PathError),
}

/// Result type alias for synchronization operations
pub type SyncResult<T> = Result<T, SyncError>;
