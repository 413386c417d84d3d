//! JMC Layout
//!
//! Keeps hand-edited analysis layouts in step with their option schemas.
//!
//! # Components
//!
//! - [`ControlRegistry`]: option type → control constructor and container rule
//! - [`Migrator`]: ordered `jus` version migration chain
//! - [`Reconciler`]: removal pass, then insertion pass
//! - [`Validator`]: per-control attribute contracts from trait inheritance
//! - [`Synchronizer`]: the pipeline over all of the above
//!
//! # Example
//!
//! ```rust
//! use jmc_layout::prelude::*;
//! use jmc_model::{AnalysisDefinition, ControlType};
//!
//! let analysis = AnalysisDefinition::from_yaml(
//!     "name: demo\noptions:\n  - {name: alpha, type: Bool}\n  - {name: beta, type: Number}\n",
//! ).unwrap();
//!
//! let sync = Synchronizer::new(SyncConfig::new());
//! let outcome = sync.sync(&analysis, None).unwrap();
//!
//! assert_eq!(outcome.report.added.len(), 2);
//! assert_eq!(outcome.document.children.len(), 2);
//! assert_eq!(outcome.document.children[0].control, ControlType::LayoutBox);
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod elements;
pub mod error;
pub mod migrate;
pub mod reconcile;
pub mod registry;
pub mod report;
pub mod sync;
pub mod validate;

pub use config::SyncConfig;
pub use elements::{ColumnElement, ControlElement, ElementList};
pub use error::{RegistryError, SyncError, SyncResult, ValidationError, VersionError, Violation};
pub use migrate::{Migration, MigrationOutcome, Migrator};
pub use reconcile::{Reconciler, Reconciliation};
pub use registry::{BuildContext, Constructor, ControlRegistry, RequiredContainer};
pub use report::{ChangeReport, RemovalReason, RemovedControl, SkippedOption};
pub use sync::{SyncOutcome, Synchronizer};
pub use validate::Validator;

/// Commonly used types
pub mod prelude {
    pub use crate::config::SyncConfig;
    pub use crate::error::{SyncError, SyncResult};
    pub use crate::registry::ControlRegistry;
    pub use crate::report::ChangeReport;
    pub use crate::sync::{SyncOutcome, Synchronizer};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
