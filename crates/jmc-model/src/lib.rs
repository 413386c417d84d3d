//! JMC Model
//!
//! Data model shared by the layout tooling: option schemas, layout documents
//! and their controls, tree paths and format versions.
//!
//! # Core Concepts
//!
//! - [`OptionSchema`]: Ordered, name-unique list of [`OptionSpec`] entries
//! - [`LayoutDocument`]: Persisted layout tree of one analysis
//! - [`LayoutNode`]: One control, bound to an option or a pure container
//! - [`NodePath`]: Index-based addressing of controls in the tree
//! - [`JusVersion`]: Layout document format version
//!
//! # Example
//!
//! ```rust
//! use jmc_model::{ControlType, LayoutDocument, LayoutNode, NodePath};
//!
//! let mut doc = LayoutDocument::empty("ttest", "T-Test");
//! doc.insert(
//!     &NodePath::root(),
//!     0,
//!     LayoutNode::container(ControlType::LayoutBox, vec![
//!         LayoutNode::new(ControlType::CheckBox).with_name("welchs"),
//!     ]),
//! ).unwrap();
//!
//! assert_eq!(doc.find_bound("welchs"), Some(NodePath::new(vec![0, 0])));
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod document;
mod error;
mod format;
mod node;
mod option;
mod path;
mod version;

// Re-exports
pub use document::LayoutDocument;
pub use error::{ModelError, ModelResult, SchemaError};
pub use format::DocumentFormat;
pub use node::{Column, ControlType, LayoutNode};
pub use option::{AnalysisDefinition, Choice, OptionSchema, OptionSpec, OptionType};
pub use path::{NodePath, PathError};
pub use version::{JusVersion, VersionParseError};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
