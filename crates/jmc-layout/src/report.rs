//! Change report of one synchronization run

use std::fmt::{self, Display, Formatter};

use jmc_model::{ControlType, LayoutNode, OptionSpec, OptionType};

/// Why a control was taken out of the layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemovalReason {
    /// Bound option no longer exists in the schema
    Stale,
    /// Another control already binds the same option
    Duplicate,
}

impl Display for RemovalReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stale => f.write_str("stale"),
            Self::Duplicate => f.write_str("duplicate"),
        }
    }
}

/// A control removed by the removal pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovedControl {
    /// Binding key of the control
    pub name: String,
    /// Control type
    pub control: ControlType,
    /// Display label, if any
    pub label: Option<String>,
    pub reason: RemovalReason,
}

impl RemovedControl {
    /// Record for a bound control
    #[must_use]
    pub fn of(node: &LayoutNode, reason: RemovalReason) -> Self {
        Self {
            name: node.binding_key().unwrap_or_default().to_string(),
            control: node.control.clone(),
            label: node.label().map(str::to_string),
            reason,
        }
    }
}

/// An option that got no control because its type is unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedOption {
    pub name: String,
    pub kind: OptionType,
}

/// What one synchronization run did to a layout
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeReport {
    /// Options that received a new control, in schema order
    pub added: Vec<OptionSpec>,
    /// Controls taken out, in removal order
    pub removed: Vec<RemovedControl>,
    /// Options left without a control
    pub skipped: Vec<SkippedOption>,
    /// Whether the document version was migrated
    pub upgraded: bool,
    /// Migration message, e.g. `from 1.0 => 2.0`
    pub message: Option<String>,
}

impl ChangeReport {
    /// Whether the document must be persisted
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.upgraded || !self.added.is_empty() || !self.removed.is_empty()
    }
}

impl Display for ChangeReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if let Some(message) = &self.message {
            writeln!(f, "upgraded: {message}")?;
        }
        for option in &self.added {
            writeln!(f, "added: {} ({})", option.name, option.kind)?;
        }
        for control in &self.removed {
            writeln!(f, "removed: {} ({}, {})", control.name, control.control, control.reason)?;
        }
        for option in &self.skipped {
            writeln!(f, "skipped: {} (unknown type '{}')", option.name, option.kind)?;
        }
        Ok(())
    }
}
