//! Synchronization entry point
//!
//! [`Synchronizer::sync`] runs the full pipeline on one analysis:
//!
//! ```text
//! layout (or empty) ─▶ migrate ─▶ remove stale ─▶ insert missing ─▶ validate
//! ```
//!
//! The synchronizer does no I/O; callers persist the returned document when
//! [`ChangeReport::changed`] says so.

use jmc_model::{AnalysisDefinition, JusVersion, LayoutDocument};

use crate::config::SyncConfig;
use crate::elements::ElementList;
use crate::error::SyncResult;
use crate::migrate::Migrator;
use crate::reconcile::Reconciler;
use crate::registry::ControlRegistry;
use crate::report::ChangeReport;
use crate::validate::Validator;

/// Result of synchronizing one analysis
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Updated layout
    pub document: LayoutDocument,
    pub report: ChangeReport,
    /// Element projection of the updated layout
    pub elements: ElementList,
}

/// Migrates, reconciles and validates layouts
#[derive(Debug, Clone)]
pub struct Synchronizer {
    registry: ControlRegistry,
    migrator: Migrator,
    validator: Validator,
    config: SyncConfig,
}

impl Synchronizer {
    /// Create a synchronizer with the built-in registry
    #[must_use]
    pub fn new(config: SyncConfig) -> Self {
        Self {
            registry: ControlRegistry::with_defaults(),
            migrator: Migrator::new(),
            validator: Validator::new(),
            config,
        }
    }

    /// Replace the control registry
    #[inline]
    #[must_use]
    pub fn with_registry(mut self, registry: ControlRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Synchronize `layout` with the options of `analysis`
    ///
    /// A missing layout starts as an empty document at the current version.
    ///
    /// # Errors
    /// - [`SyncError::Version`](crate::SyncError::Version) if the layout version cannot be migrated
    /// - [`SyncError::UnknownOptionType`](crate::SyncError::UnknownOptionType) under strict type handling
    /// - [`SyncError::Validation`](crate::SyncError::Validation) if the result breaks a control contract
    pub fn sync(
        &self,
        analysis: &AnalysisDefinition,
        layout: Option<LayoutDocument>,
    ) -> SyncResult<SyncOutcome> {
        let mut document = layout.unwrap_or_else(|| {
            tracing::info!("Creating layout for '{}'", analysis.name);
            let mut doc = LayoutDocument::empty(analysis.name.clone(), analysis.title.clone());
            doc.jus = Some(JusVersion::CURRENT.to_string());
            doc
        });

        let migration = self.migrator.migrate(&mut document)?;
        let reconciliation = Reconciler::new(&self.registry)
            .with_strict_types(self.config.strict_types)
            .reconcile(&mut document, &analysis.options)?;

        if self.config.validate {
            self.validator.validate(&document)?;
        }

        let report = ChangeReport {
            added: reconciliation.added,
            removed: reconciliation.removed,
            skipped: reconciliation.skipped,
            upgraded: migration.upgraded(),
            message: migration.message(),
        };
        tracing::info!(
            "Synchronized '{}': {} added, {} removed, {} skipped",
            analysis.name,
            report.added.len(),
            report.removed.len(),
            report.skipped.len()
        );

        let elements = ElementList::from_document(&document);
        Ok(SyncOutcome {
            document,
            report,
            elements,
        })
    }
}
