//! Command implementations
//!
//! Every command writes user-facing lines to `out`; logs go to stderr.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use jmc_layout::{SyncConfig, SyncOutcome, Synchronizer};

use crate::config;
use crate::project::{load_definition, load_layout, save_layout, AnalysisFiles, Project};

/// Options of `jmc sync`
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Restrict to one analysis
    pub analysis: Option<String>,
    /// Report without writing
    pub dry_run: bool,
    /// Explicit config file
    pub config: Option<PathBuf>,
}

/// Synchronize every layout of a module, returning how many files were written
///
/// # Errors
/// Returns error on the first analysis that fails to load, migrate,
/// reconcile, validate or save
pub fn sync(module_dir: &Path, options: &SyncOptions, out: &mut impl Write) -> Result<usize> {
    let project = Project::open(module_dir)?;
    let config = config::load(options.config.as_deref(), module_dir)?;
    let synchronizer = Synchronizer::new(config);

    tracing::info!("Synchronizing layouts of '{}'", project.package.name);

    let mut written = 0;
    for files in project.analyses(options.analysis.as_deref())? {
        let (outcome, created) = sync_one(&synchronizer, &files)?;
        write!(out, "{}", outcome.report)?;

        if !outcome.report.changed() && !created {
            continue;
        }
        let file_name = display_name(&files.layout);
        if options.dry_run {
            writeln!(out, "would write: {file_name}")?;
        } else {
            save_layout(&files.layout, &outcome.document)?;
            writeln!(out, "wrote: {file_name}")?;
            written += 1;
        }
    }
    Ok(written)
}

/// Check that every layout is up to date and valid, without writing
///
/// # Errors
/// Returns error if an analysis fails to load, migrate, reconcile or validate
pub fn check(module_dir: &Path, config_path: Option<&Path>, out: &mut impl Write) -> Result<bool> {
    let project = Project::open(module_dir)?;
    let config = config::load(config_path, module_dir)?;
    let synchronizer = Synchronizer::new(config.with_validate(true));

    let mut up_to_date = true;
    for files in project.analyses(None)? {
        let (outcome, created) = sync_one(&synchronizer, &files)?;
        if outcome.report.changed() || created {
            writeln!(out, "out of date: {}", display_name(&files.layout))?;
            up_to_date = false;
        }
    }
    if up_to_date {
        writeln!(out, "all layouts up to date")?;
    }
    Ok(up_to_date)
}

/// Print the element list of an analysis as JSON
///
/// The layout defaults to the `.u.yaml` beside the definition; the result is
/// what a sync would produce, nothing is written.
///
/// # Errors
/// Returns error if the files cannot be loaded or the sync fails
pub fn elements(definition: &Path, layout: Option<&Path>, out: &mut impl Write) -> Result<()> {
    let mut files = AnalysisFiles::for_definition(definition);
    if let Some(layout) = layout {
        files.layout = layout.to_path_buf();
    }

    let synchronizer = Synchronizer::new(SyncConfig::default());
    let (outcome, _) = sync_one(&synchronizer, &files)?;
    let json = serde_json::to_string_pretty(&outcome.elements)?;
    writeln!(out, "{json}")?;
    Ok(())
}

fn sync_one(synchronizer: &Synchronizer, files: &AnalysisFiles) -> Result<(SyncOutcome, bool)> {
    let definition = load_definition(&files.definition)?;
    let existing = load_layout(&files.layout)?;
    let created = existing.is_none();

    let outcome = synchronizer
        .sync(&definition, existing)
        .with_context(|| format!("failed to synchronize analysis '{}'", files.name))?;
    Ok((outcome, created))
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned())
}
