//! Module discovery and layout file I/O

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use jmc_model::{AnalysisDefinition, DocumentFormat, LayoutDocument};

use crate::package::PackageInfo;

const DEFINITION_SUFFIX: &str = ".a.yaml";
const LAYOUT_SUFFIX: &str = ".u.yaml";

/// Definition and layout files of one analysis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisFiles {
    /// Base name shared by both files
    pub name: String,
    /// `<name>.a.yaml`
    pub definition: PathBuf,
    /// `<name>.u.yaml`, which may not exist yet
    pub layout: PathBuf,
}

impl AnalysisFiles {
    /// Files for a definition path, layout beside it
    #[must_use]
    pub fn for_definition(definition: &Path) -> Self {
        let file_name = definition
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();
        let name = file_name
            .strip_suffix(DEFINITION_SUFFIX)
            .unwrap_or(file_name)
            .to_string();
        let layout = definition.with_file_name(format!("{name}{LAYOUT_SUFFIX}"));
        Self {
            name,
            definition: definition.to_path_buf(),
            layout,
        }
    }
}

/// A jamovi module on disk
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub package: PackageInfo,
    /// Directory holding the analysis definitions
    pub definitions: PathBuf,
}

impl Project {
    /// Open the module at `root`
    ///
    /// # Errors
    /// Returns error if `DESCRIPTION` is missing or invalid, or there is no
    /// `jamovi/` or `inst/jamovi/` directory
    pub fn open(root: &Path) -> Result<Self> {
        let package = PackageInfo::load(root)?;
        let Some(definitions) = [root.join("jamovi"), root.join("inst").join("jamovi")]
            .into_iter()
            .find(|dir| dir.is_dir())
        else {
            bail!("no jamovi/ or inst/jamovi/ directory in {}", root.display());
        };

        tracing::debug!(
            "Opened package '{}' {} ({})",
            package.name,
            package.version,
            definitions.display()
        );
        Ok(Self {
            root: root.to_path_buf(),
            package,
            definitions,
        })
    }

    /// Analyses of the module, sorted by name
    ///
    /// # Errors
    /// Returns error if the definitions directory cannot be read, or `only`
    /// names an analysis that does not exist
    pub fn analyses(&self, only: Option<&str>) -> Result<Vec<AnalysisFiles>> {
        let entries = fs::read_dir(&self.definitions)
            .with_context(|| format!("failed to list {}", self.definitions.display()))?;

        let mut found = Vec::new();
        for entry in entries {
            let path = entry?.path();
            let is_definition = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(DEFINITION_SUFFIX));
            if is_definition {
                found.push(AnalysisFiles::for_definition(&path));
            }
        }
        found.sort_by(|a, b| a.name.cmp(&b.name));

        if let Some(name) = only {
            found.retain(|files| files.name == name);
            if found.is_empty() {
                bail!("no analysis named '{name}' in {}", self.definitions.display());
            }
        }
        Ok(found)
    }
}

/// Read an analysis definition
///
/// # Errors
/// Returns error if the file cannot be read or parsed
pub fn load_definition(path: &Path) -> Result<AnalysisDefinition> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    AnalysisDefinition::from_yaml(&text).with_context(|| format!("invalid analysis {}", path.display()))
}

/// Read a layout, `None` if the file does not exist
///
/// # Errors
/// Returns error if the file exists but cannot be read or parsed
pub fn load_layout(path: &Path) -> Result<Option<LayoutDocument>> {
    if !path.exists() {
        return Ok(None);
    }
    let format = DocumentFormat::from_path(path)?;
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let doc = LayoutDocument::parse(&text, format)
        .with_context(|| format!("invalid layout {}", path.display()))?;
    Ok(Some(doc))
}

/// Write a layout in the format of its extension
///
/// # Errors
/// Returns error if serialization or the write fails
pub fn save_layout(path: &Path, doc: &LayoutDocument) -> Result<()> {
    let format = DocumentFormat::from_path(path)?;
    let text = doc.render(format)?;
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
