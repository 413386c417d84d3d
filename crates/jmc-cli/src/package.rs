//! Package metadata from the module's `DESCRIPTION` file

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use regex::Regex;

/// Metadata of the module being synchronized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageInfo {
    pub name: String,
    pub title: String,
    pub version: String,
    pub authors: Vec<String>,
    pub maintainer: String,
    pub date: String,
    pub description: String,
}

impl PackageInfo {
    /// Read `DESCRIPTION` from a module directory
    ///
    /// # Errors
    /// Returns error if the file is missing or has no `Package` field
    pub fn load(module_dir: &Path) -> Result<Self> {
        let path = module_dir.join("DESCRIPTION");
        if !path.is_file() {
            bail!(
                "a DESCRIPTION file could not be found in {}; is it an R/jamovi package?",
                module_dir.display()
            );
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Parse the `Field: value` format, continuation lines indented
    ///
    /// # Errors
    /// Returns error if there is no `Package` field
    pub fn parse(text: &str) -> Result<Self> {
        let field = Regex::new(r"^([A-Za-z][A-Za-z0-9@/._-]*):[ \t]*(.*)$")?;
        let spaces = Regex::new(r"\s{2,}")?;

        let mut fields: HashMap<String, String> = HashMap::new();
        let mut current: Option<String> = None;
        for line in text.lines() {
            if line.starts_with([' ', '\t']) {
                if let Some(value) = current.as_ref().and_then(|key| fields.get_mut(key)) {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                continue;
            }
            current = field.captures(line).map(|caps| {
                let key = caps[1].to_string();
                fields.insert(key.clone(), caps[2].trim().to_string());
                key
            });
        }
        for value in fields.values_mut() {
            *value = spaces.replace_all(value.trim(), " ").into_owned();
        }

        let Some(name) = fields.remove("Package").filter(|name| !name.is_empty()) else {
            bail!("DESCRIPTION file does not contain a package name");
        };
        let mut take = |key: &str, default: &str| {
            fields
                .remove(key)
                .unwrap_or_else(|| default.to_string())
        };

        let title = take("Title", &name);
        let version = take("Version", "0.0.0");
        let maintainer = take("Maintainer", "(no maintainer, sorry)");
        let date = take("Date", "1970-01-01");
        let description = take("Description", "(no description)");
        let authors = take("Author", "")
            .split(',')
            .map(str::trim)
            .filter(|author| !author.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            name,
            title,
            version,
            authors,
            maintainer,
            date,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_full_description() {
        let info = PackageInfo::parse(
            "\
Package: jmv
Type: Package
Title: The jamovi Analyses
Version: 0.8.1
Date: 2017-11-27
Author: Ravi Selker, Jonathon Love,
    Damian Dropmann
Maintainer: Jonathon Love <jon@thon.cc>
Description: A suite of common statistical methods
    such as descriptives,   t-tests and ANOVAs.
License: GPL (>= 2)
",
        )
        .unwrap();

        assert_eq!(info.name, "jmv");
        assert_eq!(info.title, "The jamovi Analyses");
        assert_eq!(info.version, "0.8.1");
        assert_eq!(info.authors, ["Ravi Selker", "Jonathon Love", "Damian Dropmann"]);
        assert_eq!(info.maintainer, "Jonathon Love <jon@thon.cc>");
        assert_eq!(
            info.description,
            "A suite of common statistical methods such as descriptives, t-tests and ANOVAs."
        );
    }

    #[test]
    fn defaults_for_missing_fields() {
        let info = PackageInfo::parse("Package: demo\n").unwrap();
        assert_eq!(info.title, "demo");
        assert_eq!(info.version, "0.0.0");
        assert!(info.authors.is_empty());
        assert_eq!(info.maintainer, "(no maintainer, sorry)");
        assert_eq!(info.date, "1970-01-01");
        assert_eq!(info.description, "(no description)");
    }

    #[test]
    fn package_is_required() {
        let err = PackageInfo::parse("Title: Nameless\n").unwrap_err();
        assert!(err.to_string().contains("package name"));
    }
}
