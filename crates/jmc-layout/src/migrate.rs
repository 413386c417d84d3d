//! Layout document version migration
//!
//! The `jus` tag moves through an ordered chain of [`Migration`] steps:
//!
//! ```text
//! absent | 1.0  ──upgrade_to_2_0──▶  2.0 (current)
//! ```
//!
//! The whole plan is resolved before the document is touched, so a version
//! error never leaves a half-migrated tree behind.

use jmc_model::{Column, ControlType, JusVersion, LayoutDocument, LayoutNode};
use serde_json::Value as JsonValue;

use crate::error::VersionError;

/// Rewrites a top-level control list; returns whether anything changed
pub type Transform = fn(&mut Vec<LayoutNode>) -> bool;

/// One step of the migration chain
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub from: JusVersion,
    pub to: JusVersion,
    pub transform: Transform,
    pub description: &'static str,
}

/// Result of migrating one document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOutcome {
    /// Version before migration
    pub from: JusVersion,
    /// Version after migration
    pub to: JusVersion,
    /// Whether any control was rewritten
    pub rewritten: bool,
}

impl MigrationOutcome {
    /// Whether the version tag moved
    #[inline]
    #[must_use]
    pub fn upgraded(&self) -> bool {
        self.from != self.to
    }

    /// `"from 1.0 => 2.0"` when upgraded
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.upgraded()
            .then(|| format!("from {} => {}", self.from, self.to))
    }
}

/// Ordered migration chain
#[derive(Debug, Clone)]
pub struct Migrator {
    steps: Vec<Migration>,
    target: JusVersion,
}

impl Default for Migrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Migrator {
    /// Chain with every known step, targeting the current version
    #[must_use]
    pub fn new() -> Self {
        Self {
            steps: vec![Migration {
                from: JusVersion::LEGACY,
                to: JusVersion::CURRENT,
                transform: upgrade_to_2_0,
                description: "target lists wrapped, combo options and toggle values renamed",
            }],
            target: JusVersion::CURRENT,
        }
    }

    /// Version documents are brought to
    #[inline]
    #[must_use]
    pub fn target(&self) -> JusVersion {
        self.target
    }

    /// Steps in chain order
    #[inline]
    #[must_use]
    pub fn steps(&self) -> &[Migration] {
        &self.steps
    }

    /// Whether `version` is a version this chain knows
    #[must_use]
    pub fn knows(&self, version: JusVersion) -> bool {
        self.steps
            .iter()
            .any(|step| step.from == version || step.to == version)
    }

    /// Bring `doc` to the target version
    ///
    /// # Errors
    /// Returns [`VersionError`] for malformed, unknown or too new tags; the
    /// document is left untouched in that case.
    pub fn migrate(&self, doc: &mut LayoutDocument) -> Result<MigrationOutcome, VersionError> {
        let from = self.version_of(doc)?;
        let plan = self.plan(&doc.name, from)?;

        let mut rewritten = false;
        for step in &plan {
            tracing::debug!(
                "Migrating '{}' from {} to {}: {}",
                doc.name,
                step.from,
                step.to,
                step.description
            );
            rewritten |= (step.transform)(&mut doc.children);
        }

        let outcome = MigrationOutcome {
            from,
            to: plan.last().map_or(from, |step| step.to),
            rewritten,
        };
        if outcome.upgraded() {
            doc.jus = Some(outcome.to.to_string());
            tracing::info!("Upgraded layout '{}' {} => {}", doc.name, outcome.from, outcome.to);
        }
        Ok(outcome)
    }

    fn version_of(&self, doc: &LayoutDocument) -> Result<JusVersion, VersionError> {
        match doc.jus.as_deref() {
            None => Ok(JusVersion::LEGACY),
            Some(tag) => tag.parse().map_err(|source| VersionError::Malformed {
                document: doc.name.clone(),
                source,
            }),
        }
    }

    fn plan(&self, document: &str, from: JusVersion) -> Result<Vec<&Migration>, VersionError> {
        if from > self.target {
            return Err(VersionError::Newer {
                document: document.to_string(),
                found: from,
                supported: self.target,
            });
        }
        if from != self.target && !self.knows(from) {
            return Err(VersionError::Unknown {
                document: document.to_string(),
                found: from,
            });
        }

        let mut plan = Vec::new();
        let mut current = from;
        while current < self.target {
            let step = self
                .steps
                .iter()
                .find(|step| step.from == current)
                .ok_or_else(|| VersionError::Unknown {
                    document: document.to_string(),
                    found: current,
                })?;
            plan.push(step);
            current = step.to;
        }
        Ok(plan)
    }
}

/// 1.0 → 2.0 rewrite, depth-first over `children`
fn upgrade_to_2_0(nodes: &mut Vec<LayoutNode>) -> bool {
    let mut changed = false;
    for node in nodes.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            changed |= upgrade_to_2_0(children);
        }
        changed |= upgrade_node(node);
    }
    changed
}

fn upgrade_node(node: &mut LayoutNode) -> bool {
    match node.control {
        ControlType::TargetListBox | ControlType::VariableTargetListBox => {
            wrap_target_list(node);
            true
        }
        ControlType::ComboBox => upgrade_combo_options(node),
        ControlType::CheckBox | ControlType::RadioButton => {
            rename_key(&mut node.attributes, "checkedValue", "focusValue")
        }
        _ => false,
    }
}

/// Legacy target list becomes a target list inside a `TargetLayoutBox`
fn wrap_target_list(node: &mut LayoutNode) {
    node.control = if node.control == ControlType::TargetListBox {
        ControlType::ListBox
    } else {
        ControlType::VariablesListBox
    };

    if let Some(columns) = node.columns.as_mut() {
        columns.iter_mut().for_each(extract_cell_template);
    }
    node.attributes.insert("isTarget".to_string(), JsonValue::Bool(true));
    let label = node.attributes.shift_remove("label");

    let list = std::mem::replace(node, LayoutNode::new(ControlType::TargetLayoutBox));
    node.children = Some(vec![list]);
    if let Some(label) = label {
        node.attributes.insert("label".to_string(), label);
    }
}

/// Inline cell fields of a legacy column move into a `template`
fn extract_cell_template(column: &mut Column) {
    if column.template.is_some() {
        return;
    }
    let Some(tag) = column.attributes.get("type").and_then(JsonValue::as_str) else {
        return;
    };
    let control = ControlType::from(tag);
    column.attributes.shift_remove("type");

    let mut keys = vec!["format", "horizontalAlignment", "verticalAlignment"];
    match control {
        ControlType::TextBox => keys.push("inputPattern"),
        ControlType::ComboBox => keys.push("options"),
        _ => {}
    }

    let mut cell = LayoutNode::new(control);
    for key in keys {
        if let Some(value) = column.attributes.shift_remove(key) {
            cell.attributes.insert(key.to_string(), value);
        }
    }
    column.template = Some(Box::new(cell));
}

fn upgrade_combo_options(node: &mut LayoutNode) -> bool {
    let Some(JsonValue::Array(entries)) = node.attributes.get_mut("options") else {
        return false;
    };

    let mut changed = false;
    for entry in entries.iter_mut() {
        if let JsonValue::Object(fields) = entry {
            if fields.contains_key("label") || fields.contains_key("value") {
                *fields = renamed(std::mem::take(fields), &[("label", "title"), ("value", "name")]);
                changed = true;
            }
        }
    }
    changed
}

/// Rename one key in place, keeping its position
fn rename_key<M>(map: &mut M, from: &str, to: &str) -> bool
where
    M: Default + IntoIterator<Item = (String, JsonValue)> + FromIterator<(String, JsonValue)>,
    for<'a> &'a M: IntoIterator<Item = (&'a String, &'a JsonValue)>,
{
    if !(&*map).into_iter().any(|(key, _)| key == from) {
        return false;
    }
    *map = renamed(std::mem::take(map), &[(from, to)]);
    true
}

fn renamed<M>(map: M, renames: &[(&str, &str)]) -> M
where
    M: IntoIterator<Item = (String, JsonValue)> + FromIterator<(String, JsonValue)>,
{
    map.into_iter()
        .map(|(key, value)| {
            let key = renames
                .iter()
                .find(|(from, _)| *from == key)
                .map_or(key, |(_, to)| (*to).to_string());
            (key, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmc_model::DocumentFormat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn legacy(yaml: &str) -> LayoutDocument {
        LayoutDocument::parse(yaml, DocumentFormat::Yaml).unwrap()
    }

    #[test]
    fn combo_and_toggle_upgrade() {
        let mut doc = legacy(
            "\
name: demo
title: Demo
jus: '1.0'
children:
  - type: ComboBox
    name: method
    options:
      - label: A
        value: a
  - type: CheckBox
    name: flag
    checkedValue: x
",
        );
        let outcome = Migrator::new().migrate(&mut doc).unwrap();

        assert!(outcome.upgraded());
        assert!(outcome.rewritten);
        assert_eq!(outcome.message().as_deref(), Some("from 1.0 => 2.0"));
        assert_eq!(doc.jus.as_deref(), Some("2.0"));
        assert_eq!(
            doc.children[0].attr("options"),
            Some(&json!([{ "title": "A", "name": "a" }]))
        );
        assert_eq!(doc.children[1].attr("focusValue"), Some(&json!("x")));
        assert!(doc.children[1].attr("checkedValue").is_none());
    }

    #[test]
    fn absent_tag_is_legacy() {
        let mut doc = legacy("name: demo\nchildren: []\n");
        let outcome = Migrator::new().migrate(&mut doc).unwrap();
        assert_eq!(outcome.from, JusVersion::LEGACY);
        assert!(!outcome.rewritten);
        assert_eq!(doc.jus.as_deref(), Some("2.0"));
    }

    #[test]
    fn target_list_is_wrapped() {
        let mut doc = legacy(
            "\
name: demo
children:
  - type: VariableSupplier
    children:
      - type: VariableTargetListBox
        name: vars
        label: Dependent Variables
        columns:
          - name: column1
            type: TextBox
            format: number
            inputPattern: '[0-9]+'
            stretchFactor: 1
",
        );
        Migrator::new().migrate(&mut doc).unwrap();

        let wrapper = &doc.children[0].child_nodes()[0];
        assert_eq!(wrapper.control, ControlType::TargetLayoutBox);
        assert_eq!(wrapper.label(), Some("Dependent Variables"));

        let list = &wrapper.child_nodes()[0];
        assert_eq!(list.control, ControlType::VariablesListBox);
        assert_eq!(list.binding_key(), Some("vars"));
        assert_eq!(list.attr("isTarget"), Some(&json!(true)));
        assert!(list.label().is_none());

        let column = &list.columns.as_deref().unwrap()[0];
        assert_eq!(column.attributes.get("stretchFactor"), Some(&json!(1)));
        assert!(column.attributes.get("format").is_none());
        let cell = column.template.as_deref().unwrap();
        assert_eq!(cell.control, ControlType::TextBox);
        assert_eq!(cell.attr("format"), Some(&json!("number")));
        assert_eq!(cell.attr("inputPattern"), Some(&json!("[0-9]+")));
    }

    #[test]
    fn combo_cell_takes_options() {
        let mut doc = legacy(
            "\
name: demo
children:
  - type: TargetListBox
    name: terms
    columns:
      - name: kind
        type: ComboBox
        options: [a, b]
        inputPattern: ignored
",
        );
        Migrator::new().migrate(&mut doc).unwrap();

        let list = &doc.children[0].child_nodes()[0];
        assert_eq!(list.control, ControlType::ListBox);
        let column = &list.columns.as_deref().unwrap()[0];
        let cell = column.template.as_deref().unwrap();
        assert_eq!(cell.attr("options"), Some(&json!(["a", "b"])));
        assert!(cell.attr("inputPattern").is_none());
        assert_eq!(column.attributes.get("inputPattern"), Some(&json!("ignored")));
    }

    #[test]
    fn current_document_is_untouched() {
        let mut doc = legacy(
            "name: demo\njus: '2.0'\nchildren:\n  - type: CheckBox\n    name: flag\n    checkedValue: x\n",
        );
        let before = doc.clone();
        let outcome = Migrator::new().migrate(&mut doc).unwrap();
        assert!(!outcome.upgraded());
        assert_eq!(outcome.message(), None);
        assert_eq!(doc, before);
    }

    #[test]
    fn migration_is_idempotent() {
        let mut doc = legacy(
            "\
name: demo
children:
  - type: TargetListBox
    name: terms
    label: Terms
  - type: RadioButton
    name: r
    checkedValue: y
",
        );
        let mut nodes = doc.children.clone();
        assert!(upgrade_to_2_0(&mut nodes));
        let once = nodes.clone();
        assert!(!upgrade_to_2_0(&mut nodes));
        assert_eq!(nodes, once);

        Migrator::new().migrate(&mut doc).unwrap();
        assert_eq!(doc.children, once);
    }

    #[test]
    fn malformed_tags_are_rejected() {
        for tag in ["abc", "2", "1.x"] {
            let mut doc = LayoutDocument::empty("demo", "Demo");
            doc.jus = Some(tag.to_string());
            let before = doc.clone();
            let err = Migrator::new().migrate(&mut doc).unwrap_err();
            assert!(matches!(err, VersionError::Malformed { .. }), "{tag}");
            assert!(err.to_string().contains("demo"));
            assert_eq!(doc, before);
        }
    }

    #[test]
    fn unknown_and_newer_versions() {
        let mut doc = LayoutDocument::empty("demo", "Demo");
        doc.jus = Some("1.5".to_string());
        assert!(matches!(
            Migrator::new().migrate(&mut doc),
            Err(VersionError::Unknown { .. })
        ));

        doc.jus = Some("3.0".to_string());
        assert!(matches!(
            Migrator::new().migrate(&mut doc),
            Err(VersionError::Newer { .. })
        ));
    }

    #[test]
    fn entries_without_legacy_keys_are_left_alone() {
        let mut node = LayoutNode::new(ControlType::ComboBox)
            .with_attr("options", json!([{ "title": "A", "name": "a" }, "b"]));
        assert!(!upgrade_combo_options(&mut node));
    }

    #[test]
    fn rename_keeps_position() {
        let mut node = LayoutNode::new(ControlType::CheckBox)
            .with_attr("label", "Flag")
            .with_attr("checkedValue", "x")
            .with_attr("style", "inline");
        assert!(rename_key(&mut node.attributes, "checkedValue", "focusValue"));
        let keys: Vec<_> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["label", "focusValue", "style"]);
    }
}
