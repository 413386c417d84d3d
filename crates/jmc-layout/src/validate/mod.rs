//! Structural validation of layout documents
//!
//! Each control is checked against the merged schema of its trait sequence
//! (see [`traits`]), then its `children`, column templates and item
//! template are visited. Templates are checked in template context, where
//! the binding requirement does not apply.
//!
//! Validation never mutates; all violations are collected into a single
//! [`ValidationError`].

pub mod schema;
pub mod traits;

use std::collections::{HashMap, HashSet};

use jmc_model::{ControlType, LayoutDocument, LayoutNode};

use crate::error::{ValidationError, Violation};
use schema::{ObjectSchema, Requirement};

/// Validator with precomputed per-control schemas
#[derive(Debug, Clone)]
pub struct Validator {
    schemas: HashMap<ControlType, ObjectSchema>,
    cells: HashMap<ControlType, ObjectSchema>,
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}

impl Validator {
    /// Build the merged schema of every known control type
    #[must_use]
    pub fn new() -> Self {
        Self {
            schemas: merged_schemas(traits::traits_of),
            cells: merged_schemas(traits::cell_traits_of),
        }
    }

    /// Merged schema of a control type
    #[inline]
    #[must_use]
    pub fn schema_for(&self, control: &ControlType) -> Option<&ObjectSchema> {
        self.schemas.get(control)
    }

    /// Merged schema of a control type used as a list cell
    #[inline]
    #[must_use]
    pub fn cell_schema_for(&self, control: &ControlType) -> Option<&ObjectSchema> {
        self.cells.get(control)
    }

    /// Validate a whole document
    ///
    /// # Errors
    /// Returns every violation found, naming the document
    pub fn validate(&self, doc: &LayoutDocument) -> Result<(), ValidationError> {
        let violations = self.violations(doc);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                document: doc.name.clone(),
                violations,
            })
        }
    }

    /// All violations of a document, in traversal order
    #[must_use]
    pub fn violations(&self, doc: &LayoutDocument) -> Vec<Violation> {
        let mut walk = Walk {
            validator: self,
            seen: HashSet::new(),
            violations: Vec::new(),
        };
        for (i, node) in doc.children.iter().enumerate() {
            walk.visit(node, &format!("children[{i}]"), false);
        }
        walk.violations
    }
}

type TraitLookup = fn(&ControlType) -> Option<&'static [traits::ControlTrait]>;

fn merged_schemas(lookup: TraitLookup) -> HashMap<ControlType, ObjectSchema> {
    traits::known_controls()
        .into_iter()
        .filter_map(|control| {
            let traits = lookup(&control)?;
            Some((control, traits::merged(traits)))
        })
        .collect()
}

struct Walk<'a> {
    validator: &'a Validator,
    seen: HashSet<&'a str>,
    violations: Vec<Violation>,
}

impl<'a> Walk<'a> {
    fn visit(&mut self, node: &'a LayoutNode, path: &str, template: bool) {
        let mut constraints = Vec::new();

        let schema = if template {
            self.validator.cell_schema_for(&node.control)
        } else {
            self.validator.schema_for(&node.control)
        };
        match schema {
            Some(schema) => check_node(schema, node, template, &mut constraints),
            None => constraints.push(format!("unknown control type '{}'", node.control)),
        }

        if !template {
            if let Some(key) = node.binding_key() {
                if !self.seen.insert(key) {
                    constraints.push(format!("duplicate binding '{key}'"));
                }
            }
        }

        if !constraints.is_empty() {
            let control = node.describe();
            self.violations
                .extend(constraints.into_iter().map(|constraint| Violation {
                    path: path.to_string(),
                    control: control.clone(),
                    constraint,
                }));
        }

        for (i, child) in node.child_nodes().iter().enumerate() {
            self.visit(child, &format!("{path}.children[{i}]"), template);
        }
        for (i, column) in node.columns.iter().flatten().enumerate() {
            if let Some(cell) = column.template.as_deref() {
                self.visit(cell, &format!("{path}.columns[{i}].template"), true);
            }
        }
        if let Some(item) = node.template.as_deref() {
            self.visit(item, &format!("{path}.template"), true);
        }
    }
}

fn check_node(schema: &ObjectSchema, node: &LayoutNode, template: bool, out: &mut Vec<String>) {
    for requirement in &schema.required {
        match requirement {
            Requirement::Property(key) if !node.has_property(key) => {
                out.push(format!("missing required property '{key}'"));
            }
            Requirement::Binding if !template && !node.is_bound() => {
                out.push("missing binding 'name' or 'optionId'".to_string());
            }
            _ => {}
        }
    }

    for (key, value) in &node.attributes {
        match schema.properties.get(key.as_str()) {
            Some(rule) => rule.check(key, value, out),
            None if !schema.allows_additional() => out.push(format!("unknown property '{key}'")),
            None => {}
        }
    }
}
