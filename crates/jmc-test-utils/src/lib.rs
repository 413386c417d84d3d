//! Testing utilities for JMC workspace
//!
//! Shared fixtures for schemas and layouts, and structural checks on
//! reconciled trees.

#![allow(missing_docs)]

use indexmap::IndexMap;
use jmc_model::{
    AnalysisDefinition, ControlType, DocumentFormat, LayoutDocument, LayoutNode, NodePath,
    OptionSchema, OptionSpec, OptionType,
};

pub fn option(name: &str, kind: &str) -> OptionSpec {
    OptionSpec::new(name, OptionType::from(kind))
}

/// Schema from `(name, type)` pairs
pub fn schema(options: &[(&str, &str)]) -> OptionSchema {
    OptionSchema::new(options.iter().map(|(name, kind)| option(name, kind)).collect()).unwrap()
}

pub fn analysis(name: &str, options: Vec<OptionSpec>) -> AnalysisDefinition {
    AnalysisDefinition {
        name: name.to_string(),
        title: name.to_string(),
        options: OptionSchema::new(options).unwrap(),
        extra: IndexMap::new(),
    }
}

pub fn analysis_from_yaml(yaml: &str) -> AnalysisDefinition {
    AnalysisDefinition::from_yaml(yaml).unwrap()
}

pub fn layout_from_yaml(yaml: &str) -> LayoutDocument {
    LayoutDocument::parse(yaml, DocumentFormat::Yaml).unwrap()
}

pub fn empty_layout(name: &str) -> LayoutDocument {
    LayoutDocument::empty(name, name)
}

pub fn check_box(name: &str) -> LayoutNode {
    LayoutNode::new(ControlType::CheckBox).with_name(name)
}

pub fn layout_box(children: Vec<LayoutNode>) -> LayoutNode {
    LayoutNode::container(ControlType::LayoutBox, children)
}

/// Controls enclosing `path`, innermost first
pub fn ancestors<'a>(doc: &'a LayoutDocument, path: &NodePath) -> Vec<&'a LayoutNode> {
    let mut out = Vec::new();
    let mut current = path.parent();
    while let Some(parent) = current {
        if let Some(node) = doc.node(&parent) {
            out.push(node);
        }
        current = parent.parent();
    }
    out
}

/// Panics unless every visible option is bound exactly once
pub fn assert_complete(doc: &LayoutDocument, schema: &OptionSchema, skip: &[OptionType]) {
    let bindings = doc.bindings();
    for option in schema.iter() {
        if option.hidden || skip.contains(&option.kind) {
            continue;
        }
        let count = bindings.iter().filter(|key| **key == option.name).count();
        assert_eq!(count, 1, "option '{}' bound {count} times", option.name);
    }
}

/// Panics if a binding key is not an option of `schema`
pub fn assert_sound(doc: &LayoutDocument, schema: &OptionSchema) {
    for key in doc.bindings() {
        assert!(schema.contains(key), "control bound to unknown option '{key}'");
    }
}

/// Panics if a pure container has no children
pub fn assert_no_empty_containers(doc: &LayoutDocument) {
    for (path, node) in doc.nodes() {
        if node.control.is_pure_container() {
            assert!(node.has_children(), "empty {} at {path}", node.control);
        }
    }
}

/// Panics if a toggle neighbours a non-toggle in any child list
pub fn assert_toggle_neighbours(doc: &LayoutDocument) {
    let check = |siblings: &[LayoutNode], at: &str| {
        for pair in siblings.windows(2) {
            assert_eq!(
                pair[0].control.is_toggle(),
                pair[1].control.is_toggle(),
                "{} next to {} in {at}",
                pair[0].describe(),
                pair[1].describe()
            );
        }
    };
    check(&doc.children, "<root>");
    for (path, node) in doc.nodes() {
        check(node.child_nodes(), &path.to_string());
    }
}

/// Supplier an option's control must sit under; template members decide first
pub fn required_supplier(option: &OptionSpec) -> Option<ControlType> {
    option
        .template
        .as_deref()
        .into_iter()
        .chain(&option.elements)
        .find_map(required_supplier)
        .or_else(|| {
            if option.kind.is_variable_like() {
                Some(ControlType::VariableSupplier)
            } else if option.kind.is_term_like() {
                Some(ControlType::Supplier)
            } else {
                None
            }
        })
}

/// Panics unless every variable and term list, or list with such cells,
/// sits under its supplier
pub fn assert_supplied(doc: &LayoutDocument, schema: &OptionSchema) {
    for (path, node) in doc.nodes() {
        let Some(option) = node.binding_key().and_then(|key| schema.get(key)) else {
            continue;
        };
        let Some(required) = required_supplier(option) else {
            continue;
        };
        assert!(
            ancestors(doc, &path).iter().any(|a| a.control == required),
            "'{}' is not inside a {required}",
            option.name
        );
    }
}
