//! Control element projection
//!
//! Downstream emitters do not walk the layout document; they consume a
//! normalized [`ElementList`] where events are split out of the attributes
//! and structural fields are always present.

use indexmap::IndexMap;
use jmc_model::{Column, ControlType, LayoutDocument, LayoutNode};
use serde::Serialize;
use serde_json::Value as JsonValue;

/// One control of the element list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlElement {
    #[serde(rename = "type")]
    pub control: ControlType,
    /// Binding key, if the control binds an option
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Display attributes, events excluded
    pub attributes: IndexMap<String, JsonValue>,
    pub events: IndexMap<String, JsonValue>,
    pub children: Vec<ControlElement>,
    pub columns: Vec<ColumnElement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<ControlElement>>,
}

/// Column of a list element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnElement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub attributes: IndexMap<String, JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<ControlElement>>,
}

impl From<&LayoutNode> for ControlElement {
    fn from(node: &LayoutNode) -> Self {
        let mut attributes = node.attributes.clone();
        let events = match attributes.shift_remove("events") {
            Some(JsonValue::Object(events)) => events.into_iter().collect(),
            Some(other) => {
                attributes.insert("events".to_string(), other);
                IndexMap::new()
            }
            None => IndexMap::new(),
        };

        Self {
            control: node.control.clone(),
            name: node.binding_key().map(str::to_string),
            attributes,
            events,
            children: node.child_nodes().iter().map(Self::from).collect(),
            columns: node
                .columns
                .iter()
                .flatten()
                .map(ColumnElement::from)
                .collect(),
            template: node.template.as_deref().map(|t| Box::new(Self::from(t))),
        }
    }
}

impl From<&Column> for ColumnElement {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            attributes: column.attributes.clone(),
            template: column
                .template
                .as_deref()
                .map(|t| Box::new(ControlElement::from(t))),
        }
    }
}

/// Flattened control elements of one layout
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ElementList {
    /// Document-level events
    pub events: IndexMap<String, JsonValue>,
    /// Top-level controls in declaration order
    pub controls: Vec<ControlElement>,
}

impl ElementList {
    #[must_use]
    pub fn from_document(doc: &LayoutDocument) -> Self {
        Self {
            events: doc.events.clone(),
            controls: doc.children.iter().map(ControlElement::from).collect(),
        }
    }

    /// Controls reachable through `children`, in preorder, with their depth
    pub fn iter(&self) -> impl Iterator<Item = (usize, &ControlElement)> {
        let mut stack: Vec<(usize, &ControlElement)> =
            self.controls.iter().rev().map(|c| (0, c)).collect();
        std::iter::from_fn(move || {
            let (depth, element) = stack.pop()?;
            stack.extend(element.children.iter().rev().map(|c| (depth + 1, c)));
            Some((depth, element))
        })
    }

    /// Elements bound to an option
    pub fn bound(&self) -> impl Iterator<Item = &ControlElement> {
        self.iter()
            .map(|(_, element)| element)
            .filter(|element| element.name.is_some())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn document() -> LayoutDocument {
        let mut doc = LayoutDocument::empty("demo", "Demo").with_children(vec![
            LayoutNode::container(
                ControlType::LayoutBox,
                vec![LayoutNode::new(ControlType::CheckBox)
                    .with_name("flag")
                    .with_attr("label", "Flag")
                    .with_attr("events", json!({ "change": "onChange" }))],
            ),
            LayoutNode::container(
                ControlType::VariableSupplier,
                vec![LayoutNode::container(
                    ControlType::TargetLayoutBox,
                    vec![LayoutNode::new(ControlType::VariablesListBox)
                        .with_name("vars")
                        .with_template(LayoutNode::new(ControlType::VariableLabel))],
                )],
            ),
        ]);
        doc.events.insert("loaded".to_string(), json!("onLoaded"));
        doc
    }

    #[test]
    fn events_are_split_from_attributes() {
        let list = ElementList::from_document(&document());
        let flag = &list.controls[0].children[0];
        assert_eq!(flag.name.as_deref(), Some("flag"));
        assert_eq!(flag.events.get("change"), Some(&json!("onChange")));
        assert!(!flag.attributes.contains_key("events"));
        assert_eq!(flag.attributes.get("label"), Some(&json!("Flag")));
        assert_eq!(list.events.get("loaded"), Some(&json!("onLoaded")));
    }

    #[test]
    fn preorder_with_depth() {
        let list = ElementList::from_document(&document());
        let walk: Vec<_> = list
            .iter()
            .map(|(depth, e)| (depth, e.control.as_str().to_string()))
            .collect();
        assert_eq!(
            walk,
            [
                (0, "LayoutBox".to_string()),
                (1, "CheckBox".to_string()),
                (0, "VariableSupplier".to_string()),
                (1, "TargetLayoutBox".to_string()),
                (2, "VariablesListBox".to_string()),
            ]
        );
        assert_eq!(list.len(), 5);
        let bound: Vec<_> = list.bound().filter_map(|e| e.name.as_deref()).collect();
        assert_eq!(bound, ["flag", "vars"]);
    }

    #[test]
    fn json_shape() {
        let list = ElementList::from_document(&document());
        let value = serde_json::to_value(&list).unwrap();
        let vars = &value["controls"][1]["children"][0]["children"][0];
        assert_eq!(vars["type"], json!("VariablesListBox"));
        assert_eq!(vars["template"]["type"], json!("VariableLabel"));
        assert_eq!(vars["columns"], json!([]));
    }
}
