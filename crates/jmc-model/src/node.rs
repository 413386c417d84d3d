//! Layout controls
//!
//! A [`LayoutNode`] is one control of the visual layout tree: either bound to
//! an option through its `name` / `optionId`, or a pure structural container.

use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Control type tag
///
/// Unknown tags are preserved as [`ControlType::Other`] so hand-edited
/// documents survive a load/save cycle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ControlType {
    TextBox,
    CheckBox,
    RadioButton,
    ComboBox,
    ListBox,
    VariablesListBox,
    TargetLayoutBox,
    LayoutBox,
    Supplier,
    VariableSupplier,
    Label,
    CollapseBox,
    VariableLabel,
    TermLabel,
    /// Pre-2.0 target list, rewritten by migration
    TargetListBox,
    /// Pre-2.0 variable target list, rewritten by migration
    VariableTargetListBox,
    Other(String),
}

impl ControlType {
    /// Tag as written in the document
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::TextBox => "TextBox",
            Self::CheckBox => "CheckBox",
            Self::RadioButton => "RadioButton",
            Self::ComboBox => "ComboBox",
            Self::ListBox => "ListBox",
            Self::VariablesListBox => "VariablesListBox",
            Self::TargetLayoutBox => "TargetLayoutBox",
            Self::LayoutBox => "LayoutBox",
            Self::Supplier => "Supplier",
            Self::VariableSupplier => "VariableSupplier",
            Self::Label => "Label",
            Self::CollapseBox => "CollapseBox",
            Self::VariableLabel => "VariableLabel",
            Self::TermLabel => "TermLabel",
            Self::TargetListBox => "TargetListBox",
            Self::VariableTargetListBox => "VariableTargetListBox",
            Self::Other(tag) => tag,
        }
    }

    /// Containers that exist only to group or position other controls
    ///
    /// These never bind to an option, whatever attributes they carry.
    #[inline]
    #[must_use]
    pub fn is_pure_container(&self) -> bool {
        matches!(
            self,
            Self::LayoutBox
                | Self::TargetLayoutBox
                | Self::Supplier
                | Self::VariableSupplier
                | Self::Label
                | Self::CollapseBox
        )
    }

    /// Containers without placement rules of their own
    #[inline]
    #[must_use]
    pub fn is_unstructured_container(&self) -> bool {
        matches!(self, Self::LayoutBox | Self::CollapseBox | Self::Label)
    }

    /// Check boxes and radio buttons
    #[inline]
    #[must_use]
    pub fn is_toggle(&self) -> bool {
        matches!(self, Self::CheckBox | Self::RadioButton)
    }

    /// Pre-2.0 target list types
    #[inline]
    #[must_use]
    pub fn is_legacy_target(&self) -> bool {
        matches!(self, Self::TargetListBox | Self::VariableTargetListBox)
    }
}

impl From<&str> for ControlType {
    fn from(tag: &str) -> Self {
        match tag {
            "TextBox" => Self::TextBox,
            "CheckBox" => Self::CheckBox,
            "RadioButton" => Self::RadioButton,
            "ComboBox" => Self::ComboBox,
            "ListBox" => Self::ListBox,
            "VariablesListBox" => Self::VariablesListBox,
            "TargetLayoutBox" => Self::TargetLayoutBox,
            "LayoutBox" => Self::LayoutBox,
            "Supplier" => Self::Supplier,
            "VariableSupplier" => Self::VariableSupplier,
            "Label" => Self::Label,
            "CollapseBox" => Self::CollapseBox,
            "VariableLabel" => Self::VariableLabel,
            "TermLabel" => Self::TermLabel,
            "TargetListBox" => Self::TargetListBox,
            "VariableTargetListBox" => Self::VariableTargetListBox,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for ControlType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<ControlType> for String {
    fn from(control: ControlType) -> Self {
        control.as_str().to_string()
    }
}

impl Display for ControlType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column of a list control
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Column {
    /// Column key within a row
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Cell prototype
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<LayoutNode>>,

    /// Display attributes (`stretchFactor`, `label`, legacy inline cell fields)
    #[serde(flatten)]
    pub attributes: IndexMap<String, JsonValue>,
}

impl Column {
    /// Create a named column with a cell template
    #[must_use]
    pub fn new(name: impl Into<String>, template: LayoutNode) -> Self {
        Self {
            name: Some(name.into()),
            template: Some(Box::new(template)),
            attributes: IndexMap::new(),
        }
    }

    /// With an attribute
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// One control of the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    /// Control type
    #[serde(rename = "type")]
    pub control: ControlType,

    /// Binding key (and display identifier)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Explicit binding key, takes precedence over `name`
    #[serde(rename = "optionId", default, skip_serializing_if = "Option::is_none")]
    pub option_id: Option<String>,

    /// Nested controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<LayoutNode>>,

    /// Column definitions of list controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<Column>>,

    /// Prototype for repeated items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<LayoutNode>>,

    /// Free-form display attributes in document order
    #[serde(flatten)]
    pub attributes: IndexMap<String, JsonValue>,
}

impl LayoutNode {
    /// Create a bare control
    #[must_use]
    pub fn new(control: ControlType) -> Self {
        Self {
            control,
            name: None,
            option_id: None,
            children: None,
            columns: None,
            template: None,
            attributes: IndexMap::new(),
        }
    }

    /// Create a container holding `children`
    #[must_use]
    pub fn container(control: ControlType, children: Vec<LayoutNode>) -> Self {
        Self::new(control).with_children(children)
    }

    /// With binding name
    #[inline]
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// With an attribute
    #[inline]
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// With children
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<LayoutNode>) -> Self {
        self.children = Some(children);
        self
    }

    /// With columns
    #[inline]
    #[must_use]
    pub fn with_columns(mut self, columns: Vec<Column>) -> Self {
        self.columns = Some(columns);
        self
    }

    /// With item template
    #[inline]
    #[must_use]
    pub fn with_template(mut self, template: LayoutNode) -> Self {
        self.template = Some(Box::new(template));
        self
    }

    /// Key of the option this control binds, if any
    ///
    /// Pure containers never bind; otherwise `optionId` wins over `name`.
    #[must_use]
    pub fn binding_key(&self) -> Option<&str> {
        if self.control.is_pure_container() {
            return None;
        }
        self.option_id.as_deref().or(self.name.as_deref())
    }

    /// Whether this control binds an option
    #[inline]
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.binding_key().is_some()
    }

    /// `label` attribute
    #[inline]
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.attributes.get("label").and_then(JsonValue::as_str)
    }

    /// Attribute lookup
    #[inline]
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&JsonValue> {
        self.attributes.get(key)
    }

    /// Child controls (empty when absent)
    #[inline]
    #[must_use]
    pub fn child_nodes(&self) -> &[LayoutNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Whether the control has at least one child
    #[inline]
    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.child_nodes().is_empty()
    }

    /// Whether a named property is present, structural fields included
    #[must_use]
    pub fn has_property(&self, key: &str) -> bool {
        match key {
            "type" => true,
            "name" => self.name.is_some(),
            "optionId" => self.option_id.is_some(),
            "children" => self.children.is_some(),
            "columns" => self.columns.is_some(),
            "template" => self.template.is_some(),
            other => self.attributes.contains_key(other),
        }
    }

    /// Short human description: binding key if bound, else type and label
    #[must_use]
    pub fn describe(&self) -> String {
        match (self.binding_key(), self.label()) {
            (Some(key), _) => format!("{} '{key}'", self.control),
            (None, Some(label)) if !label.is_empty() => format!("{} \"{label}\"", self.control),
            _ => self.control.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn binding_key_prefers_option_id() {
        let mut node = LayoutNode::new(ControlType::CheckBox).with_name("shown");
        assert_eq!(node.binding_key(), Some("shown"));

        node.option_id = Some("bound".to_string());
        assert_eq!(node.binding_key(), Some("bound"));
    }

    #[test]
    fn pure_containers_never_bind() {
        let node = LayoutNode::new(ControlType::LayoutBox).with_name("box");
        assert!(!node.is_bound());
        assert!(LayoutNode::new(ControlType::TextBox).binding_key().is_none());
    }

    #[test]
    fn control_type_tags() {
        assert_eq!(ControlType::from("VariablesListBox"), ControlType::VariablesListBox);
        assert_eq!(
            ControlType::from("Slider"),
            ControlType::Other("Slider".to_string())
        );
        assert!(ControlType::Supplier.is_pure_container());
        assert!(ControlType::RadioButton.is_toggle());
        assert!(!ControlType::ListBox.is_toggle());
    }

    #[test]
    fn node_from_json_keeps_attributes() {
        let node: LayoutNode = serde_json::from_value(json!({
            "type": "TextBox",
            "name": "alpha",
            "format": "number",
            "events": { "change": "onChange" },
            "label": "Alpha"
        }))
        .unwrap();

        assert_eq!(node.control, ControlType::TextBox);
        assert_eq!(node.label(), Some("Alpha"));
        let keys: Vec<_> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(keys, ["format", "events", "label"]);
    }

    #[test]
    fn node_without_type_is_rejected() {
        let result: Result<LayoutNode, _> = serde_json::from_value(json!({ "name": "x" }));
        assert!(result.is_err());
    }

    #[test]
    fn non_array_children_is_rejected() {
        let result: Result<LayoutNode, _> =
            serde_json::from_value(json!({ "type": "LayoutBox", "children": "oops" }));
        assert!(result.is_err());
    }

    #[test]
    fn describe_control() {
        let bound = LayoutNode::new(ControlType::CheckBox).with_name("alpha");
        assert_eq!(bound.describe(), "CheckBox 'alpha'");

        let labelled = LayoutNode::new(ControlType::Label).with_attr("label", "Options");
        assert_eq!(labelled.describe(), "Label \"Options\"");

        assert_eq!(LayoutNode::new(ControlType::LayoutBox).describe(), "LayoutBox");
    }
}
