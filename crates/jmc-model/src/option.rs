//! Option schema model
//!
//! An analysis declares its configurable parameters as an ordered list of
//! [`OptionSpec`] entries. The order is significant: it is the canonical
//! placement order for controls in the layout.

use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{ModelError, SchemaError};

/// Option type tag
///
/// Tags the tool does not know are kept as [`OptionType::Other`] so that a
/// schema still loads; what happens to them is decided by the control registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OptionType {
    Bool,
    Integer,
    Number,
    String,
    List,
    NMXList,
    Terms,
    Term,
    Variables,
    Variable,
    Pairs,
    Pair,
    Array,
    Group,
    Data,
    Output,
    Other(String),
}

impl OptionType {
    /// Tag as written in the schema
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Bool => "Bool",
            Self::Integer => "Integer",
            Self::Number => "Number",
            Self::String => "String",
            Self::List => "List",
            Self::NMXList => "NMXList",
            Self::Terms => "Terms",
            Self::Term => "Term",
            Self::Variables => "Variables",
            Self::Variable => "Variable",
            Self::Pairs => "Pairs",
            Self::Pair => "Pair",
            Self::Array => "Array",
            Self::Group => "Group",
            Self::Data => "Data",
            Self::Output => "Output",
            Self::Other(tag) => tag,
        }
    }

    /// Variable-assignment types that live under a variable supplier
    #[inline]
    #[must_use]
    pub fn is_variable_like(&self) -> bool {
        matches!(self, Self::Variables | Self::Variable | Self::Pairs | Self::Pair)
    }

    /// Model-term types that live under a term supplier
    #[inline]
    #[must_use]
    pub fn is_term_like(&self) -> bool {
        matches!(self, Self::Terms | Self::Term)
    }
}

impl From<&str> for OptionType {
    fn from(tag: &str) -> Self {
        match tag {
            "Bool" => Self::Bool,
            "Integer" => Self::Integer,
            "Number" => Self::Number,
            "String" => Self::String,
            "List" => Self::List,
            "NMXList" => Self::NMXList,
            "Terms" => Self::Terms,
            "Term" => Self::Term,
            "Variables" => Self::Variables,
            "Variable" => Self::Variable,
            "Pairs" => Self::Pairs,
            "Pair" => Self::Pair,
            "Array" => Self::Array,
            "Group" => Self::Group,
            "Data" => Self::Data,
            "Output" => Self::Output,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for OptionType {
    fn from(tag: String) -> Self {
        Self::from(tag.as_str())
    }
}

impl From<OptionType> for String {
    fn from(kind: OptionType) -> Self {
        kind.as_str().to_string()
    }
}

impl Display for OptionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable value of a `List` / `NMXList` option
///
/// Schemas write choices either as bare strings or as `{name, title}` records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice {
    Plain(String),
    Named {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
}

impl Choice {
    /// Stored value
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Plain(name) | Self::Named { name, .. } => name,
        }
    }

    /// Display text, falling back to the value
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Self::Plain(name) => name,
            Self::Named { name, title } => title.as_deref().unwrap_or(name),
        }
    }
}

/// One option of an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Stable identifier; empty only for nested template members
    #[serde(default)]
    pub name: String,

    /// Type tag
    #[serde(rename = "type")]
    pub kind: OptionType,

    /// Display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Choices of a `List` / `NMXList`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<Choice>,

    /// Row shape of an `Array`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Box<OptionSpec>>,

    /// Members of a `Group`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub elements: Vec<OptionSpec>,

    /// Hidden options get no control
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub hidden: bool,

    /// Remaining keys (`default`, `min`, `description`, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

impl OptionSpec {
    /// Create an option with a name and type
    #[must_use]
    pub fn new(name: impl Into<String>, kind: OptionType) -> Self {
        Self {
            name: name.into(),
            kind,
            title: None,
            options: Vec::new(),
            template: None,
            elements: Vec::new(),
            hidden: false,
            extra: IndexMap::new(),
        }
    }

    /// With display title
    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// With choices
    #[inline]
    #[must_use]
    pub fn with_choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = choices.into_iter().map(|c| Choice::Plain(c.into())).collect();
        self
    }

    /// With row template
    #[inline]
    #[must_use]
    pub fn with_template(mut self, template: OptionSpec) -> Self {
        self.template = Some(Box::new(template));
        self
    }

    /// With group members
    #[inline]
    #[must_use]
    pub fn with_elements(mut self, elements: Vec<OptionSpec>) -> Self {
        self.elements = elements;
        self
    }

    /// Mark hidden
    #[inline]
    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Title or empty string
    #[inline]
    #[must_use]
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// Ordered, name-unique list of options
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<OptionSpec>", into = "Vec<OptionSpec>")]
pub struct OptionSchema {
    options: Vec<OptionSpec>,
    index: HashMap<String, usize>,
}

impl OptionSchema {
    /// Build a schema, rejecting unnamed and duplicate options
    ///
    /// # Errors
    /// Returns [`SchemaError`] on the first offending option
    pub fn new(options: Vec<OptionSpec>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(options.len());
        for (i, option) in options.iter().enumerate() {
            if option.name.is_empty() {
                return Err(SchemaError::UnnamedOption { index: i });
            }
            if index.insert(option.name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateOption(option.name.clone()));
            }
        }
        Ok(Self { options, index })
    }

    /// Look up an option by name
    #[inline]
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&OptionSpec> {
        self.index.get(name).map(|&i| &self.options[i])
    }

    /// Check whether an option name exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Options in schema order
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &OptionSpec> {
        self.options.iter()
    }

    /// Number of options
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.options.len()
    }

    /// Check if schema is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl TryFrom<Vec<OptionSpec>> for OptionSchema {
    type Error = SchemaError;

    fn try_from(options: Vec<OptionSpec>) -> Result<Self, Self::Error> {
        Self::new(options)
    }
}

impl From<OptionSchema> for Vec<OptionSpec> {
    fn from(schema: OptionSchema) -> Self {
        schema.options
    }
}

/// Analysis definition (`*.a.yaml`)
///
/// Only the fields the layout tooling reads are typed; the rest is retained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDefinition {
    /// Analysis identifier
    pub name: String,

    /// Display title
    #[serde(default)]
    pub title: String,

    /// Options
    #[serde(default)]
    pub options: OptionSchema,

    /// Remaining keys (`menuGroup`, `version`, `jas`, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

impl AnalysisDefinition {
    /// Parse from YAML string
    ///
    /// # Errors
    /// Returns error if YAML is invalid or the option list is malformed
    pub fn from_yaml(yaml: &str) -> Result<Self, ModelError> {
        serde_yaml::from_str(yaml).map_err(ModelError::InvalidYaml)
    }

    /// Parse from JSON string
    ///
    /// # Errors
    /// Returns error if JSON is invalid or the option list is malformed
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        serde_json::from_str(json).map_err(ModelError::InvalidJson)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ANALYSIS: &str = r#"
name: ttestIS
title: Independent Samples T-Test
menuGroup: T-Tests
options:
  - name: data
    type: Data
  - name: vars
    title: Dependent Variables
    type: Variables
  - name: welchs
    title: Welch's
    type: Bool
    default: false
  - name: hypothesis
    title: Alternative hypothesis
    type: List
    options:
      - different
      - name: oneGreater
        title: Group 1 > Group 2
  - name: contrasts
    type: Array
    template:
      type: Group
      elements:
        - name: var
          type: Variable
        - name: type
          type: List
          options: [none, deviation]
"#;

    #[test]
    fn analysis_from_yaml() {
        let analysis = AnalysisDefinition::from_yaml(ANALYSIS).unwrap();
        assert_eq!(analysis.name, "ttestIS");
        assert_eq!(analysis.options.len(), 5);
        assert_eq!(analysis.extra.get("menuGroup"), Some(&JsonValue::from("T-Tests")));

        let welchs = analysis.options.get("welchs").unwrap();
        assert_eq!(welchs.kind, OptionType::Bool);
        assert_eq!(welchs.extra.get("default"), Some(&JsonValue::Bool(false)));

        let contrasts = analysis.options.get("contrasts").unwrap();
        let template = contrasts.template.as_deref().unwrap();
        assert_eq!(template.kind, OptionType::Group);
        assert_eq!(template.elements.len(), 2);
        assert_eq!(template.elements[0].kind, OptionType::Variable);
    }

    #[test]
    fn choices_plain_and_named() {
        let analysis = AnalysisDefinition::from_yaml(ANALYSIS).unwrap();
        let hypothesis = analysis.options.get("hypothesis").unwrap();
        assert_eq!(hypothesis.options[0].name(), "different");
        assert_eq!(hypothesis.options[0].title(), "different");
        assert_eq!(hypothesis.options[1].name(), "oneGreater");
        assert_eq!(hypothesis.options[1].title(), "Group 1 > Group 2");
    }

    #[test]
    fn schema_order_is_preserved() {
        let analysis = AnalysisDefinition::from_yaml(ANALYSIS).unwrap();
        let names: Vec<_> = analysis.options.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(names, ["data", "vars", "welchs", "hypothesis", "contrasts"]);
    }

    #[test]
    fn schema_rejects_duplicates() {
        let result = OptionSchema::new(vec![
            OptionSpec::new("a", OptionType::Bool),
            OptionSpec::new("a", OptionType::Number),
        ]);
        assert_eq!(result, Err(SchemaError::DuplicateOption("a".to_string())));
    }

    #[test]
    fn schema_rejects_unnamed() {
        let result = OptionSchema::new(vec![OptionSpec::new("", OptionType::Bool)]);
        assert_eq!(result, Err(SchemaError::UnnamedOption { index: 0 }));
    }

    #[test]
    fn duplicate_in_yaml_is_load_error() {
        let yaml = "name: x\noptions:\n  - {name: a, type: Bool}\n  - {name: a, type: Bool}\n";
        let err = AnalysisDefinition::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("duplicate option name"));
    }

    #[test]
    fn unknown_type_is_kept() {
        let yaml = "name: x\noptions:\n  - {name: a, type: Slider}\n";
        let analysis = AnalysisDefinition::from_yaml(yaml).unwrap();
        let option = analysis.options.get("a").unwrap();
        assert_eq!(option.kind, OptionType::Other("Slider".to_string()));
        assert_eq!(option.kind.to_string(), "Slider");
    }
}
