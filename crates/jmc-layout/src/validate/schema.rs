//! Partial attribute schemas
//!
//! A small structural schema language, just enough to describe the
//! attribute contract of a control: value kinds, enumerations, nested
//! objects with required keys, and homogeneous arrays.

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

/// JSON value kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    Boolean,
    Number,
    Integer,
    Array,
    Object,
    Any,
}

impl ValueKind {
    /// Whether `value` is of this kind
    #[must_use]
    pub fn matches(self, value: &JsonValue) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
            Self::Any => true,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Boolean => "a boolean",
            Self::Number => "a number",
            Self::Integer => "an integer",
            Self::Array => "an array",
            Self::Object => "an object",
            Self::Any => "a value",
        }
    }
}

/// Constraint on one attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    Kind(ValueKind),
    /// String from a fixed set
    OneOf(Vec<&'static str>),
    Object(ObjectSchema),
    ArrayOf(Box<Rule>),
}

impl Rule {
    /// Append a constraint message for every way `value` breaks this rule
    pub fn check(&self, subject: &str, value: &JsonValue, out: &mut Vec<String>) {
        match self {
            Self::Kind(kind) => {
                if !kind.matches(value) {
                    out.push(format!("property '{subject}' must be {}", kind.expected()));
                }
            }
            Self::OneOf(allowed) => {
                if !value.as_str().is_some_and(|s| allowed.iter().any(|a| *a == s)) {
                    out.push(format!(
                        "property '{subject}' must be one of: {}",
                        allowed.join(", ")
                    ));
                }
            }
            Self::Object(schema) => {
                let Some(fields) = value.as_object() else {
                    out.push(format!("property '{subject}' must be an object"));
                    return;
                };
                for required in &schema.required {
                    if let Requirement::Property(key) = required {
                        if !fields.contains_key(*key) {
                            out.push(format!("missing required property '{subject}.{key}'"));
                        }
                    }
                }
                for (key, field) in fields {
                    match schema.properties.get(key.as_str()) {
                        Some(rule) => rule.check(&format!("{subject}.{key}"), field, out),
                        None if !schema.allows_additional() => {
                            out.push(format!("unknown property '{subject}.{key}'"));
                        }
                        None => {}
                    }
                }
            }
            Self::ArrayOf(item) => {
                let Some(items) = value.as_array() else {
                    out.push(format!("property '{subject}' must be an array"));
                    return;
                };
                for (i, element) in items.iter().enumerate() {
                    item.check(&format!("{subject}[{i}]"), element, out);
                }
            }
        }
    }
}

/// Required entry of an object schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Property(&'static str),
    /// `name` or `optionId`; waived inside list templates
    Binding,
}

/// Object schema: required keys, typed properties, openness
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectSchema {
    pub required: Vec<Requirement>,
    pub properties: IndexMap<&'static str, Rule>,
    /// `None` inherits; unset means open
    pub additional: Option<bool>,
}

impl ObjectSchema {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn require(mut self, requirement: Requirement) -> Self {
        self.required.push(requirement);
        self
    }

    #[inline]
    #[must_use]
    pub fn property(mut self, name: &'static str, rule: Rule) -> Self {
        self.properties.insert(name, rule);
        self
    }

    /// Reject keys not listed in `properties`
    #[inline]
    #[must_use]
    pub fn closed(mut self) -> Self {
        self.additional = Some(false);
        self
    }

    /// Accept keys not listed in `properties`
    #[inline]
    #[must_use]
    pub fn open(mut self) -> Self {
        self.additional = Some(true);
        self
    }

    #[inline]
    #[must_use]
    pub fn allows_additional(&self) -> bool {
        self.additional.unwrap_or(true)
    }

    /// Merge `other` into this schema
    ///
    /// Required lists are concatenated, later properties override earlier
    /// ones, except `events` whose allowed names are merged.
    pub fn extend(&mut self, other: &ObjectSchema) {
        for requirement in &other.required {
            if !self.required.contains(requirement) {
                self.required.push(*requirement);
            }
        }

        for (name, rule) in &other.properties {
            match (self.properties.get_mut(name), rule) {
                (Some(Rule::Object(mine)), Rule::Object(theirs)) if *name == "events" => {
                    mine.extend(theirs);
                }
                _ => {
                    self.properties.insert(*name, rule.clone());
                }
            }
        }

        if other.additional.is_some() {
            self.additional = other.additional;
        }
    }
}

/// Closed object accepting the named events
#[must_use]
pub fn events(names: &[&'static str]) -> Rule {
    let schema = names
        .iter()
        .fold(ObjectSchema::new().closed(), |schema, &name| {
            schema.property(name, Rule::Kind(ValueKind::Any))
        });
    Rule::Object(schema)
}
