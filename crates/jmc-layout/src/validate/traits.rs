//! Control traits and the inheritance table
//!
//! Every control type is described by a sequence of traits; its attribute
//! contract is the merge of the traits' partial schemas, in order.

use std::fmt::{self, Display, Formatter};

use jmc_model::ControlType;

use super::schema::{events, ObjectSchema, Requirement, Rule, ValueKind};

/// Reusable slice of a control's attribute contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlTrait {
    Control,
    Named,
    Value,
    Container,
    Supplier,
    Collapsible,
    Text,
    Toggle,
    Choices,
    List,
    Cell,
}

impl ControlTrait {
    /// Lowercase trait name
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Control => "control",
            Self::Named => "named",
            Self::Value => "value",
            Self::Container => "container",
            Self::Supplier => "supplier",
            Self::Collapsible => "collapsible",
            Self::Text => "text",
            Self::Toggle => "toggle",
            Self::Choices => "choices",
            Self::List => "list",
            Self::Cell => "cell",
        }
    }

    /// Partial schema contributed by this trait
    #[must_use]
    pub fn schema(self) -> ObjectSchema {
        let string = || Rule::Kind(ValueKind::String);
        let boolean = || Rule::Kind(ValueKind::Boolean);

        match self {
            Self::Control => ObjectSchema::new()
                .property("label", string())
                .property("margin", Rule::OneOf(vec!["small", "normal", "large", "none"]))
                .property("stretchFactor", Rule::Kind(ValueKind::Number))
                .property("style", string())
                .property("events", events(&["loaded", "updated"]))
                .open(),
            Self::Named => ObjectSchema::new().require(Requirement::Binding),
            Self::Value => ObjectSchema::new()
                .property("enable", string())
                .property("events", events(&["change"])),
            Self::Container => ObjectSchema::new().require(Requirement::Property("children")),
            Self::Supplier => ObjectSchema::new()
                .property("persistentItems", boolean())
                .property("format", string())
                .property("events", events(&["update"])),
            Self::Collapsible => ObjectSchema::new().property("collapsed", boolean()),
            Self::Text => ObjectSchema::new()
                .property("format", string())
                .property("inputPattern", string())
                .property("suffix", string())
                .property("borderless", boolean()),
            Self::Toggle => ObjectSchema::new()
                .property("focusValue", Rule::Kind(ValueKind::Any))
                .property("optionPart", string()),
            Self::Choices => ObjectSchema::new()
                .require(Requirement::Property("options"))
                .property("options", choice_list()),
            Self::List => ObjectSchema::new()
                .property("isTarget", boolean())
                .property("maxItemCount", Rule::Kind(ValueKind::Integer))
                .property("showColumnHeaders", boolean())
                .property("fullRowSelect", boolean())
                .property("options", choice_list())
                .property("events", events(&["listItemAdded", "listItemRemoved"])),
            Self::Cell => ObjectSchema::new().property("format", string()),
        }
    }
}

impl Display for ControlTrait {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn choice_list() -> Rule {
    let choice = ObjectSchema::new()
        .require(Requirement::Property("name"))
        .property("name", Rule::Kind(ValueKind::String))
        .property("title", Rule::Kind(ValueKind::String));
    Rule::ArrayOf(Box::new(Rule::Object(choice)))
}

/// Trait sequence of a control type (`None` for unknown and legacy types)
#[must_use]
pub fn traits_of(control: &ControlType) -> Option<&'static [ControlTrait]> {
    use ControlTrait::{
        Cell, Choices, Collapsible, Container, Control, List, Named, Supplier, Text, Toggle, Value,
    };

    let traits: &'static [ControlTrait] = match control {
        ControlType::LayoutBox | ControlType::Label | ControlType::TargetLayoutBox => {
            &[Control, Container]
        }
        ControlType::CollapseBox => &[Control, Container, Collapsible],
        ControlType::Supplier | ControlType::VariableSupplier => &[Control, Container, Supplier],
        ControlType::CheckBox | ControlType::RadioButton => &[Control, Named, Value, Toggle],
        ControlType::TextBox => &[Control, Named, Value, Text],
        ControlType::ComboBox => &[Control, Named, Value, Choices],
        ControlType::ListBox | ControlType::VariablesListBox => &[Control, Named, Value, List],
        ControlType::VariableLabel | ControlType::TermLabel => &[Control, Cell],
        ControlType::TargetListBox | ControlType::VariableTargetListBox | ControlType::Other(_) => {
            return None
        }
    };
    Some(traits)
}

/// Trait sequence of a control used as a list cell
///
/// A `Label` cell displays its row value and has no children.
#[must_use]
pub fn cell_traits_of(control: &ControlType) -> Option<&'static [ControlTrait]> {
    match control {
        ControlType::Label => Some(&[ControlTrait::Control, ControlTrait::Cell]),
        other => traits_of(other),
    }
}

/// Control types with an attribute contract
#[must_use]
pub fn known_controls() -> Vec<ControlType> {
    vec![
        ControlType::TextBox,
        ControlType::CheckBox,
        ControlType::RadioButton,
        ControlType::ComboBox,
        ControlType::ListBox,
        ControlType::VariablesListBox,
        ControlType::TargetLayoutBox,
        ControlType::LayoutBox,
        ControlType::Supplier,
        ControlType::VariableSupplier,
        ControlType::Label,
        ControlType::CollapseBox,
        ControlType::VariableLabel,
        ControlType::TermLabel,
    ]
}

/// Merged schema of a trait sequence
#[must_use]
pub fn merged(traits: &[ControlTrait]) -> ObjectSchema {
    traits.iter().fold(ObjectSchema::new(), |mut schema, t| {
        schema.extend(&t.schema());
        schema
    })
}
