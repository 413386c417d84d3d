//! Control type registry
//!
//! Maps option type tags to control constructors and to the kind of
//! container their control must live in. The registry is an explicit,
//! immutable value: build it once with [`ControlRegistry::with_defaults`]
//! and pass it by reference to the reconciler.

use std::collections::{HashMap, HashSet};
use std::fmt;

use jmc_model::{Column, ControlType, LayoutNode, OptionSpec, OptionType};
use serde_json::{json, Value as JsonValue};

use crate::error::RegistryError;

/// Where a constructed control is being built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildContext {
    /// A control bound to a top-level option
    #[default]
    Standalone,
    /// A cell or row prototype inside a list control
    Template,
}

impl BuildContext {
    #[inline]
    #[must_use]
    pub fn is_template(self) -> bool {
        matches!(self, Self::Template)
    }
}

/// Container a control must be placed under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RequiredContainer {
    VariableSupplier,
    Supplier,
    /// Any generic container (`LayoutBox`, `CollapseBox`, `Label`)
    #[default]
    None,
}

impl RequiredContainer {
    /// Whether a container of type `control` satisfies this requirement
    #[must_use]
    pub fn accepts(self, control: &ControlType) -> bool {
        match self {
            Self::VariableSupplier => *control == ControlType::VariableSupplier,
            Self::Supplier => *control == ControlType::Supplier,
            Self::None => control.is_unstructured_container(),
        }
    }

    #[inline]
    #[must_use]
    pub fn is_none(self) -> bool {
        matches!(self, Self::None)
    }
}

/// Control constructor: builds the control for one option
///
/// Receives the registry so composite types can build their cells.
pub type Constructor =
    fn(&ControlRegistry, &OptionSpec, BuildContext) -> Result<LayoutNode, RegistryError>;

/// Registry of option type → control mappings
#[derive(Clone, Default)]
pub struct ControlRegistry {
    constructors: HashMap<OptionType, Constructor>,
    containers: HashMap<OptionType, RequiredContainer>,
    unrepresented: HashSet<OptionType>,
}

impl ControlRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create registry with the built-in option types
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(OptionType::Bool, build_check_box);
        registry.register(OptionType::Integer, build_text_box);
        registry.register(OptionType::Number, build_text_box);
        registry.register(OptionType::String, build_text_box);
        registry.register(OptionType::List, build_combo_box);
        registry.register(OptionType::NMXList, build_multi_list);
        registry.register(OptionType::Terms, build_target_list);
        registry.register(OptionType::Term, build_target_list);
        registry.register(OptionType::Variables, build_target_list);
        registry.register(OptionType::Variable, build_target_list);
        registry.register(OptionType::Pairs, build_pairs_list);
        registry.register(OptionType::Pair, build_pairs_list);
        registry.register(OptionType::Array, build_array_list);

        for kind in [
            OptionType::Variables,
            OptionType::Variable,
            OptionType::Pairs,
            OptionType::Pair,
        ] {
            registry.require_container(kind, RequiredContainer::VariableSupplier);
        }
        registry.require_container(OptionType::Terms, RequiredContainer::Supplier);
        registry.require_container(OptionType::Term, RequiredContainer::Supplier);

        registry.mark_unrepresented(OptionType::Data);
        registry.mark_unrepresented(OptionType::Output);
        registry.mark_unrepresented(OptionType::Group);

        registry
    }

    /// Register a constructor for an option type, replacing any existing one
    pub fn register(&mut self, kind: OptionType, constructor: Constructor) {
        self.unrepresented.remove(&kind);
        self.constructors.insert(kind, constructor);
    }

    /// Set the container requirement of an option type
    pub fn require_container(&mut self, kind: OptionType, container: RequiredContainer) {
        self.containers.insert(kind, container);
    }

    /// Mark an option type as intentionally having no control
    pub fn mark_unrepresented(&mut self, kind: OptionType) {
        self.constructors.remove(&kind);
        self.unrepresented.insert(kind);
    }

    /// Check if a constructor exists for the type
    #[inline]
    #[must_use]
    pub fn contains(&self, kind: &OptionType) -> bool {
        self.constructors.contains_key(kind)
    }

    /// Check if the type is intentionally unrepresented
    #[inline]
    #[must_use]
    pub fn is_unrepresented(&self, kind: &OptionType) -> bool {
        self.unrepresented.contains(kind)
    }

    /// Number of registered constructors
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Build the control for `spec`
    ///
    /// # Errors
    /// - [`RegistryError::Unrepresented`] for types deliberately without a control
    /// - [`RegistryError::NoConstructor`] for types nothing is registered for
    pub fn construct(
        &self,
        spec: &OptionSpec,
        context: BuildContext,
    ) -> Result<LayoutNode, RegistryError> {
        if self.unrepresented.contains(&spec.kind) {
            return Err(RegistryError::Unrepresented(spec.kind.clone()));
        }
        let constructor = self
            .constructors
            .get(&spec.kind)
            .ok_or_else(|| RegistryError::NoConstructor(spec.kind.clone()))?;
        constructor(self, spec, context)
    }

    /// Container the control for `spec` must be placed under
    ///
    /// Nested requirements (array templates, group members in order) win over
    /// the type's own requirement.
    #[must_use]
    pub fn required_container(&self, spec: &OptionSpec) -> RequiredContainer {
        spec.template
            .as_deref()
            .into_iter()
            .chain(&spec.elements)
            .map(|inner| self.required_container(inner))
            .find(|required| !required.is_none())
            .unwrap_or_else(|| self.containers.get(&spec.kind).copied().unwrap_or_default())
    }

    /// Fresh, empty container satisfying `required`
    #[must_use]
    pub fn container_for(&self, required: RequiredContainer) -> LayoutNode {
        match required {
            RequiredContainer::VariableSupplier => supplier(ControlType::VariableSupplier),
            RequiredContainer::Supplier => supplier(ControlType::Supplier),
            RequiredContainer::None => {
                LayoutNode::container(ControlType::LayoutBox, Vec::new()).with_attr("margin", "large")
            }
        }
    }
}

impl fmt::Debug for ControlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut constructors: Vec<_> = self.constructors.keys().map(OptionType::as_str).collect();
        constructors.sort_unstable();
        let mut unrepresented: Vec<_> = self.unrepresented.iter().map(OptionType::as_str).collect();
        unrepresented.sort_unstable();

        f.debug_struct("ControlRegistry")
            .field("constructors", &constructors)
            .field("containers", &self.containers.len())
            .field("unrepresented", &unrepresented)
            .finish()
    }
}

fn supplier(control: ControlType) -> LayoutNode {
    LayoutNode::container(control, Vec::new())
        .with_attr("persistentItems", false)
        .with_attr("stretchFactor", 1)
}

/// Base control: bound name outside templates, label when titled
fn base(control: ControlType, spec: &OptionSpec, context: BuildContext) -> LayoutNode {
    let mut node = LayoutNode::new(control);
    if !context.is_template() {
        node.name = Some(spec.name.clone());
    }
    if let Some(title) = &spec.title {
        node.attributes.insert("label".to_string(), JsonValue::from(title.as_str()));
    }
    node
}

fn choices(spec: &OptionSpec) -> JsonValue {
    spec.options
        .iter()
        .map(|choice| json!({ "title": choice.title(), "name": choice.name() }))
        .collect()
}

fn build_check_box(
    _: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    Ok(base(ControlType::CheckBox, spec, context))
}

fn build_text_box(
    _: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    let node = base(ControlType::TextBox, spec, context);
    Ok(match spec.kind {
        OptionType::Integer => node
            .with_attr("format", "number")
            .with_attr("inputPattern", "[0-9]+"),
        OptionType::Number => node
            .with_attr("format", "number")
            .with_attr("inputPattern", "[-0-9.]+"),
        _ => node.with_attr("format", "string"),
    })
}

fn build_combo_box(
    _: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    Ok(base(ControlType::ComboBox, spec, context).with_attr("options", choices(spec)))
}

fn build_multi_list(
    _: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    Ok(base(ControlType::ListBox, spec, context)
        .with_attr("options", choices(spec))
        .with_template(LayoutNode::new(ControlType::CheckBox)))
}

/// Variables, Variable, Terms and Term
fn build_target_list(
    _: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    let (list, cell) = if spec.kind.is_term_like() {
        (ControlType::ListBox, ControlType::TermLabel)
    } else {
        (ControlType::VariablesListBox, ControlType::VariableLabel)
    };

    if context.is_template() {
        return Ok(LayoutNode::new(cell));
    }

    let mut node = LayoutNode::new(list)
        .with_name(spec.name.clone())
        .with_attr("isTarget", true)
        .with_attr("showColumnHeaders", false)
        .with_attr("fullRowSelect", true)
        .with_template(LayoutNode::new(cell));
    if matches!(spec.kind, OptionType::Variable | OptionType::Term) {
        node = node.with_attr("maxItemCount", 1);
    }
    Ok(target_box(spec, node))
}

fn build_pairs_list(
    _: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    if context.is_template() {
        return Ok(LayoutNode::new(ControlType::VariableLabel));
    }

    let cell = |name: &str| {
        Column::new(name, LayoutNode::new(ControlType::VariableLabel)).with_attr("stretchFactor", 1)
    };
    let mut node = LayoutNode::new(ControlType::VariablesListBox)
        .with_name(spec.name.clone())
        .with_attr("isTarget", true)
        .with_attr("showColumnHeaders", false)
        .with_attr("fullRowSelect", true)
        .with_columns(vec![cell("i1"), cell("i2")]);
    if spec.kind == OptionType::Pair {
        node = node.with_attr("maxItemCount", 1);
    }
    Ok(target_box(spec, node))
}

fn target_box(spec: &OptionSpec, list: LayoutNode) -> LayoutNode {
    let mut wrapper = LayoutNode::container(ControlType::TargetLayoutBox, vec![list]);
    if let Some(title) = &spec.title {
        wrapper
            .attributes
            .insert("label".to_string(), JsonValue::from(title.as_str()));
    }
    wrapper
}

fn build_array_list(
    registry: &ControlRegistry,
    spec: &OptionSpec,
    context: BuildContext,
) -> Result<LayoutNode, RegistryError> {
    let mut node = base(ControlType::ListBox, spec, context)
        .with_attr("showColumnHeaders", false)
        .with_attr("fullRowSelect", true)
        .with_attr("stretchFactor", 1);

    match spec.template.as_deref() {
        Some(row) if row.kind == OptionType::Group => {
            let columns = row
                .elements
                .iter()
                .map(|element| {
                    let cell = template_cell(registry, element)?;
                    Ok(Column::new(element.name.clone(), cell).with_attr("stretchFactor", 1))
                })
                .collect::<Result<Vec<_>, RegistryError>>()?;
            node = node.with_columns(columns);
        }
        Some(row) => {
            node = node.with_template(template_cell(registry, row)?);
        }
        None => {}
    }
    Ok(node)
}

/// Row cell of a list; types without a cell of their own show their value as text
fn template_cell(registry: &ControlRegistry, spec: &OptionSpec) -> Result<LayoutNode, RegistryError> {
    match registry.construct(spec, BuildContext::Template) {
        Err(RegistryError::NoConstructor(kind) | RegistryError::Unrepresented(kind)) => {
            tracing::debug!("Cell '{}' of type {} shown as text", spec.name, kind);
            Ok(LayoutNode::new(ControlType::Label).with_attr("format", "string"))
        }
        built => built,
    }
}
