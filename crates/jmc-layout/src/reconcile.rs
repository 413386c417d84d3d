//! Tree reconciliation
//!
//! Brings a layout in line with its option schema in two passes:
//!
//! 1. **Removal** (postorder): controls bound to options that no longer
//!    exist, or binding an option a second time, are taken out. Their
//!    surviving children move into a fresh `LayoutBox` at the same position.
//!    Pure containers left without children are dropped.
//! 2. **Insertion** (schema order): every visible option without a control
//!    gets one, placed right after the previous option's control at the
//!    deepest level that satisfies its container requirement and the
//!    toggle neighbour rule.

use std::collections::HashSet;

use jmc_model::{ControlType, LayoutDocument, LayoutNode, NodePath, OptionSchema, OptionSpec, PathError};

use crate::error::{RegistryError, SyncError, SyncResult};
use crate::registry::{BuildContext, ControlRegistry, RequiredContainer};
use crate::report::{RemovalReason, RemovedControl, SkippedOption};

/// Outcome of both passes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    pub added: Vec<OptionSpec>,
    pub removed: Vec<RemovedControl>,
    pub skipped: Vec<SkippedOption>,
}

impl Reconciliation {
    /// Whether the tree was modified
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.added.is_empty() || !self.removed.is_empty()
    }
}

/// Reconciles layouts against schemas using a control registry
#[derive(Debug, Clone, Copy)]
pub struct Reconciler<'r> {
    registry: &'r ControlRegistry,
    strict_types: bool,
}

impl<'r> Reconciler<'r> {
    #[inline]
    #[must_use]
    pub fn new(registry: &'r ControlRegistry) -> Self {
        Self {
            registry,
            strict_types: false,
        }
    }

    /// Fail on option types without a constructor instead of skipping them
    #[inline]
    #[must_use]
    pub fn with_strict_types(mut self, strict: bool) -> Self {
        self.strict_types = strict;
        self
    }

    /// Run the removal pass, then the insertion pass
    ///
    /// # Errors
    /// Returns [`SyncError::UnknownOptionType`] under strict type handling
    pub fn reconcile(
        &self,
        doc: &mut LayoutDocument,
        schema: &OptionSchema,
    ) -> SyncResult<Reconciliation> {
        let removed = self.remove_stale(doc, schema);
        let (added, skipped) = self.insert_missing(doc, schema)?;
        Ok(Reconciliation {
            added,
            removed,
            skipped,
        })
    }

    /// Removal pass
    pub fn remove_stale(&self, doc: &mut LayoutDocument, schema: &OptionSchema) -> Vec<RemovedControl> {
        let mut claimed = HashSet::new();
        let mut removed = Vec::new();
        prune(&mut doc.children, schema, &mut claimed, &mut removed);

        for control in &removed {
            tracing::debug!("Removed {} '{}' ({})", control.control, control.name, control.reason);
        }
        removed
    }

    /// Insertion pass, returning the added and the skipped options
    ///
    /// # Errors
    /// Returns [`SyncError::UnknownOptionType`] under strict type handling
    pub fn insert_missing(
        &self,
        doc: &mut LayoutDocument,
        schema: &OptionSchema,
    ) -> SyncResult<(Vec<OptionSpec>, Vec<SkippedOption>)> {
        let mut added = Vec::new();
        let mut skipped = Vec::new();
        let mut anchor: Option<NodePath> = None;

        for option in schema.iter().filter(|option| !option.hidden) {
            if let Some(path) = doc.find_bound(&option.name) {
                tracing::debug!("Option '{}' bound at {}", option.name, path);
                anchor = Some(path);
                continue;
            }

            let control = match self.registry.construct(option, BuildContext::Standalone) {
                Ok(control) => control,
                Err(RegistryError::Unrepresented(kind)) => {
                    tracing::debug!("Option '{}' of type {} has no control", option.name, kind);
                    continue;
                }
                Err(RegistryError::NoConstructor(kind)) => {
                    if self.strict_types {
                        return Err(SyncError::UnknownOptionType {
                            option: option.name.clone(),
                            kind: kind.to_string(),
                        });
                    }
                    tracing::warn!("Skipping option '{}': unknown type '{}'", option.name, kind);
                    skipped.push(SkippedOption {
                        name: option.name.clone(),
                        kind,
                    });
                    continue;
                }
            };

            let required = self.registry.required_container(option);
            let placed = self.place(doc, anchor.as_ref(), control, required)?;
            tracing::debug!("Placed '{}' at {}", option.name, placed);

            anchor = doc.find_bound(&option.name).or(Some(placed));
            added.push(option.clone());
        }

        Ok((added, skipped))
    }

    /// Insert `control` after `anchor`, walking up until the level fits
    fn place(
        &self,
        doc: &mut LayoutDocument,
        anchor: Option<&NodePath>,
        control: LayoutNode,
        required: RequiredContainer,
    ) -> Result<NodePath, PathError> {
        let Some(mut current) = anchor.cloned() else {
            let container = self.registry.container_for(required).with_children(vec![control]);
            return doc.insert(&NodePath::root(), 0, container);
        };

        loop {
            let (Some(parent), Some(index)) = (current.parent(), current.index()) else {
                return Err(PathError::NotFound(current));
            };

            if parent.is_root() {
                let container = self.registry.container_for(required).with_children(vec![control]);
                return doc.insert(&parent, index + 1, container);
            }

            let parent_node = doc
                .node(&parent)
                .ok_or_else(|| PathError::NotFound(parent.clone()))?;
            if required.accepts(&parent_node.control)
                && fits_between(parent_node.child_nodes(), index + 1, &control.control)
            {
                return doc.insert(&parent, index + 1, control);
            }
            current = parent;
        }
    }
}

/// Toggles may only neighbour toggles
#[inline]
#[must_use]
pub fn compatible(a: &ControlType, b: &ControlType) -> bool {
    a.is_toggle() == b.is_toggle()
}

/// Whether `control` may be spliced in at `index` of `siblings`
fn fits_between(siblings: &[LayoutNode], index: usize, control: &ControlType) -> bool {
    let left = index
        .checked_sub(1)
        .and_then(|i| siblings.get(i))
        .map_or(true, |node| compatible(&node.control, control));
    let right = siblings
        .get(index)
        .map_or(true, |node| compatible(&node.control, control));
    left && right
}

fn prune(
    nodes: &mut Vec<LayoutNode>,
    schema: &OptionSchema,
    claimed: &mut HashSet<String>,
    removed: &mut Vec<RemovedControl>,
) {
    let mut i = 0;
    while i < nodes.len() {
        let verdict = nodes[i].binding_key().and_then(|key| {
            if !schema.contains(key) {
                Some(RemovalReason::Stale)
            } else if !claimed.insert(key.to_string()) {
                Some(RemovalReason::Duplicate)
            } else {
                None
            }
        });

        if let Some(children) = nodes[i].children.as_mut() {
            prune(children, schema, claimed, removed);
        }

        if let Some(reason) = verdict {
            let node = nodes.remove(i);
            removed.push(RemovedControl::of(&node, reason));
            if let Some(children) = node.children.filter(|c| !c.is_empty()) {
                nodes.insert(i, orphan_box(children));
                i += 1;
            }
            continue;
        }

        let node = &nodes[i];
        if node.control.is_pure_container() && !node.has_children() {
            nodes.remove(i);
            continue;
        }
        i += 1;
    }
}

fn orphan_box(children: Vec<LayoutNode>) -> LayoutNode {
    LayoutNode::container(ControlType::LayoutBox, children).with_attr("margin", "large")
}
