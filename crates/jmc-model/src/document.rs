//! Layout documents
//!
//! A [`LayoutDocument`] owns the top-level control list. Controls are
//! addressed by [`NodePath`]; re-parenting is an explicit splice on a child
//! list, there are no parent back-pointers.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::ModelError;
use crate::format::DocumentFormat;
use crate::node::LayoutNode;
use crate::path::{NodePath, PathError};
use crate::version::JusVersion;

/// Persisted layout of one analysis (`*.u.yaml`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutDocument {
    /// Display title
    #[serde(default)]
    pub title: String,

    /// Analysis name
    #[serde(default)]
    pub name: String,

    /// Format version tag, absent on legacy documents
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jus: Option<String>,

    /// Development stage
    #[serde(default)]
    pub stage: i64,

    /// Document-level event bindings
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub events: IndexMap<String, JsonValue>,

    /// Top-level controls
    #[serde(default)]
    pub children: Vec<LayoutNode>,

    /// Remaining keys (`compilerMode`, ...)
    #[serde(flatten)]
    pub extra: IndexMap<String, JsonValue>,
}

impl LayoutDocument {
    /// Empty document at the current format version
    #[must_use]
    pub fn empty(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            name: name.into(),
            jus: Some(JusVersion::CURRENT.to_string()),
            stage: 0,
            events: IndexMap::new(),
            children: Vec::new(),
            extra: IndexMap::new(),
        }
    }

    /// With top-level controls
    #[inline]
    #[must_use]
    pub fn with_children(mut self, children: Vec<LayoutNode>) -> Self {
        self.children = children;
        self
    }

    /// Parse from text in the given format
    ///
    /// # Errors
    /// Returns error if the text is invalid or a control is malformed
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, ModelError> {
        match format {
            DocumentFormat::Yaml => serde_yaml::from_str(text).map_err(ModelError::InvalidYaml),
            DocumentFormat::Json => serde_json::from_str(text).map_err(ModelError::InvalidJson),
        }
    }

    /// Serialize to text in the given format
    ///
    /// # Errors
    /// Returns error if serialization fails
    pub fn render(&self, format: DocumentFormat) -> Result<String, ModelError> {
        match format {
            DocumentFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| ModelError::Serialization(e.to_string()))
            }
            DocumentFormat::Json => serde_json::to_string_pretty(self)
                .map_err(|e| ModelError::Serialization(e.to_string())),
        }
    }

    /// Control at `path` (`None` for the root or a dangling path)
    #[must_use]
    pub fn node(&self, path: &NodePath) -> Option<&LayoutNode> {
        let mut segments = path.iter();
        let mut current = self.children.get(segments.next()?)?;
        for index in segments {
            current = current.children.as_ref()?.get(index)?;
        }
        Some(current)
    }

    /// Mutable control at `path`
    #[must_use]
    pub fn node_mut(&mut self, path: &NodePath) -> Option<&mut LayoutNode> {
        let mut segments = path.iter();
        let mut current = self.children.get_mut(segments.next()?)?;
        for index in segments {
            current = current.children.as_mut()?.get_mut(index)?;
        }
        Some(current)
    }

    /// Child list owned by `parent` (the root list for the empty path)
    #[must_use]
    pub fn child_list(&self, parent: &NodePath) -> Option<&[LayoutNode]> {
        if parent.is_root() {
            return Some(&self.children);
        }
        self.node(parent).map(LayoutNode::child_nodes)
    }

    /// Mutable child list owned by `parent`, created on demand
    pub fn child_list_mut(&mut self, parent: &NodePath) -> Option<&mut Vec<LayoutNode>> {
        if parent.is_root() {
            return Some(&mut self.children);
        }
        self.node_mut(parent)
            .map(|node| node.children.get_or_insert_with(Vec::new))
    }

    /// Splice `node` into `parent`'s child list at `index`
    ///
    /// # Errors
    /// Returns error if `parent` does not exist or `index` is past the end
    pub fn insert(
        &mut self,
        parent: &NodePath,
        index: usize,
        node: LayoutNode,
    ) -> Result<NodePath, PathError> {
        let list = self
            .child_list_mut(parent)
            .ok_or_else(|| PathError::NotFound(parent.clone()))?;
        if index > list.len() {
            return Err(PathError::OutOfBounds {
                parent: parent.clone(),
                index,
                len: list.len(),
            });
        }
        list.insert(index, node);
        Ok(parent.child(index))
    }

    /// Detach the control at `path`
    ///
    /// # Errors
    /// Returns error if no control exists at `path`
    pub fn remove(&mut self, path: &NodePath) -> Result<LayoutNode, PathError> {
        let not_found = || PathError::NotFound(path.clone());
        let parent = path.parent().ok_or_else(not_found)?;
        let index = path.index().ok_or_else(not_found)?;
        let list = self.child_list_mut(&parent).ok_or_else(not_found)?;
        if index >= list.len() {
            return Err(not_found());
        }
        Ok(list.remove(index))
    }

    /// Path of the first bound control (preorder) whose key equals `key`
    #[must_use]
    pub fn find_bound(&self, key: &str) -> Option<NodePath> {
        self.nodes()
            .into_iter()
            .find(|(_, node)| node.binding_key() == Some(key))
            .map(|(path, _)| path)
    }

    /// All controls reachable through `children`, in preorder
    #[must_use]
    pub fn nodes(&self) -> Vec<(NodePath, &LayoutNode)> {
        let mut out = Vec::new();
        let mut stack: Vec<(NodePath, &LayoutNode)> = self
            .children
            .iter()
            .enumerate()
            .rev()
            .map(|(i, node)| (NodePath::top(i), node))
            .collect();

        while let Some((path, node)) = stack.pop() {
            for (i, child) in node.child_nodes().iter().enumerate().rev() {
                stack.push((path.child(i), child));
            }
            out.push((path, node));
        }
        out
    }

    /// Binding keys of all bound controls, in preorder
    #[must_use]
    pub fn bindings(&self) -> Vec<&str> {
        self.nodes()
            .into_iter()
            .filter_map(|(_, node)| node.binding_key())
            .collect()
    }
}
