//! Node paths for addressing within a layout tree
//!
//! Provides [`NodePath`] for index-based addressing of controls inside a
//! [`LayoutDocument`](crate::LayoutDocument).

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Path of a control within the layout tree
///
/// Each segment is an index into the child list of the previous level,
/// starting at the document's top-level `children`. The empty path is the
/// root itself, which owns the top-level child list but is not a control.
///
/// # Examples
/// - `[0]` → first top-level control
/// - `[2, 0, 1]` → second child of the first child of the third top-level control
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Create new path from segments
    #[inline]
    #[must_use]
    pub fn new(segments: Vec<usize>) -> Self {
        Self(segments)
    }

    /// Path of a top-level control
    #[inline]
    #[must_use]
    pub fn top(index: usize) -> Self {
        Self(vec![index])
    }

    /// Empty path (root)
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Get path segments
    #[inline]
    #[must_use]
    pub fn segments(&self) -> &[usize] {
        &self.0
    }

    /// Get number of segments (nesting depth)
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if path is empty (root)
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Get parent path (if not root)
    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            None
        } else {
            Some(Self(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Index of this control within its parent's child list
    #[inline]
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }

    /// Index of the top-level ancestor (the first segment)
    #[inline]
    #[must_use]
    pub fn top_level(&self) -> Option<usize> {
        self.0.first().copied()
    }

    /// Append a segment, returning new path
    #[inline]
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut new = self.clone();
        new.0.push(index);
        new
    }

    /// Path of the sibling at `index` under the same parent
    ///
    /// Returns `None` for the root.
    #[inline]
    #[must_use]
    pub fn sibling(&self, index: usize) -> Option<Self> {
        let mut new = self.clone();
        let last = new.0.last_mut()?;
        *last = index;
        Some(new)
    }

    /// Check if this path is a prefix of another
    #[inline]
    #[must_use]
    pub fn is_prefix_of(&self, other: &Self) -> bool {
        if self.0.len() > other.0.len() {
            return false;
        }
        self.0 == other.0[..self.0.len()]
    }

    /// Check if this path is an ancestor of another (strict prefix)
    #[inline]
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        self.0.len() < other.0.len() && self.is_prefix_of(other)
    }

    /// Iterator over segments from root to leaf
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }
}

impl Display for NodePath {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "<root>");
        }
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for NodePath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() || s == "<root>" {
            return Ok(Self::root());
        }

        let segments = s
            .split('.')
            .map(|seg| {
                if seg.is_empty() {
                    Err(PathError::EmptySegment)
                } else {
                    seg.parse::<usize>()
                        .map_err(|_| PathError::InvalidSegment(seg.to_string()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self(segments))
    }
}

impl From<Vec<usize>> for NodePath {
    fn from(segments: Vec<usize>) -> Self {
        Self(segments)
    }
}

/// Path errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    /// Empty segment in a textual path
    #[error("empty path segment")]
    EmptySegment,

    /// Non-numeric segment in a textual path
    #[error("invalid path segment: '{0}'")]
    InvalidSegment(String),

    /// No control at the given path
    #[error("no control at path {0}")]
    NotFound(NodePath),

    /// Insertion index past the end of a child list
    #[error("index {index} out of bounds under {parent} (len {len})")]
    OutOfBounds {
        /// Parent path
        parent: NodePath,
        /// Requested index
        index: usize,
        /// Current child count
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_parent_and_index() {
        let path = NodePath::new(vec![2, 0, 1]);
        assert_eq!(path.parent(), Some(NodePath::new(vec![2, 0])));
        assert_eq!(path.index(), Some(1));
        assert_eq!(path.top_level(), Some(2));
        assert_eq!(NodePath::root().parent(), None);
    }

    #[test]
    fn path_sibling_keeps_parent() {
        let path = NodePath::new(vec![1, 3]);
        assert_eq!(path.sibling(4), Some(NodePath::new(vec![1, 4])));
        assert_eq!(NodePath::root().sibling(0), None);
    }

    #[test]
    fn path_prefix() {
        let a = NodePath::new(vec![1]);
        let b = NodePath::new(vec![1, 2]);
        assert!(a.is_prefix_of(&b));
        assert!(a.is_ancestor_of(&b));
        assert!(!b.is_ancestor_of(&a));
        assert!(!a.is_ancestor_of(&a));
    }

    #[test]
    fn path_display_and_parse() {
        let path: NodePath = "0.4.2".parse().unwrap();
        assert_eq!(path.segments(), &[0, 4, 2]);
        assert_eq!(path.to_string(), "0.4.2");
        assert_eq!(NodePath::root().to_string(), "<root>");
        assert!("0..1".parse::<NodePath>().is_err());
        assert!(matches!(
            "a.1".parse::<NodePath>(),
            Err(PathError::InvalidSegment(_))
        ));
    }
}
