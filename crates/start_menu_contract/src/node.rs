//! Immutable menu tree model and path addressing.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One entry of the menu tree: either a launchable leaf or a folder with a submenu.
///
/// Nodes are built once by a tree provider and never mutated by the cascade runtime. A leaf
/// always carries an empty `children` sequence; folder children may be empty when the provider
/// supplies them lazily through [`TreeProvider::children_of`](crate::TreeProvider::children_of).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Identifier, unique within the enclosing children sequence only.
    pub identifier: String,
    /// Label shown in the panel.
    pub display_label: String,
    /// Whether activating or hovering this node opens a submenu.
    pub is_folder: bool,
    /// Ordered child entries (always empty for leaves).
    #[serde(default)]
    pub children: Vec<MenuNode>,
    /// Opaque icon reference resolved by the rendering layer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_ref: Option<String>,
}

impl MenuNode {
    /// Creates a leaf entry.
    pub fn leaf(identifier: impl Into<String>, display_label: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            display_label: display_label.into(),
            is_folder: false,
            children: Vec::new(),
            icon_ref: None,
        }
    }

    /// Creates a folder entry with the given children.
    pub fn folder(
        identifier: impl Into<String>,
        display_label: impl Into<String>,
        children: Vec<MenuNode>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            display_label: display_label.into(),
            is_folder: true,
            children,
            icon_ref: None,
        }
    }

    /// Attaches an icon reference.
    pub fn with_icon(mut self, icon_ref: impl Into<String>) -> Self {
        self.icon_ref = Some(icon_ref.into());
        self
    }

    /// Returns whether this node and its whole subtree satisfy the model invariants: leaves have
    /// no children and identifiers are unique within every children sequence.
    pub fn is_well_formed(&self) -> bool {
        if !self.is_folder && !self.children.is_empty() {
            return false;
        }
        let mut seen = HashSet::new();
        self.children
            .iter()
            .all(|child| seen.insert(child.identifier.as_str()) && child.is_well_formed())
    }

    /// Resolves a descendant by its identifiers relative to this node.
    pub fn descendant(&self, relative: &[String]) -> Option<&MenuNode> {
        let Some((first, rest)) = relative.split_first() else {
            return Some(self);
        };
        self.children
            .iter()
            .find(|child| &child.identifier == first)
            .and_then(|child| child.descendant(rest))
    }
}

/// Removes later duplicates of an identifier from one children sequence, keeping first
/// occurrences in order. Returns the identifiers that were dropped.
pub fn dedupe_siblings(children: &mut Vec<MenuNode>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut dropped = Vec::new();
    children.retain(|child| {
        if seen.insert(child.identifier.clone()) {
            true
        } else {
            dropped.push(child.identifier.clone());
            false
        }
    });
    dropped
}

/// Address of a node: identifiers from its top-level ancestor down to the node itself.
///
/// The empty path names the top-level panel (the menu surface itself), which has no anchor node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodePath(Vec<String>);

impl NodePath {
    /// Returns the path of the top-level panel.
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from identifier segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns whether this is the top-level panel path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the identifier segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns the number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the zero-based nesting depth of the addressed node (`None` for the root panel).
    pub fn depth(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }

    /// Returns the identifier of the addressed node.
    pub fn leaf(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// Returns the path of the panel containing the addressed node.
    pub fn parent(&self) -> Option<NodePath> {
        let (_, parent) = self.0.split_last()?;
        Some(Self(parent.to_vec()))
    }

    /// Returns a new path extended by one child identifier.
    pub fn child(&self, identifier: impl Into<String>) -> NodePath {
        let mut segments = self.0.clone();
        segments.push(identifier.into());
        Self(segments)
    }

    /// Returns whether `self` equals `other` or is one of its ancestors.
    pub fn is_prefix_of(&self, other: &NodePath) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.0 {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl From<Vec<String>> for NodePath {
    fn from(segments: Vec<String>) -> Self {
        Self(segments)
    }
}
