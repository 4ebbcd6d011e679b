//! Tree-content provider contract and in-memory adapters.

use thiserror::Error;

use crate::node::{MenuNode, NodePath};

/// Errors surfaced by a [`TreeProvider`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The provider could not supply the requested panel contents.
    #[error("menu content unavailable for {path}: {reason}")]
    Unavailable {
        /// Folder whose children were requested.
        path: NodePath,
        /// Provider-specific failure description.
        reason: String,
    },
}

impl ProviderError {
    /// Creates an [`ProviderError::Unavailable`] for `path`.
    pub fn unavailable(path: &NodePath, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            path: path.clone(),
            reason: reason.into(),
        }
    }
}

/// Host service supplying static menu content.
///
/// The runtime asks for the children of a folder the first time its submenu opens. Passing
/// [`NodePath::root`] requests the top-level entries.
pub trait TreeProvider {
    /// Returns the ordered children of the folder addressed by `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] when the content cannot be produced. Callers treat
    /// this as an empty panel.
    fn children_of(&self, path: &NodePath) -> Result<Vec<MenuNode>, ProviderError>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Provider with no content at all; every panel is empty.
pub struct NoopTreeProvider;

impl TreeProvider for NoopTreeProvider {
    fn children_of(&self, _path: &NodePath) -> Result<Vec<MenuNode>, ProviderError> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Clone, Default)]
/// Provider backed by a precomputed in-memory tree.
pub struct MemoryTreeProvider {
    top_level: Vec<MenuNode>,
}

impl MemoryTreeProvider {
    /// Creates a provider whose top-level panel is `top_level`.
    pub fn new(top_level: Vec<MenuNode>) -> Self {
        Self { top_level }
    }

    /// Returns the top-level entries.
    pub fn top_level(&self) -> &[MenuNode] {
        &self.top_level
    }

    /// Resolves the node addressed by `path`, if any.
    pub fn node(&self, path: &NodePath) -> Option<&MenuNode> {
        let (first, rest) = path.segments().split_first()?;
        self.top_level
            .iter()
            .find(|node| &node.identifier == first)
            .and_then(|node| node.descendant(rest))
    }
}

impl TreeProvider for MemoryTreeProvider {
    fn children_of(&self, path: &NodePath) -> Result<Vec<MenuNode>, ProviderError> {
        if path.is_root() {
            return Ok(self.top_level.clone());
        }
        match self.node(path) {
            Some(node) if node.is_folder => Ok(node.children.clone()),
            Some(_) => Err(ProviderError::unavailable(path, "not a folder")),
            None => Err(ProviderError::unavailable(path, "no such node")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn provider() -> MemoryTreeProvider {
        MemoryTreeProvider::new(vec![
            MenuNode::folder(
                "programs",
                "Programs",
                vec![MenuNode::folder(
                    "games",
                    "Games",
                    vec![MenuNode::leaf("chess", "Chess")],
                )],
            ),
            MenuNode::leaf("run", "Run..."),
        ])
    }

    #[test]
    fn root_path_returns_top_level_entries() {
        let entries = provider().children_of(&NodePath::root()).expect("root");
        let ids: Vec<_> = entries.iter().map(|n| n.identifier.as_str()).collect();
        assert_eq!(ids, vec!["programs", "run"]);
    }

    #[test]
    fn nested_folder_children_resolve_by_path() {
        let entries = provider()
            .children_of(&NodePath::new(["programs", "games"]))
            .expect("games");
        assert_eq!(entries, vec![MenuNode::leaf("chess", "Chess")]);
    }

    #[test]
    fn leaves_and_missing_nodes_are_unavailable() {
        let provider = provider();
        let err = provider
            .children_of(&NodePath::new(["run"]))
            .expect_err("leaf");
        assert!(matches!(err, ProviderError::Unavailable { .. }));
        assert!(provider
            .children_of(&NodePath::new(["programs", "nope"]))
            .is_err());
    }
}
