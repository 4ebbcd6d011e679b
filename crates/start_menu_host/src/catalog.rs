//! Classic top-level start-menu catalog and the composite provider that serves it.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use start_menu_contract::{MenuNode, NodePath, ProviderError, TreeProvider};

/// One row of the top-level panel as rendered.
///
/// Dividers are layout hints only; they never reach the cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CatalogEntry {
    Item(MenuNode),
    Divider,
}

impl CatalogEntry {
    pub fn node(&self) -> Option<&MenuNode> {
        match self {
            Self::Item(node) => Some(node),
            Self::Divider => None,
        }
    }
}

/// The classic top-level rows, dividers included.
pub fn classic_layout() -> Vec<CatalogEntry> {
    use CatalogEntry::{Divider, Item};
    vec![
        Item(MenuNode::leaf("update", "Windows Update").with_icon("globe")),
        Divider,
        Item(MenuNode::folder("programs", "Programs", Vec::new()).with_icon("monitor")),
        Item(MenuNode::folder("documents", "Documents", Vec::new()).with_icon("folder-open")),
        Item(MenuNode::folder("settings", "Settings", Vec::new()).with_icon("settings")),
        Item(MenuNode::folder("find", "Find", Vec::new()).with_icon("search")),
        Item(MenuNode::leaf("help", "Help").with_icon("help-circle")),
        Item(MenuNode::leaf("run", "Run...").with_icon("play")),
        Divider,
        Item(MenuNode::leaf("logoff", "Log Off...").with_icon("log-out")),
        Item(MenuNode::leaf("shutdown", "Shut Down...").with_icon("power")),
    ]
}

/// The classic top-level entries without dividers, in display order.
pub fn classic_catalog() -> Vec<MenuNode> {
    classic_layout()
        .into_iter()
        .filter_map(|entry| match entry {
            CatalogEntry::Item(node) => Some(node),
            CatalogEntry::Divider => None,
        })
        .collect()
}

/// Serves a fixed top-level panel and delegates each top-level folder to a mounted provider.
///
/// A mounted provider sees paths relative to its folder: the folder itself is its
/// [`NodePath::root`]. Folders without a mount are empty.
pub struct CatalogTreeProvider {
    top_level: Vec<MenuNode>,
    mounts: HashMap<String, Box<dyn TreeProvider>>,
}

impl CatalogTreeProvider {
    pub fn new(top_level: Vec<MenuNode>) -> Self {
        Self {
            top_level,
            mounts: HashMap::new(),
        }
    }

    pub fn classic() -> Self {
        Self::new(classic_catalog())
    }

    /// Mounts `provider` under the top-level folder `identifier`, replacing any earlier mount.
    pub fn with_folder(
        mut self,
        identifier: impl Into<String>,
        provider: impl TreeProvider + 'static,
    ) -> Self {
        self.mounts.insert(identifier.into(), Box::new(provider));
        self
    }

    pub fn top_level(&self) -> &[MenuNode] {
        &self.top_level
    }
}

impl TreeProvider for CatalogTreeProvider {
    fn children_of(&self, path: &NodePath) -> Result<Vec<MenuNode>, ProviderError> {
        let Some((first, rest)) = path.segments().split_first() else {
            return Ok(self.top_level.clone());
        };
        let entry = self
            .top_level
            .iter()
            .find(|node| &node.identifier == first)
            .ok_or_else(|| ProviderError::unavailable(path, "no such top-level entry"))?;
        if !entry.is_folder {
            return Err(ProviderError::unavailable(path, "not a folder"));
        }

        match self.mounts.get(first) {
            Some(provider) => provider
                .children_of(&NodePath::new(rest.iter().cloned()))
                .map_err(|ProviderError::Unavailable { reason, .. }| {
                    ProviderError::unavailable(path, reason)
                }),
            None if rest.is_empty() => Ok(entry.children.clone()),
            None => Err(ProviderError::unavailable(path, "no content mounted")),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use start_menu_contract::MemoryTreeProvider;

    use super::*;

    fn labels(nodes: &[MenuNode]) -> Vec<&str> {
        nodes.iter().map(|node| node.display_label.as_str()).collect()
    }

    #[test]
    fn classic_catalog_lists_entries_in_display_order() {
        let catalog = classic_catalog();
        assert_eq!(
            labels(&catalog),
            vec![
                "Windows Update",
                "Programs",
                "Documents",
                "Settings",
                "Find",
                "Help",
                "Run...",
                "Log Off...",
                "Shut Down...",
            ]
        );
        let folders: Vec<_> = catalog
            .iter()
            .filter(|node| node.is_folder)
            .map(|node| node.identifier.as_str())
            .collect();
        assert_eq!(folders, vec!["programs", "documents", "settings", "find"]);
    }

    #[test]
    fn layout_places_dividers_between_groups() {
        let layout = classic_layout();
        let dividers: Vec<_> = layout
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.node().is_none())
            .map(|(index, _)| index)
            .collect();
        assert_eq!(dividers, vec![1, 8]);
    }

    #[test]
    fn mounted_folder_receives_relative_paths() {
        let provider = CatalogTreeProvider::classic().with_folder(
            "programs",
            MemoryTreeProvider::new(vec![MenuNode::folder(
                "games",
                "Games",
                vec![MenuNode::leaf("chess", "Chess")],
            )]),
        );

        let programs = provider
            .children_of(&NodePath::new(["programs"]))
            .expect("programs");
        assert_eq!(labels(&programs), vec!["Games"]);

        let games = provider
            .children_of(&NodePath::new(["programs", "games"]))
            .expect("games");
        assert_eq!(labels(&games), vec!["Chess"]);
    }

    #[test]
    fn mount_errors_report_the_full_path() {
        let provider =
            CatalogTreeProvider::classic().with_folder("programs", MemoryTreeProvider::default());

        let err = provider
            .children_of(&NodePath::new(["programs", "missing"]))
            .expect_err("missing");
        assert_eq!(
            err,
            ProviderError::unavailable(&NodePath::new(["programs", "missing"]), "no such node")
        );
    }

    #[test]
    fn unmounted_folders_are_empty_and_leaves_are_rejected() {
        let provider = CatalogTreeProvider::classic();
        assert!(provider
            .children_of(&NodePath::new(["documents"]))
            .expect("documents")
            .is_empty());
        assert!(provider.children_of(&NodePath::new(["run"])).is_err());
        assert!(provider.children_of(&NodePath::new(["nope"])).is_err());
        assert_eq!(
            provider.children_of(&NodePath::root()).expect("top").len(),
            9
        );
    }
}
