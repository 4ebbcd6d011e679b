use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use start_menu_contract::{MenuNode, NodePath};

/// Last surface intent forwarded to the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SurfaceIntent {
    #[default]
    CollapsedSurface,
    ExpandedSurface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PanelStatus {
    Loaded,
    /// The provider failed; the panel renders as empty until it is reopened.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Panel {
    pub entries: Vec<MenuNode>,
    pub status: PanelStatus,
}

impl Panel {
    pub fn find(&self, identifier: &str) -> Option<&MenuNode> {
        self.entries.iter().find(|node| node.identifier == identifier)
    }
}

/// Read-only snapshot of the chain of visible submenu anchors, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpenPath(Vec<String>);

impl OpenPath {
    pub fn ids(&self) -> &[String] {
        &self.0
    }

    pub fn to_strs(&self) -> Vec<&str> {
        self.0.iter().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the anchor path of the panel at `depth`.
    pub fn anchor(&self, depth: usize) -> Option<NodePath> {
        (depth < self.0.len()).then(|| NodePath::from(self.0[..=depth].to_vec()))
    }
}

fn panel_visible(open_path: &[String], path: &NodePath) -> bool {
    path.parent()
        .is_some_and(|parent| open_path.starts_with(parent.segments()))
}

/// Mutable cascade state owned by the controller.
#[derive(Debug, Clone, Default)]
pub struct CascadeState {
    pub open_path: Vec<String>,
    pub hovered: Option<NodePath>,
    /// Panel contents keyed by anchor path; the root path holds the top-level entries.
    pub panels: HashMap<NodePath, Panel>,
}

impl CascadeState {
    pub fn snapshot(&self) -> OpenPath {
        OpenPath(self.open_path.clone())
    }

    /// Returns `path`'s node if its containing panel is visible and loaded.
    pub fn visible_node(&self, path: &NodePath) -> Option<&MenuNode> {
        if !panel_visible(&self.open_path, path) {
            return None;
        }
        let parent = path.parent()?;
        self.panels.get(&parent)?.find(path.leaf()?)
    }

    /// Closes every panel at `depth` and deeper. Failed panels are forgotten so the next open
    /// cycle asks the provider again.
    pub fn truncate(&mut self, depth: usize) -> Vec<String> {
        if depth >= self.open_path.len() {
            return Vec::new();
        }
        let closed = self.open_path.split_off(depth);
        self.panels
            .retain(|path, panel| panel.status == PanelStatus::Loaded || path.len() <= depth);
        if self
            .hovered
            .as_ref()
            .is_some_and(|hovered| !panel_visible(&self.open_path, hovered))
        {
            self.hovered = None;
        }
        closed
    }

    /// Closes everything and forgets every failed panel, the top-level one included.
    pub fn reset(&mut self) -> Vec<String> {
        let closed = std::mem::take(&mut self.open_path);
        self.hovered = None;
        self.panels
            .retain(|_, panel| panel.status == PanelStatus::Loaded);
        closed
    }
}
