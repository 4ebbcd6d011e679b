//! Shared fixture tree and helpers for controller integration tests.

#![allow(dead_code)]

use std::rc::Rc;

use start_menu_contract::{DispatchIntent, MemoryTreeProvider, MenuNode, NodePath};
use start_menu_runtime::{CascadeController, MenuConfig};

pub const ROOT_DELAY: u64 = 3000;
pub const NESTED_DELAY: u64 = 500;

pub fn fixture_tree() -> MemoryTreeProvider {
    MemoryTreeProvider::new(vec![
        MenuNode::folder(
            "Programs",
            "Programs",
            vec![
                MenuNode::folder(
                    "Accessories",
                    "Accessories",
                    vec![MenuNode::leaf("Notepad", "Notepad"), MenuNode::leaf("Paint", "Paint")],
                ),
                MenuNode::folder(
                    "Games",
                    "Games",
                    vec![
                        MenuNode::folder(
                            "Chess",
                            "Chess",
                            vec![
                                MenuNode::folder(
                                    "Openings",
                                    "Openings",
                                    vec![MenuNode::leaf("Sicilian", "Sicilian")],
                                ),
                                MenuNode::leaf("Endgames", "Endgames"),
                            ],
                        ),
                        MenuNode::leaf("Solitaire", "Solitaire"),
                    ],
                ),
                MenuNode::leaf("Explorer", "Windows Explorer"),
            ],
        ),
        MenuNode::folder(
            "Documents",
            "Documents",
            vec![MenuNode::leaf("Readme", "readme.txt")],
        ),
        MenuNode::folder(
            "Settings",
            "Settings",
            vec![MenuNode::folder(
                "ControlPanel",
                "Control Panel",
                vec![MenuNode::leaf("Mouse", "Mouse")],
            )],
        ),
        MenuNode::leaf("run", "Run..."),
        MenuNode::leaf("shutdown", "Shut Down..."),
    ])
}

pub fn fixture_config() -> MenuConfig {
    MenuConfig {
        open_delay_nested_ms: NESTED_DELAY,
        open_delay_root_ms: ROOT_DELAY,
        root_entry: "Programs".to_string(),
        terminate_entries: vec!["shutdown".to_string()],
        ..MenuConfig::default()
    }
}

pub fn controller() -> CascadeController {
    CascadeController::new(fixture_config(), Rc::new(fixture_tree()))
}

pub fn path(ids: &[&str]) -> NodePath {
    NodePath::new(ids.iter().copied())
}

/// Every node path in the fixture tree, depth first.
pub fn all_paths() -> Vec<NodePath> {
    fn walk(prefix: &NodePath, nodes: &[MenuNode], out: &mut Vec<NodePath>) {
        for node in nodes {
            let here = prefix.child(node.identifier.clone());
            out.push(here.clone());
            walk(&here, &node.children, out);
        }
    }
    let mut out = Vec::new();
    walk(&NodePath::root(), fixture_tree().top_level(), &mut out);
    out
}

pub fn resizes(effects: &[DispatchIntent]) -> Vec<DispatchIntent> {
    effects
        .iter()
        .filter(|intent| intent.kind() == "resize")
        .cloned()
        .collect()
}
