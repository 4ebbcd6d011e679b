//! Filesystem-backed "Programs" tree.
//!
//! Shortcuts are collected from one or more start-menu directories. Only `.lnk` and `.exe`
//! files survive; folders that end up empty are omitted. Every node's identifier is its full
//! filesystem path, so a leaf identifier can be handed straight to the opener.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use start_menu_contract::{MemoryTreeProvider, MenuNode, NodePath, ProviderError, TreeProvider};
use tracing::{debug, info};

const PROGRAM_EXTENSIONS: [&str; 2] = ["lnk", "exe"];

/// Start-menu tree scanned from disk on first use.
///
/// A successful scan is kept for the lifetime of the value; a failed scan is retried on the
/// next request.
#[derive(Debug, Default)]
pub struct FsProgramTree {
    roots: Vec<PathBuf>,
    snapshot: RefCell<Option<MemoryTreeProvider>>,
}

impl FsProgramTree {
    pub fn new(roots: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            roots: roots.into_iter().collect(),
            snapshot: RefCell::new(None),
        }
    }

    /// Uses the all-users (`%ProgramData%`) and per-user (`%APPDATA%`) start-menu program
    /// directories, in that order. Unset variables are skipped.
    pub fn from_env() -> Self {
        Self::new(
            ["ProgramData", "APPDATA"]
                .into_iter()
                .filter_map(env::var_os)
                .map(|base| {
                    PathBuf::from(base)
                        .join("Microsoft")
                        .join("Windows")
                        .join("Start Menu")
                        .join("Programs")
                }),
        )
    }

    /// Scans every root and merges their top-level folders by name.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Unavailable`] when no root could be read.
    pub fn scan(&self) -> Result<Vec<MenuNode>, ProviderError> {
        let mut merged: Vec<MenuNode> = Vec::new();
        let mut readable = 0usize;
        for root in &self.roots {
            match scan_directory(root) {
                Ok(items) => {
                    readable += 1;
                    merge_top_level(&mut merged, items);
                }
                Err(err) => {
                    debug!(root = %root.display(), %err, "skipping unreadable start menu root")
                }
            }
        }
        if readable == 0 {
            return Err(ProviderError::unavailable(
                &NodePath::root(),
                "no readable start menu directory",
            ));
        }
        sort_entries(&mut merged);
        info!(roots = readable, entries = merged.len(), "scanned start menu programs");
        Ok(merged)
    }
}

impl TreeProvider for FsProgramTree {
    fn children_of(&self, path: &NodePath) -> Result<Vec<MenuNode>, ProviderError> {
        let mut snapshot = self.snapshot.borrow_mut();
        let tree = match snapshot.take() {
            Some(tree) => tree,
            None => MemoryTreeProvider::new(self.scan()?),
        };
        let children = tree.children_of(path);
        *snapshot = Some(tree);
        children
    }
}

fn scan_directory(dir: &Path) -> io::Result<Vec<MenuNode>> {
    let mut items = Vec::new();
    for entry in fs::read_dir(dir)?.flatten() {
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().into_owned();
        if file_name.starts_with('.') || file_name.eq_ignore_ascii_case("desktop.ini") {
            continue;
        }

        if path.is_dir() {
            let children = scan_directory(&path).unwrap_or_default();
            if !children.is_empty() {
                items.push(MenuNode::folder(
                    path.to_string_lossy().into_owned(),
                    file_name,
                    children,
                ));
            }
        } else if is_program(&path) {
            let label = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or(file_name);
            items.push(MenuNode::leaf(path.to_string_lossy().into_owned(), label));
        }
    }
    sort_entries(&mut items);
    Ok(items)
}

fn is_program(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            PROGRAM_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

fn merge_top_level(merged: &mut Vec<MenuNode>, items: Vec<MenuNode>) {
    for item in items {
        let existing = item.is_folder.then(|| {
            merged
                .iter_mut()
                .find(|node| node.is_folder && node.display_label == item.display_label)
        });
        match existing.flatten() {
            Some(folder) => {
                folder.children.extend(item.children);
                sort_entries(&mut folder.children);
            }
            None => merged.push(item),
        }
    }
}

fn sort_entries(items: &mut [MenuNode]) {
    items.sort_by(|a, b| match (a.is_folder, b.is_folder) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .display_label
            .to_lowercase()
            .cmp(&b.display_label.to_lowercase()),
    });
}
