//! Cascade actions and the per-level hover transition rules.
//!
//! Every level of the menu runs the same small state machine (Idle, PendingOpen, Open), keyed
//! by the node's depth in its [`NodePath`]. The states are not stored as flags on nodes: a node
//! is PendingOpen while it owns an Open timer and Open while it appears in the open path.

use serde::{Deserialize, Serialize};
use start_menu_contract::{dedupe_siblings, DispatchIntent, NodePath, TreeProvider};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::MenuConfig;
use crate::model::{CascadeState, Panel, PanelStatus};
use crate::timer::{HoverTimers, TimerKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
/// Events accepted by [`reduce_cascade`], in arrival order.
pub enum CascadeAction {
    /// Pointer entered a node.
    HoverEnter { path: NodePath },
    /// Pointer left a node.
    HoverLeave { path: NodePath },
    /// Explicit click or commit on a node.
    Activate { path: NodePath },
    /// Focus left the menu; close every level.
    DismissAll,
    /// Pointer left the whole menu surface. Handled exactly like [`CascadeAction::DismissAll`].
    PointerExitedSurface,
    /// A hover timer expired.
    TimerFired { path: NodePath, kind: TimerKind },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CascadeError {
    /// The event names a node that is not in any visible panel.
    #[error("{0} is not in a visible panel")]
    NodeNotVisible(NodePath),
}

/// Read-only collaborators used while reducing.
pub struct CascadeContext<'a> {
    pub config: &'a MenuConfig,
    pub provider: &'a dyn TreeProvider,
}

/// Applies `action` to the cascade state and returns the launch/terminate intents it produced.
///
/// Surface resize intents are not produced here; they are derived from the resulting open path
/// by the controller's [`SideEffectGateway`](crate::gateway::SideEffectGateway).
///
/// # Errors
///
/// Returns [`CascadeError::NodeNotVisible`] when a hover or activation names a node whose panel
/// is not on screen. State is left untouched in that case.
pub fn reduce_cascade(
    state: &mut CascadeState,
    timers: &mut HoverTimers<NodePath>,
    ctx: &CascadeContext<'_>,
    action: CascadeAction,
    now: u64,
) -> Result<Vec<DispatchIntent>, CascadeError> {
    let mut effects = Vec::new();
    match action {
        CascadeAction::HoverEnter { path } => {
            ensure_panel(state, ctx.provider, &NodePath::root());
            let (depth, is_folder) = visible_entry(state, &path)?;

            // The pointer is in exactly one place: only timers on its ancestor chain survive.
            let cancelled = timers.retain(|owner| owner.is_prefix_of(&path));
            if cancelled > 0 {
                debug!(%path, cancelled, "cancelled off-chain hover timers");
            }

            // Sibling switch closes the other chain now, before this node's own delay starts.
            let sibling_open = state
                .open_path
                .get(depth)
                .is_some_and(|open| Some(open.as_str()) != path.leaf());
            if sibling_open {
                let closed = state.truncate(depth);
                debug!(%path, ?closed, "sibling hover closed open chain");
            }

            state.hovered = Some(path.clone());
            if is_folder && !is_open(state, &path, depth) {
                let delay = ctx.config.open_delay_for(&path);
                debug!(%path, delay, "scheduling submenu open");
                timers.schedule(path, TimerKind::Open, now, delay);
            }
        }
        CascadeAction::HoverLeave { path } => {
            if state.hovered.as_ref() == Some(&path) {
                state.hovered = None;
            }
            if timers.cancel_owner(&path).is_some() {
                debug!(%path, "hover left before open delay elapsed");
            }
        }
        CascadeAction::Activate { path } => {
            ensure_panel(state, ctx.provider, &NodePath::root());
            let (depth, is_folder) = visible_entry(state, &path)?;
            if is_folder {
                timers.retain(|owner| owner.is_prefix_of(&path) && *owner != path);
                state.hovered = Some(path.clone());
                open_submenu(state, ctx.provider, &path, depth);
            } else {
                let identifier = path.leaf().unwrap_or_default();
                if ctx.config.is_terminate_entry(identifier) {
                    effects.push(DispatchIntent::Terminate);
                } else {
                    effects.push(DispatchIntent::launch(identifier));
                }
            }
        }
        CascadeAction::DismissAll | CascadeAction::PointerExitedSurface => {
            let cancelled = timers.clear();
            let closed = state.reset();
            debug!(cancelled, ?closed, "dismissed menu");
        }
        CascadeAction::TimerFired {
            path,
            kind: TimerKind::Open,
        } => match visible_entry(state, &path) {
            Ok((depth, true)) => open_submenu(state, ctx.provider, &path, depth),
            _ => debug!(%path, "dropping open timer for node no longer on screen"),
        },
    }
    Ok(effects)
}

fn visible_entry(state: &CascadeState, path: &NodePath) -> Result<(usize, bool), CascadeError> {
    let node = state
        .visible_node(path)
        .ok_or_else(|| CascadeError::NodeNotVisible(path.clone()))?;
    let depth = path.depth().unwrap_or_default();
    Ok((depth, node.is_folder))
}

fn is_open(state: &CascadeState, path: &NodePath, depth: usize) -> bool {
    state.open_path.get(depth).map(String::as_str) == path.leaf()
}

fn open_submenu(
    state: &mut CascadeState,
    provider: &dyn TreeProvider,
    path: &NodePath,
    depth: usize,
) {
    if is_open(state, path, depth) {
        return;
    }
    state.truncate(depth);
    if let Some(leaf) = path.leaf() {
        state.open_path.push(leaf.to_string());
    }
    ensure_panel(state, provider, path);
    debug!(%path, "submenu opened");
}

/// Loads `path`'s children on first open. Failures become an empty, unavailable panel that is
/// requested again on the next open cycle.
fn ensure_panel(state: &mut CascadeState, provider: &dyn TreeProvider, path: &NodePath) {
    if state.panels.contains_key(path) {
        return;
    }
    let panel = match provider.children_of(path) {
        Ok(mut entries) => {
            let dropped = dedupe_siblings(&mut entries);
            if !dropped.is_empty() {
                warn!(%path, ?dropped, "provider returned duplicate sibling identifiers");
            }
            let malformed: Vec<&str> = entries
                .iter()
                .filter(|node| !node.is_well_formed())
                .map(|node| node.identifier.as_str())
                .collect();
            if !malformed.is_empty() {
                warn!(%path, ?malformed, "provider returned malformed entries");
            }
            Panel {
                entries,
                status: PanelStatus::Loaded,
            }
        }
        Err(err) => {
            warn!(%path, %err, "menu content unavailable; showing empty panel");
            Panel {
                entries: Vec::new(),
                status: PanelStatus::Unavailable,
            }
        }
    };
    state.panels.insert(path.clone(), panel);
}
