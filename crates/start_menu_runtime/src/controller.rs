//! Stateful cascade controller: the single owner of the open path, hover timers, and surface
//! intent for one menu surface.

use std::rc::Rc;

use start_menu_contract::{DispatchIntent, NodePath, TreeProvider};
use tracing::debug;

use crate::config::MenuConfig;
use crate::gateway::{surface_intent_for, SideEffectGateway};
use crate::model::{CascadeState, OpenPath, Panel, SurfaceIntent};
use crate::reducer::{reduce_cascade, CascadeAction, CascadeContext};
use crate::timer::{HoverTimers, PendingTimer};

/// Drives the hover cascade for one menu surface.
///
/// Time is supplied by the caller as milliseconds on any monotonic clock. Every entry point
/// returns the resulting [`OpenPath`] for rendering; dispatch intents accumulate until
/// [`CascadeController::take_effects`] drains them, in the order they were produced.
pub struct CascadeController {
    config: MenuConfig,
    provider: Rc<dyn TreeProvider>,
    state: CascadeState,
    timers: HoverTimers<NodePath>,
    gateway: SideEffectGateway,
    effects: Vec<DispatchIntent>,
}

impl CascadeController {
    pub fn new(config: MenuConfig, provider: Rc<dyn TreeProvider>) -> Self {
        let gateway = SideEffectGateway::from_config(&config);
        Self {
            config,
            provider,
            state: CascadeState::default(),
            timers: HoverTimers::default(),
            gateway,
            effects: Vec::new(),
        }
    }

    pub fn on_hover_enter(&mut self, path: &NodePath, now: u64) -> OpenPath {
        self.handle(CascadeAction::HoverEnter { path: path.clone() }, now)
    }

    pub fn on_hover_leave(&mut self, path: &NodePath, now: u64) -> OpenPath {
        self.handle(CascadeAction::HoverLeave { path: path.clone() }, now)
    }

    /// Explicit commit: leaves launch (or terminate) immediately, folders open with no delay.
    pub fn on_activate(&mut self, path: &NodePath, now: u64) -> OpenPath {
        self.handle(CascadeAction::Activate { path: path.clone() }, now)
    }

    pub fn on_dismiss_all(&mut self, now: u64) -> OpenPath {
        self.handle(CascadeAction::DismissAll, now)
    }

    pub fn on_pointer_exited_surface(&mut self, now: u64) -> OpenPath {
        self.handle(CascadeAction::PointerExitedSurface, now)
    }

    /// Applies one event. Events naming nodes that are not on screen are ignored.
    pub fn handle(&mut self, action: CascadeAction, now: u64) -> OpenPath {
        let ctx = CascadeContext {
            config: &self.config,
            provider: self.provider.as_ref(),
        };
        match reduce_cascade(&mut self.state, &mut self.timers, &ctx, action, now) {
            Ok(effects) => self.effects.extend(effects),
            Err(err) => debug!(%err, "ignoring menu event"),
        }
        self.sync_surface_intent();
        self.open_path()
    }

    /// Applies events strictly in the given order.
    pub fn handle_batch(
        &mut self,
        actions: impl IntoIterator<Item = CascadeAction>,
        now: u64,
    ) -> OpenPath {
        for action in actions {
            self.handle(action, now);
        }
        self.open_path()
    }

    /// Fires every timer due at `now`, one at a time in deadline order.
    pub fn advance(&mut self, now: u64) -> OpenPath {
        while let Some(timer) = self.timers.pop_due(now) {
            self.handle(
                CascadeAction::TimerFired {
                    path: timer.owner,
                    kind: timer.kind,
                },
                now,
            );
        }
        self.open_path()
    }

    pub fn open_path(&self) -> OpenPath {
        self.state.snapshot()
    }

    pub fn hovered(&self) -> Option<&NodePath> {
        self.state.hovered.as_ref()
    }

    /// Returns loaded contents for the panel anchored at `path` (root path for the top level).
    pub fn panel(&self, path: &NodePath) -> Option<&Panel> {
        self.state.panels.get(path)
    }

    pub fn pending_timer(&self, path: &NodePath) -> Option<&PendingTimer<NodePath>> {
        self.timers.get(path)
    }

    pub fn pending_timer_count(&self) -> usize {
        self.timers.len()
    }

    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    pub fn surface_intent(&self) -> SurfaceIntent {
        self.gateway.current()
    }

    pub fn config(&self) -> &MenuConfig {
        &self.config
    }

    pub fn take_effects(&mut self) -> Vec<DispatchIntent> {
        std::mem::take(&mut self.effects)
    }

    fn sync_surface_intent(&mut self) {
        let desired = surface_intent_for(&self.state.open_path, &self.config);
        if let Some(resize) = self.gateway.notify_intent(desired) {
            self.effects.push(resize);
        }
    }
}
