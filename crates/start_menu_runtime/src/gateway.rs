//! Deduplicating bridge between cascade visibility and the surface resize effect.

use start_menu_contract::{DispatchIntent, SurfaceSize};

use crate::config::MenuConfig;
use crate::model::SurfaceIntent;

/// Forwards surface intents exactly once per change.
#[derive(Debug, Clone)]
pub struct SideEffectGateway {
    current: SurfaceIntent,
    collapsed: SurfaceSize,
    expanded: SurfaceSize,
}

impl SideEffectGateway {
    pub fn new(collapsed: SurfaceSize, expanded: SurfaceSize) -> Self {
        Self {
            current: SurfaceIntent::CollapsedSurface,
            collapsed,
            expanded,
        }
    }

    pub fn from_config(config: &MenuConfig) -> Self {
        Self::new(config.collapsed, config.expanded)
    }

    pub fn current(&self) -> SurfaceIntent {
        self.current
    }

    /// Records `intent` and returns the resize to dispatch, or `None` when it repeats the
    /// currently recorded intent.
    pub fn notify_intent(&mut self, intent: SurfaceIntent) -> Option<DispatchIntent> {
        if intent == self.current {
            return None;
        }
        self.current = intent;
        let size = match intent {
            SurfaceIntent::CollapsedSurface => self.collapsed,
            SurfaceIntent::ExpandedSurface => self.expanded,
        };
        tracing::info!(?intent, %size, "surface intent changed");
        Some(DispatchIntent::resize(size))
    }
}

/// The surface is expanded exactly while the root entry anchors the outermost open panel.
pub fn surface_intent_for(open_path: &[String], config: &MenuConfig) -> SurfaceIntent {
    match open_path.first() {
        Some(first) if *first == config.root_entry => SurfaceIntent::ExpandedSurface,
        _ => SurfaceIntent::CollapsedSurface,
    }
}
