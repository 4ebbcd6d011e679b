//! Hover-cascade engine for a hierarchical start menu.
//!
//! [`CascadeController`] owns the chain of open submenus, the per-node open timers, and the
//! surface intent. Hosts feed it pointer events and clock ticks, render the returned
//! [`OpenPath`], and execute the dispatch intents it emits (see [`execute_effects`] and
//! [`run_event_loop`]).

pub mod config;
pub mod controller;
pub mod effect_executor;
pub mod event_loop;
pub mod gateway;
pub mod model;
pub mod reducer;
pub mod timer;

pub use config::{
    ConfigError, ConfigLoader, MenuConfig, COLLAPSED_DIMENSIONS, EXPANDED_DIMENSIONS,
    OPEN_DELAY_NESTED_MS, OPEN_DELAY_ROOT_MS,
};
pub use controller::CascadeController;
pub use effect_executor::{execute_effects, DispatchFailure};
pub use event_loop::{run_event_loop, MenuLoopReport};
pub use gateway::{surface_intent_for, SideEffectGateway};
pub use model::{OpenPath, Panel, PanelStatus, SurfaceIntent};
pub use reducer::{reduce_cascade, CascadeAction, CascadeContext, CascadeError};
pub use timer::{HoverTimers, PendingTimer, TimerHandle, TimerKind};
