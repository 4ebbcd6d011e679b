//! Concrete collaborators for the start-menu cascade runtime.
//!
//! - [`catalog`]: the classic top-level entries and a provider that mounts sub-trees under them
//! - [`programs`]: the "Programs" folder scanned from start-menu directories on disk
//! - [`launcher`]: an [`ActionDispatcher`](start_menu_contract::ActionDispatcher) backed by a
//!   command table and a host surface
//! - [`replay`]: scripted scenario playback used by the `menu_replay` binary

pub mod catalog;
pub mod launcher;
pub mod programs;
pub mod replay;

pub use catalog::{classic_catalog, classic_layout, CatalogEntry, CatalogTreeProvider};
pub use launcher::{
    CommandDispatcher, HeadlessSurface, LaunchCommand, LaunchTable, ProcessSpawner,
    SurfaceHost, SystemSpawner,
};
pub use programs::FsProgramTree;
pub use replay::{replay_scenario, ReplayError, ReplayOptions, ReplayRecord, Scenario};
