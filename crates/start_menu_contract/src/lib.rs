//! Shared contract types between the start-menu cascade runtime and its host collaborators.
//!
//! This crate is intentionally runtime-agnostic. It defines the immutable menu tree model, the
//! path addressing used to name nodes whose identifiers are only unique among siblings, and the
//! two host service boundaries the runtime talks to: a [`TreeProvider`] that supplies panel
//! contents and an [`ActionDispatcher`] that performs launch/resize/terminate effects.

#![warn(missing_docs, rustdoc::broken_intra_doc_links)]

pub mod dispatch;
pub mod node;
pub mod provider;

pub use dispatch::{
    ActionDispatcher, DispatchError, DispatchFuture, DispatchIntent, NoopActionDispatcher,
    RecordingActionDispatcher, SurfaceSize,
};
pub use node::{dedupe_siblings, MenuNode, NodePath};
pub use provider::{MemoryTreeProvider, NoopTreeProvider, ProviderError, TreeProvider};
