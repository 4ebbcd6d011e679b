//! Action dispatcher contract, dispatch intents, and test adapters.

use std::{cell::RefCell, future::Future, pin::Pin, rc::Rc};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Object-safe boxed future used by [`ActionDispatcher`].
pub type DispatchFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Fixed pixel size of the host surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceSize {
    /// Width in logical pixels.
    pub width: u32,
    /// Height in logical pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Creates a size.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for SurfaceSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// External effect requested by the cascade runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DispatchIntent {
    /// Resize the host surface.
    Resize {
        /// Target width.
        width: u32,
        /// Target height.
        height: u32,
    },
    /// Launch the entry named by `target`.
    Launch {
        /// Opaque launch target (a leaf identifier).
        target: String,
    },
    /// Terminate the host application.
    Terminate,
}

impl DispatchIntent {
    /// Creates a resize intent for `size`.
    pub fn resize(size: SurfaceSize) -> Self {
        Self::Resize {
            width: size.width,
            height: size.height,
        }
    }

    /// Creates a launch intent.
    pub fn launch(target: impl Into<String>) -> Self {
        Self::Launch {
            target: target.into(),
        }
    }

    /// Returns a stable token naming the intent kind for diagnostics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Resize { .. } => "resize",
            Self::Launch { .. } => "launch",
            Self::Terminate => "terminate",
        }
    }
}

/// Errors surfaced by an [`ActionDispatcher`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The host could not perform the effect.
    #[error("dispatch of {kind} failed: {reason}")]
    Failed {
        /// Intent kind token (see [`DispatchIntent::kind`]).
        kind: &'static str,
        /// Host-specific failure description.
        reason: String,
    },
}

impl DispatchError {
    /// Creates a [`DispatchError::Failed`] for `intent`.
    pub fn failed(intent: &DispatchIntent, reason: impl Into<String>) -> Self {
        Self::Failed {
            kind: intent.kind(),
            reason: reason.into(),
        }
    }
}

/// Host service performing launch/resize/terminate effects.
pub trait ActionDispatcher {
    /// Performs `intent`.
    fn dispatch<'a>(
        &'a self,
        intent: &'a DispatchIntent,
    ) -> DispatchFuture<'a, Result<(), DispatchError>>;
}

#[derive(Debug, Clone, Copy, Default)]
/// No-op dispatcher for headless composition.
pub struct NoopActionDispatcher;

impl ActionDispatcher for NoopActionDispatcher {
    fn dispatch<'a>(
        &'a self,
        _intent: &'a DispatchIntent,
    ) -> DispatchFuture<'a, Result<(), DispatchError>> {
        Box::pin(async { Ok(()) })
    }
}

#[derive(Debug, Clone, Default)]
/// Dispatcher that records every call and can be told to fail selected intent kinds.
pub struct RecordingActionDispatcher {
    calls: Rc<RefCell<Vec<DispatchIntent>>>,
    failing_kinds: Rc<RefCell<Vec<&'static str>>>,
}

impl RecordingActionDispatcher {
    /// Makes every later dispatch of `kind` fail.
    pub fn fail_kind(&self, kind: &'static str) {
        self.failing_kinds.borrow_mut().push(kind);
    }

    /// Returns every intent received so far, failed ones included.
    pub fn calls(&self) -> Vec<DispatchIntent> {
        self.calls.borrow().clone()
    }

    /// Returns received intents of one kind.
    pub fn calls_of(&self, kind: &str) -> Vec<DispatchIntent> {
        self.calls
            .borrow()
            .iter()
            .filter(|intent| intent.kind() == kind)
            .cloned()
            .collect()
    }
}

impl ActionDispatcher for RecordingActionDispatcher {
    fn dispatch<'a>(
        &'a self,
        intent: &'a DispatchIntent,
    ) -> DispatchFuture<'a, Result<(), DispatchError>> {
        Box::pin(async move {
            self.calls.borrow_mut().push(intent.clone());
            if self.failing_kinds.borrow().contains(&intent.kind()) {
                return Err(DispatchError::failed(intent, "injected failure"));
            }
            Ok(())
        })
    }
}
