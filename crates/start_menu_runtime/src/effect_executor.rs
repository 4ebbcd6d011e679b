//! Ordered execution of controller-emitted dispatch intents.

use start_menu_contract::{ActionDispatcher, DispatchError, DispatchIntent};
use tracing::{info, warn};

/// A dispatch the host could not perform. Cascade state is not rolled back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchFailure {
    pub intent: DispatchIntent,
    pub error: DispatchError,
}

/// Runs `effects` in order against `dispatcher`. A failure is logged and collected; later
/// effects still run.
pub async fn execute_effects(
    dispatcher: &dyn ActionDispatcher,
    effects: Vec<DispatchIntent>,
) -> Vec<DispatchFailure> {
    let mut failures = Vec::new();
    for intent in effects {
        match dispatcher.dispatch(&intent).await {
            Ok(()) => info!(kind = intent.kind(), ?intent, "dispatched menu effect"),
            Err(error) => {
                warn!(%error, ?intent, "menu effect dispatch failed");
                failures.push(DispatchFailure { intent, error });
            }
        }
    }
    failures
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use start_menu_contract::{RecordingActionDispatcher, SurfaceSize};

    use super::*;

    #[test]
    fn failures_do_not_stop_later_effects() {
        let dispatcher = RecordingActionDispatcher::default();
        dispatcher.fail_kind("launch");

        let failures = block_on(execute_effects(
            &dispatcher,
            vec![
                DispatchIntent::launch("run"),
                DispatchIntent::resize(SurfaceSize::new(800, 550)),
            ],
        ));

        assert_eq!(dispatcher.calls().len(), 2);
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].intent, DispatchIntent::launch("run"));
    }
}
