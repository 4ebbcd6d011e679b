//! Single-threaded tokio driver for a [`CascadeController`].
//!
//! Incoming events and timer expiries share one ordered stream: pending events are always
//! handled before an expiry that became due while they were queued.

use std::time::Duration;

use start_menu_contract::ActionDispatcher;
use tokio::sync::{mpsc, watch};
use tokio::time::{sleep_until, Instant};
use tracing::{debug, warn};

use crate::controller::CascadeController;
use crate::effect_executor::{execute_effects, DispatchFailure};
use crate::model::OpenPath;
use crate::reducer::CascadeAction;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MenuLoopReport {
    pub dispatched: usize,
    pub failures: Vec<DispatchFailure>,
}

/// Runs `controller` until the event sender is dropped, then dismisses the menu and returns.
///
/// Every processed event or expiry publishes the resulting open path on `snapshots` after its
/// effects have been dispatched.
pub async fn run_event_loop(
    mut controller: CascadeController,
    dispatcher: &dyn ActionDispatcher,
    mut events: mpsc::UnboundedReceiver<CascadeAction>,
    snapshots: watch::Sender<OpenPath>,
) -> MenuLoopReport {
    let origin = Instant::now();
    let mut report = MenuLoopReport::default();
    loop {
        let deadline = controller
            .next_deadline()
            .map(|ms| origin + Duration::from_millis(ms));
        let running = tokio::select! {
            biased;
            event = events.recv() => {
                let now = elapsed_ms(origin);
                match event {
                    Some(action) => {
                        controller.handle(action, now);
                        true
                    }
                    None => {
                        debug!("menu event channel closed");
                        controller.on_dismiss_all(now);
                        false
                    }
                }
            }
            () = wait_for(deadline) => {
                controller.advance(elapsed_ms(origin));
                true
            }
        };

        let effects = controller.take_effects();
        let attempted = effects.len();
        let failures = execute_effects(dispatcher, effects).await;
        report.dispatched += attempted - failures.len();
        for failure in &failures {
            warn!(error = %failure.error, "menu stays interactive after failed dispatch");
        }
        report.failures.extend(failures);
        snapshots.send_replace(controller.open_path());

        if !running {
            return report;
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

fn elapsed_ms(origin: Instant) -> u64 {
    u64::try_from(origin.elapsed().as_millis()).unwrap_or(u64::MAX)
}
