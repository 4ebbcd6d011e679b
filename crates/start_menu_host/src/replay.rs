//! Scripted scenario playback.
//!
//! A scenario is a TOML file of timestamped cascade events:
//!
//! ```toml
//! until_ms = 5000
//!
//! [[step]]
//! at_ms = 0
//! action = { event = "hover_enter", path = ["programs"] }
//!
//! [[step]]
//! at_ms = 3200
//! action = { event = "activate", path = ["run"] }
//! ```
//!
//! Timers that expire between two steps fire in deadline order and are reported at their own
//! deadline. An optional inline `tree` replaces the classic catalog.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use start_menu_contract::{ActionDispatcher, DispatchIntent, MenuNode};
use start_menu_runtime::{execute_effects, CascadeAction, CascadeController, ConfigError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("usage: {0}")]
    Usage(String),
    #[error("failed to read scenario {path}: {message}")]
    Read { path: String, message: String },
    #[error("failed to parse scenario {path}: {message}")]
    Parse { path: String, message: String },
    #[error("step {index} at {at_ms}ms is earlier than the previous step at {previous_ms}ms")]
    OutOfOrder {
        index: usize,
        at_ms: u64,
        previous_ms: u64,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioStep {
    pub at_ms: u64,
    pub action: CascadeAction,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Top-level entries to serve instead of the classic catalog.
    #[serde(default)]
    pub tree: Option<Vec<MenuNode>>,
    #[serde(default, rename = "step")]
    pub steps: Vec<ScenarioStep>,
    /// Clock value to advance to after the last step.
    #[serde(default)]
    pub until_ms: Option<u64>,
}

impl Scenario {
    pub fn from_toml_str(source_name: &str, body: &str) -> Result<Self, ReplayError> {
        let scenario: Self = toml::from_str(body).map_err(|err| ReplayError::Parse {
            path: source_name.to_string(),
            message: err.to_string(),
        })?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let body = fs::read_to_string(path).map_err(|err| ReplayError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&path.display().to_string(), &body)
    }

    fn validate(&self) -> Result<(), ReplayError> {
        let mut previous_ms = 0;
        for (index, step) in self.steps.iter().enumerate() {
            if step.at_ms < previous_ms {
                return Err(ReplayError::OutOfOrder {
                    index,
                    at_ms: step.at_ms,
                    previous_ms,
                });
            }
            previous_ms = step.at_ms;
        }
        Ok(())
    }
}

/// One line of replay output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum ReplayRecord {
    Dispatched {
        at_ms: u64,
        intent: DispatchIntent,
    },
    DispatchFailed {
        at_ms: u64,
        intent: DispatchIntent,
        error: String,
    },
    OpenPath {
        at_ms: u64,
        open_path: Vec<String>,
    },
}

/// Command-line options of the `menu_replay` binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayOptions {
    pub scenario: PathBuf,
    pub config: Option<PathBuf>,
    pub launch_table: Option<PathBuf>,
    /// Perform launches for real instead of only reporting them.
    pub execute: bool,
}

impl ReplayOptions {
    /// Parses arguments (without the program name). `Ok(None)` means help was requested.
    pub fn parse(args: Vec<String>) -> Result<Option<Self>, ReplayError> {
        let mut scenario = None;
        let mut config = None;
        let mut launch_table = None;
        let mut execute = false;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--config" => config = Some(PathBuf::from(expect_value(&mut args, "--config")?)),
                "--launch-table" => {
                    launch_table = Some(PathBuf::from(expect_value(&mut args, "--launch-table")?))
                }
                "--execute" => execute = true,
                flag if flag.starts_with("--") => {
                    return Err(ReplayError::Usage(format!("unknown option `{flag}`")))
                }
                path if scenario.is_none() => scenario = Some(PathBuf::from(path)),
                extra => {
                    return Err(ReplayError::Usage(format!("unexpected argument `{extra}`")))
                }
            }
        }

        let scenario =
            scenario.ok_or_else(|| ReplayError::Usage("missing scenario path".to_string()))?;
        Ok(Some(Self {
            scenario,
            config,
            launch_table,
            execute,
        }))
    }

    pub fn usage() -> &'static str {
        "Usage: menu_replay <scenario.toml> [--config <menu.toml>] \
         [--launch-table <table.toml>] [--execute]"
    }
}

fn expect_value(
    args: &mut impl Iterator<Item = String>,
    flag: &str,
) -> Result<String, ReplayError> {
    args.next()
        .ok_or_else(|| ReplayError::Usage(format!("`{flag}` requires a value")))
}

/// Plays `scenario` against `controller`, dispatching effects as they are produced.
///
/// Timers that expire between steps are fired one deadline at a time, and their effects and
/// open paths are recorded at the deadline rather than at the following step.
pub async fn replay_scenario(
    scenario: &Scenario,
    controller: &mut CascadeController,
    dispatcher: &dyn ActionDispatcher,
) -> Vec<ReplayRecord> {
    let mut records = Vec::new();
    for step in &scenario.steps {
        fire_timers_until(controller, dispatcher, step.at_ms, &mut records).await;

        debug!(at_ms = step.at_ms, action = ?step.action, "replaying step");
        let open_path = controller.handle(step.action.clone(), step.at_ms);
        flush(controller, dispatcher, step.at_ms, &mut records).await;
        records.push(ReplayRecord::OpenPath {
            at_ms: step.at_ms,
            open_path: open_path.ids().to_vec(),
        });
    }

    if let Some(until_ms) = scenario.until_ms {
        fire_timers_until(controller, dispatcher, until_ms, &mut records).await;
        records.push(ReplayRecord::OpenPath {
            at_ms: until_ms,
            open_path: controller.open_path().ids().to_vec(),
        });
    }
    records
}

async fn fire_timers_until(
    controller: &mut CascadeController,
    dispatcher: &dyn ActionDispatcher,
    until_ms: u64,
    records: &mut Vec<ReplayRecord>,
) {
    while let Some(deadline) = controller
        .next_deadline()
        .filter(|deadline| *deadline <= until_ms)
    {
        let open_path = controller.advance(deadline);
        flush(controller, dispatcher, deadline, records).await;
        records.push(ReplayRecord::OpenPath {
            at_ms: deadline,
            open_path: open_path.ids().to_vec(),
        });
    }
}

async fn flush(
    controller: &mut CascadeController,
    dispatcher: &dyn ActionDispatcher,
    at_ms: u64,
    records: &mut Vec<ReplayRecord>,
) {
    for intent in controller.take_effects() {
        let failure = execute_effects(dispatcher, vec![intent.clone()]).await.pop();
        records.push(match failure {
            Some(failure) => ReplayRecord::DispatchFailed {
                at_ms,
                intent,
                error: failure.error.to_string(),
            },
            None => ReplayRecord::Dispatched { at_ms, intent },
        });
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use futures::executor::block_on;
    use pretty_assertions::assert_eq;
    use start_menu_contract::{MemoryTreeProvider, RecordingActionDispatcher};
    use start_menu_runtime::{MenuConfig, COLLAPSED_DIMENSIONS, EXPANDED_DIMENSIONS};

    use super::*;
    use crate::catalog::CatalogTreeProvider;

    const SCENARIO: &str = r#"
        until_ms = 10000

        [[step]]
        at_ms = 0
        action = { event = "hover_enter", path = ["programs"] }

        [[step]]
        at_ms = 3200
        action = { event = "activate", path = ["run"] }

        [[step]]
        at_ms = 3300
        action = { event = "dismiss_all" }
    "#;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn replays_timers_between_steps() {
        let scenario = Scenario::from_toml_str("inline", SCENARIO).expect("parse");
        let mut controller = CascadeController::new(
            MenuConfig::default(),
            Rc::new(CatalogTreeProvider::classic()),
        );
        let dispatcher = RecordingActionDispatcher::default();
        dispatcher.fail_kind("launch");

        let records = block_on(replay_scenario(&scenario, &mut controller, &dispatcher));

        assert_eq!(
            records,
            vec![
                ReplayRecord::OpenPath {
                    at_ms: 0,
                    open_path: Vec::new(),
                },
                ReplayRecord::Dispatched {
                    at_ms: 3000,
                    intent: DispatchIntent::resize(EXPANDED_DIMENSIONS),
                },
                ReplayRecord::OpenPath {
                    at_ms: 3000,
                    open_path: vec!["programs".to_string()],
                },
                ReplayRecord::DispatchFailed {
                    at_ms: 3200,
                    intent: DispatchIntent::launch("run"),
                    error: "dispatch of launch failed: injected failure".to_string(),
                },
                ReplayRecord::OpenPath {
                    at_ms: 3200,
                    open_path: vec!["programs".to_string()],
                },
                ReplayRecord::Dispatched {
                    at_ms: 3300,
                    intent: DispatchIntent::resize(COLLAPSED_DIMENSIONS),
                },
                ReplayRecord::OpenPath {
                    at_ms: 3300,
                    open_path: Vec::new(),
                },
                ReplayRecord::OpenPath {
                    at_ms: 10000,
                    open_path: Vec::new(),
                },
            ]
        );
    }

    #[test]
    fn nested_timer_between_steps_is_reported_at_its_deadline() {
        let scenario = Scenario::from_toml_str(
            "demo",
            include_str!("../../../demos/programs_hover.toml"),
        )
        .expect("parse");
        let tree = scenario.tree.clone().expect("tree");
        let mut controller = CascadeController::new(
            MenuConfig::default(),
            Rc::new(MemoryTreeProvider::new(tree)),
        );

        let records = block_on(replay_scenario(
            &scenario,
            &mut controller,
            &RecordingActionDispatcher::default(),
        ));

        let opened_by_timer: Vec<_> = records
            .iter()
            .filter_map(|record| match record {
                ReplayRecord::OpenPath { at_ms, open_path } if [3000, 3600].contains(at_ms) => {
                    Some((*at_ms, open_path.join("/")))
                }
                _ => None,
            })
            .collect();
        assert_eq!(
            opened_by_timer,
            vec![
                (3000, "programs".to_string()),
                (3600, "programs/accessories".to_string()),
            ]
        );
        assert!(records.contains(&ReplayRecord::Dispatched {
            at_ms: 3000,
            intent: DispatchIntent::resize(EXPANDED_DIMENSIONS),
        }));
        assert!(records.contains(&ReplayRecord::Dispatched {
            at_ms: 3700,
            intent: DispatchIntent::launch("notepad"),
        }));
    }

    #[test]
    fn inline_tree_and_record_json_shape() {
        let scenario = Scenario::from_toml_str(
            "inline",
            r#"
            [[tree]]
            identifier = "docs"
            display_label = "Documents"
            is_folder = true
            children = [{ identifier = "readme", display_label = "Readme", is_folder = false }]

            [[step]]
            at_ms = 0
            action = { event = "activate", path = ["docs"] }
            "#,
        )
        .expect("parse");
        let tree = scenario.tree.clone().expect("tree");
        let mut controller = CascadeController::new(
            MenuConfig::default(),
            Rc::new(MemoryTreeProvider::new(tree)),
        );

        let records = block_on(replay_scenario(
            &scenario,
            &mut controller,
            &RecordingActionDispatcher::default(),
        ));

        assert_eq!(
            serde_json::to_string(&records[0]).expect("json"),
            r#"{"record":"open_path","at_ms":0,"open_path":["docs"]}"#
        );
    }

    #[test]
    fn rejects_steps_out_of_order() {
        let err = Scenario::from_toml_str(
            "inline",
            r#"
            [[step]]
            at_ms = 10
            action = { event = "dismiss_all" }

            [[step]]
            at_ms = 5
            action = { event = "dismiss_all" }
            "#,
        )
        .expect_err("out of order");
        assert!(matches!(
            err,
            ReplayError::OutOfOrder {
                index: 1,
                at_ms: 5,
                previous_ms: 10
            }
        ));
    }

    #[test]
    fn parses_command_line_options() {
        let options = ReplayOptions::parse(args(&[
            "demo.toml",
            "--config",
            "menu.toml",
            "--execute",
        ]))
        .expect("parse")
        .expect("options");
        assert_eq!(
            options,
            ReplayOptions {
                scenario: PathBuf::from("demo.toml"),
                config: Some(PathBuf::from("menu.toml")),
                launch_table: None,
                execute: true,
            }
        );

        assert_eq!(ReplayOptions::parse(args(&["--help"])).expect("help"), None);
        assert!(ReplayOptions::parse(args(&["--config"])).is_err());
        assert!(ReplayOptions::parse(args(&[])).is_err());
        assert!(ReplayOptions::parse(args(&["a.toml", "b.toml"])).is_err());
    }
}
