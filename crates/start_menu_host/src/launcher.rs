//! Process-launching [`ActionDispatcher`] for native hosts.
//!
//! Launch targets are looked up in a [`LaunchTable`]: built-in catalog identifiers map to fixed
//! shell commands, anything else (a shortcut path from the program tree) is handed to the
//! configured opener. Resize and terminate go to the [`SurfaceHost`] that owns the window.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::io;
use std::process::{Command, Stdio};

use serde::{Deserialize, Serialize};
use start_menu_contract::{
    ActionDispatcher, DispatchError, DispatchFuture, DispatchIntent, SurfaceSize,
};
use tracing::{debug, info};

const DEFAULT_OPENER: &str = "explorer";

/// Program plus arguments for one launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchCommand {
    pub program: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl LaunchCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for LaunchCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Identifier-to-command mapping with an opener fallback for paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaunchTable {
    pub opener: String,
    #[serde(default)]
    pub commands: BTreeMap<String, LaunchCommand>,
}

impl Default for LaunchTable {
    fn default() -> Self {
        Self::classic()
    }
}

impl LaunchTable {
    /// Built-in commands for the classic catalog entries.
    ///
    /// `logoff` and `shutdown` are only reached when the menu config does not list them as
    /// terminate entries, or when a launch intent for them is dispatched directly.
    pub fn classic() -> Self {
        let powershell = |script: &str| LaunchCommand::new("powershell", ["-c", script]);
        let explorer = |arg: &str| LaunchCommand::new(DEFAULT_OPENER, [arg]);
        let commands = [
            ("update", explorer("ms-settings:windowsupdate")),
            ("programs", explorer("shell:AppsFolder")),
            ("documents", LaunchCommand::new(DEFAULT_OPENER, Vec::<String>::new())),
            ("settings", explorer("ms-settings:")),
            ("find", explorer("search-ms:")),
            ("help", explorer("ms-contact-support:")),
            (
                "run",
                powershell("(New-Object -ComObject Shell.Application).FileRun()"),
            ),
            ("logoff", LaunchCommand::new("shutdown", ["/l"])),
            (
                "shutdown",
                powershell("(New-Object -ComObject Shell.Application).ShutdownWindows()"),
            ),
        ]
        .into_iter()
        .map(|(id, command)| (id.to_string(), command))
        .collect();
        Self {
            opener: DEFAULT_OPENER.to_string(),
            commands,
        }
    }

    pub fn with_opener(mut self, opener: impl Into<String>) -> Self {
        self.opener = opener.into();
        self
    }

    /// Returns the command that launches `target`.
    pub fn resolve(&self, target: &str) -> LaunchCommand {
        self.commands
            .get(target)
            .cloned()
            .unwrap_or_else(|| LaunchCommand::new(self.opener.clone(), [target]))
    }
}

/// Starts detached processes.
pub trait ProcessSpawner {
    /// Spawns `command` without waiting for it.
    fn spawn(&self, command: &LaunchCommand) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
/// Spawner backed by [`std::process::Command`].
pub struct SystemSpawner;

impl ProcessSpawner for SystemSpawner {
    fn spawn(&self, command: &LaunchCommand) -> io::Result<()> {
        Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map(|_child| ())
    }
}

/// Window that presents the menu.
pub trait SurfaceHost {
    fn resize(&self, size: SurfaceSize) -> Result<(), String>;
    fn terminate(&self) -> Result<(), String>;
}

#[derive(Debug, Default)]
/// Surface without a window; it remembers the last requested size and whether it was closed.
pub struct HeadlessSurface {
    size: Cell<Option<SurfaceSize>>,
    terminated: Cell<bool>,
}

impl HeadlessSurface {
    pub fn size(&self) -> Option<SurfaceSize> {
        self.size.get()
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.get()
    }
}

impl SurfaceHost for HeadlessSurface {
    fn resize(&self, size: SurfaceSize) -> Result<(), String> {
        if self.terminated.get() {
            return Err("surface already terminated".to_string());
        }
        self.size.set(Some(size));
        Ok(())
    }

    fn terminate(&self) -> Result<(), String> {
        self.terminated.set(true);
        Ok(())
    }
}

/// Dispatcher that launches through a [`ProcessSpawner`] and drives a [`SurfaceHost`].
pub struct CommandDispatcher<P, H> {
    table: LaunchTable,
    spawner: P,
    surface: H,
    launched: RefCell<Vec<LaunchCommand>>,
}

impl<P: ProcessSpawner, H: SurfaceHost> CommandDispatcher<P, H> {
    pub fn new(table: LaunchTable, spawner: P, surface: H) -> Self {
        Self {
            table,
            spawner,
            surface,
            launched: RefCell::new(Vec::new()),
        }
    }

    pub fn surface(&self) -> &H {
        &self.surface
    }

    /// Commands spawned successfully so far.
    pub fn launched(&self) -> Vec<LaunchCommand> {
        self.launched.borrow().clone()
    }

    fn perform(&self, intent: &DispatchIntent) -> Result<(), DispatchError> {
        match intent {
            DispatchIntent::Resize { width, height } => self
                .surface
                .resize(SurfaceSize::new(*width, *height))
                .map_err(|reason| DispatchError::failed(intent, reason)),
            DispatchIntent::Launch { target } => {
                let command = self.table.resolve(target);
                debug!(%target, %command, "spawning launch command");
                self.spawner
                    .spawn(&command)
                    .map_err(|err| DispatchError::failed(intent, format!("{command}: {err}")))?;
                info!(%target, "launched menu entry");
                self.launched.borrow_mut().push(command);
                Ok(())
            }
            DispatchIntent::Terminate => self
                .surface
                .terminate()
                .map_err(|reason| DispatchError::failed(intent, reason)),
        }
    }
}

impl<P: ProcessSpawner, H: SurfaceHost> ActionDispatcher for CommandDispatcher<P, H> {
    fn dispatch<'a>(
        &'a self,
        intent: &'a DispatchIntent,
    ) -> DispatchFuture<'a, Result<(), DispatchError>> {
        Box::pin(async move { self.perform(intent) })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct FakeSpawner {
        fail: bool,
        spawned: RefCell<Vec<LaunchCommand>>,
    }

    impl ProcessSpawner for FakeSpawner {
        fn spawn(&self, command: &LaunchCommand) -> io::Result<()> {
            self.spawned.borrow_mut().push(command.clone());
            if self.fail {
                Err(io::Error::new(io::ErrorKind::NotFound, "program not found"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn builtin_identifiers_resolve_to_table_commands() {
        let table = LaunchTable::classic();
        assert_eq!(
            table.resolve("settings"),
            LaunchCommand::new("explorer", ["ms-settings:"])
        );
        assert_eq!(table.resolve("logoff"), LaunchCommand::new("shutdown", ["/l"]));
        assert!(table.resolve("documents").args.is_empty());
    }

    #[test]
    fn unknown_targets_go_through_the_opener() {
        let table = LaunchTable::classic().with_opener("xdg-open");
        assert_eq!(
            table.resolve("/menu/Games/Chess.lnk"),
            LaunchCommand::new("xdg-open", ["/menu/Games/Chess.lnk"])
        );
    }

    #[test]
    fn launch_table_reads_from_toml() {
        let table: LaunchTable = toml::from_str(
            r#"
            opener = "open"

            [commands.run]
            program = "launcher"
            args = ["--run"]
            "#,
        )
        .expect("parse");
        assert_eq!(table.resolve("run"), LaunchCommand::new("launcher", ["--run"]));
        assert_eq!(table.resolve("x"), LaunchCommand::new("open", ["x"]));
    }

    #[test]
    fn dispatcher_routes_each_intent_kind() {
        let dispatcher = CommandDispatcher::new(
            LaunchTable::classic(),
            FakeSpawner::default(),
            HeadlessSurface::default(),
        );

        block_on(dispatcher.dispatch(&DispatchIntent::resize(SurfaceSize::new(800, 550))))
            .expect("resize");
        block_on(dispatcher.dispatch(&DispatchIntent::launch("run"))).expect("launch");
        block_on(dispatcher.dispatch(&DispatchIntent::Terminate)).expect("terminate");

        assert_eq!(dispatcher.surface().size(), Some(SurfaceSize::new(800, 550)));
        assert!(dispatcher.surface().is_terminated());
        assert_eq!(dispatcher.launched().len(), 1);
        assert_eq!(dispatcher.launched()[0].program, "powershell");
    }

    #[test]
    fn spawn_failure_becomes_dispatch_failure() {
        let dispatcher = CommandDispatcher::new(
            LaunchTable::classic(),
            FakeSpawner {
                fail: true,
                ..FakeSpawner::default()
            },
            HeadlessSurface::default(),
        );

        let err = block_on(dispatcher.dispatch(&DispatchIntent::launch("C:/Games/Chess.lnk")))
            .expect_err("spawn fails");

        assert!(matches!(err, DispatchError::Failed { kind: "launch", .. }));
        assert!(err.to_string().contains("explorer C:/Games/Chess.lnk"));
        assert!(dispatcher.launched().is_empty());
    }

    #[test]
    fn resize_after_terminate_is_rejected() {
        let surface = HeadlessSurface::default();
        surface.terminate().expect("terminate");
        assert!(surface.resize(SurfaceSize::new(300, 550)).is_err());
        assert_eq!(surface.size(), None);
    }
}
