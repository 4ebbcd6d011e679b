//! Replays a scripted start-menu scenario and prints one JSON record per line.
//!
//! Dispatches are only reported unless `--execute` is given, in which case launches spawn real
//! processes through the launch table.

use std::env;
use std::fs;
use std::path::Path;
use std::process::ExitCode;
use std::rc::Rc;

use start_menu_contract::{ActionDispatcher, MemoryTreeProvider, NoopActionDispatcher, TreeProvider};
use start_menu_host::{
    replay_scenario, CatalogTreeProvider, CommandDispatcher, FsProgramTree, HeadlessSurface,
    LaunchTable, ReplayError, ReplayOptions, Scenario, SystemSpawner,
};
use start_menu_runtime::{CascadeController, ConfigLoader, MenuConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = match ReplayOptions::parse(env::args().skip(1).collect()) {
        Ok(Some(options)) => options,
        Ok(None) => {
            eprintln!("{}", ReplayOptions::usage());
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("error: {err}\n{}", ReplayOptions::usage());
            return ExitCode::from(2);
        }
    };

    match run(&options).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(1)
        }
    }
}

async fn run(options: &ReplayOptions) -> Result<(), ReplayError> {
    let config = match &options.config {
        Some(path) => ConfigLoader::new(path).load()?,
        None => MenuConfig::default(),
    };
    let scenario = Scenario::load(&options.scenario)?;

    let provider: Rc<dyn TreeProvider> = match &scenario.tree {
        Some(tree) => Rc::new(MemoryTreeProvider::new(tree.clone())),
        None => Rc::new(
            CatalogTreeProvider::classic().with_folder("programs", FsProgramTree::from_env()),
        ),
    };
    let mut controller = CascadeController::new(config, provider);

    let dispatcher: Box<dyn ActionDispatcher> = if options.execute {
        let table = match &options.launch_table {
            Some(path) => load_launch_table(path)?,
            None => LaunchTable::classic(),
        };
        Box::new(CommandDispatcher::new(
            table,
            SystemSpawner,
            HeadlessSurface::default(),
        ))
    } else {
        Box::new(NoopActionDispatcher)
    };

    info!(
        scenario = %options.scenario.display(),
        steps = scenario.steps.len(),
        execute = options.execute,
        "replaying menu scenario"
    );
    let records = replay_scenario(&scenario, &mut controller, dispatcher.as_ref()).await;
    for record in &records {
        match serde_json::to_string(record) {
            Ok(line) => println!("{line}"),
            Err(err) => eprintln!("error: failed to encode record: {err}"),
        }
    }
    Ok(())
}

fn load_launch_table(path: &Path) -> Result<LaunchTable, ReplayError> {
    let body = fs::read_to_string(path).map_err(|err| ReplayError::Read {
        path: path.display().to_string(),
        message: err.to_string(),
    })?;
    toml::from_str(&body).map_err(|err| ReplayError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}
