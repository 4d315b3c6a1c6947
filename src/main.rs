//! Painel CLI - live task board for a marketing team.

use std::process;
use std::sync::Arc;

use clap::Parser;
use painel::cli::{Cli, Commands, ConfigCommands};
use painel::commands::{self, Output};
use painel::config::{ConfigOverrides, ResolvedConfig, resolve_config};
use painel::logging::{self, LogTarget};
use painel::store::FirebaseStore;
use painel::sync::StoreAdapter;

fn main() {
    let cli = Cli::parse();
    let human = cli.human_readable;

    if let Err(e) = run(cli) {
        if human {
            eprintln!("Error: {}", e);
        } else {
            eprintln!("{}", serde_json::json!({ "error": e.to_string() }));
        }
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), painel::Error> {
    let human = cli.human_readable;
    let config = resolve_config(ConfigOverrides {
        config_path: cli.config_path,
        database_url: cli.database_url,
        ..Default::default()
    })?;

    let dashboard = matches!(cli.command, None | Some(Commands::Board));
    let _log_guard = if dashboard {
        logging::init(LogTarget::File(&config.log_dir.value))
    } else {
        logging::init(LogTarget::Stderr)
    };
    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("PAINEL_GIT_COMMIT"),
        built = env!("PAINEL_BUILD_TIMESTAMP"),
        "Starting painel"
    );

    if let Some(Commands::Config {
        command: ConfigCommands::Show,
    }) = &cli.command
    {
        output(&commands::config_show(&config), human);
        return Ok(());
    }

    let adapter = connect(&config);
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(run_command(cli.command, adapter, &config, human))
}

/// Build the store adapter for the configured database.
fn connect(config: &ResolvedConfig) -> StoreAdapter {
    let store = FirebaseStore::new(
        &config.database_url.value,
        Some(config.project_id.value.clone()),
    );
    StoreAdapter::new(Arc::new(store), config.collection.value.clone())
}

async fn run_command(
    command: Option<Commands>,
    adapter: StoreAdapter,
    config: &ResolvedConfig,
    human: bool,
) -> Result<(), painel::Error> {
    match command {
        None | Some(Commands::Board) => {
            painel::tui::run_dashboard(adapter, config.team()).await?;
        }
        Some(Commands::List {
            status,
            responsible,
        }) => {
            let result = commands::list(&adapter, status, responsible.as_deref()).await?;
            output(&result, human);
        }
        Some(Commands::Stats) => {
            let result = commands::stats(&adapter).await?;
            output(&result, human);
        }
        Some(Commands::Add {
            title,
            platform,
            fields,
        }) => {
            let result = commands::add(&adapter, &title, &platform, &fields).await?;
            output(&result, human);
        }
        Some(Commands::Update {
            id,
            title,
            platform,
            fields,
        }) => {
            let result = commands::update(
                &adapter,
                &id,
                title.as_deref(),
                platform.as_deref(),
                &fields,
            )
            .await?;
            output(&result, human);
        }
        Some(Commands::Config {
            command: ConfigCommands::Show,
        }) => {
            output(&commands::config_show(config), human);
        }
    }
    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}
