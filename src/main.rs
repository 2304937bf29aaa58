//! menu-maker - SQL query and menu metrics tools for AI agents.

mod cli;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use cli::{Cli, Command};
use menu_maker::config::{Config, Transport};
use menu_maker::db::{Record, SqliteStore};
use menu_maker::error::{MenuError, Result};
use menu_maker::http;
use menu_maker::logging;
use menu_maker::metrics;
use menu_maker::resources::SchemaResource;
use menu_maker::server::Server;
use menu_maker::tools::{get_tool_definitions, ToolRouter};
use serde::Serialize;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    match cli.log_file_path() {
        Some(path) => logging::init_file_logging(&path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;

    match cli.command() {
        Command::Serve(_) => {
            let schema = SchemaResource::load(&config.schema)?;
            let server = Server::new(config.server.clone(), tool_router(&config), schema);
            match config.server.transport {
                Transport::Stdio => server.serve_stdio().await,
                Transport::Http => http::serve(server, &config.server.addr()).await,
            }
        }
        Command::Query { sql } => {
            let result = tool_router(&config)
                .call(
                    menu_maker::tools::QUERY_TOOL,
                    serde_json::json!({ "query": sql }),
                )
                .await?;
            print_json(&result)
        }
        Command::Summarize { input } => {
            let data = read_records(input.as_deref())?;
            print_json(&metrics::summarize(&data)?)
        }
        Command::Schema => {
            let schema = SchemaResource::load(&config.schema)?;
            print!("{}", schema.text);
            Ok(())
        }
        Command::Tools => print_json(&get_tool_definitions()),
    }
}

/// Resolves configuration with precedence: CLI flags, config file, environment, defaults.
fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());

    let mut config = Config::load_from_file(&config_path)?;
    config.database.apply_env_defaults();
    cli.apply_overrides(&mut config);

    info!("Database: {}", config.database.path.display());
    Ok(config)
}

fn tool_router(config: &Config) -> ToolRouter {
    ToolRouter::new(Arc::new(SqliteStore::new(&config.database)))
}

/// Reads a JSON array of records from a file, or stdin for `None` / `-`.
fn read_records(input: Option<&Path>) -> Result<Vec<Record>> {
    let content = match input {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path).map_err(|e| {
            MenuError::config(format!("Failed to read {}: {e}", path.display()))
        })?,
        _ => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| MenuError::config(format!("Failed to read stdin: {e}")))?;
            buffer
        }
    };

    serde_json::from_str(&content)
        .map_err(|e| MenuError::tool(format!("Input is not a JSON array of records: {e}")))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| MenuError::internal(format!("Failed to serialize output: {e}")))?;
    println!("{text}");
    Ok(())
}
