//! Command-line argument parsing for menu-maker.
//!
//! Uses clap to parse global options and the subcommand to run.

use clap::{Args, Parser, Subcommand};
use menu_maker::config::{Config, Transport};
use std::path::PathBuf;

/// SQL query and menu metrics tools for AI agents.
#[derive(Parser, Debug)]
#[command(name = "menu-maker")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// SQLite database file (overrides config and MENU_MAKER_DB)
    #[arg(short = 'd', long, value_name = "PATH", global = true)]
    pub database: Option<PathBuf>,

    /// Write logs to a file instead of stderr
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Log file path (implies --log-file)
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands. Running without one starts the server.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Serve the tools over JSON-RPC (stdio or HTTP)
    Serve(ServeArgs),

    /// Execute one SQL statement and print the records as JSON
    Query {
        /// The statement, passed verbatim to the database
        sql: String,
    },

    /// Summarize menu metrics from a JSON array of records
    Summarize {
        /// JSON input file (reads stdin when omitted or "-")
        #[arg(short, long, value_name = "PATH")]
        input: Option<PathBuf>,
    },

    /// Print the schema resource
    Schema,

    /// Print the tool definitions as JSON
    Tools,
}

/// Options for `serve`, overriding the `[server]` config section.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Transport to serve on
    #[arg(long, value_enum)]
    pub transport: Option<Transport>,

    /// HTTP listen interface
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP listen port
    #[arg(long)]
    pub port: Option<u16>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Returns the command to run, defaulting to `serve`.
    pub fn command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }

    /// Returns the log file path if file logging was requested.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        match (&self.log_path, self.log_file) {
            (Some(path), _) => Some(path.clone()),
            (None, true) => Some(menu_maker::logging::get_log_path()),
            (None, false) => None,
        }
    }

    /// Applies CLI overrides on top of the loaded configuration.
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(database) = &self.database {
            config.database.path = database.clone();
        }

        if let Some(Command::Serve(serve)) = &self.command {
            if let Some(transport) = serve.transport {
                config.server.transport = transport;
            }
            if let Some(host) = &serve.host {
                config.server.host = host.clone();
            }
            if let Some(port) = serve.port {
                config.server.port = port;
            }
        }
    }
}
