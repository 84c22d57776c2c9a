//! Pantry CLI: entry point.
//!
//! # Commands
//!
//! - `pantry serve [--host H] [--port P] [--logs] [--json-logs]`: run the HTTP API
//! - `pantry status`: show configuration and provider status
//! - `pantry onboard`: write a default config file
//! - `pantry search <query>`: translate a query into search parameters
//! - `pantry analyze <recipe-id>`: analyse one recipe

mod helpers;
mod onboard;
mod serve;
mod status;
mod tasks;

use anyhow::Result;
use clap::{Parser, Subcommand};

use pantry_core::config::load_config;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// Pantry: recipe assistant backend
#[derive(Parser)]
#[command(name = "pantry", version, about, long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.pantry/config.json)
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,

        /// Override the configured port
        #[arg(short, long)]
        port: Option<u16>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,

        /// Emit logs as JSON lines
        #[arg(long, default_value_t = false)]
        json_logs: bool,
    },

    /// Show configuration and provider status
    Status,

    /// Write a default configuration file
    Onboard,

    /// Translate a natural-language query into search parameters
    Search {
        /// The request, e.g. "quick vegan dinner"
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Analyse a recipe by id
    Analyze {
        recipe_id: u64,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref().map(helpers::expand_tilde);

    match cli.command {
        Commands::Serve {
            host,
            port,
            logs,
            json_logs,
        } => {
            init_logging(LogLevel::server(logs), json_logs);
            let config = load_config(config_path.as_deref());
            serve::run(config, host, port).await
        }
        Commands::Status => status::run(config_path.as_deref()),
        Commands::Onboard => onboard::run(config_path.as_deref()),
        Commands::Search { query, logs } => {
            init_logging(LogLevel::command(logs), false);
            let config = load_config(config_path.as_deref());
            tasks::search(&config, &query.join(" ")).await
        }
        Commands::Analyze { recipe_id, logs } => {
            init_logging(LogLevel::command(logs), false);
            let config = load_config(config_path.as_deref());
            tasks::analyze(&config, recipe_id).await
        }
    }
}

// ─────────────────────────────────────────────
// Logging
// ─────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogLevel {
    Debug,
    Info,
    Quiet,
}

impl LogLevel {
    /// The server logs requests at info even without `--logs`.
    fn server(verbose: bool) -> Self {
        if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Info
        }
    }

    fn command(verbose: bool) -> Self {
        if verbose {
            LogLevel::Debug
        } else {
            LogLevel::Quiet
        }
    }

    fn directives(self) -> &'static str {
        match self {
            LogLevel::Debug => "pantry=debug,tower_http=debug,info",
            LogLevel::Info => "info",
            LogLevel::Quiet => "warn",
        }
    }
}

/// Initialize tracing/logging. `RUST_LOG` wins over the level flags.
fn init_logging(level: LogLevel, json: bool) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.directives()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}
