//! `pantry serve`: run the HTTP API until Ctrl+C / SIGTERM.
//!
//! Startup sequence:
//! 1. Resolve bind address (flags override config)
//! 2. Build provider chain + recipe client from config
//! 3. Bind listener
//! 4. Serve with graceful shutdown

use anyhow::{Context, Result};
use colored::Colorize;
use tokio::net::TcpListener;
use tracing::info;

use pantry_core::Config;
use pantry_server::{serve, shutdown_signal, State};

use crate::helpers;

pub async fn run(config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    let state = State::from_config(&config).context("failed to build provider chain")?;
    let providers = state.assistant.chain().names();

    helpers::print_banner("Server");
    if providers.is_empty() {
        println!(
            "  {} no AI provider key set; run `pantry status` for details",
            "!".yellow().bold()
        );
    } else {
        println!("  Providers: {}", providers.join(" → "));
    }
    if !config.recipes.is_configured() {
        println!("  {} recipe API key not set", "!".yellow().bold());
    }

    let address = format!("{host}:{port}");
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    println!("  Listening on http://{address}");
    println!();

    serve(listener, state, shutdown_signal())
        .await
        .context("server error")
}
