//! `pantry status`: show configuration and provider status.

use std::path::Path;

use anyhow::Result;
use colored::Colorize;

use pantry_core::config::{get_config_path, load_config};
use pantry_providers::registry::find_by_name;

/// Run the status command.
pub fn run(path: Option<&Path>) -> Result<()> {
    let config = load_config(path);
    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    println!();
    println!("{}", "🍳 Pantry Status".cyan().bold());
    println!();

    println!(
        "  {:<18} {} {}",
        "Config:".bold(),
        config_path.display(),
        if config_path.exists() {
            "✓".green().to_string()
        } else {
            "(not found)".red().to_string()
        }
    );

    println!(
        "  {:<18} {}:{}",
        "Server:".bold(),
        config.server.host,
        config.server.port
    );

    println!(
        "  {:<18} {}",
        "Timeout:".bold(),
        format!("{}s per provider call", config.assist.request_timeout_secs).dimmed()
    );

    // Chain in configured order
    println!();
    println!("  {}", "Provider chain:".bold());
    for (position, name) in config.assist.chain.iter().enumerate() {
        let spec = find_by_name(name);
        let line = match spec {
            None => format!("{}", "· unknown provider, skipped".red()),
            Some(spec) => {
                let configured = config
                    .providers
                    .get_by_name(spec.credential)
                    .is_some_and(|c| c.is_configured());
                if configured {
                    format!("{} {} ({})", "✓".green(), spec.display_name, spec.model.dimmed())
                } else {
                    format!(
                        "{} {} (set {})",
                        "·".dimmed(),
                        spec.display_name.dimmed(),
                        spec.env_key
                    )
                }
            }
        };
        println!("    {}. {:<14} {}", position + 1, name, line);
    }
    if !config.providers.any_configured() {
        println!(
            "    {}",
            "no provider key set: search falls back, analyze/modify fail".yellow()
        );
    }

    println!();
    let recipe_status = if config.recipes.is_configured() {
        format!("{} (key set)", "✓".green())
    } else {
        format!("{}", "· not configured (set SPOONACULAR_API_KEY)".dimmed())
    };
    println!("  {:<18} {}", "Spoonacular:".bold(), recipe_status);

    println!();
    Ok(())
}
