//! `pantry onboard`: write `~/.pantry/config.json` with defaults.

use std::path::Path;

use anyhow::{Context, Result};
use colored::Colorize;

use pantry_core::config::{get_config_path, save_config, Config};

/// Run the onboard command.
pub fn run(path: Option<&Path>) -> Result<()> {
    println!();
    println!("{}", "🍳 Pantry Setup".cyan().bold());
    println!();

    let config_path = path.map(Path::to_path_buf).unwrap_or_else(get_config_path);

    if write_default_config(&config_path)? {
        println!(
            "  {} created config at {}",
            "✓".green(),
            config_path.display()
        );
    } else {
        println!(
            "  {} config already exists at {}",
            "✓".green(),
            config_path.display()
        );
    }

    println!();
    println!("  Next steps:");
    println!("    1. Add at least one provider key (providers.openai / gemini / groq)");
    println!("    2. Add a Spoonacular key under recipes.apiKey");
    println!("    3. Run `pantry status`, then `pantry serve`");
    println!();

    Ok(())
}

/// Write the default config unless a file already exists. Returns whether a
/// file was written.
pub fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save_config(&Config::default(), Some(path))
        .with_context(|| format!("failed to write config to {}", path.display()))?;
    Ok(true)
}
