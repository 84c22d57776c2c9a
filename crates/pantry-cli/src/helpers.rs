//! Shared CLI helpers: path expansion, banners, result printing.

use std::path::PathBuf;

use anyhow::Result;
use colored::Colorize;

use pantry_assist::{Assisted, Source};

/// Expand `~` at the start of a path to the user's home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_next::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs_next::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

pub fn print_banner(mode: &str) {
    let version = env!("CARGO_PKG_VERSION");
    println!();
    println!("{}  v{}", "🍳 Pantry".cyan().bold(), version.dimmed());
    println!("  Mode: {mode}");
    println!();
}

/// One-line provenance label.
pub fn source_label(source: &Source) -> String {
    match source {
        Source::Model { provider } => format!("{} answered by {}", "✓".green(), provider.bold()),
        Source::Fallback => format!("{} fallback result (no provider answered)", "·".yellow()),
    }
}

/// Print a task result as pretty JSON.
pub fn print_result(result: &Assisted) -> Result<()> {
    println!();
    println!("  {}", source_label(&result.source));
    println!();
    println!("{}", serde_json::to_string_pretty(&result.body)?);
    println!();
    Ok(())
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
