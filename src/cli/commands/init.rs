use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use svgs::Config;

pub fn handle(path: &Path) -> Result<()> {
    let written = Config::init(path).context("Failed to initialize svgs in the specified directory")?;
    println!("  {} Created {}", "✓".bright_green(), written.display());

    println!("\n{}", "Quick start:".bright_blue().bold());
    println!("  1. Put kebab-case SVG files in {}", "assets/".bright_yellow());
    println!("  2. Run {}", "svgs generate".bright_cyan());
    println!("  3. Later, run {} to regenerate only what changed", "svgs sync".bright_cyan());
    Ok(())
}
