pub mod clean;
pub mod generate;
pub mod init;
pub mod status;
pub mod sync;

use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;
use svgs::Svgs;

/// Load the project config from the current directory.
pub fn load(config: Option<&Path>) -> Result<Svgs> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    Ok(Svgs::new(cwd, config)?)
}

/// Display an error message with proper formatting
pub fn display_error(err: &anyhow::Error) {
    eprintln!("\n{} {}", "✗".bright_red().bold(), "Operation failed".bright_red().bold());
    eprintln!("  {} {}", "├".bright_black(), err);

    for cause in err.chain().skip(1) {
        eprintln!("  {} {}", "├".bright_black(), cause);
    }

    let error_str = err.to_string();
    if error_str.contains("Permission denied") {
        eprintln!("  {} Try running with elevated permissions", "└".bright_cyan());
    } else if error_str.contains("Assets directory not found") {
        eprintln!("  {} Check `assets_dir` in svgs.toml", "└".bright_cyan());
    } else if error_str.contains("kebab-case") {
        eprintln!("  {} Rename files like {}", "└".bright_cyan(), "arrow-left.svg".bright_cyan());
    } else {
        eprintln!("  {} Run with {} for more details",
            "└".bright_black(),
            "--verbose".bright_cyan()
        );
    }
}
