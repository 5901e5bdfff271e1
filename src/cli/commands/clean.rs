use anyhow::Result;
use colored::Colorize;
use std::path::Path;

pub fn handle(config: Option<&Path>) -> Result<()> {
    let project = super::load(config)?;
    let removed = project.clean()?;

    if removed == 0 {
        println!("{} Nothing to clean", "ℹ".bright_blue());
    } else {
        println!("{} Removed {} generated file(s)", "✓".bright_green(), removed);
    }
    Ok(())
}
