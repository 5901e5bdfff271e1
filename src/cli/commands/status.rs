use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use svgs::storage::ComponentMetadata;

pub fn handle(config: Option<&Path>, list: bool) -> Result<()> {
    let project = super::load(config)?;
    println!("{}", "Icon Status".bright_blue().bold());
    println!("{}", "===========".bright_blue());

    let changes = project.status()?;
    if changes.is_empty() {
        println!("{} Generated components are up to date", "✓".bright_green());
        return Ok(());
    }

    print_group("added", "+".bright_green().to_string(), &changes.added, list);
    print_group("updated", "~".bright_yellow().to_string(), &changes.updated, list);
    print_group("deleted", "-".bright_red().to_string(), &changes.deleted, list);

    println!("\nRun {} to apply", "svgs sync".bright_cyan());
    if !list {
        println!("{}", "Tip: Use --list to show every icon".bright_cyan());
    }
    Ok(())
}

fn print_group(label: &str, marker: String, icons: &[ComponentMetadata], list: bool) {
    if icons.is_empty() {
        return;
    }

    println!("  {} {} {}", marker, icons.len(), label);
    if list {
        for icon in icons {
            println!(
                "      {} {} ({})",
                "→".bright_black(),
                icon.component_name,
                icon.path.display().to_string().bright_black()
            );
        }
    }
}
