use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use svgs::storage::SaveOutcome;

pub fn handle(config: Option<&Path>) -> Result<()> {
    let project = super::load(config)?;
    println!("{}", "Syncing icon components...".bright_blue().bold());

    let report = project.sync()?;

    if report.changes.is_empty() {
        println!("{} Everything is up to date", "✓".bright_green());
        return Ok(());
    }

    println!("\n{:<10} {}", "Change".bright_blue(), "Icons".bright_blue());
    println!("{}", "================".bright_blue());
    println!("  {:<8} {}", "added", report.changes.added.len());
    println!("  {:<8} {}", "updated", report.changes.updated.len());
    println!("  {:<8} {}", "deleted", report.changes.deleted.len());

    if report.saved == SaveOutcome::Saved {
        println!("\n  {} Database updated", "✓".bright_green());
    }
    if report.barrels > 0 {
        println!("  {} Wrote {} barrel file(s)", "✓".bright_green(), report.barrels);
    }

    println!(
        "\n{} {}",
        "✨".bright_green(),
        format!("Sync finished in {:.2?}", report.duration).bright_green().bold()
    );
    Ok(())
}
