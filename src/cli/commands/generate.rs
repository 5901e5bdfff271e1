use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use svgs::config::LayoutKind;
use svgs::BuildSummary;

pub fn handle(config: Option<&Path>) -> Result<()> {
    let project = super::load(config)?;
    println!("{}", "Generating icon components...".bright_blue().bold());

    let summary = project.generate()?;
    print_table(project.settings().layout, &summary);

    println!(
        "\n{} {}",
        "✨".bright_green(),
        format!(
            "Generated {} components in {:.2?}",
            summary.components(),
            summary.duration
        )
        .bright_green()
        .bold()
    );
    if summary.warnings > 0 {
        println!("  {} {} file(s) skipped, see warnings above", "⚠".bright_yellow(), summary.warnings);
    }

    Ok(())
}

fn print_table(layout: LayoutKind, summary: &BuildSummary) {
    match layout {
        LayoutKind::Standalone => {
            println!("\n{}", "Component".bright_blue());
            println!("{}", "=========".bright_blue());
            for name in summary.exports.components(None) {
                println!("  {} {}", "•".bright_cyan(), name);
            }
        }
        LayoutKind::Family => {
            println!("\n{:<24} {}", "Family".bright_blue(), "Icons".bright_blue());
            println!("{}", "==============================".bright_blue());
            for (family, names) in summary.exports.families() {
                println!("  {:<22} {}", family, names.len());
            }
        }
    }

    if summary.removed > 0 {
        println!("\n  {} Removed {} stale file(s)", "✓".bright_green(), summary.removed);
    }
    if summary.barrels > 0 {
        println!("  {} Wrote {} barrel file(s)", "✓".bright_green(), summary.barrels);
    }
}
