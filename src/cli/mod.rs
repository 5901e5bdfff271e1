pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "svgs")]
#[command(about = "Generate typed icon components from a directory of SVG files", long_about = None)]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true, env = "SVGS_CONFIG", help = "Path to the config file (defaults to ./svgs.toml)")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Show debug output")]
    pub verbose: bool,

    #[arg(short, long, global = true, conflicts_with = "verbose", help = "Only show warnings and errors")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Write a default svgs.toml")]
    Init {
        #[arg(short, long, default_value = ".")]
        path: PathBuf,
    },

    #[command(about = "Clean the output directory and regenerate every component")]
    Generate,

    #[command(about = "Regenerate only added and changed icons, remove deleted ones")]
    Sync,

    #[command(about = "Show which icons would be added, updated or deleted")]
    Status {
        #[arg(short, long, help = "List every affected icon")]
        list: bool,
    },

    #[command(about = "Remove previously generated files")]
    Clean,
}
