mod cli;

use anyhow::Result;
use clap::Parser;
use cli::commands;
use tracing::Level;

fn main() {
    let cli = cli::Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_target(false)
        .init();

    if let Err(err) = run_command(cli) {
        commands::display_error(&err);
        std::process::exit(1);
    }
}

fn run_command(cli: cli::Cli) -> Result<()> {
    use cli::Commands;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Init { path } => commands::init::handle(&path),
        Commands::Generate => commands::generate::handle(config),
        Commands::Sync => commands::sync::handle(config),
        Commands::Status { list } => commands::status::handle(config, list),
        Commands::Clean => commands::clean::handle(config),
    }
}
