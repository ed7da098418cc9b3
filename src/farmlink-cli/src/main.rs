mod cli;
mod commands;
mod config;
mod transport;
mod watch;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::*;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so `scan --dry-run` output stays clean
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farmlink=info,farmlink_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Run { server } => {
            commands::agent::run(server)?;
        }

        Commands::Scan { server, dry_run } => {
            commands::agent::scan(server, dry_run)?;
        }

        Commands::Inspect { folder } => {
            commands::inspect::handle(&folder)?;
        }

        Commands::Configure { server, root, show } => {
            commands::configure::handle(server, root, show)?;
        }
    }

    Ok(())
}
