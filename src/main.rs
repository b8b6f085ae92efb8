//! prepify - Interview practice with AI-generated questions and feedback
//!
//! Entry point for the prepify CLI application.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use prepify::cli::{Cli, Commands};
use prepify::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    match cli.command {
        Commands::Completions { shell } => {
            prepify::cli::completions::print(shell);
        }
        command => {
            // Load configuration only for runtime commands.
            let settings = Settings::load()?;

            match command {
                Commands::Run(args) => {
                    prepify::cli::commands::run_session(&settings, args).await?;
                }
                Commands::List { limit, creator } => {
                    prepify::cli::commands::list_interviews(&settings, limit, creator).await?;
                }
                Commands::Report { id } => {
                    prepify::cli::commands::show_report(&settings, &id).await?;
                }
                Commands::Config(config_cmd) => {
                    prepify::cli::commands::config_command(&settings, config_cmd)?;
                }
                Commands::Completions { .. } => unreachable!(),
            }
        }
    }

    Ok(())
}
