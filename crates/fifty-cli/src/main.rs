//! Fifty CLI - 50-day habit challenge tracker
//!
//! Usage:
//!   fifty init                  Start a challenge with the default goals
//!   fifty punch --done 1,3,4    Record today's punch-in
//!   fifty analyze               Analysis, insights and recommendations
//!   fifty export --kind goals   Export goal performance to CSV

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let store = commands::open_store(&cli.data);
    let config = commands::load_config(cli.config.as_deref())?;
    let user = cli.user.as_str();

    match cli.command {
        Commands::Init { goals, start } => {
            commands::cmd_init(&store, user, goals.as_deref(), start.as_deref())
        }
        Commands::Punch { date, done } => {
            commands::cmd_punch(&store, user, date.as_deref(), &done)
        }
        Commands::Stats => commands::cmd_stats(&store, user, &config),
        Commands::Analyze { no_ai, json } => {
            commands::cmd_analyze(&store, user, &config, no_ai, json).await
        }
        Commands::Goals => commands::cmd_goals(&store, user, &config),
        Commands::Correlations => commands::cmd_correlations(&store, user, &config),
        Commands::Formation { goal } => commands::cmd_formation(&store, user, &config, goal),
        Commands::History { days, end } => {
            commands::cmd_history(&store, user, &config, days, end.as_deref())
        }
        Commands::Export { kind, output, days } => {
            commands::cmd_export(&store, user, &config, &kind, &output, days)
        }
        Commands::AiCheck => commands::cmd_ai_check(&config).await,
    }
}
