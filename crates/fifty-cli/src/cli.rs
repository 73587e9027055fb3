//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Fifty - Track and analyze your 50-day habit challenge
#[derive(Parser)]
#[command(name = "fifty")]
#[command(about = "Daily punch-in tracker and habit analytics for a 50-day challenge", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Record store path
    #[arg(long, default_value = "fifty.json", global = true)]
    pub data: PathBuf,

    /// User whose challenge to work with
    #[arg(long, default_value = "me", global = true)]
    pub user: String,

    /// Config file (defaults to ~/.local/share/fifty/config/fifty.toml, then built-in)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start (or restart) a challenge cycle
    Init {
        /// Comma-separated goal labels (defaults to the seven standard goals)
        #[arg(short, long)]
        goals: Option<String>,

        /// Cycle start date, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        start: Option<String>,
    },

    /// Record a day's punch-in
    Punch {
        /// Date to record, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        date: Option<String>,

        /// Comma-separated ids of completed goals; the rest are recorded as missed
        #[arg(long, value_delimiter = ',')]
        done: Vec<i64>,
    },

    /// Show headline numbers
    Stats,

    /// Full analysis with insights and recommendations
    Analyze {
        /// Skip the AI generator and use rule-based insights only
        #[arg(long)]
        no_ai: bool,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,
    },

    /// Per-goal performance
    Goals,

    /// Correlations between goals
    Correlations,

    /// Habit-formation progress
    Formation {
        /// Show the day-by-day curve for one goal
        #[arg(short, long)]
        goal: Option<i64>,
    },

    /// Day-by-day completion (heatmap)
    History {
        /// Number of days to show (at most 3650)
        #[arg(
            short,
            long,
            default_value = "14",
            value_parser = clap::value_parser!(u32).range(1..=3650)
        )]
        days: u32,

        /// Last day of the window, YYYY-MM-DD (defaults to today)
        #[arg(short, long)]
        end: Option<String>,
    },

    /// Export analytics to CSV
    Export {
        /// What to export: history, goals
        #[arg(short, long, default_value = "history")]
        kind: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,

        /// Days of history to export (history only, at most 3650)
        #[arg(
            long,
            default_value = "50",
            value_parser = clap::value_parser!(u32).range(1..=3650)
        )]
        days: u32,
    },

    /// Check the configured AI backend
    AiCheck,
}
