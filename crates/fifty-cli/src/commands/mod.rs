//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Challenge setup and punch-in (init, punch) and shared utilities
//! - `analysis` - Analytics views (stats, analyze, goals, correlations, formation, history)
//! - `export` - CSV export
//! - `ai` - AI backend check and summarizer construction

pub mod ai;
pub mod analysis;
pub mod core;
pub mod export;

// Re-export command functions for main.rs
pub use ai::*;
pub use analysis::*;
pub use core::*;
pub use export::*;

/// Text bar for a 0-100 rate
pub fn bar(rate: f64, width: usize) -> String {
    let filled = ((rate.clamp(0.0, 100.0) / 100.0) * width as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
