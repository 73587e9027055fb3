//! Export command implementation

use std::path::Path;

use anyhow::{Context, Result};
use fifty_core::export::{export_daily_history, export_goal_performances};
use fifty_core::{Config, ExportKind, HabitAnalyzer, JsonFileStore};

use super::{load_history, today};

/// Export daily history (the `days` ending today) or goal performance to CSV
pub fn cmd_export(
    store: &JsonFileStore,
    user: &str,
    config: &Config,
    kind: &str,
    output: &Path,
    days: u32,
) -> Result<()> {
    let kind: ExportKind = kind.parse()?;
    let history = load_history(store, user)?;
    let analyzer = HabitAnalyzer::with_config(config);

    let rows = match kind {
        ExportKind::History => {
            let rows = analyzer.daily_history(&history, today(), days);
            export_daily_history(output, &rows)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            rows.len()
        }
        ExportKind::Goals => {
            let performances = analyzer.goal_performances(&history);
            export_goal_performances(output, &performances)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            performances.len()
        }
    };

    println!(
        "✅ Exported {} {} rows to {}",
        rows,
        kind.as_str(),
        output.display()
    );
    Ok(())
}
