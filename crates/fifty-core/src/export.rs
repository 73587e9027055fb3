//! CSV export for daily history and goal performance

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;
use tracing::info;

use crate::analysis::{DailyHistory, GoalPerformance};
use crate::error::{Error, Result};

/// What to export
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// One row per calendar day
    History,
    /// One row per goal
    Goals,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::History => "history",
            ExportKind::Goals => "goals",
        }
    }
}

impl std::str::FromStr for ExportKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "history" | "daily" => Ok(ExportKind::History),
            "goals" | "performance" => Ok(ExportKind::Goals),
            other => Err(Error::Validation(format!(
                "Unknown export kind '{}' (expected history or goals)",
                other
            ))),
        }
    }
}

const HISTORY_HEADER: [&str; 5] = ["date", "completed", "total_goals", "completion_rate", "has_record"];

const GOALS_HEADER: [&str; 9] = [
    "goal_id",
    "goal_name",
    "completion_rate",
    "consistency",
    "trend",
    "recent_rate",
    "tracked_days",
    "completed_days",
    "longest_streak",
];

/// Write daily history rows, oldest first as given
pub fn write_daily_history<W: Write>(writer: W, rows: &[DailyHistory]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(HISTORY_HEADER)?;
    for row in rows {
        wtr.write_record([
            row.date.to_string(),
            row.completed.to_string(),
            row.total_goals.to_string(),
            format!("{:.1}", row.completion_rate),
            row.has_record.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one row per goal
pub fn write_goal_performances<W: Write>(writer: W, performances: &[GoalPerformance]) -> Result<()> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(GOALS_HEADER)?;
    for perf in performances {
        wtr.write_record([
            perf.goal_id.to_string(),
            perf.goal_name.clone(),
            format!("{:.1}", perf.completion_rate),
            format!("{:.1}", perf.consistency),
            format!("{:.1}", perf.trend),
            format!("{:.1}", perf.recent_rate),
            perf.tracked_days.to_string(),
            perf.completed_days.to_string(),
            perf.longest_streak.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_daily_history(path: &Path, rows: &[DailyHistory]) -> Result<()> {
    write_daily_history(File::create(path)?, rows)?;
    info!(path = %path.display(), rows = rows.len(), "Exported daily history");
    Ok(())
}

pub fn export_goal_performances(path: &Path, performances: &[GoalPerformance]) -> Result<()> {
    write_goal_performances(File::create(path)?, performances)?;
    info!(path = %path.display(), rows = performances.len(), "Exported goal performance");
    Ok(())
}
