//! Habit analytics
//!
//! Pure computations over a validated `History`:
//! - Aggregation: completion rate, streak, goal rankings, weekly pattern
//! - Goal performance and the daily history heatmap
//! - Correlation between goals
//! - Habit-formation curves and stages

pub mod aggregation;
pub mod correlation;
pub mod formation;
pub mod types;

pub use types::*;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::Config;
use crate::models::{GoalSeries, History};

/// Entry point for all analytics, parameterised by configuration
#[derive(Debug, Clone, Default)]
pub struct HabitAnalyzer {
    config: Config,
}

impl HabitAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Aggregate adherence metrics
    pub fn habit_analysis(&self, history: &History) -> HabitAnalysis {
        let analysis = aggregation::habit_analysis(history, &self.config.analysis);
        debug!(
            total_days = analysis.total_days,
            completion_rate = analysis.completion_rate,
            streak_days = analysis.streak_days,
            "Computed habit analysis"
        );
        analysis
    }

    /// Per-goal performance in goal definition order
    pub fn goal_performances(&self, history: &History) -> Vec<GoalPerformance> {
        aggregation::goal_performances(history, &self.config.analysis)
    }

    /// Pairwise correlations between tracked goals
    pub fn correlations(
        &self,
        performances: &[GoalPerformance],
        series: &[GoalSeries],
    ) -> Vec<CorrelationPair> {
        correlation::correlations(performances, series)
    }

    /// Habit-formation series per goal
    pub fn habit_formation(&self, series: &[GoalSeries]) -> Vec<HabitFormationSeries> {
        formation::habit_formation(series, &self.config.formation)
    }

    /// Heatmap cells for the `days`-long window ending at `end`
    pub fn daily_history(&self, history: &History, end: NaiveDate, days: u32) -> Vec<DailyHistory> {
        aggregation::daily_history(history, end, days)
    }

    /// Everything the summarizer and reports need, from one snapshot
    pub fn full_report(&self, history: &History) -> AnalysisBundle {
        let series = history.all_goal_series();
        let performances = self.goal_performances(history);
        let correlations = self.correlations(&performances, &series);
        let formations = self.habit_formation(&series);
        AnalysisBundle {
            analysis: self.habit_analysis(history),
            performances,
            correlations,
            formations,
        }
    }
}

/// All derived analytics for one history snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisBundle {
    pub analysis: HabitAnalysis,
    pub performances: Vec<GoalPerformance>,
    pub correlations: Vec<CorrelationPair>,
    pub formations: Vec<HabitFormationSeries>,
}
