//! Derived analysis types
//!
//! Everything here is a pure function of a `History` snapshot and is
//! recomputed on every query.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{GoalId, HabitStage};

/// Weekday labels for `weekly_pattern` indices (Monday = 0)
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Aggregate adherence metrics for a user's punch history
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HabitAnalysis {
    /// Completed goal-checks / all goal-checks, 0-100
    pub completion_rate: f64,
    /// Consecutive fully-completed days, counting back from the latest record
    pub streak_days: u32,
    /// Up to three goal ids with the highest completion ratio
    pub best_performing_goals: Vec<GoalId>,
    /// Up to three goal ids with the lowest completion ratio
    pub struggling_goals: Vec<GoalId>,
    /// Mean daily completion (0-100) per weekday, Monday first
    pub weekly_pattern: [f64; 7],
    /// Number of records that fell on each weekday
    pub weekly_observations: [u32; 7],
    /// Blend of overall and recent completion rate, 0-100
    pub predicted_success: f64,
    /// Records considered
    pub total_days: u32,
    /// Records where every entry was completed
    pub completed_days: u32,
}

impl HabitAnalysis {
    /// Spread between the strongest and weakest weekday
    pub fn weekly_spread(&self) -> f64 {
        let max = self.weekly_pattern.iter().copied().fold(f64::MIN, f64::max);
        let min = self.weekly_pattern.iter().copied().fold(f64::MAX, f64::min);
        max - min
    }

    /// Index of the strongest weekday (first wins ties)
    pub fn best_weekday(&self) -> usize {
        let mut best = 0;
        for (idx, value) in self.weekly_pattern.iter().enumerate() {
            if *value > self.weekly_pattern[best] {
                best = idx;
            }
        }
        best
    }

    /// Index of the weakest weekday (first wins ties)
    pub fn worst_weekday(&self) -> usize {
        let mut worst = 0;
        for (idx, value) in self.weekly_pattern.iter().enumerate() {
            if *value < self.weekly_pattern[worst] {
                worst = idx;
            }
        }
        worst
    }
}

/// Per-goal performance over the goal's tracked days
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalPerformance {
    pub goal_id: GoalId,
    pub goal_name: String,
    /// Completed / tracked, 0-100
    pub completion_rate: f64,
    /// Longest completed run / tracked days, 0-100
    pub consistency: f64,
    /// Recent window rate minus the preceding window rate, in points
    pub trend: f64,
    /// Completion rate over the recent window, 0-100
    pub recent_rate: f64,
    pub tracked_days: u32,
    pub completed_days: u32,
    pub longest_streak: u32,
}

impl GoalPerformance {
    pub fn is_tracked(&self) -> bool {
        self.tracked_days > 0
    }
}

/// How a correlation coefficient was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationMethod {
    /// Pearson correlation over day-aligned 0/1 outcome series
    Pearson,
    /// Similarity of summary metrics, used when series can't be aligned
    Heuristic,
}

impl CorrelationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrelationMethod::Pearson => "pearson",
            CorrelationMethod::Heuristic => "heuristic",
        }
    }
}

impl fmt::Display for CorrelationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Association between two goals' completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationPair {
    pub goal_a: GoalId,
    pub goal_b: GoalId,
    pub goal_a_name: String,
    pub goal_b_name: String,
    /// In [-1, 1]
    pub coefficient: f64,
    /// p-value-like, in [0, 1]; lower means stronger evidence
    pub significance: f64,
    /// Number of days both goals were tracked
    pub sample_size: u32,
    pub method: CorrelationMethod,
}

/// One elapsed day of the habit-formation curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDay {
    /// 1-based elapsed tracked day
    pub day: u32,
    pub consistency: f64,
    pub difficulty: f64,
    pub motivation: f64,
    pub automaticity: f64,
    pub stage: HabitStage,
}

/// Habit-formation projection for one goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitFormationSeries {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub data: Vec<HabitDay>,
    pub current_stage: HabitStage,
    /// Mean of consistency and automaticity over the last 7 days
    pub strength_score: f64,
    /// Projected days until automaticity reaches the target
    pub days_to_establish: u32,
}

/// One calendar day of the punch history (heatmap cell)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyHistory {
    pub date: NaiveDate,
    /// Goals completed that day
    pub completed: u32,
    /// Goals recorded that day, or the goal count when there is no record
    pub total_goals: u32,
    /// 0-100
    pub completion_rate: f64,
    pub has_record: bool,
}
