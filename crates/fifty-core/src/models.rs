//! Data models for Fifty
//!
//! Raw input shapes (`GoalDefinition`, `PunchRecord`) are what the record
//! store hands out. `History` is the validated, date-sorted snapshot every
//! analysis runs against.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Goal identifier, unique within a challenge cycle
pub type GoalId = i64;

/// ISO date format used by punch records
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// One of the goals a user punches in against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalDefinition {
    pub id: GoalId,
    pub label: String,
}

impl GoalDefinition {
    pub fn new(id: GoalId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
        }
    }
}

/// A day's punch-in as stored (date still a string)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PunchRecord {
    /// ISO "YYYY-MM-DD"
    pub date: String,
    /// Goal id -> completed; may cover a subset of the active goals
    #[serde(alias = "items")]
    pub completion: BTreeMap<GoalId, bool>,
}

impl PunchRecord {
    pub fn new(date: impl Into<String>, completion: BTreeMap<GoalId, bool>) -> Self {
        Self {
            date: date.into(),
            completion,
        }
    }

    /// Build a record from (goal id, completed) pairs
    pub fn from_pairs(
        date: impl Into<String>,
        pairs: impl IntoIterator<Item = (GoalId, bool)>,
    ) -> Self {
        Self::new(date, pairs.into_iter().collect())
    }
}

/// Parse a strict ISO calendar date
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let trimmed = s.trim();
    if trimmed.len() != 10 {
        return Err(Error::Validation(format!(
            "Invalid date '{}' (expected YYYY-MM-DD)",
            s
        )));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| Error::Validation(format!("Invalid date '{}': {}", s, e)))
}

/// A validated punch record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub completion: BTreeMap<GoalId, bool>,
}

impl DayRecord {
    /// Number of goal entries recorded for the day
    pub fn total(&self) -> usize {
        self.completion.len()
    }

    /// Number of goal entries marked complete
    pub fn completed(&self) -> usize {
        self.completion.values().filter(|done| **done).count()
    }

    /// At least one entry and every entry true
    pub fn is_fully_completed(&self) -> bool {
        let total = self.total();
        total > 0 && self.completed() == total
    }

    /// Completion ratio for the day, 0 when the day has no entries
    pub fn ratio(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.completed() as f64 / total as f64
        }
    }

    /// Outcome for a single goal, if the goal was tracked that day
    pub fn outcome(&self, goal_id: GoalId) -> Option<bool> {
        self.completion.get(&goal_id).copied()
    }
}

/// Day-by-day outcomes of a single goal, ordered by date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GoalSeries {
    pub goal_id: GoalId,
    pub goal_name: String,
    pub days: Vec<(NaiveDate, bool)>,
}

impl GoalSeries {
    pub fn tracked_days(&self) -> usize {
        self.days.len()
    }

    pub fn outcomes(&self) -> impl Iterator<Item = bool> + '_ {
        self.days.iter().map(|(_, done)| *done)
    }
}

/// Validated snapshot of a user's goals and punch records
///
/// Records are sorted ascending by date. Construction rejects malformed
/// dates, duplicate dates, negative or duplicate goal ids, and completion
/// entries for goals that are not defined.
#[derive(Debug, Clone, Default)]
pub struct History {
    goals: Vec<GoalDefinition>,
    days: Vec<DayRecord>,
}

impl History {
    pub fn new(goals: Vec<GoalDefinition>, records: &[PunchRecord]) -> Result<Self> {
        let mut known = HashSet::with_capacity(goals.len());
        for goal in &goals {
            if goal.id < 0 {
                return Err(Error::Validation(format!(
                    "Goal id {} is negative",
                    goal.id
                )));
            }
            if !known.insert(goal.id) {
                return Err(Error::Validation(format!(
                    "Duplicate goal id {}",
                    goal.id
                )));
            }
        }

        let mut seen_dates = HashSet::with_capacity(records.len());
        let mut days = Vec::with_capacity(records.len());
        for record in records {
            let date = parse_date(&record.date)?;
            if !seen_dates.insert(date) {
                return Err(Error::Validation(format!(
                    "More than one record for {}",
                    date
                )));
            }
            if let Some(unknown) = record.completion.keys().find(|id| !known.contains(*id)) {
                return Err(Error::Validation(format!(
                    "Record for {} references unknown goal id {}",
                    date, unknown
                )));
            }
            days.push(DayRecord {
                date,
                completion: record.completion.clone(),
            });
        }

        days.sort_by_key(|d| d.date);

        Ok(Self { goals, days })
    }

    /// Empty history for a set of goals
    pub fn empty(goals: Vec<GoalDefinition>) -> Result<Self> {
        Self::new(goals, &[])
    }

    pub fn goals(&self) -> &[GoalDefinition] {
        &self.goals
    }

    /// Records, oldest first
    pub fn days(&self) -> &[DayRecord] {
        &self.days
    }

    /// Records, most recent first
    pub fn latest_first(&self) -> impl Iterator<Item = &DayRecord> {
        self.days.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn goal(&self, id: GoalId) -> Option<&GoalDefinition> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn record_on(&self, date: NaiveDate) -> Option<&DayRecord> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|idx| &self.days[idx])
    }

    /// Date-ordered outcomes for one goal (only days where it was tracked)
    pub fn goal_series(&self, goal: &GoalDefinition) -> GoalSeries {
        let days = self
            .days
            .iter()
            .filter_map(|d| d.outcome(goal.id).map(|done| (d.date, done)))
            .collect();
        GoalSeries {
            goal_id: goal.id,
            goal_name: goal.label.clone(),
            days,
        }
    }

    /// Series for every defined goal, in goal definition order
    pub fn all_goal_series(&self) -> Vec<GoalSeries> {
        self.goals.iter().map(|g| self.goal_series(g)).collect()
    }
}

/// Stage of habit formation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitStage {
    Forming,
    Developing,
    Established,
}

impl HabitStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            HabitStage::Forming => "forming",
            HabitStage::Developing => "developing",
            HabitStage::Established => "established",
        }
    }
}

impl fmt::Display for HabitStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
