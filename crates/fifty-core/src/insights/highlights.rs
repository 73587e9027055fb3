//! Cross-goal highlights
//!
//! Picks the standout correlation, goal and habit out of the advanced
//! analytics and turns them into goal-specific recommendations.

use serde::Serialize;

use crate::analysis::{CorrelationPair, GoalPerformance, HabitFormationSeries};
use crate::models::HabitStage;

/// Completion rate below which a tracked goal is called out
const LOW_PERFORMANCE_RATE: f64 = 50.0;
/// Coefficient above which two goals are suggested together
const STRONG_CORRELATION: f64 = 0.6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvancedSummary {
    /// Pair with the largest absolute coefficient
    pub strongest_correlation: Option<CorrelationPair>,
    /// Tracked goal with the highest consistency
    pub most_consistent_goal: Option<GoalPerformance>,
    /// Goal with the highest strength score
    pub fastest_forming_goal: Option<HabitFormationSeries>,
    pub recommendations: Vec<String>,
}

impl AdvancedSummary {
    /// Short multi-line description for the generator prompt
    pub fn describe(&self) -> String {
        let mut lines = Vec::new();
        if let Some(pair) = &self.strongest_correlation {
            lines.push(format!(
                "- Strongest correlation: {} and {} ({:+.2})",
                pair.goal_a_name, pair.goal_b_name, pair.coefficient
            ));
        }
        if let Some(goal) = &self.most_consistent_goal {
            lines.push(format!(
                "- Most consistent goal: {} ({:.1}%)",
                goal.goal_name, goal.consistency
            ));
        }
        if let Some(habit) = &self.fastest_forming_goal {
            lines.push(format!(
                "- Strongest habit: {} ({}, strength {:.1})",
                habit.goal_name, habit.current_stage, habit.strength_score
            ));
        }
        lines.join("\n")
    }
}

/// First maximum by key (earlier items win ties)
fn first_max_by<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    items.fold(None, |best, item| match best {
        Some(b) if key(&item) <= key(&b) => Some(b),
        _ => Some(item),
    })
}

pub fn advanced_summary(
    performances: &[GoalPerformance],
    correlations: &[CorrelationPair],
    formations: &[HabitFormationSeries],
) -> AdvancedSummary {
    let tracked: Vec<&GoalPerformance> = performances.iter().filter(|p| p.is_tracked()).collect();
    let started: Vec<&HabitFormationSeries> =
        formations.iter().filter(|f| !f.data.is_empty()).collect();

    let strongest_correlation =
        first_max_by(correlations.iter(), |c| c.coefficient.abs()).cloned();
    let most_consistent_goal = first_max_by(tracked.iter().copied(), |p| p.consistency).cloned();
    let fastest_forming_goal =
        first_max_by(started.iter().copied(), |f| f.strength_score).cloned();

    let mut recommendations = Vec::new();

    let low: Vec<&str> = tracked
        .iter()
        .filter(|p| p.completion_rate < LOW_PERFORMANCE_RATE)
        .map(|p| p.goal_name.as_str())
        .collect();
    if !low.is_empty() {
        recommendations.push(format!(
            "Focus on goals with a low completion rate: {}",
            low.join(", ")
        ));
    }

    if let Some(pair) = correlations
        .iter()
        .find(|c| c.coefficient > STRONG_CORRELATION)
    {
        recommendations.push(format!(
            "{} and {} go well together; try doing them back to back",
            pair.goal_a_name, pair.goal_b_name
        ));
    }

    let forming: Vec<&str> = started
        .iter()
        .filter(|f| f.current_stage == HabitStage::Forming)
        .map(|f| f.goal_name.as_str())
        .collect();
    if !forming.is_empty() {
        recommendations.push(format!(
            "{} still forming; the first 21 days are the key",
            forming.join(", ")
        ));
    }

    AdvancedSummary {
        strongest_correlation,
        most_consistent_goal,
        fastest_forming_goal,
        recommendations,
    }
}
