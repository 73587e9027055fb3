//! Habit-formation model
//!
//! Projects consistency, difficulty, motivation and automaticity over the
//! elapsed tracked days of a goal. Every curve is a pure function of the
//! day index and the goal's measured completion density.

use crate::config::FormationConfig;
use crate::models::{GoalSeries, HabitStage};

use super::types::{HabitDay, HabitFormationSeries};

/// Days at the end of the series used for strength and projection
const TAIL_DAYS: usize = 7;

/// Stage for a 1-based elapsed day
pub fn stage_for_day(day: u32, config: &FormationConfig) -> HabitStage {
    if day <= config.forming_days {
        HabitStage::Forming
    } else if day <= config.developing_days {
        HabitStage::Developing
    } else {
        HabitStage::Established
    }
}

/// Formation series for every goal series, in the same order
pub fn habit_formation(series: &[GoalSeries], config: &FormationConfig) -> Vec<HabitFormationSeries> {
    series.iter().map(|s| formation_series(s, config)).collect()
}

/// Formation series for one goal
pub fn formation_series(series: &GoalSeries, config: &FormationConfig) -> HabitFormationSeries {
    let outcomes: Vec<bool> = series.outcomes().take(config.max_days).collect();

    if outcomes.is_empty() {
        return HabitFormationSeries {
            goal_id: series.goal_id,
            goal_name: series.goal_name.clone(),
            data: Vec::new(),
            current_stage: HabitStage::Forming,
            strength_score: 0.0,
            days_to_establish: config.developing_days,
        };
    }

    let density = outcomes.iter().filter(|d| **d).count() as f64 / outcomes.len() as f64;
    // Rate at which automaticity would reach the target by the end of the
    // developing stage for a goal completed every day
    let headroom = (100.0 - config.target_automaticity).max(1.0);
    let growth_rate = density * (100.0 / headroom).ln() / config.developing_days as f64;

    let forming = config.forming_days.max(1) as f64;
    let mut completed = 0u32;
    let mut streak = 0u32;
    let mut data = Vec::with_capacity(outcomes.len());

    for (idx, done) in outcomes.iter().enumerate() {
        let day = idx as u32 + 1;
        let d = day as f64;
        if *done {
            completed += 1;
            streak += 1;
        } else {
            streak = 0;
        }

        let completion_share = completed as f64 / d;
        let streak_share = (streak as f64).min(forming) / forming;
        let consistency = (70.0 * completion_share + 30.0 * streak_share).clamp(0.0, 100.0);
        let difficulty = 10.0 + 70.0 * (-(0.5 + density) * d / 40.0).exp();
        let motivation = (90.0 - 0.3 * d).max(config.motivation_floor);
        let automaticity = 100.0 * (1.0 - (-growth_rate * d).exp());

        data.push(HabitDay {
            day,
            consistency,
            difficulty,
            motivation,
            automaticity,
            stage: stage_for_day(day, config),
        });
    }

    let tail = &data[data.len().saturating_sub(TAIL_DAYS)..];
    let strength_score = tail
        .iter()
        .map(|d| (d.consistency + d.automaticity) / 2.0)
        .sum::<f64>()
        / tail.len() as f64;

    HabitFormationSeries {
        goal_id: series.goal_id,
        goal_name: series.goal_name.clone(),
        current_stage: stage_for_day(data.len() as u32, config),
        strength_score,
        days_to_establish: days_to_establish(&data, config),
        data,
    }
}

/// Projected days until automaticity reaches the target
///
/// Uses the mean daily automaticity gain over the last seven days; fewer
/// than seven days of data gives the end of the developing stage.
fn days_to_establish(data: &[HabitDay], config: &FormationConfig) -> u32 {
    if data.len() < TAIL_DAYS {
        return config.developing_days;
    }
    let tail = &data[data.len() - TAIL_DAYS..];
    let (first, last) = (&tail[0], &tail[TAIL_DAYS - 1]);
    let growth = (last.automaticity - first.automaticity) / (TAIL_DAYS - 1) as f64;
    let needed = (config.target_automaticity - last.automaticity) / growth.max(0.1);

    needed
        .clamp(
            config.min_projection_days as f64,
            config.max_projection_days as f64,
        )
        .round() as u32
}
