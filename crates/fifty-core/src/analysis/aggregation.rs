//! Aggregation engine
//!
//! Completion rate, streaks, best/struggling goals, weekly pattern and the
//! success prediction, plus per-goal performance and the daily history
//! used for heatmaps.

use chrono::{Datelike, Duration, NaiveDate};

use crate::config::AnalysisConfig;
use crate::models::{DayRecord, GoalId, GoalSeries, History};

use super::types::{DailyHistory, GoalPerformance, HabitAnalysis};

/// Percentage with a zero guard on the denominator
pub(crate) fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// (completed, total) goal-checks across a set of records
fn check_totals<'a>(records: impl Iterator<Item = &'a DayRecord>) -> (usize, usize) {
    records.fold((0, 0), |(done, total), record| {
        (done + record.completed(), total + record.total())
    })
}

/// Per-goal completion ratio for goals that appear in at least one record,
/// in goal definition order
fn goal_ratios(history: &History) -> Vec<(GoalId, f64)> {
    history
        .goals()
        .iter()
        .filter_map(|goal| {
            let mut appearances = 0;
            let mut completed = 0;
            for day in history.days() {
                if let Some(done) = day.outcome(goal.id) {
                    appearances += 1;
                    if done {
                        completed += 1;
                    }
                }
            }
            (appearances > 0).then(|| (goal.id, percent(completed, appearances)))
        })
        .collect()
}

/// Compute the aggregate habit analysis
pub fn habit_analysis(history: &History, config: &AnalysisConfig) -> HabitAnalysis {
    if history.is_empty() {
        return HabitAnalysis::default();
    }

    let (completed_checks, total_checks) = check_totals(history.days().iter());
    let completion_rate = percent(completed_checks, total_checks);

    let completed_days = history
        .days()
        .iter()
        .filter(|d| d.is_fully_completed())
        .count() as u32;

    // Empty days break the streak too
    let streak_days = history
        .latest_first()
        .take_while(|d| d.is_fully_completed())
        .count() as u32;

    // Stable sorts keep definition order for ties
    let ratios = goal_ratios(history);
    let mut best = ratios.clone();
    best.sort_by(|a, b| b.1.total_cmp(&a.1));
    let mut struggling = ratios;
    struggling.sort_by(|a, b| a.1.total_cmp(&b.1));

    let (weekly_pattern, weekly_observations) = weekly_pattern(history);

    let (recent_done, recent_total) =
        check_totals(history.latest_first().take(config.recent_window));
    let recent_completion_rate = percent(recent_done, recent_total);

    let predicted_success = (completion_rate * config.overall_weight
        + recent_completion_rate * config.recent_weight)
        .clamp(0.0, 100.0);

    HabitAnalysis {
        completion_rate,
        streak_days,
        best_performing_goals: best
            .into_iter()
            .take(config.top_goals)
            .map(|(id, _)| id)
            .collect(),
        struggling_goals: struggling
            .into_iter()
            .take(config.top_goals)
            .map(|(id, _)| id)
            .collect(),
        weekly_pattern,
        weekly_observations,
        predicted_success,
        total_days: history.len() as u32,
        completed_days,
    }
}

/// Mean daily completion per ISO weekday (Monday = 0) and the number of
/// records in each bucket. Records with no goal entries fall in no bucket.
fn weekly_pattern(history: &History) -> ([f64; 7], [u32; 7]) {
    let mut sums = [0.0_f64; 7];
    let mut counts = [0_u32; 7];

    for day in history.days().iter().filter(|day| day.total() > 0) {
        let bucket = day.date.weekday().num_days_from_monday() as usize;
        sums[bucket] += day.ratio() * 100.0;
        counts[bucket] += 1;
    }

    let mut pattern = [0.0_f64; 7];
    for (idx, slot) in pattern.iter_mut().enumerate() {
        if counts[idx] > 0 {
            *slot = sums[idx] / counts[idx] as f64;
        }
    }

    (pattern, counts)
}

/// Performance of every defined goal, in definition order
pub fn goal_performances(history: &History, config: &AnalysisConfig) -> Vec<GoalPerformance> {
    history
        .goals()
        .iter()
        .map(|goal| goal_performance(&history.goal_series(goal), config.recent_window))
        .collect()
}

/// Performance of a single goal from its tracked days
pub fn goal_performance(series: &GoalSeries, window: usize) -> GoalPerformance {
    let outcomes: Vec<bool> = series.outcomes().collect();
    let tracked = outcomes.len();
    let completed = outcomes.iter().filter(|done| **done).count();

    let mut longest = 0;
    let mut current = 0;
    for done in &outcomes {
        if *done {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }

    let recent_start = tracked.saturating_sub(window);
    let earlier_start = recent_start.saturating_sub(window);
    let recent = &outcomes[recent_start..];
    let earlier = &outcomes[earlier_start..recent_start];

    let rate = |slice: &[bool]| percent(slice.iter().filter(|d| **d).count(), slice.len());
    let recent_rate = rate(recent);
    let trend = if earlier.is_empty() {
        0.0
    } else {
        recent_rate - rate(earlier)
    };

    GoalPerformance {
        goal_id: series.goal_id,
        goal_name: series.goal_name.clone(),
        completion_rate: percent(completed, tracked),
        consistency: percent(longest, tracked),
        trend,
        recent_rate,
        tracked_days: tracked as u32,
        completed_days: completed as u32,
        longest_streak: longest as u32,
    }
}

/// One entry per calendar day in the `days`-long window ending at `end`,
/// oldest first. The window stops at the earliest representable date.
pub fn daily_history(history: &History, end: NaiveDate, days: u32) -> Vec<DailyHistory> {
    let goal_count = history.goals().len() as u32;
    let span = (days as i64).min((end - NaiveDate::MIN).num_days() + 1);

    (0..span)
        .rev()
        .filter_map(|offset| end.checked_sub_signed(Duration::days(offset)))
        .map(|date| match history.record_on(date) {
            Some(record) => DailyHistory {
                date,
                completed: record.completed() as u32,
                total_goals: record.total() as u32,
                completion_rate: record.ratio() * 100.0,
                has_record: true,
            },
            None => DailyHistory {
                date,
                completed: 0,
                total_goals: goal_count,
                completion_rate: 0.0,
                has_record: false,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GoalDefinition, PunchRecord};

    fn seven_goals() -> Vec<GoalDefinition> {
        (1..=7)
            .map(|id| GoalDefinition::new(id, format!("Goal {}", id)))
            .collect()
    }

    fn date(offset: i64) -> String {
        (NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(offset)).to_string()
    }

    fn analyze(goals: Vec<GoalDefinition>, records: &[PunchRecord]) -> HabitAnalysis {
        let history = History::new(goals, records).unwrap();
        habit_analysis(&history, &AnalysisConfig::default())
    }

    #[test]
    fn test_empty_history_is_all_zero() {
        let analysis = analyze(seven_goals(), &[]);
        assert_eq!(analysis, HabitAnalysis::default());
        assert_eq!(analysis.weekly_pattern, [0.0; 7]);
        assert_eq!(analysis.predicted_success, 0.0);
    }

    #[test]
    fn test_perfect_week() {
        let records: Vec<PunchRecord> = (0..7)
            .map(|i| PunchRecord::from_pairs(date(i), (1..=7).map(|g| (g, true))))
            .collect();
        let analysis = analyze(seven_goals(), &records);

        assert_eq!(analysis.completion_rate, 100.0);
        assert_eq!(analysis.streak_days, 7);
        assert_eq!(analysis.completed_days, 7);
        assert_eq!(analysis.total_days, 7);
        assert_eq!(analysis.predicted_success, 100.0);
        assert_eq!(analysis.weekly_pattern, [100.0; 7]);
    }

    #[test]
    fn test_best_and_struggling_goals() {
        let goals = vec![GoalDefinition::new(1, "Read"), GoalDefinition::new(2, "Run")];
        let records: Vec<PunchRecord> = (0..10)
            .map(|i| PunchRecord::from_pairs(date(i), [(1, true), (2, false)]))
            .collect();
        let history = History::new(goals, &records).unwrap();
        let config = AnalysisConfig::default();
        let analysis = habit_analysis(&history, &config);

        assert_eq!(analysis.best_performing_goals[0], 1);
        assert_eq!(analysis.struggling_goals[0], 2);

        let perfs = goal_performances(&history, &config);
        assert_eq!(perfs[0].completion_rate, 100.0);
        assert_eq!(perfs[1].completion_rate, 0.0);
    }

    #[test]
    fn test_streak_breaks_at_latest_day() {
        let mut records: Vec<PunchRecord> = (0..5)
            .map(|i| PunchRecord::from_pairs(date(i), [(1, true), (2, true)]))
            .collect();
        records.push(PunchRecord::from_pairs(date(5), [(1, true), (2, false)]));
        let goals = vec![GoalDefinition::new(1, "A"), GoalDefinition::new(2, "B")];

        let analysis = analyze(goals, &records);
        assert_eq!(analysis.streak_days, 0);
        assert_eq!(analysis.completed_days, 5);
    }

    #[test]
    fn test_streak_counts_until_first_break() {
        let goals = vec![GoalDefinition::new(1, "A")];
        let records = vec![
            PunchRecord::from_pairs(date(0), [(1, true)]),
            PunchRecord::from_pairs(date(1), [(1, false)]),
            PunchRecord::from_pairs(date(2), [(1, true)]),
            PunchRecord::from_pairs(date(3), [(1, true)]),
        ];
        assert_eq!(analyze(goals, &records).streak_days, 2);
    }

    #[test]
    fn test_empty_record_breaks_streak() {
        let goals = vec![GoalDefinition::new(1, "A")];
        let records = vec![
            PunchRecord::from_pairs(date(0), [(1, true)]),
            PunchRecord::from_pairs(date(1), []),
        ];
        let analysis = analyze(goals, &records);
        assert_eq!(analysis.streak_days, 0);
        assert_eq!(analysis.completion_rate, 100.0);
        assert_eq!(analysis.total_days, 2);
    }

    #[test]
    fn test_goal_lists_capped_and_disjoint() {
        let goals = seven_goals();
        // Goal g completed on the first g of 7 days -> distinct ratios
        let records: Vec<PunchRecord> = (0..7)
            .map(|i| PunchRecord::from_pairs(date(i), (1..=7).map(|g| (g, i < g))))
            .collect();
        let analysis = analyze(goals, &records);

        assert_eq!(analysis.best_performing_goals, vec![7, 6, 5]);
        assert_eq!(analysis.struggling_goals, vec![1, 2, 3]);
    }

    #[test]
    fn test_goal_lists_with_few_goals() {
        let goals = vec![GoalDefinition::new(1, "A"), GoalDefinition::new(2, "B")];
        let records = vec![PunchRecord::from_pairs(date(0), [(1, true), (2, true)])];
        let analysis = analyze(goals, &records);
        // Ties keep definition order
        assert_eq!(analysis.best_performing_goals, vec![1, 2]);
        assert_eq!(analysis.struggling_goals, vec![1, 2]);
    }

    #[test]
    fn test_untracked_goal_excluded_from_lists() {
        let goals = vec![GoalDefinition::new(1, "A"), GoalDefinition::new(2, "B")];
        let records = vec![PunchRecord::from_pairs(date(0), [(1, false)])];
        let analysis = analyze(goals, &records);
        assert_eq!(analysis.best_performing_goals, vec![1]);
        assert_eq!(analysis.struggling_goals, vec![1]);
    }

    #[test]
    fn test_weekly_pattern_buckets() {
        // 2024-01-01 is a Monday
        let goals = vec![GoalDefinition::new(1, "A"), GoalDefinition::new(2, "B")];
        let records = vec![
            PunchRecord::from_pairs(date(0), [(1, true), (2, true)]),
            PunchRecord::from_pairs(date(7), [(1, true), (2, false)]),
            PunchRecord::from_pairs(date(2), [(1, false), (2, false)]),
            PunchRecord::from_pairs(date(6), []),
        ];
        let analysis = analyze(goals, &records);

        assert_eq!(analysis.weekly_pattern[0], 75.0);
        assert_eq!(analysis.weekly_pattern[2], 0.0);
        assert_eq!(analysis.weekly_pattern[6], 0.0);
        assert_eq!(analysis.weekly_observations, [2, 0, 1, 0, 0, 0, 0]);
        assert_eq!(analysis.total_days, 4);
    }

    #[test]
    fn test_weekly_pattern_skips_empty_records() {
        // 2024-01-07 and 2024-01-14 are Sundays
        let goals = vec![GoalDefinition::new(1, "A")];
        let records = vec![
            PunchRecord::from_pairs(date(6), [(1, true)]),
            PunchRecord::from_pairs(date(13), []),
        ];
        let analysis = analyze(goals, &records);

        assert_eq!(analysis.weekly_pattern[6], 100.0);
        assert_eq!(analysis.weekly_observations, [0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_prediction_blends_recent_window() {
        let goals = vec![GoalDefinition::new(1, "A")];
        // 7 misses followed by 7 completions: overall 50, recent 100
        let records: Vec<PunchRecord> = (0..14)
            .map(|i| PunchRecord::from_pairs(date(i), [(1, i >= 7)]))
            .collect();
        let analysis = analyze(goals, &records);

        assert_eq!(analysis.completion_rate, 50.0);
        assert!((analysis.predicted_success - 70.0).abs() < 1e-9);
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let records: Vec<PunchRecord> = (0..30)
            .map(|i| PunchRecord::from_pairs(date(i), (1..=7).map(|g| (g, (i + g) % 3 != 0))))
            .collect();
        let history = History::new(seven_goals(), &records).unwrap();
        let config = AnalysisConfig::default();
        assert_eq!(
            habit_analysis(&history, &config),
            habit_analysis(&history, &config)
        );
    }

    #[test]
    fn test_goal_performance_trend_and_consistency() {
        let goals = vec![GoalDefinition::new(1, "Read")];
        // 7 days at 2/7, then 7 days all done
        let records: Vec<PunchRecord> = (0..14)
            .map(|i| PunchRecord::from_pairs(date(i), [(1, i >= 7 || i < 2)]))
            .collect();
        let history = History::new(goals, &records).unwrap();
        let perf = &goal_performances(&history, &AnalysisConfig::default())[0];

        assert_eq!(perf.tracked_days, 14);
        assert_eq!(perf.completed_days, 9);
        assert_eq!(perf.longest_streak, 7);
        assert_eq!(perf.consistency, 50.0);
        assert_eq!(perf.recent_rate, 100.0);
        assert!((perf.trend - (100.0 - 200.0 / 7.0)).abs() < 1e-9);
    }

    #[test]
    fn test_goal_performance_short_history_has_no_trend() {
        let goals = vec![GoalDefinition::new(1, "Read"), GoalDefinition::new(2, "Run")];
        let records: Vec<PunchRecord> = (0..5)
            .map(|i| PunchRecord::from_pairs(date(i), [(1, true)]))
            .collect();
        let history = History::new(goals, &records).unwrap();
        let perfs = goal_performances(&history, &AnalysisConfig::default());

        assert_eq!(perfs[0].trend, 0.0);
        assert!(!perfs[1].is_tracked());
        assert_eq!(perfs[1].completion_rate, 0.0);
        assert_eq!(perfs[1].consistency, 0.0);
    }

    #[test]
    fn test_daily_history_fills_missing_days() {
        let goals = vec![GoalDefinition::new(1, "A"), GoalDefinition::new(2, "B")];
        let records = vec![PunchRecord::from_pairs(date(2), [(1, true), (2, false)])];
        let history = History::new(goals, &records).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 4).unwrap();

        let days = daily_history(&history, end, 4);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0].date.to_string(), "2024-01-01");
        assert_eq!(days[3].date, end);

        let recorded = &days[2];
        assert!(recorded.has_record);
        assert_eq!(recorded.completed, 1);
        assert_eq!(recorded.total_goals, 2);
        assert_eq!(recorded.completion_rate, 50.0);

        assert!(!days[0].has_record);
        assert_eq!(days[0].total_goals, 2);
        assert_eq!(days[0].completion_rate, 0.0);
    }

    #[test]
    fn test_daily_history_stops_at_earliest_date() {
        let history = History::new(vec![GoalDefinition::new(1, "A")], &[]).unwrap();
        let end = NaiveDate::MIN + Duration::days(2);

        let days = daily_history(&history, end, 10);
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, NaiveDate::MIN);
        assert_eq!(days[2].date, end);

        let days = daily_history(&history, NaiveDate::MIN, u32::MAX);
        assert_eq!(days.len(), 1);
    }
}
