//! Rule-based insight strategy
//!
//! Deterministic insights from threshold rules on the habit analysis. Used
//! on its own when no generator is configured and as the fallback when the
//! generator fails.

use async_trait::async_trait;

use crate::analysis::{HabitAnalysis, WEEKDAYS};
use crate::error::Result;
use crate::models::GoalDefinition;

use super::summarizer::{InsightContext, InsightStrategy};
use super::types::{Insight, InsightKind, InsightReport, InsightSource};

/// Minimum number of recommendations in any report
pub const MIN_RECOMMENDATIONS: usize = 3;

/// Generic recommendations used to pad a report, in order
pub const GENERIC_RECOMMENDATIONS: [&str; 3] = [
    "Punch in at the same time every day to build a fixed routine",
    "Celebrate small wins and be proud of your progress",
    "Share your goals with friends for support and accountability",
];

/// Weekday spread (in points) above which the weekly pattern is called out
const WEEKLY_SPREAD_THRESHOLD: f64 = 20.0;

/// Append generic recommendations not already present until there are three
pub fn pad_recommendations(recommendations: &mut Vec<String>) {
    for generic in GENERIC_RECOMMENDATIONS {
        if recommendations.len() >= MIN_RECOMMENDATIONS {
            break;
        }
        if !recommendations.iter().any(|r| r == generic) {
            recommendations.push(generic.to_string());
        }
    }
}

/// Fixed report for a user with no records yet
pub fn welcome_report() -> InsightReport {
    InsightReport {
        insights: vec![Insight::new(
            InsightKind::Encouragement,
            "Start your journey",
            "Welcome to your 50-day challenge! Punch in daily and detailed analysis will follow.",
            3,
        )],
        recommendations: vec![
            "Set clear, achievable goals".to_string(),
            "Punch in at a fixed time every day".to_string(),
            "Record your progress and how you feel".to_string(),
        ],
        motivational_message: "Every great achievement starts with the decision to try!"
            .to_string(),
        source: InsightSource::Welcome,
    }
}

/// Build the rule-based report for an analysis
pub fn rule_based_report(analysis: &HabitAnalysis, goals: &[GoalDefinition]) -> InsightReport {
    let rate = analysis.completion_rate;
    let streak = analysis.streak_days;
    let mut insights = Vec::new();

    if rate >= 80.0 {
        insights.push(Insight::new(
            InsightKind::Success,
            "Excellent completion rate",
            format!("Your overall completion rate is {:.1}%. Outstanding work!", rate),
            4,
        ));
    } else if rate >= 60.0 {
        insights.push(Insight::new(
            InsightKind::Encouragement,
            "Good progress",
            format!(
                "Your completion rate is {:.1}%. There is room to improve, keep pushing!",
                rate
            ),
            3,
        ));
    } else {
        insights.push(Insight::new(
            InsightKind::Warning,
            "Needs attention",
            format!(
                "Your completion rate is {:.1}%. Consider adjusting your approach or easing your goals.",
                rate
            ),
            5,
        ));
    }

    if streak >= 7 {
        insights.push(Insight::new(
            InsightKind::Success,
            "The power of persistence",
            format!("You have punched in {} days in a row. The habit is forming!", streak),
            4,
        ));
    } else if streak >= 3 {
        insights.push(Insight::new(
            InsightKind::Encouragement,
            "Good start",
            format!("{} days in a row is a great start. Keep it going!", streak),
            3,
        ));
    }

    if analysis.weekly_spread() > WEEKLY_SPREAD_THRESHOLD {
        let best = analysis.best_weekday();
        let worst = analysis.worst_weekday();
        insights.push(Insight::new(
            InsightKind::Suggestion,
            "Weekly pattern",
            format!(
                "You do best on {} ({:.1}%) and struggle most on {} ({:.1}%).",
                WEEKDAYS[best],
                analysis.weekly_pattern[best],
                WEEKDAYS[worst],
                analysis.weekly_pattern[worst]
            ),
            3,
        ));
    }

    let mut recommendations = Vec::new();
    if rate < 70.0 {
        recommendations
            .push("Consider fewer goals or lowering the difficulty of individual goals".to_string());
    }
    if streak < 3 {
        recommendations.push("Set a reminder and punch in at a fixed time".to_string());
    }
    if !analysis.struggling_goals.is_empty() {
        let names: Vec<&str> = analysis
            .struggling_goals
            .iter()
            .filter_map(|id| goals.iter().find(|g| g.id == *id))
            .map(|g| g.label.as_str())
            .collect();
        recommendations.push(if names.is_empty() {
            "Focus on your struggling goals and break them into smaller steps".to_string()
        } else {
            format!(
                "Focus on your struggling goals ({}) and break them into smaller steps",
                names.join(", ")
            )
        });
    }
    pad_recommendations(&mut recommendations);

    InsightReport {
        insights,
        recommendations,
        motivational_message: motivational_message(analysis).to_string(),
        source: InsightSource::RuleBased,
    }
}

/// First matching rule wins
fn motivational_message(analysis: &HabitAnalysis) -> &'static str {
    if analysis.completion_rate >= 80.0 {
        "Your persistence is admirable. Keep up this excellent form!"
    } else if analysis.streak_days >= 5 {
        "Your streak is building real habit strength. Keep going!"
    } else if analysis.completion_rate >= 50.0 {
        "Progress is a process, and you are on the right path!"
    } else {
        "Everyone has ups and downs. What matters is starting again. You can do it!"
    }
}

/// Threshold rules over the analysis
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedInsights;

impl RuleBasedInsights {
    pub fn new() -> Self {
        Self
    }

    pub fn report(&self, ctx: &InsightContext<'_>) -> InsightReport {
        rule_based_report(ctx.analysis, ctx.goals)
    }
}

#[async_trait]
impl InsightStrategy for RuleBasedInsights {
    fn name(&self) -> &'static str {
        "rule_based"
    }

    async fn generate(&self, ctx: &InsightContext<'_>) -> Result<InsightReport> {
        Ok(self.report(ctx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(rate: f64, streak: u32) -> HabitAnalysis {
        HabitAnalysis {
            completion_rate: rate,
            streak_days: streak,
            total_days: 10,
            ..Default::default()
        }
    }

    fn kinds(report: &InsightReport) -> Vec<(InsightKind, u8)> {
        report.insights.iter().map(|i| (i.kind, i.priority)).collect()
    }

    #[test]
    fn test_completion_rate_tiers() {
        let high = rule_based_report(&analysis(85.0, 0), &[]);
        assert_eq!(kinds(&high)[0], (InsightKind::Success, 4));

        let mid = rule_based_report(&analysis(60.0, 0), &[]);
        assert_eq!(kinds(&mid)[0], (InsightKind::Encouragement, 3));

        let low = rule_based_report(&analysis(59.9, 0), &[]);
        assert_eq!(kinds(&low)[0], (InsightKind::Warning, 5));
    }

    #[test]
    fn test_streak_tiers() {
        assert_eq!(
            kinds(&rule_based_report(&analysis(90.0, 7), &[]))[1],
            (InsightKind::Success, 4)
        );
        assert_eq!(
            kinds(&rule_based_report(&analysis(90.0, 3), &[]))[1],
            (InsightKind::Encouragement, 3)
        );
        assert_eq!(rule_based_report(&analysis(90.0, 2), &[]).insights.len(), 1);
    }

    #[test]
    fn test_weekly_pattern_insight() {
        let mut a = analysis(90.0, 0);
        a.weekly_pattern = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 70.0];
        let report = rule_based_report(&a, &[]);
        let weekly = report
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Suggestion)
            .unwrap();
        assert!(weekly.content.contains("Monday"));
        assert!(weekly.content.contains("Sunday"));

        a.weekly_pattern = [100.0, 100.0, 100.0, 100.0, 100.0, 100.0, 80.0];
        let report = rule_based_report(&a, &[]);
        assert!(report.insights.iter().all(|i| i.kind != InsightKind::Suggestion));
    }

    #[test]
    fn test_recommendations_always_at_least_three() {
        for (rate, streak) in [(0.0, 0), (65.0, 1), (95.0, 10), (100.0, 50)] {
            let report = rule_based_report(&analysis(rate, streak), &[]);
            assert!(report.recommendations.len() >= MIN_RECOMMENDATIONS);
        }
        let strong = rule_based_report(&analysis(95.0, 10), &[]);
        assert_eq!(strong.recommendations, GENERIC_RECOMMENDATIONS.map(String::from).to_vec());
    }

    #[test]
    fn test_struggling_goal_names_in_recommendation() {
        let mut a = analysis(50.0, 0);
        a.struggling_goals = vec![2];
        let goals = vec![GoalDefinition::new(1, "Read"), GoalDefinition::new(2, "Run")];
        let report = rule_based_report(&a, &goals);
        assert!(report.recommendations.iter().any(|r| r.contains("(Run)")));
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_motivational_message_order() {
        assert!(motivational_message(&analysis(80.0, 0)).contains("admirable"));
        assert!(motivational_message(&analysis(40.0, 5)).contains("streak"));
        assert!(motivational_message(&analysis(50.0, 0)).contains("right path"));
        assert!(motivational_message(&analysis(10.0, 0)).contains("ups and downs"));
    }

    #[test]
    fn test_pad_skips_duplicates() {
        let mut recs = vec![GENERIC_RECOMMENDATIONS[0].to_string()];
        pad_recommendations(&mut recs);
        assert_eq!(recs.len(), 3);
        assert_eq!(recs[1], GENERIC_RECOMMENDATIONS[1]);
    }

    #[test]
    fn test_welcome_report() {
        let report = welcome_report();
        assert_eq!(report.insights.len(), 1);
        assert_eq!(report.insights[0].kind, InsightKind::Encouragement);
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.source, InsightSource::Welcome);
    }
}
