//! Insight summarizer - picks a strategy and always returns a report

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::analysis::HabitAnalysis;
use crate::error::Result;
use crate::models::GoalDefinition;

use super::generated::GeneratedInsights;
use super::highlights::AdvancedSummary;
use super::rules::{welcome_report, RuleBasedInsights};
use super::types::InsightReport;

/// Everything a strategy may draw on
pub struct InsightContext<'a> {
    pub analysis: &'a HabitAnalysis,
    pub goals: &'a [GoalDefinition],
    pub cycle_start: Option<NaiveDate>,
    /// 1-based day of the current challenge cycle
    pub current_day: Option<u32>,
    pub highlights: Option<&'a AdvancedSummary>,
}

impl<'a> InsightContext<'a> {
    pub fn new(analysis: &'a HabitAnalysis, goals: &'a [GoalDefinition]) -> Self {
        Self {
            analysis,
            goals,
            cycle_start: None,
            current_day: None,
            highlights: None,
        }
    }

    pub fn with_cycle(mut self, cycle_start: NaiveDate, current_day: u32) -> Self {
        self.cycle_start = Some(cycle_start);
        self.current_day = Some(current_day);
        self
    }

    pub fn with_highlights(mut self, highlights: &'a AdvancedSummary) -> Self {
        self.highlights = Some(highlights);
        self
    }
}

/// A way of turning an analysis into an insight report
#[async_trait]
pub trait InsightStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, ctx: &InsightContext<'_>) -> Result<InsightReport>;
}

/// Runs the generator strategy when one is configured, rule-based otherwise
///
/// Generator failures of any kind (unreachable, timeout, malformed reply)
/// are logged and answered by the rule-based strategy.
pub struct InsightSummarizer {
    generator: Option<Box<dyn InsightStrategy>>,
    fallback: RuleBasedInsights,
}

impl Default for InsightSummarizer {
    fn default() -> Self {
        Self::rule_based()
    }
}

impl InsightSummarizer {
    /// Rule-based only
    pub fn rule_based() -> Self {
        Self {
            generator: None,
            fallback: RuleBasedInsights::new(),
        }
    }

    pub fn with_generator(generator: GeneratedInsights) -> Self {
        Self::with_strategy(Box::new(generator))
    }

    /// Use any strategy as the primary
    pub fn with_strategy(strategy: Box<dyn InsightStrategy>) -> Self {
        Self {
            generator: Some(strategy),
            fallback: RuleBasedInsights::new(),
        }
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    pub async fn summarize(&self, ctx: &InsightContext<'_>) -> InsightReport {
        if ctx.analysis.total_days == 0 {
            debug!("No records yet, returning welcome report");
            return welcome_report();
        }

        if let Some(generator) = &self.generator {
            match generator.generate(ctx).await {
                Ok(report) => {
                    info!(
                        strategy = generator.name(),
                        insights = report.insights.len(),
                        "Generated insights"
                    );
                    return report;
                }
                Err(e) => {
                    warn!(
                        strategy = generator.name(),
                        error = %e,
                        "Insight generation failed, falling back to rules"
                    );
                }
            }
        }

        self.fallback.report(ctx)
    }
}
