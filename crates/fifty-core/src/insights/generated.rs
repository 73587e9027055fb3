//! Generator-backed insight strategy
//!
//! Renders the habit_insights prompt from the analysis, sends it to the
//! configured AI backend under a timeout and validates the JSON reply.

use std::collections::HashMap;

use async_trait::async_trait;
use tracing::debug;

use crate::ai::{parse_insight_reply, AIBackend, AIClient, CompletionRequest};
use crate::analysis::WEEKDAYS;
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::models::GoalId;
use crate::prompts::{Prompt, PromptId, PromptLibrary};

use super::summarizer::{InsightContext, InsightStrategy};
use super::types::InsightReport;

pub struct GeneratedInsights {
    client: AIClient,
    prompt: Prompt,
    config: GeneratorConfig,
}

impl GeneratedInsights {
    /// Load the prompt from the library and bind it to a client
    pub fn new(
        client: AIClient,
        prompts: &mut PromptLibrary,
        config: &GeneratorConfig,
    ) -> Result<Self> {
        let prompt = prompts.get(PromptId::HabitInsights)?.clone();
        Ok(Self {
            client,
            prompt,
            config: config.clone(),
        })
    }

    pub fn client(&self) -> &AIClient {
        &self.client
    }

    /// Render the completion request for a context
    pub fn build_request(&self, ctx: &InsightContext<'_>) -> CompletionRequest {
        let a = ctx.analysis;

        let goals = ctx
            .goals
            .iter()
            .map(|g| format!("{}: {}", g.id, g.label))
            .collect::<Vec<_>>()
            .join(", ");
        let cycle_start = ctx
            .cycle_start
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let current_day = ctx
            .current_day
            .map(|d| d.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        let completion_rate = format!("{:.1}", a.completion_rate);
        let streak_days = a.streak_days.to_string();
        let total_days = a.total_days.to_string();
        let completed_days = a.completed_days.to_string();
        let best_goals = join_ids(&a.best_performing_goals);
        let struggling_goals = join_ids(&a.struggling_goals);
        let weekly_pattern = WEEKDAYS
            .iter()
            .zip(a.weekly_pattern.iter())
            .map(|(day, rate)| format!("{} {:.1}%", day, rate))
            .collect::<Vec<_>>()
            .join(", ");
        let predicted_success = format!("{:.1}", a.predicted_success);
        let highlights = ctx.highlights.map(|h| h.describe()).unwrap_or_default();

        let mut vars: HashMap<&str, &str> = HashMap::new();
        vars.insert("goals", &goals);
        vars.insert("cycle_start", &cycle_start);
        vars.insert("current_day", &current_day);
        vars.insert("completion_rate", &completion_rate);
        vars.insert("streak_days", &streak_days);
        vars.insert("total_days", &total_days);
        vars.insert("completed_days", &completed_days);
        vars.insert("best_goals", &best_goals);
        vars.insert("struggling_goals", &struggling_goals);
        vars.insert("weekly_pattern", &weekly_pattern);
        vars.insert("predicted_success", &predicted_success);
        vars.insert("highlights", &highlights);

        CompletionRequest::new(self.prompt.render_system(&vars), self.prompt.render_user(&vars))
            .with_temperature(self.config.temperature)
            .with_max_tokens(self.config.max_tokens)
    }
}

fn join_ids(ids: &[GoalId]) -> String {
    if ids.is_empty() {
        "none".to_string()
    } else {
        ids.iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl InsightStrategy for GeneratedInsights {
    fn name(&self) -> &'static str {
        "generated"
    }

    async fn generate(&self, ctx: &InsightContext<'_>) -> Result<InsightReport> {
        let request = self.build_request(ctx);
        debug!(
            model = %self.client.model(),
            host = %self.client.host(),
            "Requesting insights from generator"
        );

        let reply = match tokio::time::timeout(self.config.timeout, self.client.complete(&request))
            .await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => return Err(Error::GeneratorUnavailable(e.to_string())),
            Err(_) => {
                return Err(Error::GeneratorUnavailable(format!(
                    "no reply within {}s",
                    self.config.timeout.as_secs_f64()
                )))
            }
        };

        parse_insight_reply(&reply, self.client.model())
    }
}
