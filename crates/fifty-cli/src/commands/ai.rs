//! AI backend commands and summarizer setup

use anyhow::Result;
use fifty_core::ai::{AIBackend, AIClient};
use fifty_core::analysis::HabitAnalysis;
use fifty_core::insights::{InsightContext, InsightReport, InsightStrategy};
use fifty_core::{Config, GeneratedInsights, InsightSummarizer, PromptId, PromptLibrary};
use tracing::warn;

/// Summarizer using the generator when a client is available
///
/// A prompt that fails to load leaves the summarizer rule-based.
pub fn build_summarizer(config: &Config, client: Option<AIClient>) -> InsightSummarizer {
    let Some(client) = client else {
        return InsightSummarizer::rule_based();
    };
    let mut prompts = PromptLibrary::new();
    match GeneratedInsights::new(client, &mut prompts, &config.generator) {
        Ok(generator) => InsightSummarizer::with_generator(generator),
        Err(e) => {
            warn!(error = %e, "Could not load insight prompt, using rule-based insights");
            InsightSummarizer::rule_based()
        }
    }
}

/// Run one insight request against a fixed sample analysis with the
/// generator settings from `config`
pub async fn sample_insights(config: &Config, client: AIClient) -> Result<InsightReport> {
    let generator = GeneratedInsights::new(client, &mut PromptLibrary::new(), &config.generator)?;
    let sample = sample_analysis();
    let ctx = InsightContext::new(&sample, &[]);
    Ok(generator.generate(&ctx).await?)
}

/// Check the configured AI backend and run one insight request
pub async fn cmd_ai_check(config: &Config) -> Result<()> {
    println!("🔍 Checking AI backend...\n");

    let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());
    println!("  AI_BACKEND: {}", backend);

    let Some(client) = AIClient::from_env() else {
        println!("\n⚠️  No AI backend configured; insights will be rule-based.");
        println!("\nTo enable generated insights:");
        println!("  Ollama:   export OLLAMA_HOST=http://localhost:11434");
        println!("  DeepSeek: export AI_BACKEND=deepseek DEEPSEEK_API_KEY=...");
        println!("  Other:    export AI_BACKEND=openai_compatible OPENAI_COMPATIBLE_HOST=...");
        return Ok(());
    };

    println!("  Backend: {}", client.backend_name());
    println!("  Host:    {}", client.host());
    println!("  Model:   {}", client.model());
    println!("  Timeout: {}s", config.generator.timeout.as_secs());
    let prompts = PromptLibrary::new();
    match prompts.override_dir() {
        Some(dir) if prompts.has_override(PromptId::HabitInsights) => {
            println!("  Prompt:  override in {}\n", dir.display())
        }
        _ => println!("  Prompt:  built-in\n"),
    }

    if client.health_check().await {
        println!("Availability: ✅ Connected");
    } else {
        println!("Availability: ❌ Failed");
        println!("\n⚠️  Could not reach {}", client.host());
        return Ok(());
    }

    println!("\n📋 Requesting sample insights...\n");
    match sample_insights(config, client).await {
        Ok(report) => {
            println!("✅ Reply parsed: {} insights", report.insights.len());
            for insight in report.by_priority() {
                println!("   [{}] {}", insight.kind, insight.title);
            }
            println!("   \"{}\"", report.motivational_message);
        }
        Err(e) => println!("❌ {}", e),
    }

    Ok(())
}

fn sample_analysis() -> HabitAnalysis {
    HabitAnalysis {
        completion_rate: 72.0,
        streak_days: 4,
        weekly_pattern: [80.0, 75.0, 70.0, 72.0, 65.0, 50.0, 55.0],
        predicted_success: 74.0,
        total_days: 14,
        completed_days: 6,
        ..Default::default()
    }
}
