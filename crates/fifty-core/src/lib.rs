//! Fifty Core Library
//!
//! Habit analytics for the 50-day punch-in challenge:
//! - Validated history snapshots of goals and daily punch records
//! - Aggregation (completion rate, streaks, weekly pattern, prediction)
//! - Per-goal performance, goal correlations and habit-formation curves
//! - Insight summarizer with rule-based and LLM-generated strategies
//! - Pluggable AI backends (Ollama, OpenAI-compatible, mock)
//! - Prompt library with user overrides
//! - JSON record store and CSV export

pub mod ai;
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod prompts;
pub mod store;

/// Test utilities including the mock LLM server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{AIBackend, AIClient, CompletionRequest, MockBackend, OllamaBackend, OpenAICompatibleBackend};
pub use analysis::{
    AnalysisBundle, CorrelationPair, DailyHistory, GoalPerformance, HabitAnalysis, HabitAnalyzer,
    HabitFormationSeries,
};
pub use config::Config;
pub use error::{Error, Result};
pub use export::ExportKind;
pub use insights::{
    advanced_summary, AdvancedSummary, GeneratedInsights, InsightContext, InsightReport,
    InsightSource, InsightSummarizer,
};
pub use models::{GoalDefinition, GoalId, HabitStage, History, PunchRecord};
pub use prompts::{Prompt, PromptId, PromptLibrary};
pub use store::{JsonFileStore, RecordStore, UserProfile};
