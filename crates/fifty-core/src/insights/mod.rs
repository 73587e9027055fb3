//! Insight summarizer
//!
//! Turns a `HabitAnalysis` into categorized insights, at least three
//! recommendations and a motivational message.
//!
//! ## Strategies
//!
//! - **Rule-based** - threshold rules, always available
//! - **Generated** - prompt sent to an AI backend, reply validated
//!
//! `InsightSummarizer` tries the generator when configured and falls back
//! to the rules on any failure, so callers always get a complete report.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use fifty_core::insights::{InsightContext, InsightSummarizer};
//!
//! let summarizer = InsightSummarizer::rule_based();
//! let report = summarizer.summarize(&InsightContext::new(&analysis, history.goals())).await;
//! ```

pub mod generated;
pub mod highlights;
pub mod rules;
pub mod summarizer;
pub mod types;

pub use generated::GeneratedInsights;
pub use highlights::{advanced_summary, AdvancedSummary};
pub use rules::{rule_based_report, welcome_report, RuleBasedInsights};
pub use summarizer::{InsightContext, InsightStrategy, InsightSummarizer};
pub use types::{Insight, InsightKind, InsightReport, InsightSource};
