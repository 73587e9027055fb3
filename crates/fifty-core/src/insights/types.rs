//! Insight report types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of an insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Success,
    Warning,
    Suggestion,
    Encouragement,
}

impl InsightKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Suggestion => "suggestion",
            Self::Encouragement => "encouragement",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "success" => Some(Self::Success),
            "warning" => Some(Self::Warning),
            "suggestion" => Some(Self::Suggestion),
            "encouragement" => Some(Self::Encouragement),
            _ => None,
        }
    }
}

impl fmt::Display for InsightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lowest and highest insight priority
pub const MIN_PRIORITY: u8 = 1;
pub const MAX_PRIORITY: u8 = 5;

/// One categorized observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub title: String,
    pub content: String,
    /// 1 (low) to 5 (high)
    pub priority: u8,
}

impl Insight {
    pub fn new(
        kind: InsightKind,
        title: impl Into<String>,
        content: impl Into<String>,
        priority: u8,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            content: content.into(),
            priority: priority.clamp(MIN_PRIORITY, MAX_PRIORITY),
        }
    }
}

/// Which strategy produced a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightSource {
    /// No history yet
    Welcome,
    RuleBased,
    Generated { model: String },
}

impl fmt::Display for InsightSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Welcome => write!(f, "welcome"),
            Self::RuleBased => write!(f, "rule-based"),
            Self::Generated { model } => write!(f, "generated ({})", model),
        }
    }
}

/// Summarizer output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    /// Always at least three
    pub recommendations: Vec<String>,
    pub motivational_message: String,
    pub source: InsightSource,
}

impl InsightReport {
    /// Insights ordered by priority, highest first (stable for ties)
    pub fn by_priority(&self) -> Vec<&Insight> {
        let mut sorted: Vec<&Insight> = self.insights.iter().collect();
        sorted.sort_by(|a, b| b.priority.cmp(&a.priority));
        sorted
    }
}
