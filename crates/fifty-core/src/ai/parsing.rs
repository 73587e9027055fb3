//! JSON parsing helpers for AI backend responses
//!
//! Models often wrap the JSON payload in extra prose, so the object is
//! located first and then validated.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::insights::rules::pad_recommendations;
use crate::insights::types::{Insight, InsightKind, InsightReport, InsightSource};
use crate::insights::types::{MAX_PRIORITY, MIN_PRIORITY};

/// Motivational message used when the model leaves it empty
pub const DEFAULT_MOTIVATION: &str = "Keep it up, you're doing great!";

#[derive(Debug, Deserialize)]
struct RawReply {
    insights: Vec<RawInsight>,
    #[serde(default)]
    recommendations: Vec<String>,
    #[serde(default, rename = "motivationalMessage", alias = "motivational_message")]
    motivational_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawInsight {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    priority: i64,
}

/// Slice out the outermost JSON object of a reply
fn extract_json(response: &str) -> Result<&str> {
    let response = response.trim();
    match (response.find('{'), response.rfind('}')) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::InvalidData(format!(
            "No JSON found in AI response | Raw: {}",
            truncate(response)
        ))),
    }
}

fn truncate(s: &str) -> String {
    match s.char_indices().nth(200) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

/// Parse and validate an insight reply
///
/// Unknown insight types or priorities outside 1-5 reject the whole reply.
/// Recommendations are padded to three and an empty motivational message
/// gets a default.
pub fn parse_insight_reply(response: &str, model: &str) -> Result<InsightReport> {
    let json_str = extract_json(response)?;
    let raw: RawReply = serde_json::from_str(json_str).map_err(|e| {
        Error::InvalidData(format!(
            "Invalid insight JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;

    let insights = raw
        .insights
        .into_iter()
        .map(|r| {
            let kind = InsightKind::parse(&r.kind)
                .ok_or_else(|| Error::InvalidData(format!("Unknown insight type '{}'", r.kind)))?;
            if r.priority < MIN_PRIORITY as i64 || r.priority > MAX_PRIORITY as i64 {
                return Err(Error::InvalidData(format!(
                    "Insight priority {} outside {}-{}",
                    r.priority, MIN_PRIORITY, MAX_PRIORITY
                )));
            }
            Ok(Insight::new(kind, r.title, r.content, r.priority as u8))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut recommendations: Vec<String> = raw
        .recommendations
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    pad_recommendations(&mut recommendations);

    let motivational_message = raw
        .motivational_message
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| DEFAULT_MOTIVATION.to_string());

    Ok(InsightReport {
        insights,
        recommendations,
        motivational_message,
        source: InsightSource::Generated {
            model: model.to_string(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::mock::MOCK_INSIGHT_REPLY;

    #[test]
    fn test_parse_reply_with_surrounding_text() {
        let report = parse_insight_reply(MOCK_INSIGHT_REPLY, "mock").unwrap();
        assert_eq!(report.insights.len(), 2);
        assert_eq!(report.insights[0].kind, InsightKind::Success);
        assert_eq!(report.insights[0].priority, 4);
        // Two from the model, padded to three
        assert_eq!(report.recommendations.len(), 3);
        assert_eq!(report.motivational_message, "Every day counts. Keep going!");
        assert_eq!(
            report.source,
            InsightSource::Generated {
                model: "mock".into()
            }
        );
    }

    #[test]
    fn test_missing_motivation_defaults() {
        let reply = r#"{"insights": [], "recommendations": ["a", "b", "c", "d"]}"#;
        let report = parse_insight_reply(reply, "m").unwrap();
        assert_eq!(report.motivational_message, DEFAULT_MOTIVATION);
        assert_eq!(report.recommendations.len(), 4);
    }

    #[test]
    fn test_snake_case_motivation_accepted() {
        let reply = r#"{"insights": [], "motivational_message": "Go!"}"#;
        let report = parse_insight_reply(reply, "m").unwrap();
        assert_eq!(report.motivational_message, "Go!");
    }

    #[test]
    fn test_rejects_invalid_replies() {
        assert!(matches!(
            parse_insight_reply("no json here", "m"),
            Err(Error::InvalidData(_))
        ));
        assert!(parse_insight_reply("{not json}", "m").is_err());
        assert!(parse_insight_reply(r#"{"recommendations": []}"#, "m").is_err());

        let bad_type = r#"{"insights": [{"type": "party", "title": "", "content": "", "priority": 3}]}"#;
        assert!(parse_insight_reply(bad_type, "m").is_err());

        let bad_priority =
            r#"{"insights": [{"type": "success", "title": "", "content": "", "priority": 7}]}"#;
        assert!(parse_insight_reply(bad_priority, "m").is_err());
    }
}
