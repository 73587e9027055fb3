//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::time::Duration;

use clap::Parser;
use fifty_core::ai::{AIClient, MockBackend};
use fifty_core::insights::InsightSource;
use fifty_core::test_utils;
use fifty_core::{Config, JsonFileStore, RecordStore};
use tempfile::TempDir;

use crate::cli::{Cli, Commands};
use crate::commands::{self, bar};

fn setup_store() -> (TempDir, JsonFileStore) {
    let dir = tempfile::tempdir().unwrap();
    let store = commands::open_store(&dir.path().join("fifty.json"));
    (dir, store)
}

/// Store with a default challenge started 2024-03-01 and 10 punch-ins:
/// goals 1-2 always done, goal 3 on even days
fn setup_challenge() -> (TempDir, JsonFileStore) {
    let (dir, store) = setup_store();
    commands::cmd_init(&store, "me", None, Some("2024-03-01")).unwrap();
    for day in 1..=10 {
        let done: Vec<i64> = if day % 2 == 0 { vec![1, 2, 3] } else { vec![1, 2] };
        let date = format!("2024-03-{:02}", day);
        commands::cmd_punch(&store, "me", Some(&date), &done).unwrap();
    }
    (dir, store)
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_punch_args() {
    let cli = Cli::parse_from(["fifty", "--user", "alice", "punch", "--done", "1,3,4"]);
    assert_eq!(cli.user, "alice");
    assert_eq!(cli.data.to_str(), Some("fifty.json"));
    match cli.command {
        Commands::Punch { date, done } => {
            assert!(date.is_none());
            assert_eq!(done, vec![1, 3, 4]);
        }
        _ => panic!("expected punch"),
    }
}

#[test]
fn test_parse_analyze_flags() {
    let cli = Cli::parse_from(["fifty", "analyze", "--no-ai", "--json", "-v"]);
    assert!(cli.verbose);
    assert!(matches!(
        cli.command,
        Commands::Analyze {
            no_ai: true,
            json: true
        }
    ));
}

#[test]
fn test_parse_history_days_bounds() {
    let cli = Cli::parse_from(["fifty", "history", "--days", "3650"]);
    assert!(matches!(cli.command, Commands::History { days: 3650, .. }));

    assert!(Cli::try_parse_from(["fifty", "history", "--days", "0"]).is_err());
    assert!(Cli::try_parse_from(["fifty", "history", "--days", "4294967295"]).is_err());
    assert!(
        Cli::try_parse_from(["fifty", "export", "-o", "out.csv", "--days", "100000"]).is_err()
    );
}

// ========== Init / Punch Tests ==========

#[test]
fn test_cmd_init_default_goals() {
    let (_dir, store) = setup_store();
    commands::cmd_init(&store, "me", None, Some("2024-03-01")).unwrap();

    let goals = store.get_goals("me").unwrap();
    assert_eq!(goals.len(), 7);
    assert_eq!(goals[0].label, commands::DEFAULT_GOALS[0]);
    assert_eq!(goals[6].id, 7);
}

#[test]
fn test_cmd_init_custom_goals() {
    let (_dir, store) = setup_store();
    commands::cmd_init(&store, "me", Some("Read, Run,,Sleep"), Some("2024-03-01")).unwrap();
    let labels: Vec<String> = store
        .get_goals("me")
        .unwrap()
        .into_iter()
        .map(|g| g.label)
        .collect();
    assert_eq!(labels, vec!["Read", "Run", "Sleep"]);
}

#[test]
fn test_cmd_init_invalid_start() {
    let (_dir, store) = setup_store();
    assert!(commands::cmd_init(&store, "me", None, Some("01/03/2024")).is_err());
    assert!(commands::cmd_init(&store, "me", Some(" , "), Some("2024-03-01")).is_err());
}

#[test]
fn test_cmd_punch_records_all_goals() {
    let (_dir, store) = setup_store();
    commands::cmd_init(&store, "me", Some("Read,Run,Sleep"), Some("2024-03-01")).unwrap();
    commands::cmd_punch(&store, "me", Some("2024-03-02"), &[1, 3]).unwrap();

    let records = store.get_records("me").unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].completion.get(&1), Some(&true));
    assert_eq!(records[0].completion.get(&2), Some(&false));
    assert_eq!(records[0].completion.get(&3), Some(&true));
    assert_eq!(store.profile("me").unwrap().current_day, 2);
}

#[test]
fn test_cmd_punch_rejects_unknown_goal() {
    let (_dir, store) = setup_store();
    commands::cmd_init(&store, "me", Some("Read"), Some("2024-03-01")).unwrap();
    assert!(commands::cmd_punch(&store, "me", Some("2024-03-02"), &[2]).is_err());
    assert!(store.get_records("me").unwrap().is_empty());
}

#[test]
fn test_cmd_punch_without_challenge() {
    let (_dir, store) = setup_store();
    assert!(commands::cmd_punch(&store, "me", Some("2024-03-02"), &[1]).is_err());
}

// ========== Analysis Command Tests ==========

#[test]
fn test_analysis_commands_run() {
    let (_dir, store) = setup_challenge();
    let config = Config::default();

    assert!(commands::cmd_stats(&store, "me", &config).is_ok());
    assert!(commands::cmd_goals(&store, "me", &config).is_ok());
    assert!(commands::cmd_correlations(&store, "me", &config).is_ok());
    assert!(commands::cmd_formation(&store, "me", &config, None).is_ok());
    assert!(commands::cmd_formation(&store, "me", &config, Some(3)).is_ok());
    assert!(commands::cmd_history(&store, "me", &config, 14, Some("2024-03-12")).is_ok());
}

#[test]
fn test_cmd_formation_unknown_goal() {
    let (_dir, store) = setup_challenge();
    assert!(commands::cmd_formation(&store, "me", &Config::default(), Some(42)).is_err());
}

#[test]
fn test_commands_without_challenge() {
    let (_dir, store) = setup_store();
    let config = Config::default();
    assert!(commands::cmd_stats(&store, "me", &config).is_err());
    assert!(commands::cmd_goals(&store, "me", &config).is_err());
}

#[tokio::test]
async fn test_analyze_user_rule_based() {
    let (_dir, store) = setup_challenge();
    let config = Config::default();
    let summarizer = commands::build_summarizer(&config, None);

    let result = commands::analyze_user(&store, "me", &config, &summarizer)
        .await
        .unwrap();
    assert_eq!(result.report.source, InsightSource::RuleBased);
    assert_eq!(result.bundle.analysis.total_days, 10);
    assert_eq!(result.bundle.analysis.best_performing_goals[..2], [1, 2]);
    assert!(result.report.recommendations.len() >= 3);
}

#[tokio::test]
async fn test_analyze_user_with_generator() {
    let (_dir, store) = setup_challenge();
    let config = Config::default();
    let summarizer = commands::build_summarizer(&config, Some(AIClient::mock()));

    let result = commands::analyze_user(&store, "me", &config, &summarizer)
        .await
        .unwrap();
    assert_eq!(
        result.report.source,
        InsightSource::Generated {
            model: "mock".into()
        }
    );
}

#[tokio::test]
async fn test_analyze_new_challenge_is_welcome() {
    let (_dir, store) = setup_store();
    commands::cmd_init(&store, "me", None, Some("2024-03-01")).unwrap();
    let config = Config::default();
    let summarizer = commands::build_summarizer(&config, Some(AIClient::mock()));

    let result = commands::analyze_user(&store, "me", &config, &summarizer)
        .await
        .unwrap();
    assert_eq!(result.report.source, InsightSource::Welcome);
}

#[tokio::test]
async fn test_sample_insights_uses_loaded_generator_config() {
    let slow = || AIClient::Mock(MockBackend::new().with_delay(Duration::from_secs(3)));

    let short = Config::from_toml("[generator]\ntimeout_secs = 1").unwrap();
    assert!(commands::sample_insights(&short, slow()).await.is_err());

    let report = commands::sample_insights(&Config::default(), AIClient::mock())
        .await
        .unwrap();
    assert!(!report.insights.is_empty());
}

// ========== Export Tests ==========

#[test]
fn test_cmd_export_goals() {
    let (dir, store) = setup_challenge();
    let output = dir.path().join("goals.csv");
    commands::cmd_export(&store, "me", &Config::default(), "goals", &output, 50).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    // Header plus seven goals
    assert_eq!(content.lines().count(), 8);
    assert!(content.contains("3,Read,50.0"));
}

#[test]
fn test_cmd_export_history() {
    let (dir, store) = setup_challenge();
    let output = dir.path().join("history.csv");
    commands::cmd_export(&store, "me", &Config::default(), "history", &output, 20).unwrap();

    let content = std::fs::read_to_string(&output).unwrap();
    assert_eq!(content.lines().count(), 21);
}

#[test]
fn test_cmd_export_unknown_kind() {
    let (dir, store) = setup_challenge();
    let output = dir.path().join("out.csv");
    assert!(commands::cmd_export(&store, "me", &Config::default(), "receipts", &output, 5).is_err());
    assert!(!output.exists());
}

// ========== Helper Tests ==========

#[test]
fn test_bar() {
    assert_eq!(bar(0.0, 4), "░░░░");
    assert_eq!(bar(50.0, 4), "██░░");
    assert_eq!(bar(150.0, 4), "████");
}

#[test]
fn test_fixture_goals_match_defaults() {
    let labels: Vec<String> = test_utils::seven_goals()
        .into_iter()
        .map(|g| g.label)
        .collect();
    assert_eq!(labels, commands::DEFAULT_GOALS);
}
