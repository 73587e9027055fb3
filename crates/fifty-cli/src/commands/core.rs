//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_store` / `load_config` / `load_history` - Shared utilities
//! - `cmd_init` - Start a challenge cycle
//! - `cmd_punch` - Record a day's punch-in

use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use fifty_core::models::parse_date;
use fifty_core::{Config, History, JsonFileStore, PunchRecord, RecordStore, UserProfile};

/// Goals used when `init` is run without `--goals`
pub const DEFAULT_GOALS: [&str; 7] = [
    "Wake early",
    "Exercise",
    "Read",
    "Meditate",
    "Study",
    "Eat healthy",
    "Write",
];

pub fn open_store(path: &Path) -> JsonFileStore {
    JsonFileStore::new(path)
}

/// Explicit config path, else the user override, else built-in defaults
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => Config::load_from(p)
            .with_context(|| format!("Failed to load config from {}", p.display())),
        None => Config::load().context("Failed to load config"),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse an optional `--flag YYYY-MM-DD`, defaulting to today
pub fn date_or_today(value: Option<&str>, flag: &str) -> Result<NaiveDate> {
    match value {
        Some(v) => parse_date(v).with_context(|| format!("Invalid --{} date (use YYYY-MM-DD)", flag)),
        None => Ok(today()),
    }
}

/// Validated snapshot for a user
pub fn load_history(store: &JsonFileStore, user: &str) -> Result<History> {
    store.snapshot(user).with_context(|| {
        format!(
            "No challenge found for '{}' in {}. Run 'fifty init' first.",
            user,
            store.path().display()
        )
    })
}

/// Profile and its validated history from a single read
pub fn load_profile(store: &JsonFileStore, user: &str) -> Result<(UserProfile, History)> {
    let profile = store.profile(user).with_context(|| {
        format!(
            "No challenge found for '{}' in {}. Run 'fifty init' first.",
            user,
            store.path().display()
        )
    })?;
    let history = profile.history().context("Stored records are invalid")?;
    Ok((profile, history))
}

pub fn cmd_init(
    store: &JsonFileStore,
    user: &str,
    goals: Option<&str>,
    start: Option<&str>,
) -> Result<()> {
    let labels: Vec<String> = match goals {
        Some(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => DEFAULT_GOALS.iter().map(|s| s.to_string()).collect(),
    };
    let start = date_or_today(start, "start")?;

    let profile = store
        .start_cycle(user, &labels, start)
        .context("Failed to start challenge")?;

    println!("🎯 Started a 50-day challenge for {} on {}", user, start);
    println!();
    println!("Goals:");
    for goal in &profile.goals {
        println!("   {:>2}. {}", goal.id, goal.label);
    }
    println!();
    println!("Next steps:");
    println!("  1. Punch in: fifty punch --done 1,2,3");
    println!("  2. See how you're doing: fifty analyze");

    Ok(())
}

pub fn cmd_punch(
    store: &JsonFileStore,
    user: &str,
    date: Option<&str>,
    done: &[i64],
) -> Result<()> {
    let date = date_or_today(date, "date")?;
    let profile = store.profile(user).with_context(|| {
        format!("No challenge found for '{}'. Run 'fifty init' first.", user)
    })?;

    for id in done {
        if !profile.goals.iter().any(|g| g.id == *id) {
            bail!(
                "Unknown goal id {} (run 'fifty goals' to list goal ids)",
                id
            );
        }
    }

    let record = PunchRecord::from_pairs(
        date.to_string(),
        profile.goals.iter().map(|g| (g.id, done.contains(&g.id))),
    );
    let updated = store
        .upsert_record(user, record)
        .context("Failed to save punch-in")?;

    let completed = updated
        .goals
        .iter()
        .filter(|g| done.contains(&g.id))
        .count();
    println!(
        "✅ Punched in for {} (day {}): {}/{} goals",
        date,
        updated.day_of_cycle(date),
        completed,
        updated.goals.len()
    );
    let missed: Vec<&str> = updated
        .goals
        .iter()
        .filter(|g| !done.contains(&g.id))
        .map(|g| g.label.as_str())
        .collect();
    if missed.is_empty() {
        println!("   🔥 Every goal done today!");
    } else {
        println!("   Missed: {}", missed.join(", "));
    }

    Ok(())
}
