//! Analytics command implementations

use anyhow::{bail, Context, Result};
use fifty_core::ai::AIClient;
use fifty_core::analysis::{AnalysisBundle, WEEKDAYS};
use fifty_core::insights::{InsightContext, InsightReport};
use fifty_core::{
    advanced_summary, AdvancedSummary, Config, GoalId, HabitAnalyzer, History, InsightSummarizer,
    JsonFileStore,
};

use super::{bar, build_summarizer, date_or_today, load_history, load_profile};

fn goal_names(history: &History, ids: &[GoalId]) -> String {
    if ids.is_empty() {
        return "-".to_string();
    }
    ids.iter()
        .map(|id| {
            history
                .goal(*id)
                .map(|g| g.label.clone())
                .unwrap_or_else(|| format!("#{}", id))
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn cmd_stats(store: &JsonFileStore, user: &str, config: &Config) -> Result<()> {
    let (profile, history) = load_profile(store, user)?;
    let analysis = HabitAnalyzer::with_config(config).habit_analysis(&history);

    println!("📊 Challenge stats for {}", user);
    println!("   ─────────────────────────────");
    println!(
        "   Cycle:            started {} (day {})",
        profile.cycle_start, profile.current_day
    );
    println!("   Days recorded:    {}", analysis.total_days);
    println!("   Perfect days:     {}", analysis.completed_days);
    println!("   Completion rate:  {:.1}%", analysis.completion_rate);
    println!("   Current streak:   {} days", analysis.streak_days);
    println!("   Predicted success: {:.1}%", analysis.predicted_success);
    println!();
    println!(
        "   💪 Best goals:       {}",
        goal_names(&history, &analysis.best_performing_goals)
    );
    println!(
        "   🐢 Struggling goals: {}",
        goal_names(&history, &analysis.struggling_goals)
    );
    println!();
    println!("   Weekly pattern:");
    for (idx, day) in WEEKDAYS.iter().enumerate() {
        let rate = analysis.weekly_pattern[idx];
        println!(
            "   {:<10} {} {:>5.1}% ({} days)",
            day,
            bar(rate, 20),
            rate,
            analysis.weekly_observations[idx]
        );
    }

    Ok(())
}

/// Everything `analyze` shows
pub struct AnalyzeResult {
    pub bundle: AnalysisBundle,
    pub highlights: AdvancedSummary,
    pub report: InsightReport,
}

/// Run the analytics and the summarizer on one snapshot
pub async fn analyze_user(
    store: &JsonFileStore,
    user: &str,
    config: &Config,
    summarizer: &InsightSummarizer,
) -> Result<AnalyzeResult> {
    let (profile, history) = load_profile(store, user)?;
    let bundle = HabitAnalyzer::with_config(config).full_report(&history);
    let highlights = advanced_summary(&bundle.performances, &bundle.correlations, &bundle.formations);

    let ctx = InsightContext::new(&bundle.analysis, history.goals())
        .with_cycle(profile.cycle_start, profile.current_day)
        .with_highlights(&highlights);
    let report = summarizer.summarize(&ctx).await;

    Ok(AnalyzeResult {
        bundle,
        highlights,
        report,
    })
}

pub async fn cmd_analyze(
    store: &JsonFileStore,
    user: &str,
    config: &Config,
    no_ai: bool,
    json: bool,
) -> Result<()> {
    let client = if no_ai { None } else { AIClient::from_env() };
    let summarizer = build_summarizer(config, client);
    let result = analyze_user(store, user, config, &summarizer).await?;

    if json {
        let output = serde_json::json!({
            "analysis": result.bundle.analysis,
            "goal_performance": result.bundle.performances,
            "correlations": result.bundle.correlations,
            "habit_formation": result.bundle.formations,
            "highlights": result.highlights,
            "insights": result.report,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize analysis")?
        );
        return Ok(());
    }

    let analysis = &result.bundle.analysis;
    println!("📊 Habit analysis");
    println!("   ─────────────────────────────");
    println!(
        "   Completion {:.1}% · streak {} · predicted {:.1}%",
        analysis.completion_rate, analysis.streak_days, analysis.predicted_success
    );

    println!();
    println!("💡 Insights ({})", result.report.source);
    for insight in result.report.by_priority() {
        println!("   [{}] {} (priority {})", insight.kind, insight.title, insight.priority);
        println!("       {}", insight.content);
    }

    println!();
    println!("📝 Recommendations");
    for (idx, rec) in result
        .report
        .recommendations
        .iter()
        .chain(result.highlights.recommendations.iter())
        .enumerate()
    {
        println!("   {}. {}", idx + 1, rec);
    }

    let highlights = result.highlights.describe();
    if !highlights.is_empty() {
        println!();
        println!("⭐ Highlights");
        for line in highlights.lines() {
            println!("   {}", line);
        }
    }

    println!();
    println!("💬 {}", result.report.motivational_message);

    Ok(())
}

pub fn cmd_goals(store: &JsonFileStore, user: &str, config: &Config) -> Result<()> {
    let history = load_history(store, user)?;
    let performances = HabitAnalyzer::with_config(config).goal_performances(&history);

    println!(
        "{:>3}  {:<20} {:>7} {:>7} {:>7} {:>7} {:>6}",
        "ID", "GOAL", "RATE", "RECENT", "CONSIST", "TREND", "BEST"
    );
    println!("{}", "─".repeat(64));
    for perf in &performances {
        if !perf.is_tracked() {
            println!("{:>3}  {:<20} {:>7}", perf.goal_id, perf.goal_name, "-");
            continue;
        }
        println!(
            "{:>3}  {:<20} {:>6.1}% {:>6.1}% {:>6.1}% {:>+7.1} {:>6}",
            perf.goal_id,
            perf.goal_name,
            perf.completion_rate,
            perf.recent_rate,
            perf.consistency,
            perf.trend,
            perf.longest_streak
        );
    }

    Ok(())
}

pub fn cmd_correlations(store: &JsonFileStore, user: &str, config: &Config) -> Result<()> {
    let history = load_history(store, user)?;
    let analyzer = HabitAnalyzer::with_config(config);
    let performances = analyzer.goal_performances(&history);
    let pairs = analyzer.correlations(&performances, &history.all_goal_series());

    if pairs.is_empty() {
        println!("Not enough tracked goals to correlate yet.");
        return Ok(());
    }

    println!(
        "{:<20} {:<20} {:>7} {:>8} {:>4}  {}",
        "GOAL A", "GOAL B", "COEFF", "P", "N", "METHOD"
    );
    println!("{}", "─".repeat(72));
    for pair in &pairs {
        println!(
            "{:<20} {:<20} {:>+7.2} {:>8.4} {:>4}  {}",
            pair.goal_a_name,
            pair.goal_b_name,
            pair.coefficient,
            pair.significance,
            pair.sample_size,
            pair.method
        );
    }

    Ok(())
}

pub fn cmd_formation(
    store: &JsonFileStore,
    user: &str,
    config: &Config,
    goal: Option<GoalId>,
) -> Result<()> {
    let history = load_history(store, user)?;
    let analyzer = HabitAnalyzer::with_config(config);

    let Some(id) = goal else {
        let formations = analyzer.habit_formation(&history.all_goal_series());
        println!(
            "{:>3}  {:<20} {:>5} {:<12} {:>8} {:>10}",
            "ID", "GOAL", "DAYS", "STAGE", "STRENGTH", "ESTABLISH"
        );
        println!("{}", "─".repeat(64));
        for f in &formations {
            println!(
                "{:>3}  {:<20} {:>5} {:<12} {:>8.1} {:>7} d",
                f.goal_id,
                f.goal_name,
                f.data.len(),
                f.current_stage.as_str(),
                f.strength_score,
                f.days_to_establish
            );
        }
        return Ok(());
    };

    let Some(definition) = history.goal(id) else {
        bail!("Unknown goal id {}", id);
    };
    let series = history.goal_series(definition);
    let formation = analyzer.habit_formation(std::slice::from_ref(&series));
    let Some(f) = formation.first() else {
        bail!("No formation data for goal {}", id);
    };

    println!(
        "🌱 {} - {} (strength {:.1}, ~{} days to establish)",
        f.goal_name, f.current_stage, f.strength_score, f.days_to_establish
    );
    if f.data.is_empty() {
        println!("   No punch-ins for this goal yet.");
        return Ok(());
    }
    println!(
        "   {:>4} {:>8} {:>8} {:>8} {:>8}  {}",
        "DAY", "CONSIST", "AUTO", "DIFF", "MOTIV", "STAGE"
    );
    for day in &f.data {
        println!(
            "   {:>4} {:>8.1} {:>8.1} {:>8.1} {:>8.1}  {}",
            day.day, day.consistency, day.automaticity, day.difficulty, day.motivation, day.stage
        );
    }

    Ok(())
}

pub fn cmd_history(
    store: &JsonFileStore,
    user: &str,
    config: &Config,
    days: u32,
    end: Option<&str>,
) -> Result<()> {
    let history = load_history(store, user)?;
    let end = date_or_today(end, "end")?;
    let rows = HabitAnalyzer::with_config(config).daily_history(&history, end, days);

    for row in &rows {
        if row.has_record {
            println!(
                "{} {} {} {}/{}",
                row.date,
                row.date.format("%a"),
                bar(row.completion_rate, 14),
                row.completed,
                row.total_goals
            );
        } else {
            println!("{} {} {} -", row.date, row.date.format("%a"), bar(0.0, 14));
        }
    }

    Ok(())
}
