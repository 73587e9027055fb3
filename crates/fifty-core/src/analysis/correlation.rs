//! Correlation engine
//!
//! Pairwise association between goals. Pearson correlation over the days
//! both goals were tracked when there are enough of them, otherwise a
//! similarity score built from the goals' summary metrics.

use std::cmp::Ordering;

use tracing::trace;

use crate::models::GoalSeries;

use super::types::{CorrelationMethod, CorrelationPair, GoalPerformance};

/// Aligned samples needed before Pearson is attempted
pub const MIN_ALIGNED_SAMPLES: usize = 3;

/// One pair per unordered combination of tracked goals
///
/// Performances with no tracked days are skipped. Pairs follow the order of
/// `performances`; `series` is looked up by goal id and may be empty, in
/// which case every pair falls back to the heuristic.
pub fn correlations(performances: &[GoalPerformance], series: &[GoalSeries]) -> Vec<CorrelationPair> {
    let tracked: Vec<&GoalPerformance> = performances.iter().filter(|p| p.is_tracked()).collect();
    let lookup = |id| series.iter().find(|s| s.goal_id == id);

    let mut pairs = Vec::with_capacity(tracked.len() * tracked.len().saturating_sub(1) / 2);
    for (i, a) in tracked.iter().enumerate() {
        for b in &tracked[i + 1..] {
            let aligned = match (lookup(a.goal_id), lookup(b.goal_id)) {
                (Some(sa), Some(sb)) => align(sa, sb),
                _ => Vec::new(),
            };
            pairs.push(correlate(a, b, &aligned));
        }
    }
    pairs
}

fn correlate(a: &GoalPerformance, b: &GoalPerformance, aligned: &[(f64, f64)]) -> CorrelationPair {
    let sample_size = aligned.len() as u32;
    let pearson = (aligned.len() >= MIN_ALIGNED_SAMPLES)
        .then(|| pearson(aligned))
        .flatten();

    let (coefficient, significance, method) = match pearson {
        Some(r) => (r, correlation_p_value(r, aligned.len()), CorrelationMethod::Pearson),
        None => (heuristic(a, b), 1.0, CorrelationMethod::Heuristic),
    };

    trace!(
        goal_a = a.goal_id,
        goal_b = b.goal_id,
        coefficient,
        significance,
        method = %method,
        "Correlated goals"
    );

    CorrelationPair {
        goal_a: a.goal_id,
        goal_b: b.goal_id,
        goal_a_name: a.goal_name.clone(),
        goal_b_name: b.goal_name.clone(),
        coefficient,
        significance,
        sample_size,
        method,
    }
}

/// 0/1 outcome pairs for the dates both series share
fn align(a: &GoalSeries, b: &GoalSeries) -> Vec<(f64, f64)> {
    let as_f64 = |done: bool| if done { 1.0 } else { 0.0 };
    let mut out = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.days.len() && j < b.days.len() {
        let (da, va) = a.days[i];
        let (db, vb) = b.days[j];
        match da.cmp(&db) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push((as_f64(va), as_f64(vb)));
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Pearson r, or None when either side has zero variance
fn pearson(samples: &[(f64, f64)]) -> Option<f64> {
    let n = samples.len() as f64;
    let mean_x = samples.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = samples.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in samples {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f64::EPSILON || var_y <= f64::EPSILON {
        return None;
    }
    Some((cov / (var_x * var_y).sqrt()).clamp(-1.0, 1.0))
}

/// Two-tailed p-value for r with n samples (t statistic, normal approximation)
fn correlation_p_value(r: f64, n: usize) -> f64 {
    let df = n.saturating_sub(2);
    if df == 0 {
        return 1.0;
    }
    let denom = 1.0 - r * r;
    if denom <= 1e-12 {
        return 0.0;
    }
    let t = r * (df as f64 / denom).sqrt();
    t_test_p_value(t.abs(), df).clamp(0.0, 1.0)
}

fn t_test_p_value(t_stat: f64, df: usize) -> f64 {
    let z = t_stat / (1.0 + t_stat * t_stat / (4.0 * df as f64)).sqrt();
    2.0 * (1.0 - standard_normal_cdf(z.abs()))
}

/// Abramowitz and Stegun approximation
fn standard_normal_cdf(x: f64) -> f64 {
    let ax = x.abs();
    let t = 1.0 / 0.231_641_9f64.mul_add(ax, 1.0);
    let poly = t * t.mul_add(
        t.mul_add(
            t.mul_add(t.mul_add(1.330_274_429, -1.821_255_978), 1.781_477_937),
            -0.356_563_782,
        ),
        0.319_381_530,
    );
    let upper = 0.398_942_3 * (-0.5 * ax * ax).exp() * poly;
    if x >= 0.0 {
        1.0 - upper
    } else {
        upper
    }
}

/// Similarity of completion rate, consistency and trend mapped onto [-1, 1]
fn heuristic(a: &GoalPerformance, b: &GoalPerformance) -> f64 {
    let similarity = 1.0
        - ((a.completion_rate - b.completion_rate).abs() + (a.consistency - b.consistency).abs())
            / 200.0
        - (a.trend - b.trend).abs() / 400.0;
    (2.0 * similarity.clamp(0.0, 1.0) - 1.0).clamp(-1.0, 1.0)
}
