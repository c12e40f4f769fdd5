use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{AnalyticsError, Result};
use crate::models::{Analysis, Area, AreaStats, RankedArea, Record};
use crate::period::{self, PeriodSelector};
use crate::text;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisOptions {
    pub min_keyword_freq: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            min_keyword_freq: text::DEFAULT_MIN_FREQ,
        }
    }
}

pub fn mean(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| *v as f64).sum::<f64>() / values.len() as f64
}

pub fn median(values: &[u8]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    if n % 2 == 1 {
        sorted[n / 2] as f64
    } else {
        (sorted[n / 2 - 1] as f64 + sorted[n / 2] as f64) / 2.0
    }
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std_dev(values: &[u8]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let sum_sq: f64 = values.iter().map(|v| (*v as f64 - m).powi(2)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

fn distribution(values: &[u8]) -> BTreeMap<u8, usize> {
    let mut counts = BTreeMap::new();
    for v in values {
        *counts.entry(*v).or_insert(0) += 1;
    }
    counts
}

fn summarize(values: &[u8]) -> Option<AreaStats> {
    let min = *values.iter().min()?;
    let max = *values.iter().max()?;
    let distribution = distribution(values);

    // Ties resolve to the smallest rating since the map iterates ascending.
    let mut mode = min;
    let mut best = 0usize;
    for (rating, count) in &distribution {
        if *count > best {
            best = *count;
            mode = *rating;
        }
    }

    Some(AreaStats {
        mean: mean(values),
        median: median(values),
        mode,
        std_dev: sample_std_dev(values),
        min,
        max,
        distribution,
    })
}

/// Per-area statistics over the given records. Areas with no ratings in
/// the subset are omitted.
pub fn compute_area_stats(records: &[&Record]) -> BTreeMap<Area, AreaStats> {
    let mut out = BTreeMap::new();
    for area in Area::ALL {
        let values: Vec<u8> = records.iter().filter_map(|r| r.score(area)).collect();
        if let Some(stats) = summarize(&values) {
            out.insert(area, stats);
        }
    }
    out
}

/// Unweighted mean of the per-area means.
pub fn overall_mean(areas: &BTreeMap<Area, AreaStats>) -> f64 {
    if areas.is_empty() {
        return 0.0;
    }
    areas.values().map(|s| s.mean).sum::<f64>() / areas.len() as f64
}

/// Areas ranked by mean, best first and worst first. Equal means keep area
/// order in both lists.
pub fn rank_areas(areas: &BTreeMap<Area, AreaStats>) -> (Vec<RankedArea>, Vec<RankedArea>) {
    let ranked: Vec<RankedArea> = areas
        .iter()
        .map(|(area, stats)| RankedArea {
            area: *area,
            mean: stats.mean,
        })
        .collect();

    let mut best = ranked.clone();
    best.sort_by(|a, b| b.mean.partial_cmp(&a.mean).unwrap_or(Ordering::Equal));
    let mut worst = ranked;
    worst.sort_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap_or(Ordering::Equal));
    (best, worst)
}

/// Filter `records` to `selector` and run the statistics and text engines.
pub fn analyze(
    records: &[Record],
    selector: &PeriodSelector,
    options: &AnalysisOptions,
) -> Result<Analysis> {
    let subset = period::filter(records, selector);
    if subset.is_empty() {
        return Err(AnalyticsError::NoData(selector.to_string()));
    }

    let areas = compute_area_stats(&subset);
    let comments: Vec<&str> = subset.iter().filter_map(|r| r.comment.as_deref()).collect();
    let (best_categories, worst_categories) = rank_areas(&areas);

    Ok(Analysis {
        count: subset.len(),
        period: *selector,
        overall_mean: overall_mean(&areas),
        keywords: text::extract_keywords(comments.iter().copied(), options.min_keyword_freq),
        comments: text::score_comments(comments.iter().copied()),
        areas,
        best_categories,
        worst_categories,
    })
}
