use std::collections::BTreeMap;

use crate::error::Result;
use crate::models::{
    Alert, AlertSubject, Area, AreaComparison, Comparison, ComparisonInsights, Direction,
    PeriodSummary, Record, Severity,
};
use crate::period::PeriodSelector;
use crate::stats::{self, AnalysisOptions};

const NEUTRAL_BAND_PCT: f64 = 5.0;
const ALERT_DROP_PCT: f64 = -10.0;
const HIGH_DROP_PCT: f64 = -20.0;

/// Percentage change from `before` to `after`. A zero baseline yields 0
/// when both are zero and 100 otherwise.
pub fn variation_pct(before: f64, after: f64) -> f64 {
    if before > 0.0 {
        (after - before) / before * 100.0
    } else if after == 0.0 {
        0.0
    } else {
        100.0
    }
}

pub fn direction(variation_pct: f64) -> Direction {
    if variation_pct.abs() < NEUTRAL_BAND_PCT {
        Direction::Neutral
    } else if variation_pct > 0.0 {
        Direction::Positive
    } else {
        Direction::Negative
    }
}

/// Analyze both periods and compare every area present in both.
pub fn compare(
    records: &[Record],
    first: &PeriodSelector,
    second: &PeriodSelector,
    options: &AnalysisOptions,
) -> Result<Comparison> {
    let before = stats::analyze(records, first, options)?;
    let after = stats::analyze(records, second, options)?;

    let mut areas = BTreeMap::new();
    let mut alerts = Vec::new();

    for (area, stats_before) in &before.areas {
        let Some(stats_after) = after.areas.get(area) else {
            continue;
        };
        let pct = variation_pct(stats_before.mean, stats_after.mean);

        if pct <= ALERT_DROP_PCT {
            alerts.push(Alert {
                subject: AlertSubject::Area(*area),
                severity: if pct <= HIGH_DROP_PCT {
                    Severity::High
                } else {
                    Severity::Medium
                },
                message: format!(
                    "Alert: {area} dropped {:.1}% in average satisfaction.",
                    pct.abs()
                ),
            });
        }

        areas.insert(
            *area,
            AreaComparison {
                before: stats_before.clone(),
                after: stats_after.clone(),
                variation_pct: pct,
                direction: direction(pct),
            },
        );
    }

    Ok(Comparison {
        first: PeriodSummary {
            period: *first,
            count: before.count,
        },
        second: PeriodSummary {
            period: *second,
            count: after.count,
        },
        areas,
        alerts,
    })
}

fn area_phrase(area: Area, direction: Direction, var: f64) -> String {
    match (area, direction) {
        (Area::Leadership, Direction::Positive) => format!(
            "Perception of leadership improved significantly over the period, with average satisfaction up {var:.1}%."
        ),
        (Area::Leadership, Direction::Negative) => format!(
            "Leadership ratings fell {var:.1}%, pointing to possible communication or management failures."
        ),
        (Area::Leadership, Direction::Neutral) => {
            "Leadership remained stable over the period, with no significant change in satisfaction.".to_string()
        }
        (Area::Compensation, Direction::Positive) => format!(
            "Compensation was one of the main positives, with the average rating growing {var:.1}%."
        ),
        (Area::Compensation, Direction::Negative) => format!(
            "Compensation was the most critical point, with average satisfaction down {var:.1}%."
        ),
        (Area::Compensation, Direction::Neutral) => {
            "Perception of compensation held steady, with no relevant sign of improvement or decline.".to_string()
        }
        (Area::Communication, Direction::Positive) => format!(
            "Internal communication became clearer and more transparent, with ratings up {var:.1}%."
        ),
        (Area::Communication, Direction::Negative) => format!(
            "Communication was a sensitive area, with indicators down {var:.1}%; a possible focus for intervention."
        ),
        (Area::Communication, Direction::Neutral) => {
            "The data show stable ratings for corporate communication.".to_string()
        }
        (Area::Benefits, Direction::Positive) => format!(
            "Benefits were rated better this period, with the average score up {var:.1}%."
        ),
        (Area::Benefits, Direction::Negative) => format!(
            "Benefits ratings dropped {var:.1}%, which may signal dissatisfaction with changes or a perceived loss of value."
        ),
        (Area::Benefits, Direction::Neutral) => {
            "Benefits kept a stable perception, without major changes.".to_string()
        }
        (Area::Culture, Direction::Positive) => format!(
            "Organizational culture was perceived more positively, with overall ratings up {var:.1}%."
        ),
        (Area::Culture, Direction::Negative) => format!(
            "Perception of organizational culture fell {var:.1}%, suggesting a possible misalignment of values."
        ),
        (Area::Culture, Direction::Neutral) => {
            "Organizational culture was rated consistently, keeping the previous level of perception.".to_string()
        }
        (Area::Relationship, Direction::Positive) => format!(
            "Relationships between colleagues were rated better this period, up {var:.1}%."
        ),
        (Area::Relationship, Direction::Negative) => format!(
            "Ratings of relationships with colleagues fell {var:.1}%, which may signal internal tension."
        ),
        (Area::Relationship, Direction::Neutral) => {
            "Relationships with colleagues stayed in line with previous periods, without major swings.".to_string()
        }
    }
}

/// Natural-language summary of a comparison.
pub fn generate_comparison_insights(comparison: &Comparison) -> ComparisonInsights {
    let areas = comparison
        .areas
        .iter()
        .map(|(area, c)| (*area, area_phrase(*area, c.direction, c.variation_pct.abs())))
        .collect();

    let mut improved = 0usize;
    let mut declined = 0usize;
    let mut top_gain: Option<(Area, f64)> = None;
    let mut top_drop: Option<(Area, f64)> = None;

    for (area, c) in &comparison.areas {
        match c.direction {
            Direction::Positive => {
                improved += 1;
                if top_gain.map_or(true, |(_, v)| c.variation_pct > v) {
                    top_gain = Some((*area, c.variation_pct));
                }
            }
            Direction::Negative => {
                declined += 1;
                if top_drop.map_or(true, |(_, v)| c.variation_pct < v) {
                    top_drop = Some((*area, c.variation_pct));
                }
            }
            Direction::Neutral => {}
        }
    }

    let overall = if improved > declined {
        format!("Ratings trended upward overall, with {improved} area(s) improving.")
    } else if declined > improved {
        format!("Ratings trended downward overall, with {declined} area(s) declining.")
    } else {
        "The period showed a balance between improvements and declines across areas.".to_string()
    };

    ComparisonInsights {
        areas,
        overall,
        max_positive: top_gain.map(|(area, v)| {
            format!("{area} showed the largest improvement, with satisfaction up {v:.1}%.")
        }),
        max_negative: top_drop.map(|(area, v)| {
            format!(
                "{area} showed the largest decline, with satisfaction down {:.1}%.",
                v.abs()
            )
        }),
    }
}
