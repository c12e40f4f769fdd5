use crate::models::{Alert, AlertSubject, Analysis, Insights, Sentiment, Severity};

pub const DEFAULT_ALERT_THRESHOLD: f64 = 3.0;

const HIGH_SATISFACTION: f64 = 4.0;
const MODERATE_SATISFACTION: f64 = 3.0;
const HIGH_SEVERITY_MEAN: f64 = 2.5;
const MAJORITY_PERCENT: f64 = 50.0;
const NEGATIVE_HIGH_PERCENT: f64 = 60.0;
const NEGATIVE_MEDIUM_PERCENT: f64 = 40.0;

/// One sentence per area plus a summary of comment sentiment.
pub fn generate_insights(analysis: &Analysis) -> Insights {
    let areas = analysis
        .areas
        .iter()
        .map(|(area, stats)| {
            let mean = stats.mean;
            let text = if mean >= HIGH_SATISFACTION {
                format!("{area} shows a high level of satisfaction, with an average of {mean:.1}.")
            } else if mean >= MODERATE_SATISFACTION {
                format!("{area} shows a moderate level of satisfaction, with an average of {mean:.1}.")
            } else {
                format!(
                    "{area} shows a low level of satisfaction, with an average of {mean:.1}. Requires attention."
                )
            };
            (*area, text)
        })
        .collect();

    let comments = match (
        analysis.sentiment_percent(Sentiment::Positive),
        analysis.sentiment_percent(Sentiment::Negative),
    ) {
        (Some(positive), _) if positive > MAJORITY_PERCENT => Some(format!(
            "{positive:.1}% of comments are positive, indicating a good overall perception."
        )),
        (_, Some(negative)) if negative > MAJORITY_PERCENT => Some(format!(
            "{negative:.1}% of comments are negative, indicating a need for improvement."
        )),
        (Some(_), Some(_)) => Some(
            "Comments show a balance between positive and negative perceptions.".to_string(),
        ),
        _ => None,
    };

    Insights { areas, comments }
}

/// Alerts for areas averaging below `threshold` and for a high share of
/// negative comments.
pub fn generate_alerts(analysis: &Analysis, threshold: f64) -> Vec<Alert> {
    let mut alerts: Vec<Alert> = analysis
        .areas
        .iter()
        .filter(|(_, stats)| stats.mean < threshold)
        .map(|(area, stats)| Alert {
            subject: AlertSubject::Area(*area),
            severity: if stats.mean < HIGH_SEVERITY_MEAN {
                Severity::High
            } else {
                Severity::Medium
            },
            message: format!(
                "Alert: {area} has a low satisfaction average ({:.1}).",
                stats.mean
            ),
        })
        .collect();

    if let Some(negative) = analysis.sentiment_percent(Sentiment::Negative) {
        let severity = if negative > NEGATIVE_HIGH_PERCENT {
            Some(Severity::High)
        } else if negative > NEGATIVE_MEDIUM_PERCENT {
            Some(Severity::Medium)
        } else {
            None
        };
        if let Some(severity) = severity {
            alerts.push(Alert {
                subject: AlertSubject::Comments,
                severity,
                message: format!("Alert: {negative:.1}% of comments are negative."),
            });
        }
    }

    alerts
}
