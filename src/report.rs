use std::fmt::Write;

use crate::compare;
use crate::insights;
use crate::models::{Analysis, Comparison, Sentiment};

#[derive(Debug, Clone, PartialEq)]
pub struct SentimentSummary {
    pub sentiment: Sentiment,
    pub count: usize,
    pub percent: f64,
}

pub fn summarize_sentiment(analysis: &Analysis) -> Vec<SentimentSummary> {
    [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative]
        .into_iter()
        .map(|sentiment| SentimentSummary {
            sentiment,
            count: analysis.sentiment_count(sentiment),
            percent: analysis.sentiment_percent(sentiment).unwrap_or(0.0),
        })
        .collect()
}

fn sentiment_label(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Positive => "Positive",
        Sentiment::Neutral => "Neutral",
        Sentiment::Negative => "Negative",
    }
}

pub fn build_analysis_report(analysis: &Analysis, alert_threshold: f64) -> String {
    let insights = insights::generate_insights(analysis);
    let alerts = insights::generate_alerts(analysis, alert_threshold);
    let mut output = String::new();

    let _ = writeln!(output, "# Exit Interview Report");
    let _ = writeln!(
        output,
        "Generated for {} ({} interviews, overall average {:.2})",
        analysis.period, analysis.count, analysis.overall_mean
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Area Statistics");
    let _ = writeln!(output, "| Area | Mean | Median | Mode | Std dev | Min | Max | 1 | 2 | 3 | 4 | 5 |");
    let _ = writeln!(output, "|---|---|---|---|---|---|---|---|---|---|---|---|");
    for (area, stats) in &analysis.areas {
        let std_dev = stats
            .std_dev
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".to_string());
        let dist = stats.filled_distribution();
        let _ = writeln!(
            output,
            "| {} | {:.2} | {:.1} | {} | {} | {} | {} | {} | {} | {} | {} | {} |",
            area,
            stats.mean,
            stats.median,
            stats.mode,
            std_dev,
            stats.min,
            stats.max,
            dist[0],
            dist[1],
            dist[2],
            dist[3],
            dist[4]
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Ranking");
    for (position, ranked) in analysis.best_categories.iter().enumerate() {
        let _ = writeln!(output, "{}. {} ({:.2})", position + 1, ranked.area, ranked.mean);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for (_, text) in &insights.areas {
        let _ = writeln!(output, "- {text}");
    }
    if let Some(text) = &insights.comments {
        let _ = writeln!(output, "- {text}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alerts");
    if alerts.is_empty() {
        let _ = writeln!(output, "No alerts for this period.");
    } else {
        for alert in &alerts {
            let _ = writeln!(output, "- [{}] {}", alert.severity, alert.message);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Keywords");
    if analysis.keywords.is_empty() {
        let _ = writeln!(output, "No recurring keywords in comments.");
    } else {
        for keyword in analysis.keywords.iter().take(15) {
            let _ = writeln!(output, "- {}: {}", keyword.term, keyword.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Comment Sentiment");
    if analysis.comments.is_empty() {
        let _ = writeln!(output, "No comments recorded for this period.");
    } else {
        for summary in summarize_sentiment(analysis) {
            let _ = writeln!(
                output,
                "- {}: {} ({:.1}%)",
                sentiment_label(summary.sentiment),
                summary.count,
                summary.percent
            );
        }
    }

    output
}

pub fn build_comparison_report(comparison: &Comparison) -> String {
    let insights = compare::generate_comparison_insights(comparison);
    let mut output = String::new();

    let _ = writeln!(output, "# Exit Interview Comparison");
    let _ = writeln!(
        output,
        "Comparing {} ({} interviews) with {} ({} interviews)",
        comparison.first.period,
        comparison.first.count,
        comparison.second.period,
        comparison.second.count
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Variation by Area");
    let _ = writeln!(output, "| Area | Before | After | Variation | Direction |");
    let _ = writeln!(output, "|---|---|---|---|---|");
    for (area, c) in &comparison.areas {
        let _ = writeln!(
            output,
            "| {} | {:.2} | {:.2} | {:+.1}% | {} |",
            area, c.before.mean, c.after.mean, c.variation_pct, c.direction
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Insights");
    for (_, text) in &insights.areas {
        let _ = writeln!(output, "- {text}");
    }
    let _ = writeln!(output, "- {}", insights.overall);
    for text in insights.max_positive.iter().chain(insights.max_negative.iter()) {
        let _ = writeln!(output, "- {text}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Alerts");
    if comparison.alerts.is_empty() {
        let _ = writeln!(output, "No significant drops between periods.");
    } else {
        for alert in &comparison.alerts {
            let _ = writeln!(output, "- [{}] {}", alert.severity, alert.message);
        }
    }

    output
}
