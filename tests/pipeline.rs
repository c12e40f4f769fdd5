use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use exit_interview_insights::insights::{generate_alerts, generate_insights};
use exit_interview_insights::models::{AlertSubject, Sentiment, Severity};
use exit_interview_insights::{
    compare, stats, AnalysisOptions, Area, PeriodSelector, RecordStore,
};

const HEADER: &str =
    "data_desligamento,lideranca,remuneracao,comunicacao,beneficios,cultura,relacionamento,comentarios";

fn write_batch(dir: &Path, name: &str, rows: usize, date: &str, score: u8, comment: &str) {
    let mut body = String::from(HEADER);
    body.push('\n');
    for _ in 0..rows {
        body.push_str(&format!("{date},{score},3,3,3,3,3,{comment}\n"));
    }
    fs::write(dir.join(name), body).expect("write fixture");
}

#[test]
fn pooled_files_produce_exact_month_statistics() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_batch(dir.path(), "high.csv", 10, "2024-05-03", 5, "Ótimo ambiente de trabalho");
    write_batch(dir.path(), "low.csv", 5, "2024-05-20", 1, "Chefe péssimo e ambiente ruim");

    let store = RecordStore::new(dir.path());
    let table = store.load(false).expect("table");
    let selector = PeriodSelector::parse("month", "5").expect("selector");
    let analysis = stats::analyze(&table.records, &selector, &AnalysisOptions::default())
        .expect("analysis");

    assert_eq!(analysis.count, 15);
    let leadership = &analysis.areas[&Area::Leadership];
    // (10 x 5 + 5 x 1) / 15
    assert!((leadership.mean - 55.0 / 15.0).abs() < 1e-9);
    assert_eq!(leadership.distribution, BTreeMap::from([(1, 5), (5, 10)]));
    assert_eq!(leadership.filled_distribution(), [5, 0, 0, 0, 10]);
    assert_eq!(leadership.mode, 5);

    assert_eq!(analysis.sentiment_count(Sentiment::Positive), 10);
    assert_eq!(analysis.sentiment_count(Sentiment::Negative), 5);
    let ambiente = analysis
        .keywords
        .iter()
        .find(|k| k.term == "ambiente")
        .expect("ambiente keyword");
    assert_eq!(ambiente.count, 15);

    let insights = generate_insights(&analysis);
    assert!(insights.areas[0].1.contains("moderate level"));
    assert!(insights.comments.expect("comment insight").starts_with("66.7%"));

    let alerts = generate_alerts(&analysis, 3.0);
    assert!(alerts.iter().all(|a| a.subject != AlertSubject::Area(Area::Leadership)));
}

#[test]
fn comparison_across_months_flags_decline() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_batch(dir.path(), "march.csv", 4, "2024-03-10", 4, "");
    write_batch(dir.path(), "april.csv", 4, "2024-04-10", 2, "Problema com a gestão");

    let table = RecordStore::new(dir.path()).load(false).expect("table");
    let march = PeriodSelector::parse("month", "3").expect("selector");
    let april = PeriodSelector::parse("month", "4").expect("selector");
    let comparison = compare::compare(&table.records, &march, &april, &AnalysisOptions::default())
        .expect("comparison");

    let leadership = &comparison.areas[&Area::Leadership];
    assert_eq!(leadership.variation_pct, -50.0);
    assert_eq!(comparison.alerts.len(), 1);
    assert_eq!(comparison.alerts[0].severity, Severity::High);

    let insights = compare::generate_comparison_insights(&comparison);
    assert!(insights.overall.contains("downward"));
    assert!(insights.max_positive.is_none());
    assert!(insights
        .max_negative
        .expect("largest decline")
        .starts_with("Leadership"));

    let quarter = PeriodSelector::parse("quarter", "2").expect("selector");
    let missing = PeriodSelector::parse("quarter", "4").expect("selector");
    let err = compare::compare(&table.records, &quarter, &missing, &AnalysisOptions::default())
        .expect_err("no data for Q4");
    assert!(err.is_unavailable());
}

#[test]
fn reload_picks_up_new_files_only_on_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_batch(dir.path(), "a.csv", 2, "2024-01-10", 3, "");
    let store = RecordStore::new(dir.path());
    assert_eq!(store.load(false).expect("table").len(), 2);

    write_batch(dir.path(), "b.csv", 3, "2023-12-01", 3, "");
    assert_eq!(store.load(false).expect("cached").len(), 2);

    let reloaded = store.reload().expect("reloaded");
    assert_eq!(reloaded.len(), 5);
    assert_eq!(reloaded.records[0].year, 2023);
    assert_eq!(store.current().expect("published").id, reloaded.id);
}
