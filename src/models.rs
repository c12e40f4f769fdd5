use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::period::PeriodSelector;

/// The six fixed satisfaction areas, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Area {
    #[serde(rename = "lideranca")]
    Leadership,
    #[serde(rename = "remuneracao")]
    Compensation,
    #[serde(rename = "comunicacao")]
    Communication,
    #[serde(rename = "beneficios")]
    Benefits,
    #[serde(rename = "cultura")]
    Culture,
    #[serde(rename = "relacionamento")]
    Relationship,
}

impl Area {
    pub const ALL: [Area; 6] = [
        Area::Leadership,
        Area::Compensation,
        Area::Communication,
        Area::Benefits,
        Area::Culture,
        Area::Relationship,
    ];

    /// Column name used by the source files.
    pub fn column(self) -> &'static str {
        match self {
            Area::Leadership => "lideranca",
            Area::Compensation => "remuneracao",
            Area::Communication => "comunicacao",
            Area::Benefits => "beneficios",
            Area::Culture => "cultura",
            Area::Relationship => "relacionamento",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Area::Leadership => "Leadership",
            Area::Compensation => "Compensation",
            Area::Communication => "Communication",
            Area::Benefits => "Benefits",
            Area::Culture => "Culture",
            Area::Relationship => "Relationship",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One exit interview. Period keys are derived from `date` on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub quarter: u32,
    pub semester: u32,
    scores: [Option<u8>; 6],
    pub comment: Option<String>,
}

impl Record {
    pub fn new(date: NaiveDate, scores: [Option<u8>; 6], comment: Option<String>) -> Self {
        let month = date.month();
        Self {
            date,
            year: date.year(),
            month,
            quarter: (month - 1) / 3 + 1,
            semester: if month <= 6 { 1 } else { 2 },
            scores,
            comment,
        }
    }

    pub fn score(&self, area: Area) -> Option<u8> {
        self.scores[area.index()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::High => f.write_str("high"),
            Severity::Medium => f.write_str("medium"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Positive,
    Negative,
    Neutral,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Positive => f.write_str("positive"),
            Direction::Negative => f.write_str("negative"),
            Direction::Neutral => f.write_str("neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaStats {
    pub mean: f64,
    pub median: f64,
    pub mode: u8,
    /// Sample standard deviation; absent with fewer than two ratings.
    pub std_dev: Option<f64>,
    pub min: u8,
    pub max: u8,
    /// Observed ratings only. Use [`AreaStats::count_for`] for zero-filled reads.
    pub distribution: BTreeMap<u8, usize>,
}

impl AreaStats {
    pub fn count_for(&self, rating: u8) -> usize {
        self.distribution.get(&rating).copied().unwrap_or(0)
    }

    /// Counts for ratings 1 through 5, gaps filled with zero.
    pub fn filled_distribution(&self) -> [usize; 5] {
        let mut out = [0; 5];
        for (slot, rating) in out.iter_mut().zip(1u8..=5) {
            *slot = self.count_for(rating);
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordCount {
    pub term: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentInsight {
    pub text: String,
    pub length: usize,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedArea {
    pub area: Area,
    pub mean: f64,
}

/// Statistical and textual result for one period selection.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub count: usize,
    pub period: PeriodSelector,
    pub areas: BTreeMap<Area, AreaStats>,
    pub keywords: Vec<KeywordCount>,
    pub comments: Vec<CommentInsight>,
    pub overall_mean: f64,
    pub best_categories: Vec<RankedArea>,
    pub worst_categories: Vec<RankedArea>,
}

impl Analysis {
    pub fn sentiment_count(&self, sentiment: Sentiment) -> usize {
        self.comments
            .iter()
            .filter(|c| c.sentiment == sentiment)
            .count()
    }

    /// Share of scored comments with the given label, in percent.
    pub fn sentiment_percent(&self, sentiment: Sentiment) -> Option<f64> {
        if self.comments.is_empty() {
            return None;
        }
        Some(self.sentiment_count(sentiment) as f64 / self.comments.len() as f64 * 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSubject {
    Area(Area),
    Comments,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub subject: AlertSubject,
    pub severity: Severity,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Insights {
    pub areas: Vec<(Area, String)>,
    pub comments: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: PeriodSelector,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaComparison {
    pub before: AreaStats,
    pub after: AreaStats,
    pub variation_pct: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: PeriodSummary,
    pub second: PeriodSummary,
    pub areas: BTreeMap<Area, AreaComparison>,
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonInsights {
    pub areas: Vec<(Area, String)>,
    pub overall: String,
    pub max_positive: Option<String>,
    pub max_negative: Option<String>,
}
