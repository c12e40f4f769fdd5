use thiserror::Error;

/// Errors surfaced by the analytics pipeline.
///
/// `NoData` is the soft "nothing to analyze" outcome; callers are expected to
/// render a placeholder instead of failing.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("missing required column(s): {}", .0.join(", "))]
    MissingColumn(Vec<String>),

    #[error("no data available for {0}")]
    NoData(String),

    #[error("unknown period type '{0}' (expected month, quarter, semester, year or all)")]
    UnknownPeriodType(String),

    #[error("invalid period value '{0}' (expected an integer or 'all')")]
    InvalidPeriodValue(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl AnalyticsError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, AnalyticsError::NoData(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_are_listed_in_message() {
        let err = AnalyticsError::MissingColumn(vec!["lideranca".into(), "cultura".into()]);
        assert_eq!(
            err.to_string(),
            "missing required column(s): lideranca, cultura"
        );
        assert!(!err.is_unavailable());
    }

    #[test]
    fn no_data_is_unavailable() {
        assert!(AnalyticsError::NoData("month 3".into()).is_unavailable());
    }
}
