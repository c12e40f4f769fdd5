use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::AnalyticsError;
use crate::models::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodType {
    Month,
    Quarter,
    Semester,
    Year,
    All,
}

impl PeriodType {
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodType::Month => "month",
            PeriodType::Quarter => "quarter",
            PeriodType::Semester => "semester",
            PeriodType::Year => "year",
            PeriodType::All => "all",
        }
    }

    /// The derived attribute this period type keys on.
    fn key(self, record: &Record) -> Option<i64> {
        match self {
            PeriodType::Month => Some(record.month as i64),
            PeriodType::Quarter => Some(record.quarter as i64),
            PeriodType::Semester => Some(record.semester as i64),
            PeriodType::Year => Some(record.year as i64),
            PeriodType::All => None,
        }
    }
}

impl FromStr for PeriodType {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(PeriodType::Month),
            "quarter" => Ok(PeriodType::Quarter),
            "semester" => Ok(PeriodType::Semester),
            "year" => Ok(PeriodType::Year),
            "all" => Ok(PeriodType::All),
            _ => Err(AnalyticsError::UnknownPeriodType(s.to_string())),
        }
    }
}

impl fmt::Display for PeriodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodValue {
    All,
    Value(i64),
}

impl FromStr for PeriodValue {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(PeriodValue::All);
        }
        trimmed
            .parse::<i64>()
            .map(PeriodValue::Value)
            .map_err(|_| AnalyticsError::InvalidPeriodValue(s.to_string()))
    }
}

impl fmt::Display for PeriodValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodValue::All => f.write_str("all"),
            PeriodValue::Value(v) => write!(f, "{v}"),
        }
    }
}

impl Serialize for PeriodValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodValue::All => serializer.serialize_str("all"),
            PeriodValue::Value(v) => serializer.serialize_i64(*v),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct PeriodSelector {
    #[serde(rename = "type")]
    pub kind: PeriodType,
    pub value: PeriodValue,
}

impl PeriodSelector {
    pub fn new(kind: PeriodType, value: PeriodValue) -> Self {
        Self { kind, value }
    }

    pub fn all() -> Self {
        Self::new(PeriodType::All, PeriodValue::All)
    }

    /// A value of `all` selects everything whatever the type says, so an
    /// unrecognized type is only rejected alongside a concrete value.
    pub fn parse(kind: &str, value: &str) -> Result<Self, AnalyticsError> {
        if value.trim().eq_ignore_ascii_case("all") {
            let kind = kind.parse().unwrap_or(PeriodType::All);
            return Ok(Self::new(kind, PeriodValue::All));
        }
        Ok(Self::new(kind.parse()?, value.parse()?))
    }

    fn selects_everything(&self) -> bool {
        self.kind == PeriodType::All || self.value == PeriodValue::All
    }

    /// File-name friendly descriptor, e.g. `year_2024`.
    pub fn label(&self) -> String {
        format!("{}_{}", self.kind, self.value)
    }
}

impl fmt::Display for PeriodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.selects_everything() {
            f.write_str("all periods")
        } else {
            write!(f, "{} {}", self.kind, self.value)
        }
    }
}

/// Select the records matching `selector`, preserving table order.
pub fn filter<'a>(records: &'a [Record], selector: &PeriodSelector) -> Vec<&'a Record> {
    let wanted = match selector.value {
        PeriodValue::Value(v) if !selector.selects_everything() => v,
        _ => return records.iter().collect(),
    };

    let selected: Vec<&Record> = records
        .iter()
        .filter(|r| selector.kind.key(r) == Some(wanted))
        .collect();
    log::debug!(
        "period {} selected {} of {} records",
        selector,
        selected.len(),
        records.len()
    );
    selected
}

/// Distinct period values present in a table, each list ascending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvailablePeriods {
    pub month: Vec<i64>,
    pub quarter: Vec<i64>,
    pub semester: Vec<i64>,
    pub year: Vec<i64>,
}

impl AvailablePeriods {
    pub fn values(&self, kind: PeriodType) -> &[i64] {
        match kind {
            PeriodType::Month => &self.month,
            PeriodType::Quarter => &self.quarter,
            PeriodType::Semester => &self.semester,
            PeriodType::Year => &self.year,
            PeriodType::All => &[],
        }
    }
}

pub fn available_periods(records: &[Record]) -> AvailablePeriods {
    let distinct = |kind: PeriodType| -> Vec<i64> {
        records
            .iter()
            .filter_map(|r| kind.key(r))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    };

    AvailablePeriods {
        month: distinct(PeriodType::Month),
        quarter: distinct(PeriodType::Quarter),
        semester: distinct(PeriodType::Semester),
        year: distinct(PeriodType::Year),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn table() -> Vec<Record> {
        [(2023, 11, 2), (2024, 1, 10), (2024, 2, 5), (2024, 7, 20), (2024, 12, 1)]
            .into_iter()
            .map(|(y, m, d)| {
                let date = NaiveDate::from_ymd_opt(y, m, d).expect("valid date");
                Record::new(date, [Some(4); 6], None)
            })
            .collect()
    }

    #[test]
    fn all_selector_is_identity() {
        let records = table();
        let selected = filter(&records, &PeriodSelector::all());
        assert_eq!(selected.len(), records.len());
        assert!(selected.iter().zip(records.iter()).all(|(a, b)| *a == b));

        let month_all = PeriodSelector::parse("month", "all").expect("valid selector");
        assert_eq!(filter(&records, &month_all).len(), records.len());

        let all_with_value = PeriodSelector::parse("all", "2024").expect("valid selector");
        assert_eq!(filter(&records, &all_with_value).len(), records.len());

        let odd_type = PeriodSelector::parse("week", "all").expect("value all wins");
        assert_eq!(odd_type, PeriodSelector::all());
        assert_eq!(filter(&records, &odd_type).len(), records.len());
    }

    #[test]
    fn concrete_selector_matches_attribute_exactly() {
        let records = table();
        let year = PeriodSelector::parse("year", "2024").expect("valid selector");
        let selected = filter(&records, &year);
        assert_eq!(selected.len(), 4);
        assert!(selected.iter().all(|r| r.year == 2024));

        let q1 = PeriodSelector::parse("quarter", "1").expect("valid selector");
        assert!(filter(&records, &q1).iter().all(|r| r.quarter == 1));
        assert_eq!(filter(&records, &q1).len(), 2);

        let s2 = PeriodSelector::parse("semester", "2").expect("valid selector");
        assert_eq!(filter(&records, &s2).len(), 3);

        let june = PeriodSelector::parse("month", "6").expect("valid selector");
        assert!(filter(&records, &june).is_empty());
    }

    #[test]
    fn rejects_unknown_type_and_bad_value() {
        assert!(matches!(
            PeriodSelector::parse("week", "1"),
            Err(AnalyticsError::UnknownPeriodType(t)) if t == "week"
        ));
        assert!(matches!(
            PeriodSelector::parse("month", "march"),
            Err(AnalyticsError::InvalidPeriodValue(_))
        ));
    }

    #[test]
    fn lists_available_periods_sorted() {
        let periods = available_periods(&table());
        assert_eq!(periods.month, vec![1, 2, 7, 11, 12]);
        assert_eq!(periods.quarter, vec![1, 3, 4]);
        assert_eq!(periods.semester, vec![1, 2]);
        assert_eq!(periods.year, vec![2023, 2024]);
    }

    #[test]
    fn label_names_type_and_value() {
        let sel = PeriodSelector::parse("quarter", "3").expect("valid selector");
        assert_eq!(sel.label(), "quarter_3");
        assert_eq!(PeriodSelector::all().label(), "all_all");
        assert_eq!(sel.to_string(), "quarter 3");
    }
}
