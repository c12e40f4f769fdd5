use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use serde::Deserialize;

use crate::models::{Area, Record};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Date,
    Rating,
    Text,
}

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    fn matches(&self, header: &str) -> bool {
        let header = header.trim();
        header == self.name || self.aliases.contains(&header)
    }
}

pub const DATE_COLUMN: &str = "data_desligamento";
pub const COMMENT_COLUMN: &str = "comentarios";

pub const FIELDS: [Field; 8] = [
    Field { name: DATE_COLUMN, aliases: &["date"], kind: FieldKind::Date, required: true },
    Field { name: "lideranca", aliases: &[], kind: FieldKind::Rating, required: true },
    Field { name: "remuneracao", aliases: &[], kind: FieldKind::Rating, required: true },
    Field { name: "comunicacao", aliases: &[], kind: FieldKind::Rating, required: true },
    Field { name: "beneficios", aliases: &[], kind: FieldKind::Rating, required: true },
    Field { name: "cultura", aliases: &[], kind: FieldKind::Rating, required: true },
    Field { name: "relacionamento", aliases: &[], kind: FieldKind::Rating, required: true },
    Field { name: COMMENT_COLUMN, aliases: &["comment"], kind: FieldKind::Text, required: false },
];

fn has_field(headers: &StringRecord, field: &Field) -> bool {
    headers.iter().any(|h| field.matches(h))
}

pub fn has_date_column(headers: &StringRecord) -> bool {
    has_field(headers, &FIELDS[0])
}

/// Required columns absent from `headers`, in schema order.
pub fn missing_required(headers: &StringRecord) -> Vec<String> {
    FIELDS
        .iter()
        .filter(|f| f.required && !has_field(headers, f))
        .map(|f| f.name.to_string())
        .collect()
}

/// Headers used to deserialize rows. When a file carries both a column and
/// one of its aliases, the canonical column wins and the alias is ignored.
pub fn resolve_headers(headers: &StringRecord) -> StringRecord {
    headers
        .iter()
        .map(|header| {
            let shadowed = FIELDS.iter().any(|f| {
                f.aliases.contains(&header) && headers.iter().any(|h| h == f.name)
            });
            if shadowed {
                log::warn!("ignoring column '{header}' in favour of its canonical name");
                format!("{header}#ignored")
            } else {
                header.to_string()
            }
        })
        .collect()
}

/// A source row as read from disk, before validation.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(alias = "date")]
    pub data_desligamento: Option<String>,
    pub lideranca: Option<String>,
    pub remuneracao: Option<String>,
    pub comunicacao: Option<String>,
    pub beneficios: Option<String>,
    pub cultura: Option<String>,
    pub relacionamento: Option<String>,
    #[serde(alias = "comment")]
    pub comentarios: Option<String>,
}

/// Outcome of converting one row.
#[derive(Debug)]
pub enum RowOutcome {
    Accepted(Record),
    /// The row had no usable date.
    Rejected(String),
}

impl RawRow {
    fn cell(&self, area: Area) -> Option<&str> {
        let value = match area {
            Area::Leadership => &self.lideranca,
            Area::Compensation => &self.remuneracao,
            Area::Communication => &self.comunicacao,
            Area::Benefits => &self.beneficios,
            Area::Culture => &self.cultura,
            Area::Relationship => &self.relacionamento,
        };
        value.as_deref()
    }

    pub fn into_record(self) -> RowOutcome {
        let raw_date = self.data_desligamento.as_deref().unwrap_or("").trim();
        let Some(date) = parse_date(raw_date) else {
            return RowOutcome::Rejected(format!("unparseable date '{raw_date}'"));
        };

        let mut scores = [None; 6];
        for (slot, area) in scores.iter_mut().zip(Area::ALL) {
            let cell = self.cell(area).map(str::trim).unwrap_or("");
            if cell.is_empty() {
                continue;
            }
            *slot = parse_rating(cell);
            if slot.is_none() {
                log::warn!("ignoring invalid {} rating '{}' on {}", area.column(), cell, date);
            }
        }

        let comment = self
            .comentarios
            .filter(|c| !c.trim().is_empty());

        RowOutcome::Accepted(Record::new(date, scores, comment))
    }
}

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Parse a 1–5 rating. Integral floats such as `4.0` are accepted.
pub fn parse_rating(value: &str) -> Option<u8> {
    let value = value.trim();
    let rating = match value.parse::<u8>() {
        Ok(v) => v,
        Err(_) => {
            let f = value.parse::<f64>().ok()?;
            if f.fract() != 0.0 || !(1.0..=5.0).contains(&f) {
                return None;
            }
            f as u8
        }
    };
    (1..=5).contains(&rating).then_some(rating)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_missing_required_columns_in_order() {
        let headers = StringRecord::from(vec!["date", "lideranca", "cultura", "comentarios"]);
        assert!(has_date_column(&headers));
        assert_eq!(
            missing_required(&headers),
            vec!["remuneracao", "comunicacao", "beneficios", "relacionamento"]
        );

        let no_date = StringRecord::from(vec!["lideranca"]);
        assert!(!has_date_column(&no_date));
        assert_eq!(missing_required(&no_date)[0], DATE_COLUMN);
    }

    #[test]
    fn canonical_column_shadows_its_alias() {
        let headers = StringRecord::from(vec!["date", "data_desligamento", "lideranca", "comment"]);
        let resolved = resolve_headers(&headers);
        assert_eq!(
            resolved.iter().collect::<Vec<_>>(),
            vec!["date#ignored", "data_desligamento", "lideranca", "comment"]
        );

        let row = StringRecord::from(vec!["2020-01-01", "2024-06-03", "5", "ok"]);
        let raw: RawRow = row.deserialize(Some(&resolved)).expect("no duplicate field");
        assert_eq!(raw.data_desligamento.as_deref(), Some("2024-06-03"));
        assert_eq!(raw.comentarios.as_deref(), Some("ok"));
    }

    #[test]
    fn parses_supported_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 9);
        assert_eq!(parse_date("2024-03-09"), expected);
        assert_eq!(parse_date("2024/03/09"), expected);
        assert_eq!(parse_date("09/03/2024"), expected);
        assert_eq!(parse_date("2024-03-09 14:30:00"), expected);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn ratings_must_be_integral_one_to_five() {
        assert_eq!(parse_rating("4"), Some(4));
        assert_eq!(parse_rating(" 5 "), Some(5));
        assert_eq!(parse_rating("3.0"), Some(3));
        assert_eq!(parse_rating("3.5"), None);
        assert_eq!(parse_rating("0"), None);
        assert_eq!(parse_rating("6"), None);
        assert_eq!(parse_rating("great"), None);
    }

    #[test]
    fn row_without_date_is_rejected() {
        let row = RawRow {
            data_desligamento: None,
            lideranca: Some("4".into()),
            remuneracao: None,
            comunicacao: None,
            beneficios: None,
            cultura: None,
            relacionamento: None,
            comentarios: Some("   ".into()),
        };
        assert!(matches!(row.into_record(), RowOutcome::Rejected(_)));
    }

    #[test]
    fn blank_comment_becomes_absent() {
        let row = RawRow {
            data_desligamento: Some("2024-05-02".into()),
            lideranca: Some("4".into()),
            remuneracao: Some("".into()),
            comunicacao: Some("x".into()),
            beneficios: None,
            cultura: None,
            relacionamento: None,
            comentarios: Some("   ".into()),
        };
        let RowOutcome::Accepted(record) = row.into_record() else {
            panic!("row should be accepted");
        };
        assert_eq!(record.score(Area::Leadership), Some(4));
        assert_eq!(record.score(Area::Compensation), None);
        assert_eq!(record.score(Area::Communication), None);
        assert_eq!(record.comment, None);
    }
}
