use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::{AnalyticsError, Result};
use crate::models::{Analysis, Area, Record};
use crate::period::{self, PeriodSelector};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    data_desligamento: NaiveDate,
    ano: i32,
    mes: u32,
    trimestre: u32,
    semestre: u32,
    lideranca: Option<u8>,
    remuneracao: Option<u8>,
    comunicacao: Option<u8>,
    beneficios: Option<u8>,
    cultura: Option<u8>,
    relacionamento: Option<u8>,
    comentarios: Option<&'a str>,
}

impl<'a> From<&'a Record> for ExportRow<'a> {
    fn from(r: &'a Record) -> Self {
        ExportRow {
            data_desligamento: r.date,
            ano: r.year,
            mes: r.month,
            trimestre: r.quarter,
            semestre: r.semester,
            lideranca: r.score(Area::Leadership),
            remuneracao: r.score(Area::Compensation),
            comunicacao: r.score(Area::Communication),
            beneficios: r.score(Area::Benefits),
            cultura: r.score(Area::Culture),
            relacionamento: r.score(Area::Relationship),
            comentarios: r.comment.as_deref(),
        }
    }
}

/// `desligamentos_<type>_<value>_<timestamp>.<ext>` inside `dir`.
pub fn export_path(dir: &Path, selector: &PeriodSelector, format: ExportFormat) -> PathBuf {
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    dir.join(format!(
        "desligamentos_{}_{}.{}",
        selector.label(),
        timestamp,
        format.extension()
    ))
}

/// Write the records selected by `selector` as CSV. Returns the file path.
pub fn export_csv(records: &[Record], selector: &PeriodSelector, dir: &Path) -> Result<PathBuf> {
    let subset = period::filter(records, selector);
    if subset.is_empty() {
        return Err(AnalyticsError::NoData(selector.to_string()));
    }

    fs::create_dir_all(dir)?;
    let path = export_path(dir, selector, ExportFormat::Csv);
    let mut writer = csv::Writer::from_path(&path)?;
    for record in subset {
        writer.serialize(ExportRow::from(record))?;
    }
    writer.flush()?;
    log::info!("exported records to {}", path.display());
    Ok(path)
}

/// Write a full analysis as pretty JSON. Returns the file path.
pub fn export_json(analysis: &Analysis, dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = export_path(dir, &analysis.period, ExportFormat::Json);
    let body = serde_json::to_string_pretty(analysis)?;
    fs::write(&path, body)?;
    log::info!("exported analysis to {}", path.display());
    Ok(path)
}
