use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{AnalyticsError, Result};
use crate::models::Record;
use crate::schema::{self, RawRow, RowOutcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SourceStatus {
    Loaded { records: usize, rejected_rows: usize },
    Invalid { missing: Vec<String> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReport {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: SourceStatus,
}

/// Every record loaded from the data directory, sorted by date.
#[derive(Debug, Serialize)]
pub struct Table {
    pub id: Uuid,
    pub loaded_at: DateTime<Local>,
    pub records: Vec<Record>,
    pub sources: Vec<SourceReport>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Owns the current table snapshot.
///
/// A reload builds a complete new [`Table`] before swapping the shared
/// reference, so readers holding an `Arc<Table>` never see partial state.
#[derive(Debug)]
pub struct RecordStore {
    data_dir: PathBuf,
    current: RwLock<Option<Arc<Table>>>,
}

impl RecordStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            current: RwLock::new(None),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Return the cached table, building it on a cache miss or when
    /// `force_reload` is set.
    pub fn load(&self, force_reload: bool) -> Result<Arc<Table>> {
        if !force_reload {
            if let Some(table) = self.current() {
                return Ok(table);
            }
        }

        let built = build_table(&self.data_dir)?;
        let mut slot = self.current.write().unwrap_or_else(|e| e.into_inner());
        *slot = built.clone();
        built.ok_or_else(|| {
            AnalyticsError::NoData(format!("no valid source files in {}", self.data_dir.display()))
        })
    }

    pub fn reload(&self) -> Result<Arc<Table>> {
        self.load(true)
    }

    pub fn current(&self) -> Option<Arc<Table>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

/// CSV files directly inside `dir`, in file name order.
pub fn list_sources(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && is_csv(p))
        .collect();
    files.sort();
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

/// Short rows are allowed; trailing cells they leave out read as empty.
fn open_reader(path: &Path) -> Result<csv::Reader<fs::File>> {
    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_path(path)?)
}

/// Read one source file. A file without the date column is an error; rows
/// without a usable date are skipped and counted.
pub fn read_source(path: &Path) -> Result<(Vec<Record>, usize)> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    if !schema::has_date_column(&headers) {
        return Err(AnalyticsError::MissingColumn(vec![
            schema::DATE_COLUMN.to_string(),
        ]));
    }
    let headers = schema::resolve_headers(&headers);

    let mut records = Vec::new();
    let mut rejected = 0usize;
    for (line, result) in reader.records().enumerate() {
        let row: RawRow = result?.deserialize(Some(&headers))?;
        match row.into_record() {
            RowOutcome::Accepted(record) => records.push(record),
            RowOutcome::Rejected(reason) => {
                log::warn!("{} row {}: {}", path.display(), line + 2, reason);
                rejected += 1;
            }
        }
    }
    Ok((records, rejected))
}

fn build_table(dir: &Path) -> Result<Option<Arc<Table>>> {
    let files = list_sources(dir)?;
    if files.is_empty() {
        log::warn!("no CSV files found in {}", dir.display());
        return Ok(None);
    }

    let mut records = Vec::new();
    let mut sources = Vec::with_capacity(files.len());
    let mut valid_files = 0usize;

    for path in files {
        let status = match read_source(&path) {
            Ok((mut batch, rejected_rows)) => {
                valid_files += 1;
                let status = SourceStatus::Loaded {
                    records: batch.len(),
                    rejected_rows,
                };
                records.append(&mut batch);
                status
            }
            Err(AnalyticsError::MissingColumn(missing)) => {
                log::warn!(
                    "skipping {}: missing column(s) {}",
                    path.display(),
                    missing.join(", ")
                );
                SourceStatus::Invalid { missing }
            }
            Err(err) => {
                log::warn!("skipping {}: {}", path.display(), err);
                SourceStatus::Failed {
                    reason: err.to_string(),
                }
            }
        };
        sources.push(SourceReport { path, status });
    }

    if valid_files == 0 {
        return Ok(None);
    }

    records.sort_by_key(|r| r.date);
    log::info!(
        "loaded {} records from {} of {} source file(s)",
        records.len(),
        valid_files,
        sources.len()
    );

    Ok(Some(Arc::new(Table {
        id: Uuid::new_v4(),
        loaded_at: Local::now(),
        records,
        sources,
    })))
}

/// Listing entry for a source file, mirroring an upload-time schema check.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub size_kb: f64,
    pub modified: Option<DateTime<Local>>,
    pub records: usize,
    pub columns: usize,
    pub missing_columns: Vec<String>,
    pub error: Option<String>,
}

impl SourceInfo {
    pub fn is_valid(&self) -> bool {
        self.error.is_none() && self.missing_columns.is_empty()
    }
}

/// Describe every CSV file in `dir`, most recently modified first.
pub fn inspect_sources(dir: &Path) -> Result<Vec<SourceInfo>> {
    let mut infos: Vec<SourceInfo> = list_sources(dir)?
        .iter()
        .map(|path| describe_source(path))
        .collect();
    infos.sort_by(|a, b| b.modified.cmp(&a.modified));
    Ok(infos)
}

/// Size, row count and schema check for one file. Failures are recorded in
/// `error` rather than returned.
pub fn describe_source(path: &Path) -> SourceInfo {
    let mut info = SourceInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        size_kb: 0.0,
        modified: None,
        records: 0,
        columns: 0,
        missing_columns: Vec::new(),
        error: None,
    };

    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(err) => {
            log::warn!("cannot stat {}: {}", path.display(), err);
            info.error = Some(err.to_string());
            return info;
        }
    };
    info.size_kb = metadata.len() as f64 / 1024.0;
    info.modified = metadata.modified().ok().map(DateTime::<Local>::from);

    match count_rows(path) {
        Ok((headers, rows)) => {
            info.columns = headers.len();
            info.records = rows;
            info.missing_columns = schema::missing_required(&headers);
        }
        Err(err) => info.error = Some(err.to_string()),
    }
    info
}

fn count_rows(path: &Path) -> Result<(csv::StringRecord, usize)> {
    let mut reader = open_reader(path)?;
    let headers = reader.headers()?.clone();
    let mut rows = 0usize;
    for result in reader.records() {
        result?;
        rows += 1;
    }
    Ok((headers, rows))
}
