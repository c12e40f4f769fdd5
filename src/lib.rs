pub mod compare;
pub mod config;
pub mod error;
pub mod export;
pub mod insights;
pub mod models;
pub mod period;
pub mod report;
pub mod schema;
pub mod stats;
pub mod store;
pub mod text;

pub use error::{AnalyticsError, Result};
pub use models::{Analysis, Area, Comparison, Record};
pub use period::{PeriodSelector, PeriodType, PeriodValue};
pub use stats::AnalysisOptions;
pub use store::{RecordStore, Table};
