use std::path::PathBuf;

use clap::Args;
use thiserror::Error;

use crate::insights::DEFAULT_ALERT_THRESHOLD;
use crate::stats::AnalysisOptions;
use crate::text::DEFAULT_MIN_FREQ;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("alert threshold must be between 1 and 5, got {0}")]
    InvalidThreshold(f64),

    #[error("minimum keyword frequency must be at least 1")]
    InvalidKeywordFrequency,
}

/// Runtime settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct Config {
    /// Directory holding the interview CSV files
    #[arg(long, global = true, env = "EXIT_INTERVIEW_DATA_DIR", default_value = "database")]
    pub data_dir: PathBuf,

    /// Directory where exports and reports are written
    #[arg(long, global = true, env = "EXIT_INTERVIEW_EXPORT_DIR", default_value = "exports")]
    pub export_dir: PathBuf,

    /// Areas averaging below this value raise an alert
    #[arg(long, global = true, default_value_t = DEFAULT_ALERT_THRESHOLD)]
    pub alert_threshold: f64,

    /// Minimum number of comments a keyword must appear in
    #[arg(long, global = true, default_value_t = DEFAULT_MIN_FREQ)]
    pub min_keyword_freq: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("database"),
            export_dir: PathBuf::from("exports"),
            alert_threshold: DEFAULT_ALERT_THRESHOLD,
            min_keyword_freq: DEFAULT_MIN_FREQ,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1.0..=5.0).contains(&self.alert_threshold) {
            return Err(ConfigError::InvalidThreshold(self.alert_threshold));
        }
        if self.min_keyword_freq == 0 {
            return Err(ConfigError::InvalidKeywordFrequency);
        }
        Ok(())
    }

    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            min_keyword_freq: self.min_keyword_freq,
        }
    }
}
