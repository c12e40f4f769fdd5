use std::path::PathBuf;

use anyhow::Context;
use chrono::Local;
use clap::{Parser, Subcommand};

use exit_interview_insights::config::Config;
use exit_interview_insights::export::{self, ExportFormat};
use exit_interview_insights::{
    compare, insights, period, report, stats, store, AnalyticsError, PeriodSelector, RecordStore,
};

#[derive(Parser)]
#[command(name = "exit-interview-insights")]
#[command(about = "Statistics, comment insights and period comparisons for exit interviews", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the period values present in the data
    Periods,
    /// Analyze one period
    Analyze {
        #[arg(long, default_value = "all")]
        period_type: String,
        #[arg(long, default_value = "all")]
        period_value: String,
        /// Print the full analysis as JSON
        #[arg(long)]
        json: bool,
    },
    /// Compare two periods
    Compare {
        #[arg(long)]
        from_type: String,
        #[arg(long)]
        from_value: String,
        #[arg(long)]
        to_type: String,
        #[arg(long)]
        to_value: String,
        /// Also write a markdown report to this path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Generate a markdown report for one period
    Report {
        #[arg(long, default_value = "all")]
        period_type: String,
        #[arg(long, default_value = "all")]
        period_value: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Export one period's records (CSV) or analysis (JSON)
    Export {
        #[arg(long, default_value = "all")]
        period_type: String,
        #[arg(long, default_value = "all")]
        period_value: String,
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
    },
    /// Check every source file against the expected columns
    Files,
}

/// Turn the soft "no data" outcome into `None` after telling the user.
fn available<T>(result: Result<T, AnalyticsError>) -> anyhow::Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_unavailable() => {
            println!("No data available: {err}.");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli.config;
    config.validate().context("invalid configuration")?;

    let record_store = RecordStore::new(&config.data_dir);
    let options = config.analysis_options();

    match cli.command {
        Commands::Periods => {
            let Some(table) = available(record_store.load(false))? else {
                return Ok(());
            };
            let periods = period::available_periods(&table.records);
            println!("{} records loaded.", table.len());
            println!("month: {:?}", periods.month);
            println!("quarter: {:?}", periods.quarter);
            println!("semester: {:?}", periods.semester);
            println!("year: {:?}", periods.year);
        }
        Commands::Analyze {
            period_type,
            period_value,
            json,
        } => {
            let selector = PeriodSelector::parse(&period_type, &period_value)?;
            let Some(table) = available(record_store.load(false))? else {
                return Ok(());
            };
            let Some(analysis) = available(stats::analyze(&table.records, &selector, &options))?
            else {
                return Ok(());
            };

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
                return Ok(());
            }

            println!(
                "{} interviews for {} (overall average {:.2})",
                analysis.count, analysis.period, analysis.overall_mean
            );
            for (area, s) in &analysis.areas {
                println!(
                    "- {} mean {:.2}, median {:.1}, mode {}, range {}-{}",
                    area, s.mean, s.median, s.mode, s.min, s.max
                );
            }
            let found = insights::generate_insights(&analysis);
            for text in found.areas.iter().map(|(_, t)| t).chain(found.comments.iter()) {
                println!("* {text}");
            }
            for alert in insights::generate_alerts(&analysis, config.alert_threshold) {
                println!("! [{}] {}", alert.severity, alert.message);
            }
        }
        Commands::Compare {
            from_type,
            from_value,
            to_type,
            to_value,
            out,
        } => {
            let first = PeriodSelector::parse(&from_type, &from_value)?;
            let second = PeriodSelector::parse(&to_type, &to_value)?;
            let Some(table) = available(record_store.load(false))? else {
                return Ok(());
            };
            let Some(comparison) =
                available(compare::compare(&table.records, &first, &second, &options))?
            else {
                return Ok(());
            };

            for (area, c) in &comparison.areas {
                println!(
                    "- {}: {:.2} -> {:.2} ({:+.1}%, {})",
                    area, c.before.mean, c.after.mean, c.variation_pct, c.direction
                );
            }
            let found = compare::generate_comparison_insights(&comparison);
            println!("* {}", found.overall);
            for text in found.max_positive.iter().chain(found.max_negative.iter()) {
                println!("* {text}");
            }
            for alert in &comparison.alerts {
                println!("! [{}] {}", alert.severity, alert.message);
            }

            if let Some(out) = out {
                std::fs::write(&out, report::build_comparison_report(&comparison))
                    .with_context(|| format!("failed to write {}", out.display()))?;
                println!("Report written to {}.", out.display());
            }
        }
        Commands::Report {
            period_type,
            period_value,
            out,
        } => {
            let selector = PeriodSelector::parse(&period_type, &period_value)?;
            let Some(table) = available(record_store.load(false))? else {
                return Ok(());
            };
            let Some(analysis) = available(stats::analyze(&table.records, &selector, &options))?
            else {
                return Ok(());
            };

            let out = match out {
                Some(path) => path,
                None => {
                    std::fs::create_dir_all(&config.export_dir)?;
                    config.export_dir.join(format!(
                        "relatorio_desligamentos_{}_{}.md",
                        selector.label(),
                        Local::now().format("%Y%m%d_%H%M%S")
                    ))
                }
            };
            let body = report::build_analysis_report(&analysis, config.alert_threshold);
            std::fs::write(&out, body)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Export {
            period_type,
            period_value,
            format,
        } => {
            let selector = PeriodSelector::parse(&period_type, &period_value)?;
            let Some(table) = available(record_store.load(false))? else {
                return Ok(());
            };
            let result = match format {
                ExportFormat::Csv => export::export_csv(&table.records, &selector, &config.export_dir),
                ExportFormat::Json => stats::analyze(&table.records, &selector, &options)
                    .and_then(|analysis| export::export_json(&analysis, &config.export_dir)),
            };
            if let Some(path) = available(result)? {
                println!("Exported to {}.", path.display());
            }
        }
        Commands::Files => {
            let infos = store::inspect_sources(&config.data_dir)
                .with_context(|| format!("failed to read {}", config.data_dir.display()))?;
            if infos.is_empty() {
                println!("No CSV files found in {}.", config.data_dir.display());
                return Ok(());
            }
            for info in infos {
                let status = match (&info.error, info.missing_columns.is_empty()) {
                    (Some(err), _) => format!("invalid: {err}"),
                    (None, false) => format!("missing columns: {}", info.missing_columns.join(", ")),
                    (None, true) => "valid".to_string(),
                };
                println!(
                    "- {} ({:.1} KB, {} records, {} columns): {}",
                    info.name, info.size_kb, info.records, info.columns, status
                );
            }
        }
    }

    Ok(())
}
