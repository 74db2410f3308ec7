// Entry point and high-level CLI flow.
//
// One run reads the incident export, renders the per-service chart, builds
// the review document and prints a single confirmation line. Settings come
// from defaults, an optional TOML file, then the flags below.
mod chart;
mod config;
mod document;
mod error;
mod loader;
mod normalize;
mod output;
mod pipeline;
mod reports;
mod review;
mod types;
mod util;

use anyhow::{Context, Result};
use chart::BarChart;
use chrono::{Local, NaiveDate};
use clap::Parser;
use config::{DocumentFormat, ReportConfig, SampleIdPolicy};
use document::{DocxDocument, MarkdownDocument};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "incident-report")]
#[command(about = "Summarize an incident export into a review report with a chart")]
struct Args {
    /// TOML file with report settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Incident export (CSV with id, title, service, ttr (ms) columns)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory for the chart and document
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Number of slowest incidents to list
    #[arg(long)]
    top_n: Option<usize>,

    /// Resolution time (minutes) above which an incident counts as long
    #[arg(long)]
    threshold_minutes: Option<f64>,

    /// Date used for output file names (YYYY-MM-DD), defaults to today
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Output document format
    #[arg(long, value_enum)]
    format: Option<DocumentFormat>,

    /// List the first N ids per alert title instead of the last one
    #[arg(long, value_name = "N")]
    sample_first: Option<usize>,

    /// TrueType font for chart text
    #[arg(long)]
    font: Option<PathBuf>,

    /// Also write the summary statistics as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,

    /// Print each report table to the console
    #[arg(long)]
    preview: bool,
}

/// Merge file settings (or defaults) with the command line flags.
fn resolve_config(args: &Args) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ReportConfig::default(),
    };
    if let Some(input) = &args.input {
        config.input = input.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
    }
    if let Some(top_n) = args.top_n {
        config.top_n = top_n;
    }
    if let Some(threshold) = args.threshold_minutes {
        config.threshold_minutes = threshold;
    }
    if let Some(date) = args.date {
        config.report_date = Some(date);
    }
    if let Some(format) = args.format {
        config.format = format;
    }
    if let Some(limit) = args.sample_first {
        config.sample_ids = SampleIdPolicy::First { limit };
    }
    if let Some(font) = &args.font {
        config.chart.font_path = Some(font.clone());
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;
    let date = config
        .report_date
        .unwrap_or_else(|| Local::now().date_naive());

    let chart = BarChart::new(config.chart.clone());
    let outcome = match config.format {
        DocumentFormat::Docx => pipeline::run(&config, date, &chart, DocxDocument::new()),
        DocumentFormat::Markdown => pipeline::run(&config, date, &chart, MarkdownDocument::new()),
    }
    .with_context(|| format!("report run failed for {}", config.input.display()))?;

    if outcome.load.parse_errors > 0 {
        warn!(
            "{} of {} rows skipped due to parse errors",
            util::format_int(outcome.load.parse_errors),
            util::format_int(outcome.load.total_rows)
        );
    }

    if args.preview {
        let summary = &outcome.summary;
        let rows = config.preview_rows;
        output::preview_table_rows("Alerts per Service", &summary.by_service, rows);
        output::preview_table_rows("Most Frequently Triggered Alerts", &summary.by_title, rows);
        output::preview_table_rows("Alerts with the Highest Time to Resolve", &summary.slowest, rows);
        output::preview_table_rows("Alerts Over Threshold", &summary.over_threshold, rows);
    }

    if let Some(path) = &args.summary_json {
        output::write_json(path, &outcome.summary.stats)
            .with_context(|| format!("failed to write summary {}", path.display()))?;
    }

    println!("{}", output::confirmation(&outcome.paths.document));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Args {
        Args::parse_from(std::iter::once("incident-report").chain(list.iter().copied()))
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&args(&[
            "--input",
            "june.csv",
            "--top-n",
            "3",
            "--threshold-minutes",
            "30",
            "--date",
            "2025-06-01",
            "--format",
            "markdown",
            "--sample-first",
            "2",
        ]))
        .unwrap();
        assert_eq!(config.input, PathBuf::from("june.csv"));
        assert_eq!(config.top_n, 3);
        assert_eq!(config.threshold_minutes, 30.0);
        assert_eq!(config.report_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert_eq!(config.format, DocumentFormat::Markdown);
        assert_eq!(config.sample_ids, SampleIdPolicy::First { limit: 2 });
    }

    #[test]
    fn no_flags_keeps_defaults() {
        let config = resolve_config(&args(&[])).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.toml");
        std::fs::write(&path, "top_n = 8\nthreshold_minutes = 90.0\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();

        let config = resolve_config(&args(&["--config", &path_arg, "--top-n", "2"])).unwrap();
        assert_eq!(config.top_n, 2);
        assert_eq!(config.threshold_minutes, 90.0);
    }

    #[test]
    fn invalid_flag_values_are_rejected() {
        assert!(resolve_config(&args(&["--top-n", "0"])).is_err());
    }
}
