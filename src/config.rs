// Run configuration.
//
// Values come from built-in defaults, then an optional TOML file, then CLI
// flags (applied in `main`). `validate` runs once after all layers merged.
use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Docx,
    Markdown,
}

impl DocumentFormat {
    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Docx => "docx",
            DocumentFormat::Markdown => "md",
        }
    }
}

/// Which alert ids represent a title in the frequency table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum SampleIdPolicy {
    /// Id of the last matching row in source order.
    #[default]
    Last,
    /// First `limit` ids joined with commas, `" ..."` when more exist.
    First {
        #[serde(default = "default_sample_limit")]
        limit: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartConfig {
    #[serde(default = "default_chart_width")]
    pub width: u32,
    #[serde(default = "default_chart_height")]
    pub height: u32,
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default = "default_input")]
    pub input: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    #[serde(default = "default_threshold_minutes")]
    pub threshold_minutes: f64,
    #[serde(default)]
    pub report_date: Option<NaiveDate>,
    #[serde(default = "default_format")]
    pub format: DocumentFormat,
    #[serde(default)]
    pub sample_ids: SampleIdPolicy,
    #[serde(default)]
    pub chart: ChartConfig,
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: default_chart_width(),
            height: default_chart_height(),
            font_path: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
            output_dir: default_output_dir(),
            top_n: default_top_n(),
            threshold_minutes: default_threshold_minutes(),
            report_date: None,
            format: default_format(),
            sample_ids: SampleIdPolicy::default(),
            chart: ChartConfig::default(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl ReportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::invalid("top_n must be at least 1"));
        }
        if !self.threshold_minutes.is_finite() || self.threshold_minutes < 0.0 {
            return Err(ConfigError::invalid(format!(
                "threshold_minutes must be a non-negative number, got {}",
                self.threshold_minutes
            )));
        }
        if self.chart.width == 0 || self.chart.height == 0 {
            return Err(ConfigError::invalid("chart width and height must be non-zero"));
        }
        if let SampleIdPolicy::First { limit: 0 } = self.sample_ids {
            return Err(ConfigError::invalid("sample_ids.limit must be at least 1"));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<ReportConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content, path)
}

pub fn parse_config(content: &str, path: &Path) -> Result<ReportConfig, ConfigError> {
    toml::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn default_input() -> PathBuf {
    PathBuf::from("incident_report.csv")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_top_n() -> usize {
    5
}

fn default_threshold_minutes() -> f64 {
    60.0
}

fn default_format() -> DocumentFormat {
    DocumentFormat::Docx
}

fn default_sample_limit() -> usize {
    5
}

fn default_chart_width() -> u32 {
    600
}

fn default_chart_height() -> u32 {
    400
}

fn default_preview_rows() -> usize {
    5
}
