use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row as it appears in the export. Everything is optional text so a
/// blank or malformed cell never rejects the whole record.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub id: Option<String>,
    pub title: Option<String>,
    pub service: Option<String>,
    #[serde(rename = "ttr (ms)")]
    pub ttr_ms: Option<String>,
}

/// A loaded row before defaults are applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RawIncident {
    pub id: String,
    pub title: Option<String>,
    pub service: Option<String>,
    pub resolution_time_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncidentRecord {
    pub id: String,
    pub title: String,
    pub service: String,
    pub resolution_time_ms: f64,
    pub resolution_time_minutes: f64,
}

/// Occurrence count for one service or title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ServiceCountRow {
    #[serde(rename = "Service")]
    #[tabled(rename = "Service")]
    pub service: String,
    #[serde(rename = "AlertCount")]
    #[tabled(rename = "Alert Count")]
    pub count: usize,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct TitleCountRow {
    #[serde(rename = "AlertTitle")]
    #[tabled(rename = "Alert Title")]
    pub title: String,
    #[serde(rename = "Count")]
    #[tabled(rename = "Count")]
    pub count: usize,
    #[serde(rename = "SampleAlertId")]
    #[tabled(rename = "Sample Alert ID")]
    pub sample_id: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ResolutionRow {
    #[serde(rename = "Title")]
    #[tabled(rename = "Title")]
    pub title: String,
    #[serde(rename = "Service")]
    #[tabled(rename = "Service")]
    pub service: String,
    #[serde(rename = "TimeToResolve")]
    #[tabled(rename = "Time to Resolve")]
    pub time_to_resolve: String,
    #[serde(rename = "AlertId")]
    #[tabled(rename = "Alert ID")]
    pub id: String,
}

/// Everything the report document needs, computed once from the table.
#[derive(Debug, Clone)]
pub struct IncidentSummary {
    pub total_alerts: usize,
    pub by_service: Vec<ServiceCountRow>,
    pub by_title: Vec<TitleCountRow>,
    pub slowest: Vec<ResolutionRow>,
    pub over_threshold: Vec<ResolutionRow>,
    pub threshold_minutes: f64,
    pub stats: SummaryStats,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryStats {
    pub total_alerts: usize,
    pub total_services: usize,
    pub total_titles: usize,
    pub over_threshold: usize,
    pub threshold_minutes: f64,
    pub top_n: usize,
    pub avg_resolution_minutes: f64,
}
