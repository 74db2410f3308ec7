use crate::types::{IncidentRecord, RawIncident};

pub const DEFAULT_TITLE: &str = "Untitled";
pub const DEFAULT_SERVICE: &str = "Unknown";
pub const MS_PER_MINUTE: f64 = 60_000.0;

/// Apply defaults to missing fields and derive resolution minutes.
/// Never fails; row order is preserved.
pub fn normalize(rows: Vec<RawIncident>) -> Vec<IncidentRecord> {
    rows.into_iter().map(normalize_one).collect()
}

fn normalize_one(row: RawIncident) -> IncidentRecord {
    let resolution_time_ms = row.resolution_time_ms.unwrap_or(0.0);
    IncidentRecord {
        id: row.id,
        title: row.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        service: row.service.unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
        resolution_time_ms,
        resolution_time_minutes: resolution_time_ms / MS_PER_MINUTE,
    }
}
