use crate::error::LoadError;
use crate::types::{RawIncident, RawRow};
use crate::util::{extract_incident_id, non_empty, parse_f64_safe};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use tracing::{debug, warn};

pub const REQUIRED_COLUMNS: [&str; 4] = ["id", "title", "service", "ttr (ms)"];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub defaulted_ttr: usize,
}

pub fn load_incidents(path: &Path) -> Result<(Vec<RawIncident>, LoadReport), LoadError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => LoadError::NotFound(path.to_path_buf()),
        _ => LoadError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    read_incidents(file, path)
}

/// Decode incident rows from any reader. `path` is only used in error
/// messages.
pub fn read_incidents<R: Read>(
    reader: R,
    path: &Path,
) -> Result<(Vec<RawIncident>, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new()
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(reader);

    let headers = rdr.headers().map_err(|source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut report = LoadReport::default();
    let mut rows: Vec<RawIncident> = Vec::new();

    for result in rdr.deserialize::<RawRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                warn!(row = report.total_rows, error = %e, "skipping unreadable row");
                report.parse_errors += 1;
                continue;
            }
        };

        let ttr_cell = non_empty(row.ttr_ms);
        let resolution_time_ms = parse_f64_safe(ttr_cell.as_deref());
        if ttr_cell.is_some() && resolution_time_ms.is_none() {
            debug!(row = report.total_rows, value = ?ttr_cell, "non-numeric ttr treated as missing");
            report.defaulted_ttr += 1;
        }

        rows.push(RawIncident {
            id: row.id.as_deref().map(extract_incident_id).unwrap_or_default(),
            title: non_empty(row.title),
            service: non_empty(row.service),
            resolution_time_ms,
        });
    }

    report.loaded_rows = rows.len();
    if report.defaulted_ttr > 0 {
        warn!(
            rows = report.defaulted_ttr,
            "ttr (ms) values were not numeric and will count as 0"
        );
    }
    Ok((rows, report))
}
