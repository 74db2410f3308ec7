use crate::config::DocumentFormat;
use crate::error::WriteError;
use crate::util::month_year_slug;
use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};

/// Date-stamped locations of the two report artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub chart: PathBuf,
    pub document: PathBuf,
}

impl OutputPaths {
    pub fn for_date(dir: &Path, date: NaiveDate, format: DocumentFormat) -> Self {
        let stamp = month_year_slug(date);
        Self {
            chart: dir.join(format!("alerts-by-service-{}.png", stamp)),
            document: dir.join(format!(
                "squadcast-incident-review-report-{}.{}",
                stamp,
                format.extension()
            )),
        }
    }
}

pub fn ensure_dir(dir: &Path) -> Result<(), WriteError> {
    std::fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write a file, replacing any previous one of the same name.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    std::fs::write(path, bytes).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), WriteError> {
    let s = serde_json::to_string_pretty(value).map_err(|source| WriteError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    write_bytes(path, s.as_bytes())
}

pub fn preview_table_rows<T>(title: &str, rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", title);
    let slice: Vec<T> = rows.iter().cloned().take(max_rows).collect();
    if slice.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);
    if rows.len() > max_rows {
        println!("({} more rows in the report)", rows.len() - max_rows);
    }
    println!();
}

pub fn confirmation(document: &Path) -> String {
    format!("Report generated: {}", document.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SummaryStats;

    #[test]
    fn paths_are_month_stamped() {
        let date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let paths = OutputPaths::for_date(Path::new("out"), date, DocumentFormat::Docx);
        assert_eq!(paths.chart, PathBuf::from("out/alerts-by-service-june-2025.png"));
        assert_eq!(
            paths.document,
            PathBuf::from("out/squadcast-incident-review-report-june-2025.docx")
        );

        let md = OutputPaths::for_date(Path::new("."), date, DocumentFormat::Markdown);
        assert!(md.document.ends_with("squadcast-incident-review-report-june-2025.md"));
    }

    #[test]
    fn write_bytes_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.md");
        write_bytes(&path, b"first version, longer").unwrap();
        write_bytes(&path, b"second").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn write_into_missing_dir_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_bytes(&dir.path().join("nope/report.md"), b"x").unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }

    #[test]
    fn json_summary_round_trips_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.json");
        let stats = SummaryStats {
            total_alerts: 3,
            total_services: 2,
            total_titles: 2,
            over_threshold: 1,
            threshold_minutes: 60.0,
            top_n: 5,
            avg_resolution_minutes: 50.166,
        };
        write_json(&path, &stats).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["total_alerts"], 3);
        assert_eq!(value["over_threshold"], 1);
    }

    #[test]
    fn confirmation_names_document() {
        assert_eq!(
            confirmation(Path::new("squadcast-incident-review-report-june-2025.docx")),
            "Report generated: squadcast-incident-review-report-june-2025.docx"
        );
    }
}
