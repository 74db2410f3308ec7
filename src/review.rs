use crate::document::ReportDocument;
use crate::error::DocumentError;
use crate::types::IncidentSummary;
use std::path::Path;

pub const REPORT_TITLE: &str = "Incident Review Report";
pub const CHART_WIDTH_INCHES: f64 = 5.5;

/// Lay out the five report sections, always in the same order.
pub fn build_review<D: ReportDocument>(
    doc: &mut D,
    summary: &IncidentSummary,
    chart_path: &Path,
) -> Result<(), DocumentError> {
    doc.title(REPORT_TITLE);

    doc.heading("1. Total Alert Count", 1);
    doc.paragraph(&format!("Total number of alerts: {}", summary.total_alerts));

    doc.heading("2. Alerts per Service", 1);
    doc.table(&summary.by_service);
    doc.image(chart_path, CHART_WIDTH_INCHES)?;

    doc.heading("3. Most Frequently Triggered Alerts", 1);
    doc.table(&summary.by_title);

    doc.heading("4. Alerts with the Highest Time to Resolve", 1);
    doc.table(&summary.slowest);

    doc.heading(
        &format!(
            "5. Alerts Taking More Than {} to Resolve",
            describe_threshold(summary.threshold_minutes)
        ),
        1,
    );
    doc.table(&summary.over_threshold);
    Ok(())
}

/// "1 Hour", "2 Hours", or "45 Minutes".
pub fn describe_threshold(minutes: f64) -> String {
    if minutes >= 60.0 && minutes % 60.0 == 0.0 {
        let hours = (minutes / 60.0) as u64;
        if hours == 1 {
            "1 Hour".to_string()
        } else {
            format!("{} Hours", hours)
        }
    } else if minutes == 1.0 {
        "1 Minute".to_string()
    } else {
        format!("{} Minutes", minutes)
    }
}
