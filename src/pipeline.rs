// Orchestration of one report run.
//
// load -> normalize -> aggregate -> chart -> document -> write. Each stage
// error aborts the run; a chart written before a later failure is left in
// place.
use crate::chart::ChartRenderer;
use crate::config::ReportConfig;
use crate::document::ReportDocument;
use crate::error::PipelineError;
use crate::loader::{load_incidents, LoadReport};
use crate::normalize::normalize;
use crate::output::{self, OutputPaths};
use crate::reports::generate_summary;
use crate::review::build_review;
use crate::types::IncidentSummary;
use crate::util::format_int;
use chrono::NaiveDate;
use tracing::{debug, info};

#[derive(Debug)]
pub struct RunOutcome {
    pub load: LoadReport,
    pub summary: IncidentSummary,
    pub paths: OutputPaths,
}

pub fn run<C, D>(
    config: &ReportConfig,
    date: NaiveDate,
    chart: &C,
    mut doc: D,
) -> Result<RunOutcome, PipelineError>
where
    C: ChartRenderer,
    D: ReportDocument,
{
    let (raw, load) = load_incidents(&config.input)?;
    info!(
        "Loaded {} incidents from {} ({} rows skipped)",
        format_int(load.loaded_rows),
        config.input.display(),
        format_int(load.parse_errors)
    );

    let table = normalize(raw);
    let summary = generate_summary(&table, config);
    debug!(
        services = summary.by_service.len(),
        titles = summary.by_title.len(),
        over_threshold = summary.over_threshold.len(),
        "aggregates computed"
    );

    let paths = OutputPaths::for_date(&config.output_dir, date, config.format);
    output::ensure_dir(&config.output_dir)?;

    chart.render(&summary.by_service, &paths.chart)?;

    build_review(&mut doc, &summary, &paths.chart)?;
    let bytes = doc.to_bytes()?;
    output::write_bytes(&paths.document, &bytes)?;
    info!(path = %paths.document.display(), "document written");

    Ok(RunOutcome {
        load,
        summary,
        paths,
    })
}
