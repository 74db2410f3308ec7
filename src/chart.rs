// Bar chart of alert counts per service.
//
// Drawing goes through `plotters` with its bitmap backend. Text needs a
// TrueType font registered under the "sans-serif" family before any chart is
// built; `ensure_font` does that once per process.
use crate::config::ChartConfig;
use crate::error::RenderError;
use crate::types::ServiceCountRow;
use once_cell::sync::OnceCell;
use plotters::coord::ranged1d::SegmentValue;
use plotters::prelude::*;
use plotters::style::{FontStyle, FontTransform};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const FONT_FAMILY: &str = "sans-serif";
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

const SYSTEM_FONTS: [&str; 6] = [
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

static REGISTERED_FONT: OnceCell<PathBuf> = OnceCell::new();

pub trait ChartRenderer {
    fn render(&self, counts: &[ServiceCountRow], path: &Path) -> Result<(), RenderError>;
}

#[derive(Debug, Clone)]
pub struct BarChart {
    config: ChartConfig,
}

impl BarChart {
    pub fn new(config: ChartConfig) -> Self {
        Self { config }
    }
}

impl ChartRenderer for BarChart {
    fn render(&self, counts: &[ServiceCountRow], path: &Path) -> Result<(), RenderError> {
        let font = ensure_font(self.config.font_path.as_deref())?;
        debug!(font = %font.display(), "chart font registered");

        let root = BitMapBackend::new(path, (self.config.width, self.config.height))
            .into_drawing_area();
        root.fill(&WHITE).map_err(draw_error)?;

        let max_count = counts.iter().map(|c| c.count).max().unwrap_or(0);
        let label_area = label_area_height(counts);

        let mut chart = ChartBuilder::on(&root)
            .caption("Alerts per Service", (FONT_FAMILY, 20))
            .margin(10)
            .x_label_area_size(label_area)
            .y_label_area_size(50)
            .build_cartesian_2d(
                // the integer range includes its end, so n - 1 gives n slots
                (0..counts.len().saturating_sub(1)).into_segmented(),
                0..max_count + 1,
            )
            .map_err(draw_error)?;

        let label_for = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => counts.get(*i).map(|c| c.service.clone()).unwrap_or_default(),
            _ => String::new(),
        };

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Service")
            .y_desc("Alert Count")
            .x_labels(counts.len().max(1))
            .x_label_formatter(&label_for)
            .x_label_style(
                (FONT_FAMILY, 12)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .draw()
            .map_err(draw_error)?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, c)| {
                let mut bar = Rectangle::new(
                    [(SegmentValue::Exact(i), 0), (SegmentValue::Exact(i + 1), c.count)],
                    SKY_BLUE.filled(),
                );
                bar.set_margin(0, 0, 6, 6);
                bar
            }))
            .map_err(draw_error)?;

        root.present().map_err(draw_error)?;
        info!(path = %path.display(), services = counts.len(), "chart rendered");
        Ok(())
    }
}

/// Rotated service names need room below the axis; scale with the longest.
fn label_area_height(counts: &[ServiceCountRow]) -> u32 {
    let longest = counts
        .iter()
        .map(|c| c.service.chars().count())
        .max()
        .unwrap_or(0) as u32;
    (longest * 7 + 30).clamp(40, 160)
}

fn draw_error<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

/// Candidate font files: the configured one only, or the known system paths.
pub fn font_candidates(configured: Option<&Path>) -> Vec<PathBuf> {
    match configured {
        Some(path) => vec![path.to_path_buf()],
        None => SYSTEM_FONTS.iter().map(PathBuf::from).collect(),
    }
}

fn ensure_font(configured: Option<&Path>) -> Result<&'static PathBuf, RenderError> {
    REGISTERED_FONT.get_or_try_init(|| {
        let candidates = font_candidates(configured);
        let Some((path, bytes)) = candidates
            .iter()
            .find_map(|p| std::fs::read(p).ok().map(|bytes| (p.clone(), bytes)))
        else {
            let searched = candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(RenderError::FontNotFound { searched });
        };
        // plotters keeps a reference to registered font data for the
        // lifetime of the process.
        let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
        plotters::style::register_font(FONT_FAMILY, FontStyle::Normal, bytes)
            .map_err(|_| RenderError::InvalidFont(path.clone()))?;
        Ok(path)
    })
}
