// Document backends for the review report.
//
// `ReportDocument` is the narrow surface the report builder needs. The docx
// backend buffers blocks and only touches `docx-rs` when serialized; the
// markdown backend renders tables with `tabled` and is cheap enough to use
// in tests.
use crate::error::DocumentError;
use docx_rs::{
    Docx, Paragraph, Pic, Run, Style, StyleType, Table as DocxTable, TableCell, TableRow,
};
use std::io::Cursor;
use std::path::Path;
use tabled::{builder::Builder, settings::Style as TableStyle, Tabled};

const EMU_PER_INCH: f64 = 914_400.0;

pub trait ReportDocument {
    fn title(&mut self, text: &str);
    fn heading(&mut self, text: &str, level: usize);
    fn paragraph(&mut self, text: &str);
    fn table<T: Tabled>(&mut self, rows: &[T]);
    /// Embed an image file scaled to `width_inches`, keeping its aspect ratio.
    fn image(&mut self, path: &Path, width_inches: f64) -> Result<(), DocumentError>;
    /// Serialize the finished document.
    fn to_bytes(&self) -> Result<Vec<u8>, DocumentError>;
}

fn header_cells<T: Tabled>() -> Vec<String> {
    T::headers().into_iter().map(|h| h.into_owned()).collect()
}

fn row_cells<T: Tabled>(row: &T) -> Vec<String> {
    row.fields().into_iter().map(|f| f.into_owned()).collect()
}

#[derive(Debug, Clone)]
enum Block {
    Title(String),
    Heading(String, usize),
    Paragraph(String),
    Table {
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Image {
        bytes: Vec<u8>,
        width_emu: u32,
        height_emu: u32,
    },
}

/// Word document written through `docx-rs`.
#[derive(Debug, Clone, Default)]
pub struct DocxDocument {
    blocks: Vec<Block>,
}

impl DocxDocument {
    pub fn new() -> Self {
        Self::default()
    }

    fn styled_docx() -> Docx {
        Docx::new()
            .add_style(
                Style::new("Title", StyleType::Paragraph)
                    .name("Title")
                    .size(52)
                    .bold(),
            )
            .add_style(
                Style::new("Heading1", StyleType::Paragraph)
                    .name("Heading 1")
                    .size(32)
                    .bold(),
            )
            .add_style(
                Style::new("Heading2", StyleType::Paragraph)
                    .name("Heading 2")
                    .size(26)
                    .bold(),
            )
    }
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

fn docx_table(headers: &[String], rows: &[Vec<String>]) -> DocxTable {
    let header = TableRow::new(
        headers
            .iter()
            .map(|h| {
                TableCell::new().add_paragraph(Paragraph::new().add_run(Run::new().add_text(h).bold()))
            })
            .collect(),
    );
    let body = rows.iter().map(|cells| {
        TableRow::new(
            cells
                .iter()
                .map(|c| TableCell::new().add_paragraph(text_paragraph(c)))
                .collect(),
        )
    });
    DocxTable::new(std::iter::once(header).chain(body).collect())
}

impl ReportDocument for DocxDocument {
    fn title(&mut self, text: &str) {
        self.blocks.push(Block::Title(text.to_string()));
    }

    fn heading(&mut self, text: &str, level: usize) {
        self.blocks.push(Block::Heading(text.to_string(), level));
    }

    fn paragraph(&mut self, text: &str) {
        self.blocks.push(Block::Paragraph(text.to_string()));
    }

    fn table<T: Tabled>(&mut self, rows: &[T]) {
        self.blocks.push(Block::Table {
            headers: header_cells::<T>(),
            rows: rows.iter().map(row_cells).collect(),
        });
    }

    fn image(&mut self, path: &Path, width_inches: f64) -> Result<(), DocumentError> {
        let image_error = |message: String| DocumentError::Image {
            path: path.to_path_buf(),
            message,
        };
        let bytes = std::fs::read(path).map_err(|e| image_error(e.to_string()))?;
        let decoded = image::load_from_memory(&bytes).map_err(|e| image_error(e.to_string()))?;
        if decoded.width() == 0 {
            return Err(image_error("image has zero width".to_string()));
        }
        let width_emu = width_inches * EMU_PER_INCH;
        let height_emu = width_emu * f64::from(decoded.height()) / f64::from(decoded.width());
        self.blocks.push(Block::Image {
            bytes,
            width_emu: width_emu.round() as u32,
            height_emu: height_emu.round() as u32,
        });
        Ok(())
    }

    fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut docx = Self::styled_docx();
        for block in &self.blocks {
            docx = match block {
                Block::Title(text) => docx.add_paragraph(text_paragraph(text).style("Title")),
                Block::Heading(text, level) => {
                    let style = format!("Heading{}", (*level).clamp(1, 2));
                    docx.add_paragraph(text_paragraph(text).style(&style))
                }
                Block::Paragraph(text) => docx.add_paragraph(text_paragraph(text)),
                Block::Table { headers, rows } => docx.add_table(docx_table(headers, rows)),
                Block::Image {
                    bytes,
                    width_emu,
                    height_emu,
                } => docx.add_paragraph(
                    Paragraph::new()
                        .add_run(Run::new().add_image(Pic::new(bytes).size(*width_emu, *height_emu))),
                ),
            };
        }

        let mut buf = Cursor::new(Vec::new());
        docx.build()
            .pack(&mut buf)
            .map_err(|e| DocumentError::Pack(e.to_string()))?;
        Ok(buf.into_inner())
    }
}

/// Markdown rendition of the same document, built fully in memory.
#[derive(Debug, Clone, Default)]
pub struct MarkdownDocument {
    out: String,
}

impl MarkdownDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }
}

impl ReportDocument for MarkdownDocument {
    fn title(&mut self, text: &str) {
        self.out.push_str(&format!("# {}\n\n", text));
    }

    fn heading(&mut self, text: &str, level: usize) {
        let hashes = "#".repeat(level.clamp(1, 5) + 1);
        self.out.push_str(&format!("{} {}\n\n", hashes, text));
    }

    fn paragraph(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push_str("\n\n");
    }

    fn table<T: Tabled>(&mut self, rows: &[T]) {
        let mut builder = Builder::default();
        builder.push_record(header_cells::<T>());
        for row in rows {
            builder.push_record(row_cells(row));
        }
        let table = builder.build().with(TableStyle::markdown()).to_string();
        self.out.push_str(&table);
        self.out.push_str("\n\n");
    }

    fn image(&mut self, path: &Path, _width_inches: f64) -> Result<(), DocumentError> {
        // linked relative to the document, which sits next to the chart
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.out.push_str(&format!("![Alerts per Service]({})\n\n", name));
        Ok(())
    }

    fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        Ok(self.as_str().as_bytes().to_vec())
    }
}
