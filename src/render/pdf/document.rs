use std::io::Cursor;

use log::debug;
use serde_json::Value;

use super::canvas::{Align, FontFamily, PdfCanvas, TextStyle};
use crate::record::{format_value, scalar_text};
use crate::render::document::{key_label, DocumentTable, GenericDocument};
use crate::render::theme::DocumentPalette;
use crate::render::{export_timestamp, ExportFormat, RenderError, ReportRenderer};

const BANNER_SIZE: f32 = 20.0;
const TITLE_SIZE: f32 = 18.0;
const SECTION_SIZE: f32 = 14.0;
const TABLE_TITLE_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 11.0;
const CELL_SIZE: f32 = 9.0;
const METRIC_VALUE_SIZE: f32 = 16.0;
const SMALL_SIZE: f32 = 8.0;
const METRICS_PER_ROW: usize = 3;

const DOCUMENT_NOTICE: &str = "Document generated automatically by VALERA export file service";

/// Free-form document: title banner, summary, paragraphs, tables, metrics.
#[derive(Default)]
pub struct PdfDocumentRenderer {
    palette: DocumentPalette,
}

impl PdfDocumentRenderer {
    pub fn new(palette: DocumentPalette) -> Self {
        Self { palette }
    }

    fn body(&self) -> TextStyle {
        TextStyle::new(BODY_SIZE).color(self.palette.secondary)
    }

    fn write_header(&self, canvas: &mut PdfCanvas) {
        let p = &self.palette;
        canvas.rule(p.primary);
        canvas.space(4.0);
        canvas.line(
            "REPORT",
            TextStyle::new(BANNER_SIZE).bold().align(Align::Center).color(p.primary),
        );
        canvas.line(
            &format!("Generated: {}", export_timestamp()),
            TextStyle::new(10.0).align(Align::Right).color(p.muted),
        );
        canvas.rule(p.light);
        canvas.space(4.0);
    }

    fn section(&self, canvas: &mut PdfCanvas, title: &str) {
        canvas.space(4.0);
        canvas.ensure_space(PdfCanvas::line_height(SECTION_SIZE) * 3.0);
        canvas.line(title, TextStyle::new(SECTION_SIZE).bold().color(self.palette.secondary));
        canvas.rule(self.palette.primary);
        canvas.space(3.0);
    }

    fn paragraphs(&self, canvas: &mut PdfCanvas, paragraphs: &[String]) {
        for text in paragraphs {
            canvas.paragraph(text, self.body().indent(5.0));
            canvas.space(2.0);
        }
    }

    fn table(&self, canvas: &mut PdfCanvas, table: &DocumentTable, fallback_title: &str) {
        let p = &self.palette;
        let title = table.title.as_deref().unwrap_or(fallback_title);
        canvas.space(2.0);
        canvas.line(title, TextStyle::new(TABLE_TITLE_SIZE).bold().color(p.secondary));
        canvas.space(1.0);

        let header = TextStyle::new(CELL_SIZE + 1.0).bold().color(p.white).fill(p.primary);
        canvas.grid_row(&table.headers, header, 0.0);

        for row in 0..table.rows.len() {
            let style = TextStyle::new(CELL_SIZE).color(p.secondary);
            let style = if row % 2 == 0 { style.fill(p.light) } else { style };
            canvas.grid_row(&table.row_text(row), style, 0.0);
        }
        canvas.rule(p.primary);
        canvas.space(4.0);
    }

    fn metrics(&self, canvas: &mut PdfCanvas, metrics: &[(String, String)]) {
        let p = &self.palette;
        self.section(canvas, "KEY METRICS");
        for chunk in metrics.chunks(METRICS_PER_ROW) {
            let values: Vec<String> = chunk.iter().map(|(_, value)| value.clone()).collect();
            let labels: Vec<String> = chunk.iter().map(|(key, _)| key.clone()).collect();
            canvas.grid_row(
                &values,
                TextStyle::new(METRIC_VALUE_SIZE).bold().color(p.primary).fill(p.light),
                0.0,
            );
            canvas.grid_row(&labels, TextStyle::new(CELL_SIZE).color(p.muted).fill(p.light), 5.0);
        }
    }

    fn additional(&self, canvas: &mut PdfCanvas, entries: &[(String, Value)]) {
        self.section(canvas, "ADDITIONAL INFORMATION");
        for (key, value) in entries {
            match value {
                Value::Object(_) | Value::Array(_) => {
                    canvas.line(
                        &key_label(key).to_uppercase(),
                        TextStyle::new(TABLE_TITLE_SIZE).bold().color(self.palette.secondary),
                    );
                    canvas.paragraph(&format_value(value), self.body().indent(5.0));
                }
                scalar => {
                    canvas.paragraph(
                        &format!("{}: {}", key_label(key), scalar_text(scalar)),
                        self.body(),
                    );
                }
            }
            canvas.space(2.0);
        }
    }

    fn write_footer(&self, canvas: &mut PdfCanvas) {
        let style = TextStyle::new(SMALL_SIZE).align(Align::Center).color(self.palette.muted);
        canvas.pin_to_bottom(PdfCanvas::line_height(SMALL_SIZE) * 2.0 + 4.0);
        canvas.rule(self.palette.light);
        canvas.line(DOCUMENT_NOTICE, style.italic());
        let page = format!("Page {}", canvas.pages());
        canvas.line(&page, style);
    }
}

impl ReportRenderer for PdfDocumentRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        if data.is_null() {
            return Err(RenderError::Validation("document data is required".to_string()));
        }
        let doc = GenericDocument::from_value(data);

        let mut canvas = PdfCanvas::new("Report", FontFamily::HELVETICA, None)?;
        self.write_header(&mut canvas);

        if let Some(text) = &doc.plain_text {
            self.section(&mut canvas, "INFORMATION");
            self.paragraphs(&mut canvas, std::slice::from_ref(text));
        }

        if let Some(title) = &doc.title {
            canvas.paragraph(
                title,
                TextStyle::new(TITLE_SIZE)
                    .bold()
                    .align(Align::Center)
                    .color(self.palette.white)
                    .fill(self.palette.primary),
            );
            canvas.space(4.0);
        }

        if !doc.summary.is_empty() {
            self.section(&mut canvas, "EXECUTIVE SUMMARY");
            self.paragraphs(&mut canvas, &doc.summary);
        }
        if !doc.content.is_empty() {
            self.section(&mut canvas, "CONTENT");
            self.paragraphs(&mut canvas, &doc.content);
        }

        let tables: Vec<&DocumentTable> = doc.tables.iter().filter(|t| t.is_renderable()).collect();
        if !tables.is_empty() {
            self.section(&mut canvas, "DATA AND ANALYSIS");
            for (index, table) in tables.iter().enumerate() {
                self.table(&mut canvas, table, &format!("Table {}", index + 1));
            }
        }
        if let Some(table) = doc.main_table.as_ref().filter(|t| t.is_renderable()) {
            self.section(&mut canvas, "MAIN INFORMATION");
            self.table(&mut canvas, table, "Main data");
        }

        if !doc.metrics.is_empty() {
            self.metrics(&mut canvas, &doc.metrics);
        }
        if !doc.additional.is_empty() {
            self.additional(&mut canvas, &doc.additional);
        }

        self.write_footer(&mut canvas);

        debug!("Document PDF laid out on {} page(s)", canvas.pages());
        canvas.finish(sink)
    }
}
