use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Run, Table, TableRow};
use log::debug;
use serde_json::Value;

use super::{base_docx, bold_paragraph, cell, heading, pack, text_paragraph, TITLE_SIZE};
use crate::record::{format_value, scalar_text};
use crate::render::document::{key_label, DocumentTable, GenericDocument};
use crate::render::{ExportFormat, RenderError, ReportRenderer};

// usable width of an A4 page in twentieths of a point
const TABLE_WIDTH: usize = 9000;

/// Free-form Word document: centred title, paragraphs and grid tables.
#[derive(Default)]
pub struct DocxDocumentRenderer;

impl DocxDocumentRenderer {
    fn table(docx: Docx, table: &DocumentTable) -> Docx {
        let width = TABLE_WIDTH / table.headers.len().max(1);

        let mut rows = vec![TableRow::new(
            table
                .headers
                .iter()
                .map(|header| cell(bold_paragraph(header), width))
                .collect(),
        )];
        for row in 0..table.rows.len() {
            rows.push(TableRow::new(
                table
                    .row_text(row)
                    .iter()
                    .map(|text| cell(text_paragraph(text), width))
                    .collect(),
            ));
        }

        let docx = match &table.title {
            Some(title) => docx.add_paragraph(heading(title)),
            None => docx,
        };
        docx.add_table(Table::new(rows).set_grid(vec![width; table.headers.len()]))
            .add_paragraph(Paragraph::new())
    }
}

impl ReportRenderer for DocxDocumentRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        if data.is_null() {
            return Err(RenderError::Validation("document data is required".to_string()));
        }
        let doc = GenericDocument::from_value(data);
        let mut docx = base_docx();

        if let Some(text) = &doc.plain_text {
            docx = docx.add_paragraph(text_paragraph(text));
        }

        if let Some(title) = &doc.title {
            docx = docx.add_paragraph(
                Paragraph::new()
                    .add_run(Run::new().add_text(title).bold().size(TITLE_SIZE))
                    .align(AlignmentType::Center),
            );
        }

        for text in doc.summary.iter().chain(doc.content.iter()) {
            docx = docx.add_paragraph(text_paragraph(text));
        }

        for table in doc.renderable_tables() {
            docx = Self::table(docx, table);
        }

        if !doc.metrics.is_empty() {
            docx = docx.add_paragraph(heading("Key metrics"));
            for (key, value) in &doc.metrics {
                docx = docx.add_paragraph(text_paragraph(&format!("{}: {}", key, value)));
            }
        }

        if !doc.additional.is_empty() {
            docx = docx.add_paragraph(heading("Additional information"));
            for (key, value) in &doc.additional {
                let text = match value {
                    Value::Object(_) | Value::Array(_) => format_value(value),
                    scalar => scalar_text(scalar),
                };
                docx = docx.add_paragraph(text_paragraph(&format!("{}: {}", key_label(key), text)));
            }
        }

        pack(docx, sink)?;
        debug!("DOCX document size: {} bytes", sink.get_ref().len());
        Ok(())
    }
}
