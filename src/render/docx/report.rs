use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Footer, Paragraph, Run, Table, TableRow};
use log::debug;
use serde_json::Value;

use super::{base_docx, bold_paragraph, cell, centered, heading, pack, text_paragraph, TITLE_SIZE};
use crate::record::{
    display_field, evidence_entries, text_field, ActionEntry, FieldSpec, NOT_AVAILABLE,
    NO_ACTIONS, NO_EVIDENCE, REPORT_FIELDS,
};
use crate::render::{export_timestamp, ExportFormat, RenderError, ReportRenderer};

const LABEL_COLUMN_WIDTH: usize = 2800;
const VALUE_COLUMN_WIDTH: usize = 6200;

/// Word document for one report: header, field table, text sections,
/// evidence, numbered actions and a page footer.
pub struct DocxReportRenderer {
    fields: &'static [FieldSpec],
}

impl Default for DocxReportRenderer {
    fn default() -> Self {
        Self::new(REPORT_FIELDS)
    }
}

impl DocxReportRenderer {
    pub fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    fn header(&self, docx: Docx, record: &Value) -> Docx {
        let title = text_field(record, "reportTitle", "Finding report").to_uppercase();
        let code = text_field(record, "loraReportCode", NOT_AVAILABLE);
        let status = text_field(record, "reportStatus", NOT_AVAILABLE).to_uppercase();
        let created = text_field(record, "createdAt", NOT_AVAILABLE);

        docx.add_paragraph(
            Paragraph::new()
                .add_run(Run::new().add_text(title).bold().size(TITLE_SIZE))
                .align(AlignmentType::Center),
        )
        .add_paragraph(centered(&format!("Code: {}    Status: {}", code, status)))
        .add_paragraph(centered(&format!("Created: {}", created)))
        .add_paragraph(Paragraph::new())
    }

    fn field_table(&self, record: &Value) -> Table {
        let mut rows = vec![TableRow::new(vec![
            cell(bold_paragraph("Field"), LABEL_COLUMN_WIDTH),
            cell(bold_paragraph("Value"), VALUE_COLUMN_WIDTH),
        ])];

        for spec in self.fields {
            let value = display_field(record, spec);
            rows.push(TableRow::new(vec![
                cell(text_paragraph(spec.label), LABEL_COLUMN_WIDTH),
                cell(text_paragraph(&value), VALUE_COLUMN_WIDTH),
            ]));
        }

        Table::new(rows).set_grid(vec![LABEL_COLUMN_WIDTH, VALUE_COLUMN_WIDTH])
    }

    fn actions(&self, mut docx: Docx, record: &Value) -> Docx {
        docx = docx.add_paragraph(heading("Actions"));
        let actions = ActionEntry::all(record);
        if actions.is_empty() {
            return docx.add_paragraph(text_paragraph(&format!("{}.", NO_ACTIONS)));
        }

        for (index, action) in actions.iter().enumerate() {
            docx = docx
                .add_paragraph(
                    Paragraph::new().add_run(
                        Run::new()
                            .add_text(format!("{}. {}", index + 1, action.description))
                            .bold(),
                    ),
                )
                .add_paragraph(text_paragraph(&format!("   Responsible: {}", action.responsible)))
                .add_paragraph(text_paragraph(&format!("   Due date: {}", action.due_date)))
                .add_paragraph(text_paragraph(&format!("   Status: {}", action.status_label)))
                .add_paragraph(Paragraph::new());
        }
        docx
    }
}

impl ReportRenderer for DocxReportRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Docx
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        if !data.is_object() {
            return Err(RenderError::Validation(
                "a single report object is required".to_string(),
            ));
        }

        let mut docx = self.header(base_docx(), data);
        docx = docx
            .add_paragraph(heading("Report details"))
            .add_table(self.field_table(data))
            .add_paragraph(Paragraph::new());

        for (title, path) in [
            ("Description", "detailedDescription"),
            ("Cause", "findingCause"),
            ("Conversation", "conversation"),
        ] {
            let text = text_field(data, path, "");
            if !text.is_empty() {
                docx = docx
                    .add_paragraph(heading(title))
                    .add_paragraph(text_paragraph(&text));
            }
        }

        docx = docx.add_paragraph(heading("Evidence"));
        let evidence = evidence_entries(data);
        if evidence.is_empty() {
            docx = docx.add_paragraph(text_paragraph(&format!("{}.", NO_EVIDENCE)));
        }
        for entry in &evidence {
            docx = docx.add_paragraph(text_paragraph(&format!("\u{2022} {}", entry)));
        }

        docx = self.actions(docx, data);

        let footer = Footer::new().add_paragraph(centered(&format!(
            "ID: {}  |  Exported: {}  |  VALERA ECOSYSTEM",
            text_field(data, "id", NOT_AVAILABLE),
            export_timestamp()
        )));
        docx = docx.footer(footer);

        pack(docx, sink)?;
        debug!("DOCX buffer size: {} bytes", sink.get_ref().len());
        Ok(())
    }
}
