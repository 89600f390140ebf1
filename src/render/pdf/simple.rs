use std::io::Cursor;

use log::debug;
use serde_json::Value;

use super::canvas::{Align, FontFamily, PdfCanvas, TextStyle};
use super::{report_records, RecordStage, GENERATED_NOTICE};
use crate::record::{
    display_field, evidence_entries, text_field, ActionEntry, ActionStatus, FieldSpec,
    NOT_AVAILABLE, NO_ACTIONS, NO_EVIDENCE, REPORT_FIELDS,
};
use crate::render::theme::PdfPalette;
use crate::render::{export_timestamp, ExportFormat, RenderError, ReportRenderer};

const TITLE_SIZE: f32 = 16.0;
const HEADING_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 9.5;
const FOOTER_SIZE: f32 = 8.0;

/// Plain paginated report. One record per page group.
pub struct PdfReportRenderer {
    fields: &'static [FieldSpec],
    palette: PdfPalette,
}

impl Default for PdfReportRenderer {
    fn default() -> Self {
        Self::new(REPORT_FIELDS, PdfPalette::default())
    }
}

impl PdfReportRenderer {
    pub fn new(fields: &'static [FieldSpec], palette: PdfPalette) -> Self {
        Self { fields, palette }
    }

    fn body(&self) -> TextStyle {
        TextStyle::new(BODY_SIZE).color(self.palette.text)
    }

    fn write_record(&self, canvas: &mut PdfCanvas, record: &Value) -> Result<(), RenderError> {
        let mut stage = RecordStage::default();
        canvas.ensure_fresh_page();

        self.write_header(canvas, record);
        stage.advance(RecordStage::HeaderWritten)?;

        self.write_details(canvas, record);
        stage.advance(RecordStage::SectionsWritten)?;

        for (heading, path) in [
            ("Description", "detailedDescription"),
            ("Cause", "findingCause"),
        ] {
            self.heading(canvas, heading);
            canvas.paragraph(&text_field(record, path, NOT_AVAILABLE), self.body());
            canvas.space(3.0);
            stage.advance(RecordStage::SectionsWritten)?;
        }

        let conversation = text_field(record, "conversation", "");
        if !conversation.is_empty() {
            self.heading(canvas, "Conversation");
            canvas.paragraph(&conversation, self.body());
            canvas.space(3.0);
            stage.advance(RecordStage::SectionsWritten)?;
        }

        self.write_evidence(canvas, record);
        self.write_actions(canvas, record);
        stage.advance(RecordStage::SectionsWritten)?;

        self.write_footer(canvas, record);
        stage.advance(RecordStage::FooterWritten)
    }

    fn write_header(&self, canvas: &mut PdfCanvas, record: &Value) {
        let title = text_field(record, "reportTitle", NOT_AVAILABLE);
        canvas.paragraph(
            &format!("LORA Report - {}", title),
            TextStyle::new(TITLE_SIZE)
                .bold()
                .align(Align::Center)
                .color(self.palette.text),
        );
        canvas.space(2.0);

        let meta = self.body().align(Align::Center).color(self.palette.muted);
        canvas.line(
            &format!(
                "Report ID: {}    Code: {}",
                text_field(record, "id", NOT_AVAILABLE),
                text_field(record, "loraReportCode", NOT_AVAILABLE)
            ),
            meta,
        );
        canvas.line(
            &format!(
                "Status: {}    Created: {}",
                text_field(record, "reportStatus", NOT_AVAILABLE).to_uppercase(),
                text_field(record, "createdAt", NOT_AVAILABLE)
            ),
            meta,
        );
        canvas.rule(self.palette.rule);
        canvas.space(2.0);
    }

    fn heading(&self, canvas: &mut PdfCanvas, text: &str) {
        canvas.ensure_space(PdfCanvas::line_height(HEADING_SIZE) * 2.0);
        canvas.line(
            text,
            TextStyle::new(HEADING_SIZE)
                .bold()
                .color(self.palette.text)
                .fill(self.palette.section_fill),
        );
        canvas.space(1.5);
    }

    fn write_details(&self, canvas: &mut PdfCanvas, record: &Value) {
        self.heading(canvas, "Report details");
        for spec in self.fields {
            let value = display_field(record, spec);
            canvas.paragraph(&format!("{}: {}", spec.label, value), self.body());
        }
        canvas.space(3.0);
    }

    fn write_evidence(&self, canvas: &mut PdfCanvas, record: &Value) {
        self.heading(canvas, "Evidence");
        let evidence = evidence_entries(record);
        if evidence.is_empty() {
            canvas.line(NO_EVIDENCE, self.body().italic().color(self.palette.muted));
        }
        for entry in evidence {
            canvas.paragraph(&format!("- {}", entry), self.body().indent(3.0));
        }
        canvas.space(3.0);
    }

    fn write_actions(&self, canvas: &mut PdfCanvas, record: &Value) {
        self.heading(canvas, "Actions");
        let actions = ActionEntry::all(record);
        if actions.is_empty() {
            canvas.line(NO_ACTIONS, self.body().italic().color(self.palette.muted));
        }
        for (index, action) in actions.iter().enumerate() {
            let fill = match action.status {
                ActionStatus::Closed => self.palette.action_closed,
                ActionStatus::Open => self.palette.action_open,
            };
            let style = self.body().fill(fill);
            canvas.paragraph(&format!("{}. {}", index + 1, action.description), style.bold());
            canvas.line(&format!("   Responsible: {}", action.responsible), style);
            canvas.line(&format!("   Due date: {}", action.due_date), style);
            canvas.line(&format!("   Status: {}", action.status_label), style);
            canvas.space(2.0);
        }
    }

    fn write_footer(&self, canvas: &mut PdfCanvas, record: &Value) {
        let style = TextStyle::new(FOOTER_SIZE)
            .align(Align::Center)
            .color(self.palette.muted);
        canvas.pin_to_bottom(PdfCanvas::line_height(FOOTER_SIZE) * 3.0 + 4.0);
        canvas.rule(self.palette.rule);
        canvas.line(
            &format!(
                "Report ID: {}    Exported: {}",
                text_field(record, "id", NOT_AVAILABLE),
                export_timestamp()
            ),
            style,
        );
        canvas.line(GENERATED_NOTICE, style.italic());
    }
}

impl ReportRenderer for PdfReportRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        let records = report_records(data)?;

        let mut canvas = PdfCanvas::new("LORA Report", FontFamily::HELVETICA, None)?;
        for record in &records {
            self.write_record(&mut canvas, record)?;
        }

        debug!(
            "Simple PDF laid out {} record(s) on {} page(s)",
            records.len(),
            canvas.pages()
        );
        canvas.finish(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "id": 17,
            "reportTitle": "Gas leak near pump",
            "reportStatus": "open",
            "loraReportCode": "LR-017",
            "createdAt": "2024-03-01",
            "detailedDescription": "Strong smell of gas near pump 3.",
            "findingCause": "Worn gasket",
            "reportEvidence": "leak found",
            "actions": [
                { "description": "Replace gasket", "responsible": "Maintenance", "dueDate": "2024-03-05", "status": "close" },
                { "description": "Inspect line", "status": "open" }
            ]
        })
    }

    fn render(data: &Value) -> Result<Vec<u8>, RenderError> {
        let mut sink = Cursor::new(Vec::new());
        PdfReportRenderer::default().render(data, &mut sink)?;
        Ok(sink.into_inner())
    }

    #[test]
    fn test_single_record_renders_pdf() {
        let bytes = render(&sample()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_list_of_records_renders_pdf() {
        let bytes = render(&json!([sample(), { "id": 2 }])).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_sparse_record_is_tolerated() {
        assert!(render(&json!({})).is_ok());
        assert!(render(&json!({ "actions": "call back", "evidence": [] })).is_ok());
    }

    #[test]
    fn test_invalid_shapes_are_rejected() {
        assert!(render(&json!([])).unwrap_err().is_validation());
        assert!(render(&json!("text")).unwrap_err().is_validation());
        assert!(render(&json!([{ "id": 1 }, 2])).unwrap_err().is_validation());
    }

    #[test]
    fn test_long_text_spans_pages() {
        let mut record = sample();
        record["detailedDescription"] = json!("word ".repeat(4000));
        let bytes = render(&record).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
