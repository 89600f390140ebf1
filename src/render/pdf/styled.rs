use std::io::Cursor;
use std::path::PathBuf;

use log::{debug, warn};
use serde_json::Value;

use super::canvas::{Align, FontFamily, PdfCanvas, TextStyle, MARGIN, PAGE_HEIGHT};
use super::{RecordStage, GENERATED_NOTICE};
use crate::record::{
    evidence_entries, format_value, resolve, text_field, ActionEntry, ActionStatus, FieldSpec,
    NOT_AVAILABLE, NO_EVIDENCE, STYLED_SUMMARY_FIELDS,
};
use crate::render::theme::StyledPdfPalette;
use crate::render::{ExportFormat, RenderError, ReportRenderer};

const STAMP_X: f32 = 150.0;
const STAMP_TOP: f32 = PAGE_HEIGHT - 15.0;
const STAMP_WIDTH: f32 = 45.0;
const STAMP_HEIGHT: f32 = 10.0;
const LOGO_HEIGHT: f32 = 18.0;

const BODY_SIZE: f32 = 10.0;

/// Single-report PDF on cream paper with an OPEN/CLOSED stamp.
pub struct StyledPdfRenderer {
    summary_fields: &'static [FieldSpec],
    palette: StyledPdfPalette,
    logo_path: Option<PathBuf>,
}

impl Default for StyledPdfRenderer {
    fn default() -> Self {
        Self::new(STYLED_SUMMARY_FIELDS, StyledPdfPalette::default(), None)
    }
}

impl StyledPdfRenderer {
    pub fn new(
        summary_fields: &'static [FieldSpec],
        palette: StyledPdfPalette,
        logo_path: Option<PathBuf>,
    ) -> Self {
        Self {
            summary_fields,
            palette,
            logo_path,
        }
    }

    pub fn with_logo(mut self, logo_path: Option<PathBuf>) -> Self {
        self.logo_path = logo_path;
        self
    }

    fn body(&self) -> TextStyle {
        TextStyle::new(BODY_SIZE).color(self.palette.text_dark)
    }

    fn draw_logo(&self, canvas: &mut PdfCanvas) {
        let Some(path) = &self.logo_path else {
            return;
        };
        if !path.is_file() {
            warn!("Logo not found at {}, rendering without it", path.display());
            return;
        }
        if let Err(e) = canvas.image(path, MARGIN, PAGE_HEIGHT - MARGIN, LOGO_HEIGHT) {
            warn!("Could not embed logo {}: {}", path.display(), e);
        }
    }

    fn draw_stamp(&self, canvas: &mut PdfCanvas, record: &Value) {
        let status = text_field(record, "reportStatus", "open").to_lowercase();
        let (text, fill, border) = if status == "open" {
            ("OPEN", self.palette.open_stamp_fill, self.palette.open_stamp_border)
        } else {
            ("CLOSED", self.palette.closed_stamp_fill, self.palette.closed_stamp_border)
        };
        canvas.stamp(
            STAMP_X,
            STAMP_TOP,
            STAMP_WIDTH,
            STAMP_HEIGHT,
            text,
            TextStyle::new(14.0).bold().fill(fill),
            border,
        );
    }

    fn draw_header(&self, canvas: &mut PdfCanvas, record: &Value) {
        canvas.space(20.0);
        canvas.line(
            &format!("CODE: {}", text_field(record, "loraReportCode", "No code")),
            TextStyle::new(11.0).bold().color(self.palette.text_brown),
        );
        canvas.paragraph(
            &text_field(record, "reportTitle", "Untitled").to_uppercase(),
            TextStyle::new(18.0).bold().color(self.palette.text_dark),
        );
        canvas.line(
            &format!("Created: {}", text_field(record, "createdAt", NOT_AVAILABLE)),
            TextStyle::new(9.0).color(self.palette.text_brown),
        );
        canvas.rule(self.palette.border);
    }

    fn block_title(&self, canvas: &mut PdfCanvas, title: &str) {
        canvas.space(3.0);
        canvas.ensure_space(PdfCanvas::line_height(12.0) * 3.0);
        canvas.line(
            &title.to_uppercase(),
            TextStyle::new(12.0)
                .bold()
                .color(self.palette.text_brown)
                .fill(self.palette.block_fill),
        );
        canvas.rule(self.palette.border);
    }

    fn draw_summary(&self, canvas: &mut PdfCanvas, record: &Value) {
        self.block_title(canvas, "Summary");
        let cells: Vec<String> = self
            .summary_fields
            .iter()
            .map(|spec| format!("{}: {}", spec.label, format_value(&resolve(record, spec.path))))
            .collect();
        let style = self.body().fill(self.palette.summary_fill);
        for pair in cells.chunks(2) {
            canvas.grid_row(pair, style, 1.5);
        }
    }

    fn draw_paragraph_block(&self, canvas: &mut PdfCanvas, title: &str, text: &str) {
        self.block_title(canvas, title);
        canvas.paragraph(text, self.body());
    }

    fn draw_actions(&self, canvas: &mut PdfCanvas, actions: &[ActionEntry]) {
        self.block_title(canvas, "Actions");
        for action in actions {
            let fill = match action.status {
                ActionStatus::Closed => self.palette.action_closed,
                ActionStatus::Open => self.palette.action_open,
            };
            canvas.paragraph(
                &format!("Action: {}", action.description),
                self.body().bold().fill(fill),
            );
            let detail = TextStyle::new(9.0).color(self.palette.text_dark).indent(3.0);
            canvas.line(&format!("Responsible: {}", action.responsible), detail);
            canvas.line(&format!("Due date: {}", action.due_date), detail);
            canvas.line(&format!("Status: {}", action.status_label), detail);
            canvas.space(2.0);
        }
    }

    fn draw_footer(&self, canvas: &mut PdfCanvas, record: &Value) {
        let style = TextStyle::new(8.0).italic().color(self.palette.text_brown);
        canvas.space(8.0);
        canvas.rule(self.palette.border);
        canvas.line(
            &format!("ID: {}", text_field(record, "id", NOT_AVAILABLE)),
            style.align(Align::Right),
        );
        canvas.line(GENERATED_NOTICE, style.align(Align::Center));
    }
}

impl ReportRenderer for StyledPdfRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Pdf
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        if !data.is_object() {
            return Err(RenderError::Validation(
                "a single report object is required".to_string(),
            ));
        }

        let mut canvas = PdfCanvas::new(
            "LORA Report",
            FontFamily::COURIER,
            Some(self.palette.background),
        )?;
        let mut stage = RecordStage::default();

        self.draw_logo(&mut canvas);
        self.draw_stamp(&mut canvas, data);
        self.draw_header(&mut canvas, data);
        stage.advance(RecordStage::HeaderWritten)?;

        self.draw_summary(&mut canvas, data);
        stage.advance(RecordStage::SectionsWritten)?;

        for (title, path) in [
            ("Description", "detailedDescription"),
            ("Cause", "findingCause"),
            ("Conversation", "conversation"),
        ] {
            let text = text_field(data, path, "");
            if !text.is_empty() {
                self.draw_paragraph_block(&mut canvas, title, &text);
            }
        }

        let evidence = evidence_entries(data);
        if evidence.is_empty() {
            self.draw_paragraph_block(&mut canvas, "Evidence", NO_EVIDENCE);
        } else {
            self.block_title(&mut canvas, "Evidence");
            for entry in &evidence {
                canvas.paragraph(&format!("- {}", entry), self.body());
            }
        }

        let actions = ActionEntry::all(data);
        if !actions.is_empty() {
            self.draw_actions(&mut canvas, &actions);
        }
        stage.advance(RecordStage::SectionsWritten)?;

        self.draw_footer(&mut canvas, data);
        stage.advance(RecordStage::FooterWritten)?;

        debug!("Styled PDF laid out on {} page(s)", canvas.pages());
        canvas.finish(sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn sample(status: &str) -> Value {
        json!({
            "id": 5,
            "loraReportCode": "LR-005",
            "reportTitle": "Loose handrail",
            "reportStatus": status,
            "project": "North",
            "createdBy": "inspector",
            "detailedDescription": "Handrail on stairs is loose.",
            "evidence": ["photo1.jpg"],
            "actions": [{ "description": "Tighten bolts", "status": "close" }]
        })
    }

    fn render(renderer: &StyledPdfRenderer, data: &Value) -> Result<Vec<u8>, RenderError> {
        let mut sink = Cursor::new(Vec::new());
        renderer.render(data, &mut sink)?;
        Ok(sink.into_inner())
    }

    #[test]
    fn test_open_and_closed_reports_render() {
        let renderer = StyledPdfRenderer::default();
        for status in ["open", "closed"] {
            let bytes = render(&renderer, &sample(status)).unwrap();
            assert!(bytes.starts_with(b"%PDF"));
        }
    }

    #[test]
    fn test_list_input_is_rejected() {
        let renderer = StyledPdfRenderer::default();
        let err = render(&renderer, &json!([sample("open")])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_missing_logo_is_skipped() {
        let renderer = StyledPdfRenderer::default()
            .with_logo(Some(PathBuf::from("/nonexistent/logo.png")));
        assert!(render(&renderer, &sample("open")).is_ok());
    }

    #[test]
    fn test_undecodable_logo_is_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not an image").unwrap();
        let renderer =
            StyledPdfRenderer::default().with_logo(Some(file.path().to_path_buf()));
        assert!(render(&renderer, &sample("closed")).is_ok());
    }

    #[test]
    fn test_empty_record_renders() {
        assert!(render(&StyledPdfRenderer::default(), &json!({})).is_ok());
    }
}
