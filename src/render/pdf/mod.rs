//! PDF rendering on top of `printpdf`.
//!
//! - `canvas` - cursor-based page layout: wrapping, automatic page breaks, fills
//! - `simple` - plain report layout, one or many records
//! - `styled` - single report with status stamp and optional logo
//! - `document` - free-form document with paragraphs and tables

pub mod canvas;
pub mod document;
pub mod simple;
pub mod styled;

pub use document::PdfDocumentRenderer;
pub use simple::PdfReportRenderer;
pub use styled::StyledPdfRenderer;

use serde_json::Value;

use super::RenderError;

pub(crate) const GENERATED_NOTICE: &str = "Document generated automatically by VALERA ECOSYSTEM";

/// Progress of one record's page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordStage {
    #[default]
    BlankPage,
    HeaderWritten,
    SectionsWritten,
    FooterWritten,
}

impl RecordStage {
    /// Move to `next`, rejecting out-of-order writes.
    pub fn advance(&mut self, next: RecordStage) -> Result<(), RenderError> {
        use RecordStage::*;
        let allowed = matches!(
            (*self, next),
            (BlankPage, HeaderWritten)
                | (HeaderWritten, SectionsWritten)
                | (SectionsWritten, SectionsWritten)
                | (SectionsWritten, FooterWritten)
        );
        if !allowed {
            return Err(RenderError::Layout(format!(
                "cannot move from {:?} to {:?}",
                self, next
            )));
        }
        *self = next;
        Ok(())
    }
}

/// Accept one report object or a non-empty list of report objects.
pub(crate) fn report_records(data: &Value) -> Result<Vec<&Value>, RenderError> {
    match data {
        Value::Object(_) => Ok(vec![data]),
        Value::Array(items) if items.is_empty() => Err(RenderError::Validation(
            "no reports available to export".to_string(),
        )),
        Value::Array(items) if items.iter().all(Value::is_object) => Ok(items.iter().collect()),
        Value::Array(_) => Err(RenderError::Validation(
            "every report in the list must be an object".to_string(),
        )),
        _ => Err(RenderError::Validation(
            "expected a report object or a list of report objects".to_string(),
        )),
    }
}
