//! Document renderers.
//!
//! Every format implements [`ReportRenderer`]: take a report record, a list of
//! records or a free-form document as JSON and write a complete file into an
//! in-memory buffer.
//! Renderers are immutable and hold only their configuration (field schema,
//! palette, optional logo path), so one instance serves concurrent requests.

pub mod document;
pub mod docx;
pub mod pdf;
pub mod theme;
pub mod xlsx;

use std::fmt;
use std::io::Cursor;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use utoipa::ToSchema;

pub use self::document::{is_generic_document, GenericDocument};
pub use self::docx::{DocxDocumentRenderer, DocxReportRenderer};
pub use self::pdf::{PdfDocumentRenderer, PdfReportRenderer, StyledPdfRenderer};
pub use self::xlsx::{XlsxDocumentRenderer, XlsxListRenderer, XlsxReportRenderer};

/// Errors raised while building a document.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Input has the wrong shape for this renderer. Raised before any drawing.
    #[error("{0}")]
    Validation(String),
    #[error("PDF generation error: {0}")]
    Pdf(String),
    #[error("DOCX generation error: {0}")]
    Docx(String),
    #[error("XLSX generation error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
    #[error("layout error: {0}")]
    Layout(String),
    #[error("failed to write document buffer: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    pub fn is_validation(&self) -> bool {
        matches!(self, RenderError::Validation(_))
    }
}

/// Output formats the service can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Docx,
    Xlsx,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 3] = [ExportFormat::Pdf, ExportFormat::Docx, ExportFormat::Xlsx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Xlsx => "xlsx",
        }
    }

    /// MIME type sent in the `Content-Type` header.
    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// File extension including the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => ".pdf",
            Self::Docx => ".docx",
            Self::Xlsx => ".xlsx",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "xlsx" => Ok(Self::Xlsx),
            other => Err(format!("unsupported format: {}", other)),
        }
    }
}

/// Local time stamped into document footers.
pub(crate) fn export_timestamp() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Capability shared by all format-specific renderers.
pub trait ReportRenderer: Send + Sync {
    /// Format produced; fixes the content type and extension.
    fn format(&self) -> ExportFormat;

    /// Render `data` into `sink`. The sink's position afterwards is unspecified.
    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError>;

    fn content_type(&self) -> &'static str {
        self.format().content_type()
    }

    fn extension(&self) -> &'static str {
        self.format().extension()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("pdf".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!(" XLSX ".parse::<ExportFormat>(), Ok(ExportFormat::Xlsx));
        assert!("csv".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_format_metadata() {
        for format in ExportFormat::ALL {
            assert!(format.extension().starts_with('.'));
            assert!(format.extension().ends_with(format.as_str()));
            assert!(format.content_type().starts_with("application/"));
        }
    }
}
