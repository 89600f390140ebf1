//! Export dispatch: pick a renderer, run it, and turn the bytes into an
//! attachment response.
//!
//! - `filename` - attachment name safety check and fallback
//! - `handlers` - generic `/export` HTTP endpoints

pub mod filename;
pub mod handlers;

use std::collections::HashMap;
use std::io::{Cursor, Seek, SeekFrom};
use std::path::PathBuf;
use std::sync::Arc;

use actix_web::{http::header, web, HttpResponse};
use serde_json::Value;

use crate::error::ExportError;
use crate::render::{
    is_generic_document, DocxDocumentRenderer, DocxReportRenderer, ExportFormat,
    PdfDocumentRenderer, PdfReportRenderer, RenderError, ReportRenderer, StyledPdfRenderer,
    XlsxDocumentRenderer, XlsxListRenderer, XlsxReportRenderer,
};

pub use filename::{attachment_name, is_safe_filename};

/// Concrete renderer variants the dispatcher knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RendererKind {
    Pdf,
    PdfStyled,
    Docx,
    Xlsx,
    XlsxList,
    PdfDocument,
    DocxDocument,
    XlsxDocument,
}

impl RendererKind {
    /// Default renderer for a requested format. Free-form documents get the
    /// document renderers; spreadsheets of a list become the list workbook.
    pub fn for_format(format: ExportFormat, data: &Value) -> Self {
        if is_generic_document(data) {
            return match format {
                ExportFormat::Pdf => RendererKind::PdfDocument,
                ExportFormat::Docx => RendererKind::DocxDocument,
                ExportFormat::Xlsx => RendererKind::XlsxDocument,
            };
        }
        match format {
            ExportFormat::Pdf => RendererKind::Pdf,
            ExportFormat::Docx => RendererKind::Docx,
            ExportFormat::Xlsx if data.is_array() => RendererKind::XlsxList,
            ExportFormat::Xlsx => RendererKind::Xlsx,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RendererKind::Pdf => "pdf",
            RendererKind::PdfStyled => "pdf_styled",
            RendererKind::Docx => "docx",
            RendererKind::Xlsx => "xlsx",
            RendererKind::XlsxList => "xlsx_list",
            RendererKind::PdfDocument => "pdf_document",
            RendererKind::DocxDocument => "docx_document",
            RendererKind::XlsxDocument => "xlsx_document",
        }
    }
}

/// A rendered document ready to be sent.
#[derive(Debug)]
pub struct ExportedFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportedFile {
    pub fn size_mb(&self) -> f64 {
        self.bytes.len() as f64 / (1024.0 * 1024.0)
    }

    pub fn into_response(self) -> HttpResponse {
        HttpResponse::Ok()
            .content_type(self.content_type)
            .insert_header((
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", self.filename),
            ))
            .insert_header(("X-File-Size-MB", format!("{:.2}", self.size_mb())))
            .body(self.bytes)
    }
}

/// Lookup table from renderer kind to renderer. Immutable once built.
pub struct Exporter {
    renderers: HashMap<RendererKind, Arc<dyn ReportRenderer>>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Exporter {
    pub fn new(logo_path: Option<PathBuf>) -> Self {
        let mut renderers: HashMap<RendererKind, Arc<dyn ReportRenderer>> = HashMap::new();
        renderers.insert(RendererKind::Pdf, Arc::new(PdfReportRenderer::default()));
        renderers.insert(
            RendererKind::PdfStyled,
            Arc::new(StyledPdfRenderer::default().with_logo(logo_path)),
        );
        renderers.insert(RendererKind::Docx, Arc::new(DocxReportRenderer::default()));
        renderers.insert(RendererKind::Xlsx, Arc::new(XlsxReportRenderer::default()));
        renderers.insert(RendererKind::XlsxList, Arc::new(XlsxListRenderer::default()));
        renderers.insert(RendererKind::PdfDocument, Arc::new(PdfDocumentRenderer::default()));
        renderers.insert(RendererKind::DocxDocument, Arc::new(DocxDocumentRenderer));
        renderers.insert(RendererKind::XlsxDocument, Arc::new(XlsxDocumentRenderer::default()));
        Self { renderers }
    }

    /// Empty table, for assembling a custom set of renderers.
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn with_renderer(mut self, kind: RendererKind, renderer: Arc<dyn ReportRenderer>) -> Self {
        self.renderers.insert(kind, renderer);
        self
    }

    /// Render `data` and package it as an attachment named after `filename`.
    pub fn export(
        &self,
        kind: RendererKind,
        data: &Value,
        filename: Option<&str>,
    ) -> Result<ExportedFile, ExportError> {
        let renderer = self
            .renderers
            .get(&kind)
            .ok_or_else(|| ExportError::UnsupportedFormat(kind.name().to_string()))?;

        let mut sink = Cursor::new(Vec::new());
        renderer.render(data, &mut sink)?;

        let size = sink.seek(SeekFrom::End(0)).map_err(RenderError::from)?;
        sink.rewind().map_err(RenderError::from)?;
        if size == 0 {
            return Err(ExportError::EmptyDocument);
        }

        let filename = attachment_name(filename, renderer.extension());
        log::debug!("Rendered {} ({} bytes) with {}", filename, size, kind.name());

        Ok(ExportedFile {
            filename,
            content_type: renderer.content_type(),
            bytes: sink.into_inner(),
        })
    }

    /// [`Exporter::export`] on the blocking thread pool.
    pub async fn export_blocking(
        self: &Arc<Self>,
        kind: RendererKind,
        data: Value,
        filename: Option<String>,
    ) -> Result<ExportedFile, ExportError> {
        let exporter = Arc::clone(self);
        web::block(move || exporter.export(kind, &data, filename.as_deref())).await?
    }
}
