//! Word documents on top of `docx-rs`.
//!
//! - `report` - one LORA report with field table, evidence and actions
//! - `document` - free-form document with paragraphs and tables

pub mod document;
pub mod report;

pub use document::DocxDocumentRenderer;
pub use report::DocxReportRenderer;

use std::io::Cursor;

use docx_rs::{
    AlignmentType, BreakType, Docx, Paragraph, Run, RunFonts, TableCell, WidthType,
};

use super::RenderError;

const BASE_FONT: &str = "Courier New";
// docx sizes are in half-points
const BASE_SIZE: usize = 20;
pub(crate) const TITLE_SIZE: usize = 32;
const HEADING_SIZE: usize = 26;

/// Empty document with the shared font setup.
pub(crate) fn base_docx() -> Docx {
    Docx::new()
        .default_fonts(
            RunFonts::new()
                .ascii(BASE_FONT)
                .hi_ansi(BASE_FONT)
                .east_asia(BASE_FONT)
                .cs(BASE_FONT),
        )
        .default_size(BASE_SIZE)
}

pub(crate) fn pack(docx: Docx, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
    docx.build()
        .pack(&mut *sink)
        .map_err(|e| RenderError::Docx(e.to_string()))
}

pub(crate) fn heading(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold().size(HEADING_SIZE))
}

pub(crate) fn centered(text: &str) -> Paragraph {
    text_paragraph(text).align(AlignmentType::Center)
}

/// One paragraph; embedded newlines become line breaks.
pub(crate) fn text_paragraph(text: &str) -> Paragraph {
    let mut run = Run::new();
    for (index, line) in text.split('\n').enumerate() {
        if index > 0 {
            run = run.add_break(BreakType::TextWrapping);
        }
        run = run.add_text(line);
    }
    Paragraph::new().add_run(run)
}

pub(crate) fn bold_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text).bold())
}

pub(crate) fn cell(paragraph: Paragraph, width: usize) -> TableCell {
    TableCell::new()
        .add_paragraph(paragraph)
        .width(width, WidthType::Dxa)
}
