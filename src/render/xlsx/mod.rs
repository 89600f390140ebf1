//! Spreadsheet rendering on top of `rust_xlsxwriter`.
//!
//! - `report` - one record as Summary, Details and Actions sheets
//! - `list` - many records as one banded table
//! - `document` - free-form tables, one sheet each

pub mod document;
pub mod list;
pub mod report;

pub use document::XlsxDocumentRenderer;
pub use list::XlsxListRenderer;
pub use report::XlsxReportRenderer;

use std::borrow::Cow;
use std::io::{Cursor, Write};

use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};

use super::theme::Rgb;
use super::RenderError;
use crate::record::CellValue;

/// Most characters a single cell accepts.
pub const MAX_CELL_CHARS: usize = 32_767;
const TRUNCATION_MARK: char = '\u{2026}';

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::RGB(rgb.to_hex())
    }
}

/// Column width for content of `max_len` characters, padded and capped.
pub fn column_width(max_len: usize, padding: usize, cap: usize) -> f64 {
    (max_len + padding).min(cap) as f64
}

/// `text` cut to [`MAX_CELL_CHARS`], ending in an ellipsis when shortened.
pub fn cell_text(text: &str) -> Cow<'_, str> {
    if text.chars().count() <= MAX_CELL_CHARS {
        return Cow::Borrowed(text);
    }
    let mut clipped: String = text.chars().take(MAX_CELL_CHARS - 1).collect();
    clipped.push(TRUNCATION_MARK);
    Cow::Owned(clipped)
}

/// Write one typed cell; text goes through [`cell_text`].
pub(crate) fn write_cell(
    sheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
    format: &Format,
) -> Result<(), RenderError> {
    match cell {
        CellValue::Empty => sheet.write_blank(row, col, format)?,
        CellValue::Number(number) => sheet.write_number_with_format(row, col, *number, format)?,
        CellValue::Bool(flag) => sheet.write_boolean_with_format(row, col, *flag, format)?,
        CellValue::Text(text) => sheet.write_string_with_format(row, col, cell_text(text), format)?,
    };
    Ok(())
}

/// Solid background with a thin border, the base of every table cell.
pub(crate) fn filled(fill: Rgb, border: Rgb) -> Format {
    Format::new()
        .set_pattern(FormatPattern::Solid)
        .set_background_color(fill)
        .set_border(FormatBorder::Thin)
        .set_border_color(border)
}

pub(crate) fn bordered(border: Rgb) -> Format {
    Format::new()
        .set_border(FormatBorder::Thin)
        .set_border_color(border)
}

/// Serialize the workbook and append it to `sink`.
pub(crate) fn save_into(
    workbook: &mut Workbook,
    sink: &mut Cursor<Vec<u8>>,
) -> Result<usize, RenderError> {
    let buffer = workbook.save_to_buffer()?;
    sink.write_all(&buffer)?;
    Ok(buffer.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text_is_capped_with_marker() {
        assert_eq!(cell_text("short"), "short");

        let exact = "y".repeat(MAX_CELL_CHARS);
        assert!(matches!(cell_text(&exact), Cow::Borrowed(_)));

        let clipped = cell_text(&"\u{e9}".repeat(40_000)).into_owned();
        assert_eq!(clipped.chars().count(), MAX_CELL_CHARS);
        assert!(clipped.ends_with('\u{2026}'));
    }

    #[test]
    fn test_column_width_is_padded_and_capped() {
        assert_eq!(column_width(10, 5, 50), 15.0);
        assert_eq!(column_width(45, 5, 50), 50.0);
        assert_eq!(column_width(300, 5, 50), 50.0);
        assert_eq!(column_width(0, 5, 50), 5.0);
    }
}
