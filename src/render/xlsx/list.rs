use std::io::Cursor;

use log::debug;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use serde_json::Value;

use super::{column_width, filled, save_into, write_cell};
use crate::record::{cell_value, resolve, CellValue, FieldSpec, REPORT_FIELDS};
use crate::render::theme::XlsxListPalette;
use crate::render::{ExportFormat, RenderError, ReportRenderer};

const WIDTH_PADDING: usize = 5;
const WIDTH_CAP: usize = 50;

/// One row per report on a single banded "Reports" sheet.
pub struct XlsxListRenderer {
    fields: &'static [FieldSpec],
    palette: XlsxListPalette,
}

impl Default for XlsxListRenderer {
    fn default() -> Self {
        Self::new(REPORT_FIELDS, XlsxListPalette::default())
    }
}

impl XlsxListRenderer {
    pub fn new(fields: &'static [FieldSpec], palette: XlsxListPalette) -> Self {
        Self { fields, palette }
    }

    /// Cell grid for `records`; non-object entries become empty rows.
    fn rows(&self, records: &[Value]) -> Vec<Vec<CellValue>> {
        records
            .iter()
            .map(|record| {
                self.fields
                    .iter()
                    .map(|spec| {
                        if record.is_object() {
                            cell_value(&resolve(record, spec.path))
                        } else {
                            CellValue::Empty
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Longest displayed value per column, header included.
    fn column_lengths(&self, rows: &[Vec<CellValue>]) -> Vec<usize> {
        self.fields
            .iter()
            .enumerate()
            .map(|(col, spec)| {
                rows.iter()
                    .filter_map(|row| row.get(col))
                    .map(CellValue::display_len)
                    .chain(std::iter::once(spec.label.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }
}

impl ReportRenderer for XlsxListRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        let Value::Array(records) = data else {
            return Err(RenderError::Validation(
                "a list of reports is required".to_string(),
            ));
        };

        let p = &self.palette;
        let rows = self.rows(records);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Reports")?;

        let header = filled(p.header_fill, p.border)
            .set_bold()
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        for (col, spec) in self.fields.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, spec.label, &header)?;
        }
        sheet.set_row_height(0, 20)?;

        for (index, cells) in rows.iter().enumerate() {
            let row = index as u32 + 1;
            // banding counts from the header row, so the first data row is "even"
            let fill = if row % 2 == 1 {
                p.even_row_fill
            } else {
                p.odd_row_fill
            };
            let format = filled(fill, p.border)
                .set_text_wrap()
                .set_align(FormatAlign::Top);

            for (col, cell) in cells.iter().enumerate() {
                write_cell(sheet, row, col as u16, cell, &format)?;
            }
            sheet.set_row_height(row, 30)?;
        }

        for (col, max_len) in self.column_lengths(&rows).into_iter().enumerate() {
            sheet.set_column_width(col as u16, column_width(max_len, WIDTH_PADDING, WIDTH_CAP))?;
        }

        let size = save_into(&mut workbook, sink)?;
        debug!("XLSX list of {} report(s): {} bytes", records.len(), size);
        Ok(())
    }
}
