use std::io::Cursor;

use log::debug;
use rust_xlsxwriter::{Format, FormatAlign, Workbook};
use serde_json::Value;

use super::{bordered, cell_text, column_width, filled, save_into, write_cell};
use crate::record::{cell_value, CellValue};
use crate::render::document::{DocumentTable, GenericDocument};
use crate::render::theme::XlsxDocumentPalette;
use crate::render::{ExportFormat, RenderError, ReportRenderer};

const WIDTH_PADDING: usize = 2;
const WIDTH_CAP: usize = 50;
const MAX_SHEET_NAME: usize = 31;
const FORBIDDEN_IN_SHEET_NAME: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

/// One sheet per table; documents without tables get an "Information" sheet.
#[derive(Default)]
pub struct XlsxDocumentRenderer {
    palette: XlsxDocumentPalette,
}

impl XlsxDocumentRenderer {
    pub fn new(palette: XlsxDocumentPalette) -> Self {
        Self { palette }
    }

    fn table_sheet(
        &self,
        workbook: &mut Workbook,
        name: &str,
        table: &DocumentTable,
    ) -> Result<(), RenderError> {
        let p = &self.palette;
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;

        let header = filled(p.header_fill, p.border)
            .set_bold()
            .set_align(FormatAlign::Center);
        for (col, text) in table.headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, cell_text(text), &header)?;
        }

        let body = bordered(p.border);
        let rows = table_cells(table);
        for (index, cells) in rows.iter().enumerate() {
            for (col, cell) in cells.iter().enumerate() {
                write_cell(sheet, index as u32 + 1, col as u16, cell, &body)?;
            }
        }

        for (col, text) in table.headers.iter().enumerate() {
            let max_len = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(CellValue::display_len)
                .chain(std::iter::once(text.chars().count()))
                .max()
                .unwrap_or(0);
            sheet.set_column_width(col as u16, column_width(max_len, WIDTH_PADDING, WIDTH_CAP))?;
        }
        Ok(())
    }

    fn information_sheet(
        &self,
        workbook: &mut Workbook,
        doc: &GenericDocument,
    ) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Information")?;
        sheet.set_column_width(0, WIDTH_CAP as f64)?;

        if let Some(title) = &doc.title {
            let format = Format::new().set_bold().set_font_size(14);
            sheet.write_string_with_format(0, 0, cell_text(title), &format)?;
        }

        let wrap = Format::new().set_text_wrap().set_align(FormatAlign::Top);
        let mut row = 2;
        for text in doc.summary.iter().chain(doc.content.iter()) {
            sheet.write_string_with_format(row, 0, cell_text(text), &wrap)?;
            row += 1;
        }
        for (key, value) in &doc.metrics {
            sheet.write_string(row, 0, cell_text(&format!("{}: {}", key, value)))?;
            row += 1;
        }
        Ok(())
    }

    fn plain_text_sheet(&self, workbook: &mut Workbook, text: &str) -> Result<(), RenderError> {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Data")?;
        sheet.write_string(0, 0, cell_text(text))?;
        sheet.set_column_width(0, 30)?;
        Ok(())
    }
}

impl ReportRenderer for XlsxDocumentRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        if data.is_null() {
            return Err(RenderError::Validation("document data is required".to_string()));
        }
        let doc = GenericDocument::from_value(data);
        let mut workbook = Workbook::new();

        let listed: Vec<&DocumentTable> = doc.tables.iter().filter(|t| t.is_renderable()).collect();
        if let Some(text) = &doc.plain_text {
            self.plain_text_sheet(&mut workbook, text)?;
        } else if !listed.is_empty() {
            let titles: Vec<String> = listed
                .iter()
                .enumerate()
                .map(|(index, table)| {
                    table
                        .title
                        .clone()
                        .unwrap_or_else(|| format!("Table_{}", index + 1))
                })
                .collect();
            for (name, table) in sheet_names(&titles).iter().zip(listed) {
                self.table_sheet(&mut workbook, name, table)?;
            }
        } else if let Some(table) = doc.main_table.as_ref().filter(|t| t.is_renderable()) {
            let title = table.title.clone().unwrap_or_else(|| "Data".to_string());
            let names = sheet_names(std::slice::from_ref(&title));
            self.table_sheet(&mut workbook, &names[0], table)?;
        } else {
            self.information_sheet(&mut workbook, &doc)?;
        }

        let size = save_into(&mut workbook, sink)?;
        debug!("XLSX document: {} bytes", size);
        Ok(())
    }
}

/// Typed cells of every row, padded or cut to the header count.
fn table_cells(table: &DocumentTable) -> Vec<Vec<CellValue>> {
    table
        .rows
        .iter()
        .map(|cells| {
            (0..table.headers.len())
                .map(|col| cells.get(col).map(cell_value).unwrap_or(CellValue::Empty))
                .collect()
        })
        .collect()
}

/// Valid, case-insensitively unique worksheet names for `titles`.
fn sheet_names(titles: &[String]) -> Vec<String> {
    let mut taken: Vec<String> = Vec::new();
    titles
        .iter()
        .map(|title| {
            let base = sheet_name(title);
            let mut name = base.clone();
            let mut suffix = 2;
            while taken.contains(&name.to_lowercase()) {
                let tail = format!(" ({})", suffix);
                let keep = MAX_SHEET_NAME - tail.chars().count();
                name = base.chars().take(keep).collect::<String>() + &tail;
                suffix += 1;
            }
            taken.push(name.to_lowercase());
            name
        })
        .collect()
}

fn sheet_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .filter(|c| !FORBIDDEN_IN_SHEET_NAME.contains(c))
        .collect();
    let name: String = cleaned
        .trim()
        .trim_matches('\'')
        .chars()
        .take(MAX_SHEET_NAME)
        .collect();
    let name = name.trim().to_string();
    if name.is_empty() {
        "Sheet".to_string()
    } else {
        name
    }
}
