use std::io::Cursor;

use log::debug;
use rust_xlsxwriter::{Color, Format, FormatAlign, Workbook, Worksheet};
use serde_json::Value;

use super::{bordered, cell_text, filled, save_into};
use crate::record::{
    display_field, evidence_entries, text_field, ActionEntry, ActionStatus, FieldSpec,
    NOT_AVAILABLE, NO_ACTIONS, NO_EVIDENCE, REPORT_FIELDS,
};
use crate::render::theme::{Rgb, XlsxPalette};
use crate::render::{ExportFormat, RenderError, ReportRenderer};

const TEXT_BLOCK_ROWS: u32 = 4;

/// Workbook for a single report.
///
/// Object input gets three sheets (Summary, Details, Actions). Anything else
/// is dumped as JSON text into a one-cell "Data" sheet.
pub struct XlsxReportRenderer {
    fields: &'static [FieldSpec],
    palette: XlsxPalette,
}

impl Default for XlsxReportRenderer {
    fn default() -> Self {
        Self::new(REPORT_FIELDS, XlsxPalette::default())
    }
}

impl XlsxReportRenderer {
    pub fn new(fields: &'static [FieldSpec], palette: XlsxPalette) -> Self {
        Self { fields, palette }
    }

    fn summary_sheet(&self, sheet: &mut Worksheet, record: &Value) -> Result<(), RenderError> {
        let p = &self.palette;
        sheet.set_name("Summary")?.set_tab_color(p.summary_tab);

        let title = text_field(record, "reportTitle", "Finding report").to_uppercase();
        let title_format = Format::new()
            .set_bold()
            .set_font_size(14)
            .set_font_color(p.title)
            .set_align(FormatAlign::Center);
        sheet.merge_range(0, 0, 0, 1, &cell_text(&title), &title_format)?;
        sheet.set_row_height(0, 25)?;

        let header = filled(p.header_fill, p.border)
            .set_bold()
            .set_align(FormatAlign::Center);
        sheet.write_string_with_format(2, 0, "Field", &header)?;
        sheet.write_string_with_format(2, 1, "Value", &header)?;

        let label = filled(p.label_fill, p.border).set_bold();
        let value = bordered(p.border).set_text_wrap();
        for (offset, spec) in self.fields.iter().enumerate() {
            let row = 3 + offset as u32;
            sheet.write_string_with_format(row, 0, spec.label, &label)?;
            sheet.write_string_with_format(row, 1, cell_text(&display_field(record, spec)), &value)?;
        }

        sheet.set_column_width(0, 25)?;
        sheet.set_column_width(1, 60)?;
        Ok(())
    }

    fn details_sheet(&self, sheet: &mut Worksheet, record: &Value) -> Result<(), RenderError> {
        let p = &self.palette;
        sheet.set_name("Details")?.set_tab_color(p.details_tab);

        let evidence = evidence_entries(record);
        let evidence_text = if evidence.is_empty() {
            NO_EVIDENCE.to_string()
        } else {
            evidence.join("\n")
        };
        let sections = [
            ("Description", text_field(record, "detailedDescription", NOT_AVAILABLE)),
            ("Cause", text_field(record, "findingCause", NOT_AVAILABLE)),
            ("Conversation", text_field(record, "conversation", NOT_AVAILABLE)),
            ("Evidence", evidence_text),
        ];

        let band = filled(p.band_fill, p.border)
            .set_bold()
            .set_font_color(Color::White)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
        let block = bordered(p.border)
            .set_text_wrap()
            .set_align(FormatAlign::Top)
            .set_align(FormatAlign::Justify);

        let mut row = 0u32;
        for (title, text) in sections {
            sheet.merge_range(row, 0, row, 2, &title.to_uppercase(), &band)?;
            sheet.set_row_height(row, 22)?;
            row += 1;

            sheet.merge_range(row, 0, row + TEXT_BLOCK_ROWS - 1, 2, &cell_text(&text), &block)?;
            sheet.set_row_height(row, 80)?;
            row += TEXT_BLOCK_ROWS + 1;
        }

        sheet.set_column_width(0, 25)?;
        sheet.set_column_width(1, 45)?;
        sheet.set_column_width(2, 45)?;
        Ok(())
    }

    fn actions_sheet(&self, sheet: &mut Worksheet, record: &Value) -> Result<(), RenderError> {
        let p = &self.palette;
        sheet.set_name("Actions")?.set_tab_color(p.actions_tab);

        let header = filled(p.actions_header_fill, p.border)
            .set_bold()
            .set_font_color(Color::White)
            .set_align(FormatAlign::Center);
        for (col, text) in ["Description", "Responsible", "Due date", "Status"]
            .iter()
            .enumerate()
        {
            sheet.write_string_with_format(0, col as u16, *text, &header)?;
        }

        let actions = ActionEntry::all(record);
        if actions.is_empty() {
            sheet.write_string(1, 0, NO_ACTIONS)?;
        }
        for (offset, action) in actions.iter().enumerate() {
            let row = 1 + offset as u32;
            let format = filled(action_fill(action.status, p), p.border)
                .set_text_wrap()
                .set_align(FormatAlign::VerticalCenter);
            let cells = [
                action.description.as_str(),
                action.responsible.as_str(),
                action.due_date.as_str(),
                action.status_label.as_str(),
            ];
            for (col, text) in cells.iter().enumerate() {
                sheet.write_string_with_format(row, col as u16, cell_text(text), &format)?;
            }
        }

        for (col, width) in [50, 30, 20, 15].iter().enumerate() {
            sheet.set_column_width(col as u16, *width)?;
        }
        Ok(())
    }

    fn data_sheet(&self, sheet: &mut Worksheet, data: &Value) -> Result<(), RenderError> {
        sheet.set_name("Data")?;
        sheet.write_string_with_format(0, 0, cell_text(&data.to_string()), &Format::new().set_bold())?;
        sheet.set_column_width(0, 50)?;
        Ok(())
    }
}

/// Row colour of an action on the Actions sheet.
pub(crate) fn action_fill(status: ActionStatus, palette: &XlsxPalette) -> Rgb {
    match status {
        ActionStatus::Closed => palette.action_closed,
        ActionStatus::Open => palette.action_open,
    }
}

impl ReportRenderer for XlsxReportRenderer {
    fn format(&self) -> ExportFormat {
        ExportFormat::Xlsx
    }

    fn render(&self, data: &Value, sink: &mut Cursor<Vec<u8>>) -> Result<(), RenderError> {
        let mut workbook = Workbook::new();

        if data.is_object() {
            self.summary_sheet(workbook.add_worksheet(), data)?;
            self.details_sheet(workbook.add_worksheet(), data)?;
            self.actions_sheet(workbook.add_worksheet(), data)?;
        } else {
            self.data_sheet(workbook.add_worksheet(), data)?;
        }

        let size = save_into(&mut workbook, sink)?;
        debug!("XLSX report workbook size: {} bytes", size);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Read;

    fn render(data: &Value) -> Vec<u8> {
        let mut sink = Cursor::new(Vec::new());
        XlsxReportRenderer::default().render(data, &mut sink).unwrap();
        sink.into_inner()
    }

    #[test]
    fn test_record_renders_workbook() {
        let record = json!({
            "id": 9,
            "reportTitle": "Blocked exit",
            "user": { "userInformation": { "name": "Ana" } },
            "evidence": ["photo1.jpg", "photo2.jpg"],
            "actions": [
                { "description": "Clear exit", "status": "close" },
                { "description": "Add signage", "status": "open" }
            ]
        });
        assert!(render(&record).starts_with(b"PK"));
    }

    #[test]
    fn test_non_object_renders_data_sheet() {
        assert!(render(&json!([1, 2, 3])).starts_with(b"PK"));
        assert!(render(&json!("plain text")).starts_with(b"PK"));
    }

    fn styles_xml(bytes: Vec<u8>) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut styles = String::new();
        archive
            .by_name("xl/styles.xml")
            .unwrap()
            .read_to_string(&mut styles)
            .unwrap();
        styles
    }

    #[test]
    fn test_action_rows_get_status_fills() {
        let palette = XlsxPalette::default();
        assert_ne!(
            action_fill(ActionStatus::Closed, &palette),
            action_fill(ActionStatus::Open, &palette)
        );

        let styles = styles_xml(render(&json!({
            "actions": [
                { "description": "Patch", "status": "close" },
                { "description": "Inspect", "status": "open" }
            ]
        })));
        assert!(styles.contains("FFD5E8D4"));
        assert!(styles.contains("FFF8CECC"));
    }

    #[test]
    fn test_oversized_text_is_truncated_not_rejected() {
        let record = json!({
            "reportTitle": "t".repeat(40_000),
            "detailedDescription": "d".repeat(40_000),
            "conversation": "x".repeat(40_000),
            "actions": [{ "description": "a".repeat(40_000), "status": "open" }]
        });
        assert!(render(&record).starts_with(b"PK"));
        assert!(render(&json!(["z".repeat(40_000)])).starts_with(b"PK"));
    }

    #[test]
    fn test_empty_record_renders() {
        assert!(render(&json!({})).starts_with(b"PK"));
    }
}
