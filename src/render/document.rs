//! Free-form documents: a title, summary, paragraphs, tables and metrics.
//!
//! Any JSON object carrying `content`, `tables` or a `headers`/`rows` pair is
//! read as a [`GenericDocument`]. Scalars become a single plain-text paragraph.

use serde_json::{Map, Value};

use crate::record::scalar_text;

/// Keys consumed by the structured sections; everything else is "additional".
const KNOWN_KEYS: &[&str] = &[
    "title", "subtitle", "summary", "content", "tables", "headers", "rows", "metrics",
];

/// True when `data` should be exported as a free-form document rather than a
/// LORA report.
pub fn is_generic_document(data: &Value) -> bool {
    match data {
        Value::Object(map) => {
            map.contains_key("content")
                || map.contains_key("tables")
                || (map.contains_key("headers") && map.contains_key("rows"))
        }
        Value::String(_) | Value::Number(_) | Value::Bool(_) => true,
        Value::Null | Value::Array(_) => false,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentTable {
    pub title: Option<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DocumentTable {
    fn from_map(map: &Map<String, Value>) -> Self {
        let headers = match map.get("headers") {
            Some(Value::Array(items)) => items.iter().map(scalar_text).collect(),
            _ => Vec::new(),
        };
        let rows = match map.get("rows") {
            Some(Value::Array(rows)) => rows
                .iter()
                .map(|row| match row {
                    Value::Array(cells) => cells.clone(),
                    other => vec![other.clone()],
                })
                .collect(),
            _ => Vec::new(),
        };
        Self {
            title: non_blank(map.get("title")),
            headers,
            rows,
        }
    }

    /// Tables without headers or rows are left out of every format.
    pub fn is_renderable(&self) -> bool {
        !self.headers.is_empty() && !self.rows.is_empty()
    }

    /// Text of row `row`, padded or cut to the header count.
    pub fn row_text(&self, row: usize) -> Vec<String> {
        let cells = self.rows.get(row).map(Vec::as_slice).unwrap_or_default();
        (0..self.headers.len())
            .map(|col| cells.get(col).map(scalar_text).unwrap_or_default())
            .collect()
    }
}

/// Parsed free-form document. Built once per export from the request JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericDocument {
    pub title: Option<String>,
    pub summary: Vec<String>,
    pub content: Vec<String>,
    pub tables: Vec<DocumentTable>,
    /// A bare `{headers, rows}` object.
    pub main_table: Option<DocumentTable>,
    pub metrics: Vec<(String, String)>,
    pub additional: Vec<(String, Value)>,
    /// Set when the input was not an object.
    pub plain_text: Option<String>,
}

impl GenericDocument {
    pub fn from_value(data: &Value) -> Self {
        let Value::Object(map) = data else {
            return Self {
                plain_text: Some(scalar_text(data)),
                ..Self::default()
            };
        };

        let tables = match map.get("tables") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_object)
                .map(DocumentTable::from_map)
                .collect(),
            _ => Vec::new(),
        };

        let main_table = (map.contains_key("headers") && map.contains_key("rows"))
            .then(|| DocumentTable::from_map(map));

        let metrics = match map.get("metrics") {
            Some(Value::Object(metrics)) => metrics
                .iter()
                .map(|(key, value)| (key.clone(), scalar_text(value)))
                .collect(),
            _ => Vec::new(),
        };

        let additional = map
            .iter()
            .filter(|(key, value)| !KNOWN_KEYS.contains(&key.as_str()) && !is_empty(value))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Self {
            title: non_blank(map.get("title")),
            summary: paragraphs(map.get("summary")),
            content: paragraphs(map.get("content")),
            tables,
            main_table,
            metrics,
            additional,
            plain_text: None,
        }
    }

    /// Every renderable table: the `tables` list first, then the bare table.
    pub fn renderable_tables(&self) -> impl Iterator<Item = &DocumentTable> {
        self.tables
            .iter()
            .chain(self.main_table.iter())
            .filter(|table| table.is_renderable())
    }
}

/// `snake_case` key as a label: "total_sales" becomes "Total Sales".
pub fn key_label(key: &str) -> String {
    key.split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn paragraphs(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(scalar_text)
            .filter(|text| !text.trim().is_empty())
            .collect(),
        Some(value) if !is_empty(value) => vec![scalar_text(value)],
        _ => Vec::new(),
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .filter(|value| !is_empty(value))
        .map(scalar_text)
        .filter(|text| !text.trim().is_empty())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detects_document_shapes() {
        assert!(is_generic_document(&json!({ "content": ["a"] })));
        assert!(is_generic_document(&json!({ "tables": [] })));
        assert!(is_generic_document(&json!({ "headers": ["A"], "rows": [] })));
        assert!(is_generic_document(&json!("just text")));
        assert!(!is_generic_document(&json!({ "id": 1, "reportTitle": "Leak" })));
        assert!(!is_generic_document(&json!({ "headers": ["A"] })));
        assert!(!is_generic_document(&json!([{ "id": 1 }])));
        assert!(!is_generic_document(&json!(null)));
    }

    #[test]
    fn test_parses_sections() {
        let doc = GenericDocument::from_value(&json!({
            "title": "Quarterly",
            "summary": "Sales went up.",
            "content": ["First", "", "Second"],
            "tables": [
                { "title": "Q1", "headers": ["Month", "Sales"], "rows": [["Jan", 1000]] },
                "not a table"
            ],
            "metrics": { "total": 3400 },
            "owner": "Finance",
            "empty": ""
        }));

        assert_eq!(doc.title.as_deref(), Some("Quarterly"));
        assert_eq!(doc.summary, vec!["Sales went up."]);
        assert_eq!(doc.content, vec!["First", "Second"]);
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.tables[0].row_text(0), vec!["Jan", "1000"]);
        assert_eq!(doc.metrics, vec![("total".to_string(), "3400".to_string())]);
        assert_eq!(doc.additional, vec![("owner".to_string(), json!("Finance"))]);
        assert!(doc.main_table.is_none());
    }

    #[test]
    fn test_bare_table_and_ragged_rows() {
        let doc = GenericDocument::from_value(&json!({
            "title": "Stock",
            "headers": ["Item", "Qty", "Price"],
            "rows": [["Laptop", 10], ["Mouse", 50, 25.0, "extra"], "loose"]
        }));
        let table = doc.main_table.as_ref().unwrap();
        assert_eq!(table.title.as_deref(), Some("Stock"));
        assert_eq!(table.row_text(0), vec!["Laptop", "10", ""]);
        assert_eq!(table.row_text(1), vec!["Mouse", "50", "25.0"]);
        assert_eq!(table.row_text(2), vec!["loose", "", ""]);
        assert_eq!(doc.renderable_tables().count(), 1);
    }

    #[test]
    fn test_tables_without_rows_are_skipped() {
        let doc = GenericDocument::from_value(&json!({
            "tables": [{ "title": "Empty", "headers": ["A"], "rows": [] }]
        }));
        assert_eq!(doc.tables.len(), 1);
        assert_eq!(doc.renderable_tables().count(), 0);
    }

    #[test]
    fn test_scalar_becomes_plain_text() {
        let doc = GenericDocument::from_value(&json!("hello"));
        assert_eq!(doc.plain_text.as_deref(), Some("hello"));
        let doc = GenericDocument::from_value(&json!(42));
        assert_eq!(doc.plain_text.as_deref(), Some("42"));
    }

    #[test]
    fn test_key_label() {
        assert_eq!(key_label("total_sales"), "Total Sales");
        assert_eq!(key_label("owner"), "Owner");
        assert_eq!(key_label("__x__"), "X");
    }
}
