use serde_json::{Map, Value};

/// Display sentinel for anything that has no printable content.
pub const NOT_AVAILABLE: &str = "N/A";

/// Convert any resolved value into a single display string. Never fails.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Null => NOT_AVAILABLE.to_string(),
        Value::Array(items) if items.is_empty() => NOT_AVAILABLE.to_string(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(map) => join_pairs(map),
                other => scalar_text(other),
            })
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(map) => join_pairs(map),
        other => scalar_text(other),
    }
}

/// Plain text of a value without sentinel substitution.
///
/// Strings are returned unquoted; arrays and objects fall back to compact JSON.
pub fn scalar_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Bool(flag) => flag.to_string(),
        Value::Number(number) => number.to_string(),
        nested => nested.to_string(),
    }
}

fn join_pairs(map: &Map<String, Value>) -> String {
    let pairs: Vec<String> = map
        .iter()
        .filter(|(_, value)| !is_blank(value))
        .map(|(key, value)| format!("{}: {}", key, scalar_text(value)))
        .collect();

    if pairs.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        pairs.join(", ")
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        _ => false,
    }
}

/// Spreadsheet cell content that keeps native numeric and boolean typing.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
}

impl CellValue {
    /// Length of the value as it would be displayed, used for column sizing.
    pub fn display_len(&self) -> usize {
        match self {
            CellValue::Empty => 0,
            CellValue::Number(number) => number.to_string().chars().count(),
            CellValue::Bool(flag) => flag.to_string().len(),
            CellValue::Text(text) => text.chars().count(),
        }
    }
}

/// Map a raw resolved value to a cell without stringifying numbers early.
pub fn cell_value(value: &Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(flag) => CellValue::Bool(*flag),
        Value::Number(number) => number
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or_else(|| CellValue::Text(number.to_string())),
        Value::String(text) => CellValue::Text(text.clone()),
        nested => CellValue::Text(format_value(nested)),
    }
}
