//! Action and evidence extraction.

use serde_json::Value;

use super::format::{format_value, NOT_AVAILABLE};
use super::resolver::{lookup, resolve};
use super::schema::FieldSpec;

const UNASSIGNED: &str = "Unassigned";
pub const NO_ACTIONS: &str = "No actions recorded";
pub const NO_EVIDENCE: &str = "No evidence attached";

/// Text of a top-level or nested field, or `default` when it is absent or empty.
pub fn text_field(record: &Value, path: &str, default: &str) -> String {
    match lookup(record, path) {
        Some(Value::String(text)) if !text.trim().is_empty() => text.clone(),
        Some(Value::String(_)) | None => default.to_string(),
        Some(other) => format_value(other),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStatus {
    Open,
    Closed,
}

impl ActionStatus {
    /// `close`/`closed` in any case is closed, everything else counts as open.
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_ascii_lowercase()) {
            Some(s) if s == "close" || s == "closed" => ActionStatus::Closed,
            _ => ActionStatus::Open,
        }
    }
}

/// One entry of a report's `actions` list, normalized for display.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEntry {
    pub description: String,
    pub responsible: String,
    pub due_date: String,
    /// Upper-cased raw status, `N/A` when missing.
    pub status_label: String,
    pub status: ActionStatus,
}

impl ActionEntry {
    pub fn from_value(value: &Value) -> Self {
        if !value.is_object() {
            return Self {
                description: format_value(value),
                responsible: UNASSIGNED.to_string(),
                due_date: NOT_AVAILABLE.to_string(),
                status_label: NOT_AVAILABLE.to_string(),
                status: ActionStatus::Open,
            };
        }

        let raw_status = value.get("status").and_then(Value::as_str);
        Self {
            description: text_field(value, "description", NOT_AVAILABLE),
            responsible: text_field(value, "responsible", UNASSIGNED),
            due_date: text_field(value, "dueDate", NOT_AVAILABLE),
            status_label: text_field(value, "status", NOT_AVAILABLE).to_uppercase(),
            status: ActionStatus::parse(raw_status),
        }
    }

    /// All actions of a record; anything that is not a list yields at most one entry.
    pub fn all(record: &Value) -> Vec<Self> {
        match resolve(record, "actions") {
            Value::Array(items) => items.iter().map(Self::from_value).collect(),
            Value::Null => Vec::new(),
            other => vec![Self::from_value(&other)],
        }
    }
}

/// Multi-line numbered summary used where actions appear inside a field table.
pub fn action_summary(actions: &[ActionEntry]) -> String {
    if actions.is_empty() {
        return format!("{}.", NO_ACTIONS);
    }

    actions
        .iter()
        .enumerate()
        .map(|(index, action)| {
            format!(
                "{}. {}\n   Responsible: {}\n   Due date: {}\n   Status: {}",
                index + 1,
                action.description,
                action.responsible,
                action.due_date,
                action.status_label
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Display text of one schema field. `actions` becomes the numbered summary.
pub fn display_field(record: &Value, spec: &FieldSpec) -> String {
    if spec.path == "actions" {
        action_summary(&ActionEntry::all(record))
    } else {
        format_value(&resolve(record, spec.path))
    }
}

/// Evidence lines of a record, from either `reportEvidence` or `evidence`.
pub fn evidence_entries(record: &Value) -> Vec<String> {
    match resolve(record, "reportEvidence") {
        Value::Null => Vec::new(),
        Value::Array(items) => items
            .iter()
            .filter(|item| !item.is_null())
            .map(format_value)
            .collect(),
        other => vec![format_value(&other)],
    }
}
