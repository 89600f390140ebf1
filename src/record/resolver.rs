use serde_json::Value;

const EVIDENCE_PATH: &str = "reportEvidence";
const ACTIONS_PATH: &str = "actions";

/// Walk a dotted path through nested objects.
///
/// Returns `None` as soon as a segment is missing, the current value is not an
/// object, or the value found is JSON null.
pub fn lookup<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = record;
    for segment in path.split('.') {
        current = current.as_object()?.get(segment)?;
        if current.is_null() {
            return None;
        }
    }
    Some(current)
}

/// Resolve a dotted path, applying the two record-shape shims.
///
/// List endpoints send evidence as a bare `reportEvidence` string while the
/// single-report endpoint sends an `evidence` array, so `reportEvidence` is
/// always normalized to an array and falls back to `evidence`. A missing
/// `actions` path resolves to the record's `actions` field or an empty array.
/// No other path gets special treatment.
pub fn resolve(record: &Value, path: &str) -> Value {
    let found = lookup(record, path);
    match path {
        EVIDENCE_PATH => match found {
            Some(Value::String(text)) => Value::Array(vec![Value::String(text.clone())]),
            Some(value) => value.clone(),
            None => match record.get("evidence") {
                Some(Value::Array(items)) if !items.is_empty() => Value::Array(items.clone()),
                _ => Value::Null,
            },
        },
        ACTIONS_PATH => match found {
            Some(value) => value.clone(),
            None => record
                .get(ACTIONS_PATH)
                .filter(|value| !value.is_null())
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
        },
        _ => found.cloned().unwrap_or(Value::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn nested_record() -> Value {
        json!({
            "id": 7,
            "user": {
                "documentId": "CC-1001",
                "userInformation": { "name": "Ana", "lastName": null },
                "tags": ["a", "b"]
            },
            "reportTitle": "Leak at Rig 4"
        })
    }

    #[test]
    fn test_lookup_walks_nested_objects() {
        let record = nested_record();
        assert_eq!(
            lookup(&record, "user.userInformation.name"),
            Some(&json!("Ana"))
        );
        assert_eq!(lookup(&record, "id"), Some(&json!(7)));
    }

    #[test]
    fn test_lookup_stops_on_missing_or_non_object_segments() {
        let record = nested_record();
        assert_eq!(lookup(&record, "user.missing.name"), None);
        assert_eq!(lookup(&record, "reportTitle.length"), None);
        assert_eq!(lookup(&record, "user.tags.0"), None);
        assert_eq!(lookup(&record, "user.userInformation.lastName"), None);
        assert_eq!(lookup(&json!("scalar"), "id"), None);
        assert_eq!(lookup(&Value::Null, "a.b.c"), None);
    }

    #[test]
    fn test_resolve_returns_null_for_unknown_paths() {
        let record = nested_record();
        assert_eq!(resolve(&record, "hazardType"), Value::Null);
        assert_eq!(resolve(&record, "user.userInformation.lastName"), Value::Null);
    }

    // Compatibility shim: list endpoints send `reportEvidence` as a bare string.
    #[test]
    fn test_report_evidence_string_is_wrapped_in_a_list() {
        let record = json!({ "reportEvidence": "leak found" });
        assert_eq!(resolve(&record, "reportEvidence"), json!(["leak found"]));
    }

    // Compatibility shim: single-report endpoint sends an `evidence` array instead.
    #[test]
    fn test_report_evidence_falls_back_to_evidence_list() {
        let record = json!({ "evidence": ["photo1.jpg", "photo2.jpg"] });
        assert_eq!(
            resolve(&record, "reportEvidence"),
            json!(["photo1.jpg", "photo2.jpg"])
        );

        let empty = json!({ "evidence": [] });
        assert_eq!(resolve(&empty, "reportEvidence"), Value::Null);
    }

    #[test]
    fn test_actions_fall_back_to_empty_list() {
        assert_eq!(resolve(&json!({}), "actions"), json!([]));
        assert_eq!(resolve(&json!({ "actions": null }), "actions"), json!([]));

        let record = json!({ "actions": [{ "description": "Patch" }] });
        assert_eq!(resolve(&record, "actions"), json!([{ "description": "Patch" }]));
    }
}
