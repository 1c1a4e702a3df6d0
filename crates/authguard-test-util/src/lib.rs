//! Shared test utilities for the authguard workspace.
//!
//! `xtask` needs `normalize_nondeterministic` at runtime when it regenerates golden reports,
//! so this cannot live behind `#[cfg(test)]`.

use serde_json::Value;

const TIMESTAMP_KEYS: [&str; 2] = ["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// `tool.version` is replaced with `"__VERSION__"` only when the root object is a report
/// envelope (`schema`, `tool`, `verdict`, `results`). Timestamps are replaced at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("verdict")
            && obj.contains_key("results");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalizes_envelope_version_and_timestamps() {
        let input = json!({
            "schema": "authguard.report.v1",
            "tool": { "name": "authguard", "version": "0.1.0" },
            "started_at": "2026-01-01T00:00:00Z",
            "finished_at": "2026-01-01T00:00:01Z",
            "verdict": "pass",
            "results": []
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "__VERSION__");
        assert_eq!(result["started_at"], "__TIMESTAMP__");
        assert_eq!(result["finished_at"], "__TIMESTAMP__");
    }

    #[test]
    fn root_without_envelope_keys_keeps_version() {
        let input = json!({
            "tool": { "name": "other", "version": "2.0.0" },
            "nested": [{ "started_at": "2026-01-01T00:00:00Z" }]
        });

        let result = normalize_nondeterministic(input);
        assert_eq!(result["tool"]["version"], "2.0.0");
        assert_eq!(result["nested"][0]["started_at"], "__TIMESTAMP__");
    }
}
