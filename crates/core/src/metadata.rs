//! Result-label extraction from file metadata.

/// Extract the inspection result string from a file's `user_metadata`.
///
/// The rule is explicit: the `ruleType` field must be present and
/// string-typed, otherwise the result is the empty string. Malformed
/// metadata (wrong type, missing object, null) never fails the pipeline;
/// it just produces an empty banner label.
pub fn result_label(user_metadata: &serde_json::Value) -> String {
    user_metadata
        .get("ruleType")
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}
