use lookout_common::meta::is_hidden;
use serde_json::Value;

/// Key some backends use to report an empty search inside the result map.
pub const NO_RESULTS_MARKER: &str = "No results found";

/// Whether a raw result carries anything worth a credit.
///
/// A numeric top-level `NumOfResults` decides on its own. Otherwise the
/// value must hold visible content.
pub fn has_results(value: &Value) -> bool {
    if let Some(total) = value.get("NumOfResults").and_then(Value::as_f64) {
        return total > 0.0;
    }
    match value {
        Value::Null => false,
        Value::String(text) => !text.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => map
            .keys()
            .any(|key| !is_hidden(key) && key.as_str() != NO_RESULTS_MARKER),
        Value::Bool(_) | Value::Number(_) => true,
    }
}
