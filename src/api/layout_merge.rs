use serde_json::{Map, Value};

/// Returns `defaults` with `overrides` applied, leaving both inputs untouched.
///
/// Only keys present in `defaults` are considered. Where the default is an
/// object the merge recurses; otherwise the override value replaces the
/// default. An `overrides` value that is not an object yields `defaults`.
#[must_use]
pub fn merge_layout(defaults: &Value, overrides: &Value) -> Value {
    let Value::Object(overrides) = overrides else {
        return defaults.clone();
    };
    let Value::Object(defaults) = defaults else {
        return defaults.clone();
    };

    let merged: Map<String, Value> = defaults
        .iter()
        .map(|(key, default)| {
            let value = match overrides.get(key) {
                Some(override_value) if default.is_object() => {
                    merge_layout(default, override_value)
                }
                Some(override_value) => override_value.clone(),
                None => default.clone(),
            };
            (key.clone(), value)
        })
        .collect();
    Value::Object(merged)
}
