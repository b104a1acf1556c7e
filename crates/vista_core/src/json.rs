//! Helpers for configuration documents held as `serde_json::Value`.

use serde_json::Value;

/// Merge `overlay` into a copy of `base`.
///
/// Objects are merged key by key, recursively.  On any other overlap
/// (scalars, arrays, or an object meeting a non-object) the overlay value
/// wins.  Keys present on only one side are kept.
pub fn extend(base: &Value, overlay: &Value) -> Value {
    match (base, overlay) {
        (Value::Object(b), Value::Object(o)) => {
            let mut merged = b.clone();
            for (key, value) in o {
                let next = match merged.get(key) {
                    Some(existing) => extend(existing, value),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (_, overlay) => overlay.clone(),
    }
}

/// Fold [`extend`] over several documents, later ones winning.
pub fn extend_all<'a>(docs: impl IntoIterator<Item = &'a Value>) -> Value {
    docs.into_iter()
        .fold(Value::Object(Default::default()), |acc, doc| extend(&acc, doc))
}
