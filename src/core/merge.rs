use serde_json::{Map, Value};

/// Deep-merges `overlay` into `base`.
///
/// For every key of either side: two mappings are merged recursively, a
/// non-null overlay value wins, otherwise the base value is kept (possibly
/// null). Sequences are replaced as a whole, never merged element by element.
pub fn deep_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = Map::new();

    let overlay_only = overlay.keys().filter(|key| !base.contains_key(*key));
    for key in base.keys().chain(overlay_only) {
        let value = merge_value(base.get(key), overlay.get(key));
        merged.insert(key.clone(), value);
    }

    merged
}

fn merge_value(left: Option<&Value>, right: Option<&Value>) -> Value {
    match (left, right) {
        (Some(Value::Object(l)), Some(Value::Object(r))) => Value::Object(deep_merge(l, r)),
        (_, Some(r)) if !r.is_null() => r.clone(),
        (Some(l), _) => l.clone(),
        (None, _) => Value::Null,
    }
}
