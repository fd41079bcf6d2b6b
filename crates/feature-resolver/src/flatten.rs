//! Feature Flattening and Vectorization

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::trace;

/// Flatten a nested feature map into `category_name` keys.
///
/// Nested objects recurse with an underscore join, category-first
/// (`engagement.checkin_rate` becomes `engagement_checkin_rate`); any
/// non-object leaf is copied as-is.
pub fn flatten_features(features: &Map<String, Value>) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(features, "", &mut flat);
    flat
}

fn flatten_into(features: &Map<String, Value>, prefix: &str, flat: &mut BTreeMap<String, Value>) {
    for (key, value) in features {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}_{key}")
        };
        match value {
            Value::Object(nested) => flatten_into(nested, &path, flat),
            other => {
                flat.insert(path, other.clone());
            }
        }
    }
}

/// Build the model input vector in `feature_names` order.
///
/// Names absent from the flat map (or holding non-numeric values) contribute
/// `0.0`. Never fails, never reorders: the output length always equals
/// `feature_names.len()`.
pub fn vectorize_features(flat: &BTreeMap<String, Value>, feature_names: &[String]) -> Vec<f64> {
    let vector: Vec<f64> = feature_names
        .iter()
        .map(|name| flat.get(name).and_then(Value::as_f64).unwrap_or(0.0))
        .collect();
    trace!(dimension = vector.len(), "vectorized features");
    vector
}
