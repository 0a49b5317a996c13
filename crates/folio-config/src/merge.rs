//! Layered merging of build options.
//!
//! Layers are applied in order (global, environment, page). Objects merge key
//! by key, scalars are replaced by the later layer and arrays are concatenated,
//! so plugin lists from every layer are kept.

use serde_json::Value;

use crate::build::BuildOptions;
use crate::error::{ConfigError, Result};

/// Merge `update` into `target`.
///
/// ```
/// use folio_config::merge_values;
/// use serde_json::json;
///
/// let mut base = json!({ "minify": false, "plugins": ["a"] });
/// merge_values(&mut base, &json!({ "minify": true, "plugins": ["b"] }));
/// assert_eq!(base, json!({ "minify": true, "plugins": ["a", "b"] }));
/// ```
pub fn merge_values(target: &mut Value, update: &Value) {
    match (target, update) {
        (Value::Object(target_map), Value::Object(update_map)) => {
            for (key, value) in update_map {
                merge_values(target_map.entry(key.clone()).or_insert(Value::Null), value);
            }
        }
        (Value::Array(target_items), Value::Array(update_items)) => {
            target_items.extend(update_items.iter().cloned());
        }
        (target_slot, Value::Object(update_map)) => {
            let mut new_obj = serde_json::Map::with_capacity(update_map.len());
            for (key, value) in update_map {
                new_obj.insert(key.clone(), value.clone());
            }
            *target_slot = Value::Object(new_obj);
        }
        (target_slot, _) => {
            *target_slot = update.clone();
        }
    }
}

/// Apply overlay layers on top of `base` and deserialize the result.
///
/// Null layers are skipped.
pub fn merge_layers(base: &BuildOptions, layers: &[&Value]) -> Result<BuildOptions> {
    if layers.iter().all(|layer| layer.is_null()) {
        return Ok(base.clone());
    }

    let mut merged = serde_json::to_value(base).map_err(|err| {
        ConfigError::InvalidProfileOverride {
            message: err.to_string(),
        }
    })?;

    for layer in layers.iter().filter(|layer| !layer.is_null()) {
        if !layer.is_object() {
            return Err(ConfigError::InvalidProfileOverride {
                message: format!("expected a table of build options, got {layer}"),
            });
        }
        merge_values(&mut merged, layer);
    }

    serde_json::from_value(merged).map_err(|err| ConfigError::InvalidProfileOverride {
        message: err.to_string(),
    })
}
