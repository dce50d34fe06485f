//! Generic binding-section adapters.
//!
//! A binding here is an object in a flat top-level array, keyed by one
//! field — `d1_databases` entries keyed by `database_name`,
//! `kv_namespaces` keyed by `binding`, and the like.

use jsonc_splice::{insert_array_element, insert_top_level_section, remove_array_element_by_field};
use serde_json::Value;

use crate::error::ConfigError;

/// Append `binding_json` (a complete object literal) to the array under
/// `array_key`, creating the section when the config has none.
pub fn append_binding(
    text: &str,
    snapshot: &Value,
    array_key: &str,
    binding_json: &str,
) -> Result<String, ConfigError> {
    if snapshot.get(array_key).is_some() {
        Ok(insert_array_element(text, array_key, binding_json)?)
    } else {
        let key = Value::String(array_key.to_string()).to_string();
        Ok(insert_top_level_section(
            text,
            &format!("{key}: [{binding_json}]"),
        )?)
    }
}

/// Remove the binding whose `name_field` equals `name`. An array emptied by
/// the removal takes its whole section with it.
pub fn remove_binding(
    text: &str,
    array_key: &str,
    name_field: &str,
    name: &str,
) -> Result<String, ConfigError> {
    Ok(remove_array_element_by_field(
        text, array_key, name_field, name,
    )?)
}
