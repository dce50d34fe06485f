//! Compatibility flag adapters.

use jsonc_splice::ensure_array_contains_value;
use serde_json::Value;

use crate::error::ConfigError;

/// Make sure `flag` is listed under `"compatibility_flags"`, creating the
/// array when the config has none. Idempotent.
pub fn ensure_compat_flag(text: &str, snapshot: &Value, flag: &str) -> Result<String, ConfigError> {
    Ok(ensure_array_contains_value(
        text,
        snapshot,
        "compatibility_flags",
        flag,
    )?)
}

/// The flag most projects end up needing.
pub fn ensure_nodejs_compat(text: &str, snapshot: &Value) -> Result<String, ConfigError> {
    ensure_compat_flag(text, snapshot, "nodejs_compat")
}
