//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `RECORDKIT_DEBUG` | `debug` |
//! | `RECORDKIT_LOG_LEVEL` | `log_level` |
//! | `RECORDKIT_UNKNOWN_KEYS` | `unknown_keys` (`reject` / `ignore`) |
//! | `RECORDKIT_PRETTY_JSON` | `pretty_json` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use recordkit_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("recordkit.toml").unwrap();
//! let settings = settings_loader::from_path_with_env("recordkit.json").unwrap();
//! ```

use std::path::Path;

use crate::error::RecordError;
use crate::settings::Settings;

/// Loads settings from a TOML string, keeping defaults for anything absent.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, RecordError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| RecordError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, RecordError> {
    from_toml_str(&read_config(path.as_ref(), "TOML")?)
}

/// Loads settings from a JSON string, keeping defaults for anything absent.
pub fn from_json_str(json_str: &str) -> Result<Settings, RecordError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| RecordError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, RecordError> {
    from_json_str(&read_config(path.as_ref(), "JSON")?)
}

/// Loads settings from a file, picking the format from its extension
/// (`.json` is JSON, anything else is TOML), then applies environment overrides.
pub fn from_path_with_env(path: impl AsRef<Path>) -> Result<Settings, RecordError> {
    let path = path.as_ref();
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let mut settings = if is_json {
        from_json_file(path)?
    } else {
        from_toml_file(path)?
    };
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Result<Settings, RecordError> {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings)?;
    Ok(settings)
}

/// Applies environment variable overrides to a settings struct.
///
/// Fails only when `RECORDKIT_UNKNOWN_KEYS` holds something other than a policy name.
pub fn apply_env_overrides(settings: &mut Settings) -> Result<(), RecordError> {
    if let Ok(val) = std::env::var("RECORDKIT_DEBUG") {
        settings.debug = parse_flag(&val);
    }

    if let Ok(val) = std::env::var("RECORDKIT_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("RECORDKIT_UNKNOWN_KEYS") {
        settings.unknown_keys = val.parse()?;
    }

    if let Ok(val) = std::env::var("RECORDKIT_PRETTY_JSON") {
        settings.pretty_json = parse_flag(&val);
    }

    Ok(())
}

// ============================================================
// Helpers
// ============================================================

fn parse_flag(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config(path: &Path, format: &str) -> Result<String, RecordError> {
    std::fs::read_to_string(path).map_err(|e| {
        RecordError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, format: &str) -> Result<Settings, RecordError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        RecordError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    serde_json::from_value(merge_json(default_json, value)).map_err(|e| {
        RecordError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
