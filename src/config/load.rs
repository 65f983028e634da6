//! Reading layer data from files and the environment.

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

use super::ConfigError;

/// Load a TOML or JSON file (by extension, TOML otherwise), returning the
/// value and the SHA-256 digest of the raw bytes.
pub(crate) fn load_file(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value = if is_json {
        serde_json::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?
    } else {
        let toml_value: toml::Value = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
        toml_to_json(toml_value)
    };

    tracing::debug!(path = %path.display(), %digest, "loaded layer file");
    Ok((value, digest))
}

/// Convert a TOML value to JSON.
///
/// Datetimes become their RFC 3339 text; non-finite floats become null.
pub(crate) fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::Table(table) => table
            .into_iter()
            .map(|(k, v)| (k, toml_to_json(v)))
            .collect::<Map<String, Value>>()
            .into(),
        toml::Value::Array(items) => items.into_iter().map(toml_to_json).collect(),
        toml::Value::Datetime(at) => Value::String(at.to_string()),
        scalar => serde_json::to_value(scalar).unwrap_or(Value::Null),
    }
}

/// Build a layer object from `PREFIX_NAME=value` variables.
///
/// Names are lowercased with the prefix and its separator removed. Values
/// that parse as JSON scalars keep their type; everything else is a string.
pub(crate) fn env_layer<I, K, V>(prefix: &str, vars: I) -> Map<String, Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let head = format!("{}_", prefix);
    let mut map = Map::new();
    for (name, raw) in vars {
        let Some(rest) = name.as_ref().strip_prefix(&head) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }
        map.insert(rest.to_lowercase(), parse_env_value(raw.as_ref()));
    }
    map
}

fn parse_env_value(raw: &str) -> Value {
    match serde_json::from_str::<Value>(raw) {
        Ok(value) if !value.is_object() && !value.is_array() => value,
        _ => Value::String(raw.to_string()),
    }
}
