//! Layered configuration with provenance
//!
//! Wraps a [`Facade`] over the stacked layers together with the source of
//! each layer, so every resolved value can be traced back to where it came
//! from.

use layerchain_resolve::{ChainError, Facade};
use serde_json::Value;

use super::source::LayerSource;

/// Resolved view over a [`LayerStack`](super::LayerStack).
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    facade: Facade,
    /// One entry per layer, in search order
    sources: Vec<LayerSource>,
}

impl LayeredConfig {
    pub(crate) fn new(facade: Facade, sources: Vec<LayerSource>) -> Self {
        Self { facade, sources }
    }

    pub fn facade(&self) -> &Facade {
        &self.facade
    }

    pub fn sources(&self) -> &[LayerSource] {
        &self.sources
    }

    /// Read a top-level property through the chain.
    pub fn get(&self, key: &str) -> Result<Option<Value>, ChainError> {
        self.facade.get(key)
    }

    /// Get a value by dot-separated path.
    ///
    /// Only the first segment is resolved through the chain; the rest index
    /// into the value that won. Tables are not merged across layers.
    pub fn get_path(&self, path: &str) -> Result<Option<Value>, ChainError> {
        let mut parts = path.split('.');
        let Some(head) = parts.next() else {
            return Ok(None);
        };
        let Some(mut current) = self.facade.get(head)? else {
            return Ok(None);
        };
        for part in parts {
            current = match current {
                Value::Object(mut map) => match map.remove(part) {
                    Some(v) => v,
                    None => return Ok(None),
                },
                Value::Array(mut items) => match part.parse::<usize>() {
                    Ok(i) if i < items.len() => items.swap_remove(i),
                    _ => return Ok(None),
                },
                _ => return Ok(None),
            };
        }
        Ok(Some(current))
    }

    /// Get a value as u64
    pub fn get_u64(&self, path: &str) -> Result<Option<u64>, ChainError> {
        Ok(self.get_path(path)?.and_then(|v| v.as_u64()))
    }

    /// Get a value as string
    pub fn get_str(&self, path: &str) -> Result<Option<String>, ChainError> {
        Ok(self
            .get_path(path)?
            .and_then(|v| v.as_str().map(str::to_string)))
    }

    /// Get a value as bool
    pub fn get_bool(&self, path: &str) -> Result<Option<bool>, ChainError> {
        Ok(self.get_path(path)?.and_then(|v| v.as_bool()))
    }

    /// Source of the layer that supplies `key`, if any.
    pub fn explain(&self, key: &str) -> Option<&LayerSource> {
        let found = self.facade.resolve(key);
        if !found.is_found() {
            return None;
        }
        self.sources.get(found.index)
    }

    /// Serialize the contributing sources, in search order
    pub fn sources_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.sources)
    }
}
