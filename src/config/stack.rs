//! Composing a layer chain from config sources.

use layerchain_resolve::{Facade, Layer};
use serde_json::Value;
use std::path::Path;

use super::effective::LayeredConfig;
use super::load::{env_layer, load_file};
use super::source::{LayerOrigin, LayerSource};
use super::ConfigError;

/// Ordered builder for a [`LayeredConfig`].
///
/// Layers are pushed highest precedence first: the first layer pushed is the
/// first one searched. A typical stack is CLI, environment, repo file, host
/// file, defaults.
#[derive(Debug, Default)]
pub struct LayerStack {
    layers: Vec<Layer>,
    sources: Vec<LayerSource>,
}

impl LayerStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer built in code.
    pub fn push_layer(&mut self, source: LayerSource, layer: Layer) -> &mut Self {
        tracing::debug!(origin = ?source.origin, index = self.layers.len(), "pushed layer");
        self.layers.push(layer);
        self.sources.push(source);
        self
    }

    /// Append a JSON object as a layer.
    pub fn push_value(&mut self, origin: LayerOrigin, value: Value) -> Result<&mut Self, ConfigError> {
        let layer = Layer::try_from(value)?;
        Ok(self.push_layer(LayerSource::new(origin), layer))
    }

    pub fn push_cli(&mut self, overrides: Value) -> Result<&mut Self, ConfigError> {
        self.push_value(LayerOrigin::Cli, overrides)
    }

    pub fn push_defaults(&mut self, defaults: Value) -> Result<&mut Self, ConfigError> {
        self.push_value(LayerOrigin::Defaults, defaults)
    }

    /// Append a TOML or JSON file. The file must exist.
    pub fn push_file(&mut self, path: &Path) -> Result<&mut Self, ConfigError> {
        let (value, digest) = load_file(path)?;
        let layer = Layer::try_from(value)?;
        let source = LayerSource::file(path.to_string_lossy(), digest);
        Ok(self.push_layer(source, layer))
    }

    /// Append a file if it exists; missing files are skipped.
    pub fn push_file_if_exists(&mut self, path: &Path) -> Result<&mut Self, ConfigError> {
        if path.exists() {
            self.push_file(path)
        } else {
            tracing::debug!(path = %path.display(), "layer file not found, skipping");
            Ok(self)
        }
    }

    /// Append the process environment variables starting with `PREFIX_`.
    pub fn push_env(&mut self, prefix: &str) -> &mut Self {
        self.push_env_vars(prefix, std::env::vars())
    }

    /// Append `PREFIX_NAME=value` pairs from `vars` as a layer.
    pub fn push_env_vars<I, K, V>(&mut self, prefix: &str, vars: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let layer = Layer::from(env_layer(prefix, vars));
        self.push_layer(LayerSource::env(prefix), layer)
    }

    pub fn sources(&self) -> &[LayerSource] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn build(self) -> LayeredConfig {
        LayeredConfig::new(Facade::new(self.layers), self.sources)
    }
}
