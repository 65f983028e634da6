//! Layers and layer sets.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::entry::Entry;
use crate::error::ChainError;

/// One key/value mapping in the chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layer {
    entries: BTreeMap<String, Entry>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`Layer::insert`] for plain values.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), Entry::Value(value.into()));
        self
    }

    /// Builder form of [`Layer::insert`] for any entry.
    pub fn with_entry(mut self, key: impl Into<String>, entry: Entry) -> Self {
        self.entries.insert(key.into(), entry);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, entry: impl Into<Entry>) -> Option<Entry> {
        self.entries.insert(key.into(), entry.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Entry> {
        self.entries.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Entry> {
        self.entries.get(key)
    }

    /// Presence check. A key bound to `null` is defined.
    pub fn defines(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Map<String, Value>> for Layer {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            entries: map.into_iter().map(|(k, v)| (k, Entry::Value(v))).collect(),
        }
    }
}

impl TryFrom<Value> for Layer {
    type Error = ChainError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Layer::from(map)),
            other => Err(ChainError::InvalidLayers(format!(
                "expected an object, got {}",
                kind(&other)
            ))),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Entry)> for Layer {
    fn from_iter<I: IntoIterator<Item = (K, Entry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, e)| (k.into(), e)).collect(),
        }
    }
}

/// The sources a facade reads from.
///
/// A single layer has no notion of "next": resolution against it always
/// reports the end position and its continuation finds nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Layers {
    Single(Layer),
    Chain(Vec<Layer>),
}

impl Layers {
    /// Number of layers. A single layer counts as one.
    pub fn len(&self) -> usize {
        match self {
            Layers::Single(_) => 1,
            Layers::Chain(chain) => chain.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_chain(&self) -> bool {
        matches!(self, Layers::Chain(_))
    }

    pub fn as_slice(&self) -> &[Layer] {
        match self {
            Layers::Single(layer) => std::slice::from_ref(layer),
            Layers::Chain(chain) => chain,
        }
    }

    pub fn get(&self, index: usize) -> Option<&Layer> {
        self.as_slice().get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Layer> {
        match self {
            Layers::Single(layer) => (index == 0).then_some(layer),
            Layers::Chain(chain) => chain.get_mut(index),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Layer> {
        self.as_slice().iter()
    }
}

impl From<Layer> for Layers {
    fn from(layer: Layer) -> Self {
        Layers::Single(layer)
    }
}

impl From<Vec<Layer>> for Layers {
    fn from(chain: Vec<Layer>) -> Self {
        Layers::Chain(chain)
    }
}

impl TryFrom<Value> for Layers {
    type Error = ChainError;

    /// An object becomes a single layer, an array of objects a chain.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Layers::Single(Layer::from(map))),
            Value::Array(items) => {
                let mut chain = Vec::with_capacity(items.len());
                for (index, item) in items.into_iter().enumerate() {
                    match item {
                        Value::Object(map) => chain.push(Layer::from(map)),
                        other => {
                            return Err(ChainError::InvalidLayers(format!(
                                "layer {} is {}, expected an object",
                                index,
                                kind(&other)
                            )))
                        }
                    }
                }
                Ok(Layers::Chain(chain))
            }
            other => Err(ChainError::InvalidLayers(format!(
                "expected an object or an array of objects, got {}",
                kind(&other)
            ))),
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
