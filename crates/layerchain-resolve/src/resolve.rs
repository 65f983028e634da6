//! First-match lookup over a layer set.

use std::fmt;

use serde_json::Value;

use crate::entry::Entry;
use crate::error::ChainError;
use crate::facade::{dispatch, Facade};
use crate::layer::Layers;

/// Outcome of looking a key up in a layer set.
#[derive(Debug, Clone, Copy)]
pub struct Resolution<'a> {
    /// The raw entry of the first defining layer, if any.
    pub entry: Option<&'a Entry>,
    /// Index of the defining layer, or `layers.len()` when not found or
    /// when the layer set is a single layer.
    pub index: usize,
    /// Continues the search strictly after `index`.
    pub next: Next<'a>,
}

impl<'a> Resolution<'a> {
    fn not_found(layers: &'a Layers, key: &'a str) -> Self {
        Self {
            entry: None,
            index: layers.len(),
            next: Next::exhausted(layers, key),
        }
    }

    /// Resolution for an entry already located at `index`.
    pub(crate) fn at(layers: &'a Layers, key: &'a str, index: usize, entry: &'a Entry) -> Self {
        match layers {
            Layers::Single(_) => Self {
                entry: Some(entry),
                index: layers.len(),
                next: Next::exhausted(layers, key),
            },
            Layers::Chain(_) => Self {
                entry: Some(entry),
                index,
                next: Next {
                    layers,
                    key,
                    from: Some(index + 1),
                },
            },
        }
    }

    pub fn is_found(&self) -> bool {
        self.entry.is_some()
    }

    /// The raw value when the entry is a plain value.
    pub fn value(&self) -> Option<&'a Value> {
        self.entry.and_then(Entry::as_value)
    }

    pub fn key(&self) -> &'a str {
        self.next.key
    }

    pub fn layers(&self) -> &'a Layers {
        self.next.layers
    }
}

/// Continuation of a lookup past the layer where it last matched.
///
/// Holds the resume position by value, so calling it any number of times
/// yields the same resolution.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    layers: &'a Layers,
    key: &'a str,
    from: Option<usize>,
}

impl<'a> Next<'a> {
    fn exhausted(layers: &'a Layers, key: &'a str) -> Self {
        Self {
            layers,
            key,
            from: None,
        }
    }

    /// Look the same key up again in the layers after the previous match.
    pub fn resolve(&self) -> Resolution<'a> {
        match self.from {
            Some(start) => resolve_from(self.layers, self.key, start),
            None => Resolution::not_found(self.layers, self.key),
        }
    }

    /// Like [`Next::resolve`], but runs the found entry through the
    /// dispatcher, so a computed or collecting override further down the
    /// chain is evaluated rather than returned raw.
    pub fn get(&self, facade: &Facade) -> Result<Option<Value>, ChainError> {
        dispatch(facade, self.resolve())
    }

    pub fn key(&self) -> &'a str {
        self.key
    }

    /// Whether there is any layer left to search.
    pub fn is_exhausted(&self) -> bool {
        self.from.map_or(true, |start| start >= self.layers.len())
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Next")
            .field("key", &self.key)
            .field("from", &self.from)
            .finish()
    }
}

/// Resolve `key` starting at the first layer.
pub fn resolve<'a>(layers: &'a Layers, key: &'a str) -> Resolution<'a> {
    resolve_from(layers, key, 0)
}

/// Resolve `key` in layers `[start, len)`.
pub fn resolve_from<'a>(layers: &'a Layers, key: &'a str, start: usize) -> Resolution<'a> {
    let chain = match layers {
        Layers::Single(layer) => {
            return Resolution {
                entry: layer.get(key),
                index: layers.len(),
                next: Next::exhausted(layers, key),
            };
        }
        Layers::Chain(chain) => chain,
    };

    for (index, layer) in chain.iter().enumerate().skip(start) {
        if let Some(entry) = layer.get(key) {
            tracing::trace!(key, index, "property resolved");
            return Resolution {
                entry: Some(entry),
                index,
                next: Next {
                    layers,
                    key,
                    from: Some(index + 1),
                },
            };
        }
    }

    tracing::trace!(key, start, "property not defined");
    Resolution::not_found(layers, key)
}
