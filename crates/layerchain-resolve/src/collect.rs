//! Aggregation of every layer's value for a key.

use crate::entry::Entry;
use crate::layer::Layers;

/// Every entry defined for `key` in layers `[from, len)`, with the index of
/// the layer it came from. Layers without the key are skipped.
pub fn collect_indexed<'a>(layers: &'a Layers, key: &str, from: usize) -> Vec<(usize, &'a Entry)> {
    let found: Vec<_> = layers
        .iter()
        .enumerate()
        .skip(from)
        .filter_map(|(index, layer)| layer.get(key).map(|entry| (index, entry)))
        .collect();
    tracing::trace!(key, from, count = found.len(), "collected property");
    found
}

/// Every entry defined for `key` in layers `[from, len)`, first layer first.
pub fn collect_all<'a>(layers: &'a Layers, key: &str, from: usize) -> Vec<&'a Entry> {
    collect_indexed(layers, key, from)
        .into_iter()
        .map(|(_, entry)| entry)
        .collect()
}
