//! The facade over a layer set and the dispatcher behind every read.

use std::collections::BTreeSet;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::collect::collect_indexed;
use crate::entry::Entry;
use crate::error::ChainError;
use crate::layer::Layers;
use crate::resolve::{resolve, Resolution};

/// A single virtual object backed by ordered layers.
///
/// Every read goes through [`Facade::get`]: the key is resolved against the
/// layers (first match wins) and the entry found is dispatched. Plain values
/// come back as-is, computed entries are invoked with this facade so they can
/// read other properties, and collect entries aggregate the following layers.
///
/// Nothing is cached. Changes made through [`Facade::layers_mut`] are seen by
/// the next read.
#[derive(Debug, Clone)]
pub struct Facade {
    layers: Layers,
}

impl Facade {
    pub fn new(layers: impl Into<Layers>) -> Self {
        Self {
            layers: layers.into(),
        }
    }

    /// Build from JSON: an object is a single layer, an array of objects a
    /// chain. Anything else is rejected.
    pub fn from_value(value: Value) -> Result<Self, ChainError> {
        Ok(Self::new(Layers::try_from(value)?))
    }

    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut Layers {
        &mut self.layers
    }

    pub fn into_layers(self) -> Layers {
        self.layers
    }

    /// Raw lookup without dispatching.
    pub fn resolve<'a>(&'a self, key: &'a str) -> Resolution<'a> {
        resolve(&self.layers, key)
    }

    /// Read `key`. `None` means no layer defines it.
    pub fn get(&self, key: &str) -> Result<Option<Value>, ChainError> {
        dispatch(self, resolve(&self.layers, key))
    }

    /// Read `key` and deserialize it.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ChainError> {
        self.get(key)?
            .map(|value| {
                serde_json::from_value(value).map_err(|e| ChainError::Decode {
                    key: key.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    /// Read `key`, failing when no layer defines it.
    pub fn require(&self, key: &str) -> Result<Value, ChainError> {
        self.get(key)?
            .ok_or_else(|| ChainError::Missing(key.to_string()))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.resolve(key).is_found()
    }

    /// Every key defined by at least one layer, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let keys: BTreeSet<&str> = self.layers.iter().flat_map(|layer| layer.keys()).collect();
        keys.into_iter().collect()
    }

    /// Values of `key` across every layer, first layer first.
    pub fn collect(&self, key: &str) -> Result<Vec<Value>, ChainError> {
        collect_values(self, &self.layers, key, 0)
    }
}

/// Turn a resolution into the value a read returns.
pub fn dispatch(facade: &Facade, resolution: Resolution<'_>) -> Result<Option<Value>, ChainError> {
    match resolution.entry {
        Some(entry) => evaluate(facade, entry, &resolution).map(Some),
        None => Ok(None),
    }
}

fn evaluate(facade: &Facade, entry: &Entry, at: &Resolution<'_>) -> Result<Value, ChainError> {
    match entry {
        Entry::Value(value) => Ok(value.clone()),
        // The sentinel's own layer is not part of the aggregate.
        Entry::Collect => {
            collect_values(facade, at.layers(), at.key(), at.index + 1).map(Value::Array)
        }
        Entry::Computed(computed) => {
            tracing::trace!(key = at.key(), index = at.index, "invoking computed property");
            computed.invoke(facade, &at.next, at.index, at.layers())
        }
    }
}

/// Dispatched values of `key` in layers `[from, len)`.
///
/// Entries that aggregate `key` themselves are skipped; their layers add
/// nothing to the list.
pub(crate) fn collect_values(
    facade: &Facade,
    layers: &Layers,
    key: &str,
    from: usize,
) -> Result<Vec<Value>, ChainError> {
    let mut values = Vec::new();
    for (index, entry) in collect_indexed(layers, key, from) {
        if entry.aggregates(key) {
            tracing::trace!(key, index, "skipping nested aggregate");
            continue;
        }
        let at = Resolution::at(layers, key, index, entry);
        values.push(evaluate(facade, entry, &at)?);
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{collect, compute};
    use crate::layer::Layer;
    use serde_json::json;

    #[test]
    fn test_plain_read() {
        let facade = Facade::new(Layer::new().with("a", 1));
        assert_eq!(facade.get("a").unwrap(), Some(json!(1)));
        assert_eq!(facade.get("b").unwrap(), None);
    }

    #[test]
    fn test_computed_receives_index_and_layers() {
        let facade = Facade::new(vec![
            Layer::new(),
            Layer::new().with_entry(
                "where",
                compute(|_, _, index, layers| Ok(json!([index, layers.len()]))),
            ),
        ]);
        assert_eq!(facade.get("where").unwrap(), Some(json!([1, 2])));
    }

    #[test]
    fn test_computed_on_single_layer_sees_end_index() {
        let facade = Facade::new(Layer::new().with_entry(
            "where",
            compute(|_, next, index, _| Ok(json!([index, next.is_exhausted()]))),
        ));
        assert_eq!(facade.get("where").unwrap(), Some(json!([1, true])));
    }

    #[test]
    fn test_collect_sentinel_skips_own_layer() {
        // Layer 0 also defines `tags` and reaches the sentinel through `next`.
        let facade = Facade::new(vec![
            Layer::new().with_entry("tags", compute(|data, next, _, _| {
                let below = next.get(data)?.unwrap_or(Value::Null);
                Ok(json!({ "wrapped": below }))
            })),
            Layer::new().with_entry("tags", Entry::Collect),
            Layer::new().with("tags", "a"),
            Layer::new(),
            Layer::new().with("tags", "b"),
        ]);
        assert_eq!(
            facade.get("tags").unwrap(),
            Some(json!({ "wrapped": ["a", "b"] }))
        );
    }

    #[test]
    fn test_collect_factory_under_its_own_key() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("tags", collect("tags")),
            Layer::new().with("tags", "a"),
            Layer::new().with("tags", "b"),
        ]);
        assert_eq!(facade.get("tags").unwrap(), Some(json!(["a", "b"])));

        let single = Facade::new(Layer::new().with_entry("tags", collect("tags")));
        assert_eq!(single.get("tags").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_repeated_collect_factories_contribute_nothing() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("tags", collect("tags")),
            Layer::new().with("tags", "a"),
            Layer::new().with_entry("tags", collect("tags")),
            Layer::new().with("tags", "b"),
        ]);
        assert_eq!(facade.get("tags").unwrap(), Some(json!(["a", "b"])));
    }

    #[test]
    fn test_nested_sentinel_is_skipped() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("p", Entry::Collect),
            Layer::new().with("p", 1),
            Layer::new().with_entry("p", Entry::Collect),
            Layer::new().with("p", 2),
        ]);
        assert_eq!(facade.get("p").unwrap(), Some(json!([1, 2])));
        assert_eq!(facade.collect("p").unwrap(), vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_collect_of_other_key_is_still_collected() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("all", collect("v")),
            Layer::new().with_entry("v", collect("w")),
            Layer::new().with("w", 7),
            Layer::new().with("v", 2),
        ]);
        assert_eq!(facade.get("all").unwrap(), Some(json!([[7], 2])));
    }

    #[test]
    fn test_collect_sentinel_with_nothing_after_is_empty_list() {
        let facade = Facade::new(vec![Layer::new().with_entry("tags", Entry::Collect)]);
        assert_eq!(facade.get("tags").unwrap(), Some(json!([])));
    }

    #[test]
    fn test_collected_computed_entries_are_evaluated() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("all", collect("v")),
            Layer::new().with("v", 1),
            Layer::new().with_entry("v", compute(|_, next, _, _| {
                let below = next.resolve().value().cloned().unwrap_or(Value::Null);
                Ok(json!({ "computed": below }))
            })),
            Layer::new().with("v", 3),
        ]);
        assert_eq!(
            facade.get("all").unwrap(),
            Some(json!([1, {"computed": 3}, 3]))
        );
    }

    #[test]
    fn test_next_get_dispatches() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("n", compute(|data, next, _, _| {
                let below = next.get(data)?.and_then(|v| v.as_i64()).unwrap_or(0);
                Ok(json!(below + 1))
            })),
            Layer::new().with_entry("n", compute(|data, next, _, _| {
                let below = next.get(data)?.and_then(|v| v.as_i64()).unwrap_or(0);
                Ok(json!(below * 10))
            })),
            Layer::new().with("n", 4),
        ]);
        assert_eq!(facade.get("n").unwrap(), Some(json!(41)));
    }

    #[test]
    fn test_errors_propagate_unchanged() {
        let facade = Facade::new(vec![
            Layer::new().with_entry("outer", compute(|data, _, _, _| data.require("inner"))),
            Layer::new().with_entry(
                "inner",
                compute(|_, _, _, _| Err(ChainError::custom("backend unavailable"))),
            ),
        ]);
        let err = facade.get("outer").unwrap_err();
        assert!(matches!(err, ChainError::Custom(ref m) if m == "backend unavailable"));
    }

    #[test]
    fn test_get_as_and_decode_error() {
        let facade = Facade::new(Layer::new().with("port", 8080).with("name", "svc"));
        assert_eq!(facade.get_as::<u16>("port").unwrap(), Some(8080));
        assert_eq!(facade.get_as::<u16>("absent").unwrap(), None);
        let err = facade.get_as::<u16>("name").unwrap_err();
        assert!(matches!(err, ChainError::Decode { ref key, .. } if key == "name"));
    }

    #[test]
    fn test_require_missing() {
        let facade = Facade::new(vec![Layer::new()]);
        assert!(matches!(facade.require("x"), Err(ChainError::Missing(_))));
    }

    #[test]
    fn test_keys_and_contains() {
        let facade = Facade::new(vec![
            Layer::new().with("b", 1).with("a", 1),
            Layer::new().with("c", 1).with("a", 2),
        ]);
        assert_eq!(facade.keys(), vec!["a", "b", "c"]);
        assert!(facade.contains("c"));
        assert!(!facade.contains("d"));
    }

    #[test]
    fn test_mutation_is_visible_on_next_read() {
        let mut facade = Facade::new(vec![Layer::new(), Layer::new().with("x", 1)]);
        assert_eq!(facade.get("x").unwrap(), Some(json!(1)));
        facade
            .layers_mut()
            .get_mut(0)
            .unwrap()
            .insert("x", json!(0));
        assert_eq!(facade.get("x").unwrap(), Some(json!(0)));
    }

    #[test]
    fn test_facade_collect() {
        let facade = Facade::new(vec![
            Layer::new().with("v", 1),
            Layer::new(),
            Layer::new().with("v", 2),
        ]);
        assert_eq!(facade.collect("v").unwrap(), vec![json!(1), json!(2)]);
        assert!(facade.collect("w").unwrap().is_empty());
    }

    #[test]
    fn test_from_value_rejects_scalars() {
        assert!(Facade::from_value(json!("nope")).is_err());
        let facade = Facade::from_value(json!([{"x": 1}, {"x": 2}])).unwrap();
        assert_eq!(facade.get("x").unwrap(), Some(json!(1)));
    }
}
