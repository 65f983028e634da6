//! Layer entries: plain values, computed markers and the collect sentinel.

use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::error::ChainError;
use crate::facade::{collect_values, Facade};
use crate::layer::Layers;
use crate::resolve::Next;

/// Signature of a computation stored in a layer.
///
/// Arguments are the facade (for reading other properties), the
/// continuation past the layer holding the computation, the index of that
/// layer, and the full layer set.
pub type Computation =
    dyn Fn(&Facade, &Next<'_>, usize, &Layers) -> Result<Value, ChainError>;

/// A deferred computation standing in for a literal value.
#[derive(Clone)]
pub struct Computed {
    run: Rc<Computation>,
    /// Key aggregated by a [`collect`] marker
    collects: Option<Rc<str>>,
}

impl Computed {
    pub fn new<F>(computation: F) -> Self
    where
        F: Fn(&Facade, &Next<'_>, usize, &Layers) -> Result<Value, ChainError> + 'static,
    {
        Self {
            run: Rc::new(computation),
            collects: None,
        }
    }

    /// Key this marker aggregates, when built by [`collect`].
    pub fn collects(&self) -> Option<&str> {
        self.collects.as_deref()
    }

    pub(crate) fn invoke(
        &self,
        facade: &Facade,
        next: &Next<'_>,
        index: usize,
        layers: &Layers,
    ) -> Result<Value, ChainError> {
        (self.run)(facade, next, index, layers)
    }

    /// True when both markers share the same computation.
    pub fn ptr_eq(&self, other: &Computed) -> bool {
        Rc::ptr_eq(&self.run, &other.run)
    }
}

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Computed(..)")
    }
}

/// The value stored under a key in a layer.
#[derive(Debug, Clone)]
pub enum Entry {
    /// Returned as-is when resolved.
    Value(Value),
    /// Invoked when resolved; its output becomes the property value.
    Computed(Computed),
    /// Aggregates the same key from every following layer.
    Collect,
}

impl Entry {
    pub fn value(value: impl Into<Value>) -> Self {
        Self::Value(value.into())
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Entry::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_computed(&self) -> bool {
        matches!(self, Entry::Computed(_))
    }

    pub fn is_collect(&self) -> bool {
        matches!(self, Entry::Collect)
    }

    /// True when this entry, stored under `key`, aggregates `key` itself.
    ///
    /// Such entries stand for the list being built and are left out of it.
    pub fn aggregates(&self, key: &str) -> bool {
        match self {
            Entry::Collect => true,
            Entry::Computed(computed) => computed.collects() == Some(key),
            Entry::Value(_) => false,
        }
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Entry::Value(a), Entry::Value(b)) => a == b,
            (Entry::Computed(a), Entry::Computed(b)) => a.ptr_eq(b),
            (Entry::Collect, Entry::Collect) => true,
            _ => false,
        }
    }
}

impl From<Value> for Entry {
    fn from(value: Value) -> Self {
        Entry::Value(value)
    }
}

impl From<Computed> for Entry {
    fn from(computed: Computed) -> Self {
        Entry::Computed(computed)
    }
}

/// Mark `computation` as a computed property.
///
/// ```
/// use layerchain_resolve::{compute, Facade, Layer};
/// use serde_json::json;
///
/// let facade = Facade::new(vec![
///     Layer::new().with("greeting", "hello"),
///     Layer::new().with_entry(
///         "shout",
///         compute(|data, _, _, _| {
///             let greeting = data.require("greeting")?;
///             Ok(json!(greeting.as_str().unwrap_or_default().to_uppercase()))
///         }),
///     ),
/// ]);
/// assert_eq!(facade.get("shout").unwrap(), Some(json!("HELLO")));
/// ```
pub fn compute<F>(computation: F) -> Entry
where
    F: Fn(&Facade, &Next<'_>, usize, &Layers) -> Result<Value, ChainError> + 'static,
{
    Entry::Computed(Computed::new(computation))
}

/// Computed property gathering every layer's value for `key`, first layer
/// first.
///
/// This is the canonical way to aggregate. The scan covers the whole layer
/// set regardless of which layer holds the marker. Collected computed
/// entries are evaluated at their own layer. Layers whose entry for `key`
/// is itself an aggregate of `key` (this marker included, when stored under
/// `key`) contribute nothing.
pub fn collect(key: impl Into<String>) -> Entry {
    let key: String = key.into();
    let key: Rc<str> = Rc::from(key);
    let target = Rc::clone(&key);
    let run: Rc<Computation> =
        Rc::new(move |facade: &Facade, _: &Next<'_>, _: usize, layers: &Layers| {
            collect_values(facade, layers, &target, 0).map(Value::Array)
        });
    Entry::Computed(Computed {
        run,
        collects: Some(key),
    })
}
