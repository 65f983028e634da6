//! First-match property resolution over ordered key/value layers.
//!
//! A [`Facade`] presents a list of layers as one object. Reading a key
//! searches the layers in order and the first layer defining it wins. A
//! layer may store, instead of a plain value:
//!
//! - a computed entry ([`compute`]), invoked with the facade, a continuation
//!   to the next layer defining the same key, the layer index and the layers;
//! - a collect entry ([`collect`] or [`Entry::Collect`]), which aggregates
//!   the key across layers into a list.
//!
//! ```
//! use layerchain_resolve::{collect, compute, Facade, Layer};
//! use serde_json::json;
//!
//! let facade = Facade::new(vec![
//!     Layer::new().with_entry(
//!         "title",
//!         compute(|data, next, _, _| {
//!             let base = data.require("base")?;
//!             let rest = next.resolve().value().cloned().unwrap_or_default();
//!             Ok(json!(format!("{}{}", base.as_str().unwrap_or(""), rest.as_str().unwrap_or(""))))
//!         }),
//!     ),
//!     Layer::new().with("base", "hello"),
//!     Layer::new().with("title", " world").with("plugins", "a"),
//!     Layer::new().with("plugins", "b").with_entry("all_plugins", collect("plugins")),
//! ]);
//!
//! assert_eq!(facade.get("title").unwrap(), Some(json!("hello world")));
//! assert_eq!(facade.get("all_plugins").unwrap(), Some(json!(["a", "b"])));
//! ```

mod collect;
mod entry;
mod error;
mod facade;
mod layer;
mod resolve;

pub use collect::{collect_all, collect_indexed};
pub use entry::{collect, compute, Computation, Computed, Entry};
pub use error::ChainError;
pub use facade::{dispatch, Facade};
pub use layer::{Layer, Layers};
pub use resolve::{resolve, resolve_from, Next, Resolution};
