//! layerchain - layered property resolution
//!
//! Presents an ordered list of key/value layers as a single object whose
//! reads are resolved first-match-wins, with computed properties and
//! cross-layer collection. The engine lives in `layerchain-resolve`; this
//! crate re-exports it and adds a configuration front end that stacks
//! defaults, files, environment and CLI overrides with provenance.

pub mod config;

pub use config::{ConfigError, LayerOrigin, LayerSource, LayerStack, LayeredConfig};
pub use layerchain_resolve::{
    collect, collect_all, collect_indexed, compute, dispatch, resolve, resolve_from, ChainError,
    Computation, Computed, Entry, Facade, Layer, Layers, Next, Resolution,
};
