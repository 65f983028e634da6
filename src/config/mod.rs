//! Layered configuration
//!
//! Builds a resolution chain out of the usual configuration sources,
//! highest precedence first:
//! 1. CLI overrides
//! 2. Environment variables (`PREFIX_NAME`)
//! 3. Repo / host config files (TOML or JSON)
//! 4. Built-in defaults
//!
//! Each property is resolved on its own, first layer wins; tables are not
//! deep-merged. Every layer keeps its provenance.

mod effective;
mod load;
mod source;
mod stack;

pub use effective::LayeredConfig;
pub use source::{LayerOrigin, LayerSource};
pub use stack::LayerStack;

use layerchain_resolve::ChainError;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error(transparent)]
    Resolve(#[from] ChainError),
}
