//! Layer provenance.

use serde::{Deserialize, Serialize};

/// Where a layer came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Defaults,
    File,
    Env,
    Cli,
    /// Built in code, e.g. a layer carrying computed entries.
    Inline,
}

/// A contributing layer with provenance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerSource {
    /// Origin of this layer
    pub origin: LayerOrigin,

    /// File path (files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of the raw file bytes (files only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    /// Variable prefix (env only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

impl LayerSource {
    pub fn new(origin: LayerOrigin) -> Self {
        Self {
            origin,
            path: None,
            digest: None,
            prefix: None,
        }
    }

    pub fn file(path: impl Into<String>, digest: impl Into<String>) -> Self {
        Self {
            path: Some(path.into()),
            digest: Some(digest.into()),
            ..Self::new(LayerOrigin::File)
        }
    }

    pub fn env(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::new(LayerOrigin::Env)
        }
    }
}
