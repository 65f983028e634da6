//! Test fixtures for layered config tests
//!
//! Layer files live under `tests/fixtures/layers/`:
//! - `repo.toml`: repo-level overrides
//! - `host.json`: host-level settings

use std::path::{Path, PathBuf};

/// Directory holding the layer fixtures
pub fn layers_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/layers")
}

/// Path to the repo layer fixture
pub fn repo_layer_path() -> PathBuf {
    layers_dir().join("repo.toml")
}

/// Path to the host layer fixture
pub fn host_layer_path() -> PathBuf {
    layers_dir().join("host.json")
}
