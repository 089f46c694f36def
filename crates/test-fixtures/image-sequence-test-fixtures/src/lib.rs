//! Named sequence-props fixtures resolved through `fixtures/manifest.json`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

/// Fixture name -> path relative to the workspace `fixtures/` directory.
#[derive(Debug, Deserialize)]
struct Manifest {
    sequences: BTreeMap<String, String>,
}

impl Manifest {
    fn sequence_path(&self, name: &str) -> Result<PathBuf> {
        let Some(rel) = self.sequences.get(name) else {
            bail!("unknown sequence fixture '{name}'");
        };
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn sequence_text(&self, name: &str) -> Result<String> {
        let path = self.sequence_path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("sequence fixture '{name}' unreadable at {}", path.display()))
    }
}

/// Sequence props as a host would declare them (`images`, `framesPerSecond`, `loop`).
pub mod sequences {
    use super::*;

    /// Fixture names in sorted order.
    pub fn keys() -> Vec<String> {
        MANIFEST.sequences.keys().cloned().collect()
    }

    pub fn json(name: &str) -> Result<String> {
        MANIFEST.sequence_text(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        let text = MANIFEST.sequence_text(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("sequence fixture '{name}' is not valid props JSON"))
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        MANIFEST.sequence_path(name)
    }
}
