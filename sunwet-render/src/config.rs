//! Renderer configuration.
//!
//! Loaded from a JSON file; every field has a default so an empty object is
//! a valid config.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What to do when a list or record reaches a text or image leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositePolicy {
    /// Fail with a config error.
    Reject,
    /// Show the value as compact JSON. Debugging aid only.
    Serialize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Prefix for file URLs (`<base>/file/<token>`).
    pub file_base_url: String,
    /// Serialize composite values in leaves instead of failing.
    pub debug_composites: bool,
}

impl RenderConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn composites(&self) -> CompositePolicy {
        if self.debug_composites {
            CompositePolicy::Serialize
        } else {
            CompositePolicy::Reject
        }
    }
}
