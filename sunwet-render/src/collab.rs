//! Collaborators the renderer is constructed with.
//!
//! Queries, file URLs and playback all live outside the engine. They are
//! injected into the `Renderer` so tests (and the CLI) can substitute their
//! own implementations.

use anyhow::Context;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;
use sunwet_api::{DataContext, FileRef, PlaylistEntry, Value};

/// Resolves a named query plus parameters into rows.
///
/// Owns timeouts and transport failures; any error is reported back to the
/// engine as a rejected resolution.
#[async_trait]
pub trait QuerySource: Send + Sync {
    async fn query(&self, id: &str, params: &IndexMap<String, Value>) -> anyhow::Result<Vec<DataContext>>;
}

/// Turns a file reference into a fetchable URL.
pub trait FileUrls: Send + Sync {
    fn file_url(&self, file: &FileRef) -> String;
}

/// Plays a view's media.
///
/// A view publishes its playlist whenever the set of play buttons changes.
/// A pressed button toggles the entry at its index; moving on to the next
/// entry is up to the implementation.
pub trait Playback: Send + Sync {
    fn set_playlist(&self, entries: Vec<PlaylistEntry>);
    fn toggle_play(&self, index: usize);
}

// =========================================================================
// Implementations
// =========================================================================

/// File URLs under a fixed base (`<base>/file/<token>`).
#[derive(Debug, Clone)]
pub struct BaseUrlFiles {
    base: String,
}

impl BaseUrlFiles {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }
}

impl FileUrls for BaseUrlFiles {
    fn file_url(&self, file: &FileRef) -> String {
        format!("{}/file/{}", self.base, file.token())
    }
}

/// Canned query results keyed by query id. Parameters are logged and
/// otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct StaticQueries {
    results: IndexMap<String, Vec<DataContext>>,
}

impl StaticQueries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: impl Into<String>, rows: Vec<DataContext>) -> Self {
        self.results.insert(id.into(), rows);
        self
    }

    /// Load `{"<query id>": [row, ...], ...}` from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading query fixtures {}", path.display()))?;
        let results = serde_json::from_str(&text)
            .with_context(|| format!("parsing query fixtures {}", path.display()))?;
        Ok(Self { results })
    }
}

#[async_trait]
impl QuerySource for StaticQueries {
    async fn query(&self, id: &str, params: &IndexMap<String, Value>) -> anyhow::Result<Vec<DataContext>> {
        tracing::debug!(query = id, ?params, "static query");
        self.results
            .get(id)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("no query with id {}", id))
    }
}

/// Playback stand-in that only logs.
#[derive(Debug, Clone, Default)]
pub struct LogPlayback;

impl Playback for LogPlayback {
    fn set_playlist(&self, entries: Vec<PlaylistEntry>) {
        tracing::info!(entries = entries.len(), "playlist updated");
        for (i, entry) in entries.iter().enumerate() {
            tracing::debug!(index = i, file = %entry.file, media = %entry.media_type, "playlist entry");
        }
    }

    fn toggle_play(&self, index: usize) {
        tracing::info!(index, "play toggled");
    }
}
