//! Playlist entries handed to the playback collaborator.

use serde::{Deserialize, Serialize};

use crate::FileRef;

/// One playable item, resolved from a play button's field bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub file: FileRef,
    /// Media type (ex `sunwet/1/video`, `sunwet/1/audio`).
    pub media_type: String,
    pub name: Option<String>,
    pub album: Option<String>,
    pub artist: Option<String>,
    pub cover: Option<FileRef>,
}
