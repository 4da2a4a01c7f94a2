//! Pending views.
//!
//! A `View` owns a rendered tree and the resolutions still outstanding for
//! its `DataRows` slots. Polling it splices each result into its slot as it
//! settles, in whatever order the collaborators answer. Dropping the view
//! drops every in-flight resolution with it.
//!
//! The view also keeps the playlist of its play buttons current, publishing
//! it to playback whenever a splice changes it.

use futures::stream::{FuturesUnordered, StreamExt};
use sunwet_api::PlaylistEntry;
use sunwet_layout::{ErrorLeaf, RenderNode, SlotId};
use tracing::{debug, warn};

use crate::error::RenderError;
use crate::play::index_playlist;
use crate::renderer::{Job, Pending, Renderer, Settled};

/// What happened to a slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotUpdate {
    /// Rows arrived and were composed into the slot.
    Filled { slot: SlotId, rows: usize },
    /// The slot now shows a local error.
    Failed { slot: SlotId, error: RenderError },
}

pub struct View {
    renderer: Renderer,
    root: RenderNode,
    /// Scratch space for resolutions registered while composing rows.
    pending: Pending,
    in_flight: FuturesUnordered<Job>,
    /// Entries of every play button in the tree, in reading order.
    playlist: Vec<PlaylistEntry>,
}

impl View {
    pub(crate) fn new(renderer: Renderer, root: RenderNode, mut pending: Pending) -> Self {
        let in_flight = pending.jobs.drain(..).collect();
        let mut view = Self {
            renderer,
            root,
            pending,
            in_flight,
            playlist: Vec::new(),
        };
        view.refresh_playlist();
        view
    }

    /// The tree as it stands, placeholders included.
    pub fn root(&self) -> &RenderNode {
        &self.root
    }

    pub fn into_root(self) -> RenderNode {
        self.root
    }

    /// The playlist as last published to playback.
    pub fn playlist(&self) -> &[PlaylistEntry] {
        &self.playlist
    }

    pub fn is_settled(&self) -> bool {
        self.in_flight.is_empty()
    }

    pub fn pending_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Wait for the next slot to settle and splice it in.
    ///
    /// Returns `None` once nothing is outstanding. A config error aborts
    /// the view: the root is replaced by an error block, remaining
    /// resolutions are dropped, and the error is returned.
    pub async fn next(&mut self) -> Option<Result<SlotUpdate, RenderError>> {
        let settled = self.in_flight.next().await?;
        Some(self.apply(settled))
    }

    /// Drive every outstanding slot to completion, stopping at the first
    /// config error.
    pub async fn drive(&mut self) -> Result<(), RenderError> {
        while let Some(update) = self.next().await {
            update?;
        }
        Ok(())
    }

    /// Drive the view and hand back the finished tree.
    pub async fn settle(mut self) -> Result<RenderNode, RenderError> {
        self.drive().await?;
        Ok(self.root)
    }

    /// Drop all in-flight resolutions, leaving their placeholders in place.
    pub fn cancel(&mut self) {
        if !self.in_flight.is_empty() {
            debug!(dropped = self.in_flight.len(), "cancelling view");
        }
        self.in_flight = FuturesUnordered::new();
    }

    fn apply(&mut self, settled: Settled) -> Result<SlotUpdate, RenderError> {
        let Settled { slot, spec, result } = settled;
        let mark = self.pending.jobs.len();
        let composed = result.and_then(|rows| {
            let node = self.renderer.compose_rows(&spec, &rows, &mut self.pending)?;
            Ok((node, rows.len()))
        });

        let (node, update) = match composed {
            Ok((node, rows)) => {
                debug!(slot = slot.0, rows, "slot filled");
                (node, SlotUpdate::Filled { slot, rows })
            }
            Err(error) if error.is_local() => {
                // Nothing composed for this slot survives, including any
                // nested resolutions it registered.
                self.pending.jobs.truncate(mark);
                warn!(slot = slot.0, "slot failed: {}", error);
                let leaf = RenderNode::Error(ErrorLeaf {
                    kind: error.kind().label().to_string(),
                    message: error.to_string(),
                    align: spec.align,
                });
                (leaf, SlotUpdate::Failed { slot, error })
            }
            Err(error) => {
                warn!(slot = slot.0, "aborting view: {}", error);
                self.pending.jobs.clear();
                self.cancel();
                self.root = RenderNode::ErrorBlock {
                    message: error.to_string(),
                };
                self.refresh_playlist();
                return Err(error);
            }
        };

        self.in_flight.extend(self.pending.jobs.drain(..));
        if self.root.splice(slot, node).is_err() {
            debug!(slot = slot.0, "slot no longer in tree");
        }
        self.refresh_playlist();
        Ok(update)
    }

    /// Renumber the play buttons and publish the playlist if it changed.
    fn refresh_playlist(&mut self) {
        let playlist = index_playlist(&mut self.root);
        if playlist != self.playlist {
            debug!(entries = playlist.len(), "publishing playlist");
            self.renderer.publish_playlist(playlist.clone());
            self.playlist = playlist;
        }
    }
}
