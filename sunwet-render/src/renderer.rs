//! The widget renderer.
//!
//! Rendering is a synchronous walk of the widget tree. Every `DataRows` widget
//! becomes a loading placeholder plus one pending resolution; when that
//! settles the `View` calls back into `compose_rows` to render the rows,
//! which may register further resolutions of their own.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::sync::Arc;
use sunwet_api::{DataContext, DataRowsSpec, ImageSpec, PlaylistEntry, RowsLayout, TextSpec, WidgetSpec};
use sunwet_layout::{Extent, ImageLeaf, LinearNode, PlayButtonLeaf, RenderNode, SlotId, TableNode, TextLeaf};
use tracing::debug;

use crate::collab::{FileUrls, Playback, QuerySource};
use crate::config::RenderConfig;
use crate::error::RenderError;
use crate::play::playlist_entry;
use crate::resolve::{resolve_field_or_literal, resolve_query_or_field, value_to_display_string, value_to_url};
use crate::view::View;

/// A `DataRows` resolution that has finished, successfully or not.
pub(crate) struct Settled {
    pub slot: SlotId,
    pub spec: Arc<DataRowsSpec>,
    pub result: Result<Vec<DataContext>, RenderError>,
}

pub(crate) type Job = BoxFuture<'static, Settled>;

/// Resolutions registered during a render pass, not yet handed to the view.
#[derive(Default)]
pub(crate) struct Pending {
    next_slot: u64,
    pub jobs: Vec<Job>,
}

impl Pending {
    fn allocate(&mut self) -> SlotId {
        let slot = SlotId(self.next_slot);
        self.next_slot += 1;
        slot
    }
}

/// Renders widget specs against row data.
///
/// Cheap to clone; collaborators are shared.
#[derive(Clone)]
pub struct Renderer {
    queries: Arc<dyn QuerySource>,
    files: Arc<dyn FileUrls>,
    playback: Arc<dyn Playback>,
    config: RenderConfig,
}

impl Renderer {
    pub fn new(
        queries: Arc<dyn QuerySource>,
        files: Arc<dyn FileUrls>,
        playback: Arc<dyn Playback>,
        config: RenderConfig,
    ) -> Self {
        Self {
            queries,
            files,
            playback,
            config,
        }
    }

    /// Render `spec` against `ctx`.
    ///
    /// Returns as soon as the synchronous pass is done; outstanding
    /// `DataRows` are left as placeholders for the returned `View` to fill.
    /// Errors outside any `DataRows` boundary fail the whole render.
    pub fn render(&self, spec: &WidgetSpec, ctx: &DataContext) -> Result<View, RenderError> {
        let mut pending = Pending::default();
        let root = self.build(spec, ctx, &mut pending)?;
        debug!(pending = pending.jobs.len(), "initial render done");
        Ok(View::new(self.clone(), root, pending))
    }

    /// Hand a pressed play button to the playback collaborator.
    ///
    /// The button's index refers to the playlist its view last published.
    pub fn request_play(&self, leaf: &PlayButtonLeaf) {
        self.playback.toggle_play(leaf.index);
    }

    pub(crate) fn publish_playlist(&self, entries: Vec<PlaylistEntry>) {
        self.playback.set_playlist(entries);
    }

    pub(crate) fn build(
        &self,
        spec: &WidgetSpec,
        ctx: &DataContext,
        pending: &mut Pending,
    ) -> Result<RenderNode, RenderError> {
        match spec {
            WidgetSpec::Layout(layout) => {
                let mut children = Vec::with_capacity(layout.elements.len());
                for element in &layout.elements {
                    children.push(self.build(element, ctx, pending)?);
                }
                Ok(RenderNode::Linear(LinearNode::build(layout.direction, layout.align, children)))
            }
            WidgetSpec::DataRows(rows) => Ok(self.defer(rows, ctx, pending)),
            WidgetSpec::Text(text) => self.text(text, ctx).map(RenderNode::Text),
            WidgetSpec::Image(image) => self.image(image, ctx).map(RenderNode::Image),
            WidgetSpec::PlayButton(button) => Ok(RenderNode::PlayButton(PlayButtonLeaf {
                entry: playlist_entry(button, ctx)?,
                index: 0,
                orientation: button.orientation,
                align: button.align,
            })),
        }
    }

    fn defer(&self, spec: &Arc<DataRowsSpec>, ctx: &DataContext, pending: &mut Pending) -> RenderNode {
        let slot = pending.allocate();
        let queries = Arc::clone(&self.queries);
        let ctx = ctx.clone();
        let spec = Arc::clone(spec);
        let align = spec.align;
        pending.jobs.push(
            async move {
                let result = resolve_query_or_field(queries.as_ref(), &ctx, &spec.data).await;
                Settled { slot, spec, result }
            }
            .boxed(),
        );
        RenderNode::Loading { slot, align }
    }

    /// Render one widget (list) or one cell per element (table) for every
    /// row, and compose them.
    pub(crate) fn compose_rows(
        &self,
        spec: &DataRowsSpec,
        rows: &[DataContext],
        pending: &mut Pending,
    ) -> Result<RenderNode, RenderError> {
        match &spec.rows {
            RowsLayout::List(list) => {
                let mut children = Vec::with_capacity(rows.len());
                for row in rows {
                    children.push(self.build(&list.widget, row, pending)?);
                }
                Ok(RenderNode::Linear(LinearNode::build(list.direction, spec.align, children)))
            }
            RowsLayout::Table(table) => {
                let mut grid = Vec::with_capacity(rows.len());
                for row in rows {
                    let mut cells = Vec::with_capacity(table.elements.len());
                    for element in &table.elements {
                        cells.push(self.build(element, row, pending)?);
                    }
                    grid.push(cells);
                }
                let node = TableNode::build(table.orientation, spec.align, table.elements.len(), grid)?;
                Ok(RenderNode::Table(node))
            }
        }
    }

    fn text(&self, spec: &TextSpec, ctx: &DataContext) -> Result<TextLeaf, RenderError> {
        let policy = self.config.composites();
        let value = resolve_field_or_literal(ctx, &spec.data)?;
        let text = format!("{}{}{}", spec.prefix, value_to_display_string(&value, policy)?, spec.suffix);
        let link = match &spec.link {
            Some(link) => {
                let target = resolve_field_or_literal(ctx, link)?;
                Some(value_to_url(&target, self.files.as_ref(), policy)?)
            }
            None => None,
        };
        let max_extent = spec.size_max.as_ref().map(|size| Extent {
            axis: spec.orientation.conv().axis(),
            size: size.clone(),
        });
        Ok(TextLeaf {
            text,
            link,
            size: spec.size.clone(),
            size_mode: spec.size_mode,
            max_extent,
            orientation: spec.orientation,
            align: spec.align,
        })
    }

    fn image(&self, spec: &ImageSpec, ctx: &DataContext) -> Result<ImageLeaf, RenderError> {
        let value = resolve_field_or_literal(ctx, &spec.data)?;
        Ok(ImageLeaf {
            url: value_to_url(&value, self.files.as_ref(), self.config.composites())?,
            width: spec.width.clone(),
            height: spec.height.clone(),
            align: spec.align,
        })
    }
}
