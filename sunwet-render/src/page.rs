//! Whole-page rendering of a configured view.

use indexmap::IndexMap;
use sunwet_api::{DataContext, PlaylistEntry, ViewConfig, Value};
use sunwet_layout::RenderNode;
use tracing::{info, warn};

use crate::error::RenderError;
use crate::renderer::Renderer;

/// A fully rendered view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub root: RenderNode,
    /// Entries of the page's play buttons, in reading order.
    pub playlist: Vec<PlaylistEntry>,
    /// Whether the view asks for media controls next to the page.
    pub media_controls: bool,
}

/// Build the root context from a view's declared parameters.
///
/// Only declared parameters make it into the context; extras are ignored.
pub fn root_context(view: &ViewConfig, params: &IndexMap<String, Value>) -> Result<DataContext, RenderError> {
    let mut fields = IndexMap::with_capacity(view.parameters.len());
    for (name, kind) in &view.parameters {
        let value = params
            .get(name)
            .ok_or_else(|| RenderError::MissingField(name.clone()))?;
        if !kind.accepts(value) {
            return Err(RenderError::type_mismatch(format!(
                "parameter `{}` should be {}, got {}",
                name,
                kind.label(),
                value.kind_name()
            )));
        }
        fields.insert(name.clone(), value.clone());
    }
    Ok(DataContext::new(Value::Record(fields)))
}

impl Renderer {
    /// Render a view to completion.
    ///
    /// Never fails: anything not caught by a `DataRows` boundary replaces
    /// the page with a single error block.
    pub async fn render_page(&self, view: &ViewConfig, params: &IndexMap<String, Value>) -> Page {
        info!(view = %view.id, "rendering view");
        match self.try_render_page(view, params).await {
            Ok((root, playlist)) => Page {
                root,
                playlist,
                media_controls: view.media_controls,
            },
            Err(e) => {
                warn!(view = %view.id, "view failed: {}", e);
                Page {
                    root: RenderNode::ErrorBlock { message: e.to_string() },
                    playlist: Vec::new(),
                    media_controls: view.media_controls,
                }
            }
        }
    }

    async fn try_render_page(
        &self,
        view: &ViewConfig,
        params: &IndexMap<String, Value>,
    ) -> Result<(RenderNode, Vec<PlaylistEntry>), RenderError> {
        view.validate()?;
        let ctx = root_context(view, params)?;
        let mut rendered = self.render(&view.root, &ctx)?;
        rendered.drive().await?;
        let playlist = rendered.playlist().to_vec();
        Ok((rendered.into_root(), playlist))
    }
}
