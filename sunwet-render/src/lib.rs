//! Sunwet Render - turns a widget spec and row data into a rendered tree.
//!
//! This crate contains:
//! - Data resolution (fields, literals, sub-queries)
//! - The recursive widget renderer
//! - The pending view that splices sub-query results into their slots
//! - Collaborator traits for queries, file URLs and playback

pub mod collab;
pub mod config;
pub mod page;
pub mod play;
pub mod resolve;
pub mod view;

mod error;
mod renderer;

pub use collab::{BaseUrlFiles, FileUrls, LogPlayback, Playback, QuerySource, StaticQueries};
pub use config::{CompositePolicy, RenderConfig};
pub use error::{ErrorKind, RenderError};
pub use page::Page;
pub use play::index_playlist;
pub use renderer::Renderer;
pub use view::{SlotUpdate, View};
