//! Sunwet API - Shared types for view configuration and row data.
//!
//! Everything the renderer consumes arrives through these types: the
//! statically configured widget tree, the orientation vocabulary it is laid
//! out with, and the row values it is bound to.

mod context;
mod error;
mod orientation;
mod playlist;
mod spec;
mod value;

pub use context::*;
pub use error::*;
pub use orientation::*;
pub use playlist::*;
pub use spec::*;
pub use value::*;
