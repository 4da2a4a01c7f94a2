//! Layout builder for rendered widget trees.
//!
//! Containers take children that are already rendered and place them on
//! screen according to a direction (linear) or an orientation (table).
//!
//! # Architecture
//!
//! ```text
//! renderer builds leaves -> LinearNode / TableNode place them -> RenderNode tree
//! ```
//!
//! Placement is resolved once, when the container is built. The tree is then
//! only ever walked, or has a pending slot spliced in.

pub mod edge;
pub mod error;
pub mod linear;
pub mod node;
pub mod table;

pub use edge::{axis_position, Edge};
pub use error::LayoutError;
pub use linear::{cross_direction, LinearNode, Placed};
pub use node::{ErrorLeaf, Extent, ImageLeaf, PlayButtonLeaf, RenderNode, SlotId, TextLeaf};
pub use table::{TableCell, TableNode};
