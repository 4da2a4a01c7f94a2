//! LinearNode - children in a single line.
//!
//! The line runs along a direction. Children are given in reading order and
//! stored in screen order (top to bottom, left to right), so an upward or
//! leftward line stores them reversed.

use serde::Serialize;
use sunwet_api::{Direction, TransAlign};

use crate::edge::{axis_position, Edge};
use crate::node::RenderNode;

/// A child together with where it sits on the container's cross axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placed {
    pub edge: Edge,
    pub node: RenderNode,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearNode {
    pub direction: Direction,
    /// Alignment of this container within its own parent.
    pub align: TransAlign,
    /// Children in screen order.
    pub children: Vec<Placed>,
}

/// Cross direction of a line: rightward for vertical lines, downward for
/// horizontal ones.
pub fn cross_direction(direction: Direction) -> Direction {
    match direction {
        Direction::Up | Direction::Down => Direction::Right,
        Direction::Left | Direction::Right => Direction::Down,
    }
}

impl LinearNode {
    /// Place `children` (reading order) along `direction`.
    pub fn build(direction: Direction, align: TransAlign, children: Vec<RenderNode>) -> Self {
        let n = children.len();
        let cross = cross_direction(direction);
        let mut slots: Vec<Option<Placed>> = (0..n).map(|_| None).collect();
        for (i, node) in children.into_iter().enumerate() {
            let screen = axis_position(direction, i, n) - 1;
            let edge = Edge::for_align(cross, node.align());
            slots[screen] = Some(Placed { edge, node });
        }
        Self {
            direction,
            align,
            children: slots.into_iter().flatten().collect(),
        }
    }
}
