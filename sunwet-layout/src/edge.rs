//! Axis placement rules shared by both container kinds.

use serde::Serialize;
use sunwet_api::{Direction, TransAlign};

/// Where a child sits on its container's transverse axis, in screen terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    Top,
    Bottom,
    Left,
    Right,
    Center,
}

impl Edge {
    /// The screen edge a flow in direction `d` starts from.
    pub fn leading(d: Direction) -> Edge {
        match d {
            Direction::Down => Edge::Top,
            Direction::Up => Edge::Bottom,
            Direction::Right => Edge::Left,
            Direction::Left => Edge::Right,
        }
    }

    /// The screen edge a flow in direction `d` ends at.
    pub fn trailing(d: Direction) -> Edge {
        match d {
            Direction::Down => Edge::Bottom,
            Direction::Up => Edge::Top,
            Direction::Right => Edge::Right,
            Direction::Left => Edge::Left,
        }
    }

    /// Resolve an alignment against the transverse direction `trans`.
    ///
    /// `Start`/`End` follow the reading flow, so they flip with reversed
    /// directions; `Middle` doesn't care.
    pub fn for_align(trans: Direction, align: TransAlign) -> Edge {
        match align {
            TransAlign::Start => Edge::leading(trans),
            TransAlign::Middle => Edge::Center,
            TransAlign::End => Edge::trailing(trans),
        }
    }
}

/// 1-based screen position of item `index` of `len` along direction `d`.
///
/// Forward directions keep input order (`index + 1`), reversed ones flip it
/// (`len - index`). Linear containers apply this once, tables once per axis.
pub fn axis_position(d: Direction, index: usize, len: usize) -> usize {
    debug_assert!(index < len);
    if d.is_reversed() { len - index } else { index + 1 }
}
