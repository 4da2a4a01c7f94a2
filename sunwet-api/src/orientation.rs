//! Reading directions and orientations.
//!
//! An `Orientation` fuses a primary reading direction (`conv`) with a
//! secondary, perpendicular one (`trans`). Both accessors read from a single
//! table so every caller agrees on the decomposition.

use serde::{Deserialize, Serialize};

/// A 4-way reading direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Screen axis a direction runs along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Vertical,
    Horizontal,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    /// Up and left run against screen storage order.
    pub fn is_reversed(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }

    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

/// An 8-way orientation: primary reading direction plus transverse direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    UpLeft,
    UpRight,
    DownLeft,
    #[default]
    DownRight,
    LeftUp,
    LeftDown,
    RightUp,
    RightDown,
}

/// (conv, trans) per orientation, indexed by discriminant.
const AXES: [(Direction, Direction); 8] = [
    (Direction::Up, Direction::Left),
    (Direction::Up, Direction::Right),
    (Direction::Down, Direction::Left),
    (Direction::Down, Direction::Right),
    (Direction::Left, Direction::Up),
    (Direction::Left, Direction::Down),
    (Direction::Right, Direction::Up),
    (Direction::Right, Direction::Down),
];

impl Orientation {
    pub const ALL: [Orientation; 8] = [
        Orientation::UpLeft,
        Orientation::UpRight,
        Orientation::DownLeft,
        Orientation::DownRight,
        Orientation::LeftUp,
        Orientation::LeftDown,
        Orientation::RightUp,
        Orientation::RightDown,
    ];

    /// Primary reading direction.
    pub fn conv(self) -> Direction {
        AXES[self as usize].0
    }

    /// Transverse (cross) direction.
    pub fn trans(self) -> Direction {
        AXES[self as usize].1
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::UpLeft => "up_left",
            Orientation::UpRight => "up_right",
            Orientation::DownLeft => "down_left",
            Orientation::DownRight => "down_right",
            Orientation::LeftUp => "left_up",
            Orientation::LeftDown => "left_down",
            Orientation::RightUp => "right_up",
            Orientation::RightDown => "right_down",
        }
    }
}

/// Position along the transverse axis.
///
/// `Start` and `End` are relative to the reading flow, not to screen storage
/// order: `Start` on a leftward axis is the right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransAlign {
    #[default]
    Start,
    Middle,
    End,
}
