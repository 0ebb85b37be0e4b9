//! The six jump directions of the triangular grid

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::Coord;

/// A neighbor direction, defined by its `(Δlevel, Δposition)` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
}

impl Direction {
    /// All directions in the order used by neighbor listing and move
    /// enumeration. Recorded policies depend on this order.
    pub const ALL: [Direction; 6] = [
        Direction::East,
        Direction::Northeast,
        Direction::Northwest,
        Direction::West,
        Direction::Southeast,
        Direction::Southwest,
    ];

    /// `(Δlevel, Δposition)` for one step.
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::East => (0, 1),
            Direction::West => (0, -1),
            Direction::Northeast => (-1, 0),
            Direction::Northwest => (-1, -1),
            Direction::Southeast => (1, 1),
            Direction::Southwest => (1, 0),
        }
    }

    /// Step from `coord` on a board with `levels` levels, or `None` when the
    /// result falls outside the triangle.
    pub fn step(self, coord: Coord, levels: usize) -> Option<Coord> {
        let (d_level, d_position) = self.offset();
        let level = coord.level.checked_add_signed(d_level)?;
        let position = coord.position.checked_add_signed(d_position)?;
        (level < levels && position <= level).then_some(Coord::new(level, position))
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::East => "east",
            Direction::West => "west",
            Direction::Northeast => "northeast",
            Direction::Northwest => "northwest",
            Direction::Southeast => "southeast",
            Direction::Southwest => "southwest",
        };
        f.write_str(name)
    }
}
