//! A single cell of the board

use serde::{Deserialize, Serialize};

use crate::types::Coord;

/// A board cell with a fixed coordinate and an occupancy flag.
///
/// Places are only mutated through [`crate::peg::Board`], which reports
/// no-op transitions as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    coord: Coord,
    occupied: bool,
}

impl Place {
    /// Create an occupied place.
    pub(crate) fn new(coord: Coord) -> Self {
        Self {
            coord,
            occupied: true,
        }
    }

    pub fn coord(&self) -> Coord {
        self.coord
    }

    pub fn level(&self) -> usize {
        self.coord.level
    }

    pub fn position(&self) -> usize {
        self.coord.position
    }

    pub fn is_occupied(&self) -> bool {
        self.occupied
    }

    /// Put a peg on the place. Returns `false` if it already held one.
    pub(crate) fn occupy(&mut self) -> bool {
        !std::mem::replace(&mut self.occupied, true)
    }

    /// Remove the peg. Returns `false` if the place was already empty.
    pub(crate) fn clear(&mut self) -> bool {
        std::mem::replace(&mut self.occupied, false)
    }
}
