//! Newtype wrappers for improved type safety and domain modeling.

use std::{fmt, num::NonZeroUsize};

use serde::{Deserialize, Serialize};

/// A 1-based canonical place number, as used in action strings and policy files.
///
/// Ordinal `n` names the place at canonical index `n - 1` (level-major,
/// position ascending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Ordinal(NonZeroUsize);

impl Ordinal {
    /// Create an ordinal without knowing the board size. Returns `None` for zero.
    pub fn new(value: usize) -> Option<Self> {
        NonZeroUsize::new(value).map(Ordinal)
    }

    /// Create an ordinal that must name one of `places` places.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidOrdinal`] if `value` is zero or exceeds `places`.
    pub fn checked(value: usize, places: usize) -> Result<Self, crate::Error> {
        match Self::new(value) {
            Some(ordinal) if value <= places => Ok(ordinal),
            _ => Err(crate::Error::InvalidOrdinal {
                ordinal: value,
                places,
            }),
        }
    }

    /// Ordinal of the place stored at a 0-based canonical index.
    pub fn from_index(index: usize) -> Self {
        Ordinal(NonZeroUsize::MIN.saturating_add(index))
    }

    /// Get the inner 1-based value.
    pub fn value(&self) -> usize {
        self.0.get()
    }

    /// The 0-based canonical index.
    pub fn index(&self) -> usize {
        self.0.get() - 1
    }
}

impl From<Ordinal> for usize {
    fn from(ordinal: Ordinal) -> Self {
        ordinal.value()
    }
}

impl fmt::Display for Ordinal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A `(level, position)` coordinate on the triangle. Level 0 is the apex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub level: usize,
    pub position: usize,
}

impl Coord {
    pub const fn new(level: usize, position: usize) -> Self {
        Coord { level, position }
    }

    /// Canonical 0-based index of this coordinate. Only meaningful when
    /// `position <= level`.
    pub const fn canonical_index(&self) -> usize {
        place_count(self.level) + self.position
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.level, self.position)
    }
}

/// Number of places on a triangle with `levels` levels: `L(L+1)/2`.
pub const fn place_count(levels: usize) -> usize {
    levels * (levels + 1) / 2
}

/// Smallest board that still allows a jump.
pub const MIN_LEVELS: usize = 2;
