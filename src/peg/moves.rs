//! Jump-capture moves and their action-string form

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, types::Ordinal};

/// A jump from `source` to `target`, both given as 1-based canonical ordinals.
///
/// The captured place is implied by the geometry; see
/// [`crate::peg::Board::jumped_place`]. A `Move` is only a request: the board
/// decides legality when it is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Move {
    pub source: Ordinal,
    pub target: Ordinal,
}

impl Move {
    pub fn new(source: Ordinal, target: Ordinal) -> Self {
        Self { source, target }
    }

    /// Build a move from 0-based canonical indices.
    pub fn from_indices(source: usize, target: usize) -> Self {
        Self::new(Ordinal::from_index(source), Ordinal::from_index(target))
    }

    /// Parse the `"<source> <target>"` action string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] for a missing or repeated separator,
    /// surrounding whitespace, non-numeric tokens or a zero ordinal. Range
    /// checks against a concrete board happen when the move is applied.
    pub fn parse(action: &str) -> Result<Self, Error> {
        let reject = |reason: &str| Error::ActionRejected {
            action: action.to_string(),
            reason: reason.to_string(),
        };

        let (source, target) = action
            .split_once(' ')
            .ok_or_else(|| reject("expected '<source> <target>'"))?;
        let source = parse_ordinal(source).ok_or_else(|| reject("invalid source ordinal"))?;
        let target = parse_ordinal(target).ok_or_else(|| reject("invalid target ordinal"))?;
        Ok(Self::new(source, target))
    }
}

fn parse_ordinal(token: &str) -> Option<Ordinal> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse::<usize>().ok().and_then(Ordinal::new)
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.source, self.target)
    }
}

impl FromStr for Move {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Move::parse(s)
    }
}
