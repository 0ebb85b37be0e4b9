//! Canonical `'0'`/`'1'` state strings

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::board::Board;
use crate::{Error, Result};

/// Board occupancy as a string of `'1'` (peg) and `'0'` (hole), one character
/// per place in canonical order.
///
/// This is the hashable state key handed to learners and stored in policy
/// files. Two states are equal iff their strings are equal.
///
/// # Examples
///
/// ```
/// use pegsolitaire::peg::{Board, GameState};
///
/// let board = Board::from_state(4, "1011111011")?;
/// let state = GameState::from(&board);
/// assert_eq!(state.as_str(), "1011111011");
/// assert_eq!(state.occupied_count(), 8);
/// # Ok::<(), pegsolitaire::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub struct GameState(String);

impl GameState {
    /// Parse a state string, checking that it only contains `'0'` and `'1'`.
    ///
    /// The length is checked against a board when the state is decoded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateCharacter`] for any other character.
    pub fn parse(s: &str) -> Result<Self> {
        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|(_, c)| *c != '0' && *c != '1')
        {
            return Err(Error::InvalidStateCharacter {
                character,
                position,
            });
        }
        Ok(GameState(s.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of places in the state.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of pegs on the board.
    pub fn occupied_count(&self) -> usize {
        self.0.bytes().filter(|&b| b == b'1').count()
    }

    /// Occupancy of the place at a 0-based canonical index.
    pub fn is_occupied(&self, index: usize) -> Option<bool> {
        self.0.as_bytes().get(index).map(|&b| b == b'1')
    }
}

impl AsRef<str> for GameState {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for GameState {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GameState::parse(s)
    }
}

impl TryFrom<String> for GameState {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        GameState::parse(&s)
    }
}

impl From<&Board> for GameState {
    fn from(board: &Board) -> Self {
        encode(board)
    }
}

/// Encode the board occupancy in canonical order.
pub fn encode(board: &Board) -> GameState {
    GameState(
        board
            .places()
            .iter()
            .map(|place| if place.is_occupied() { '1' } else { '0' })
            .collect(),
    )
}

/// Load `state` into `board`; equivalent to [`Board::apply_bulk_state`].
pub fn decode(board: &mut Board, state: &GameState) -> Result<()> {
    board.apply_bulk_state(state.as_str())
}
