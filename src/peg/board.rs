//! Board topology, neighbor algebra and the jump-capture move engine
//!
//! Places live in a flat vector in canonical order (level-major, position
//! ascending). Coordinates map to indices with the triangular-number formula,
//! so neighbor lookup is pure arithmetic:
//!
//! ```text
//! level 0:        1
//! level 1:      2   3
//! level 2:    4   5   6
//! level 3:  7   8   9  10
//! ```
//!
//! The numbers above are the 1-based ordinals used in action strings.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{direction::Direction, moves::Move, place::Place};
use crate::{
    Error, Result,
    types::{Coord, MIN_LEVELS, Ordinal},
};

/// A triangular peg solitaire board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardRepr")]
pub struct Board {
    levels: usize,
    places: Vec<Place>,
}

/// Unchecked serialized form of a [`Board`].
#[derive(Deserialize)]
struct BoardRepr {
    levels: usize,
    places: Vec<Place>,
}

impl TryFrom<BoardRepr> for Board {
    type Error = Error;

    /// Rebuild the board geometry and accept only occupancy from the input.
    fn try_from(repr: BoardRepr) -> Result<Self> {
        let expected = checked_place_count(repr.levels)?;
        if repr.places.len() != expected {
            return Err(Error::InvalidStateLength {
                expected,
                got: repr.places.len(),
            });
        }

        let mut board = Board::new(repr.levels)?;
        for (place, stored) in board.places.iter_mut().zip(&repr.places) {
            if stored.coord() != place.coord() {
                return Err(Error::InvalidConfiguration {
                    message: format!(
                        "place {} stored at coordinate {}",
                        place.coord(),
                        stored.coord()
                    ),
                });
            }
            if !stored.is_occupied() {
                place.clear();
            }
        }
        Ok(board)
    }
}

impl Board {
    /// Create a board with `levels` levels and every place occupied.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLevels`] if `levels < 2`.
    pub fn new(levels: usize) -> Result<Self> {
        checked_place_count(levels)?;

        let places = (0..levels)
            .flat_map(|level| (0..=level).map(move |position| Coord::new(level, position)))
            .map(Place::new)
            .collect();

        Ok(Self { levels, places })
    }

    /// Create a board and load the given state string into it.
    pub fn from_state(levels: usize, state: &str) -> Result<Self> {
        let mut board = Self::new(levels)?;
        board.apply_bulk_state(state)?;
        Ok(board)
    }

    pub fn levels(&self) -> usize {
        self.levels
    }

    /// Total number of places, `L(L+1)/2`.
    pub fn place_count(&self) -> usize {
        self.places.len()
    }

    /// All places in canonical order.
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.level < self.levels && coord.position <= coord.level
    }

    fn index_of(&self, coord: Coord) -> Option<usize> {
        self.contains(coord).then(|| coord.canonical_index())
    }

    /// Place at `(level, position)`, or `None` outside the triangle.
    pub fn place_at(&self, level: usize, position: usize) -> Option<&Place> {
        self.index_of(Coord::new(level, position))
            .map(|index| &self.places[index])
    }

    /// Place with the given 1-based ordinal.
    pub fn place(&self, ordinal: Ordinal) -> Option<&Place> {
        self.places.get(ordinal.index())
    }

    /// Ordinal of the place at `coord`.
    pub fn ordinal_of(&self, coord: Coord) -> Option<Ordinal> {
        self.index_of(coord).map(Ordinal::from_index)
    }

    /// Neighbor of `coord` one step in `direction`.
    pub fn neighbor(&self, coord: Coord, direction: Direction) -> Option<&Place> {
        direction
            .step(coord, self.levels)
            .map(|next| &self.places[next.canonical_index()])
    }

    /// Existing neighbors of `coord`, ordered E, NE, NW, W, SE, SW.
    pub fn neighbors(&self, coord: Coord) -> Vec<&Place> {
        Direction::ALL
            .iter()
            .filter_map(|&direction| self.neighbor(coord, direction))
            .collect()
    }

    pub fn are_neighbors(&self, a: Coord, b: Coord) -> bool {
        self.neighbors(a).iter().any(|place| place.coord() == b)
    }

    pub fn occupied_count(&self) -> usize {
        self.places.iter().filter(|p| p.is_occupied()).count()
    }

    pub fn empty_count(&self) -> usize {
        self.place_count() - self.occupied_count()
    }

    /// Largest number of empty places a playable start may have.
    pub fn max_empty_places(&self) -> usize {
        self.place_count() - 2
    }

    fn occupy(&mut self, index: usize) -> Result<()> {
        if self.places[index].occupy() {
            Ok(())
        } else {
            Err(Error::PlaceAlreadyOccupied {
                ordinal: index + 1,
            })
        }
    }

    fn clear(&mut self, index: usize) -> Result<()> {
        if self.places[index].clear() {
            Ok(())
        } else {
            Err(Error::PlaceAlreadyEmpty {
                ordinal: index + 1,
            })
        }
    }

    /// Build a move between two coordinates, if both are on the board.
    pub fn move_between(&self, source: Coord, target: Coord) -> Option<Move> {
        Some(Move::new(self.ordinal_of(source)?, self.ordinal_of(target)?))
    }

    /// Direction and intermediate place of a jump from `source` to `target`,
    /// ignoring occupancy. At most one direction fits any pair.
    fn jump_geometry(&self, source: Coord, target: Coord) -> Option<(Direction, Coord)> {
        Direction::ALL.iter().find_map(|&direction| {
            let middle = direction.step(source, self.levels)?;
            let landing = direction.step(middle, self.levels)?;
            (landing == target).then_some((direction, middle))
        })
    }

    /// Coordinate of the peg that `mv` would capture, if `mv` spans exactly
    /// two steps in one direction.
    pub fn jumped_place(&self, mv: Move) -> Option<Coord> {
        let source = self.place(mv.source)?.coord();
        let target = self.place(mv.target)?.coord();
        self.jump_geometry(source, target).map(|(_, middle)| middle)
    }

    /// Whether `mv` is a legal jump on the current board.
    pub fn is_legal_move(&self, mv: Move) -> bool {
        self.legal_jump(mv).is_some()
    }

    /// Canonical indices `(source, jumped, target)` of a legal move.
    fn legal_jump(&self, mv: Move) -> Option<(usize, usize, usize)> {
        let source = self.place(mv.source)?;
        let target = self.place(mv.target)?;
        if !source.is_occupied() || target.is_occupied() {
            return None;
        }
        let (_, middle) = self.jump_geometry(source.coord(), target.coord())?;
        let jumped = middle.canonical_index();
        self.places[jumped]
            .is_occupied()
            .then_some((mv.source.index(), jumped, mv.target.index()))
    }

    /// Execute a jump: clear the source and the captured place, occupy the target.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MoveRejected`] without touching the board when `mv` is
    /// not legal.
    pub fn apply_move(&mut self, mv: Move) -> Result<()> {
        let (source, jumped, target) = self.legal_jump(mv).ok_or(Error::MoveRejected {
            source_ordinal: mv.source.value(),
            target_ordinal: mv.target.value(),
        })?;

        // Preconditions were checked above, so none of these can fail.
        self.clear(source)?;
        self.clear(jumped)?;
        self.occupy(target)
    }

    /// All legal moves: occupied sources in canonical order, directions in
    /// [`Direction::ALL`] order.
    pub fn legal_moves(&self) -> Vec<Move> {
        let mut moves = Vec::new();
        for (index, place) in self.places.iter().enumerate() {
            if !place.is_occupied() {
                continue;
            }
            for direction in Direction::ALL {
                if let Some(target) = self.jump_target(place.coord(), direction) {
                    moves.push(Move::from_indices(index, target));
                }
            }
        }
        moves
    }

    /// Whether any legal move exists; cheaper than `legal_moves().is_empty()`.
    pub fn has_legal_move(&self) -> bool {
        self.places
            .iter()
            .filter(|place| place.is_occupied())
            .any(|place| {
                Direction::ALL
                    .iter()
                    .any(|&direction| self.jump_target(place.coord(), direction).is_some())
            })
    }

    fn jump_target(&self, source: Coord, direction: Direction) -> Option<usize> {
        let middle = self.neighbor(source, direction)?;
        if !middle.is_occupied() {
            return None;
        }
        let landing = self.neighbor(middle.coord(), direction)?;
        (!landing.is_occupied()).then(|| landing.coord().canonical_index())
    }

    /// Load a `'0'`/`'1'` state string, toggling only places that differ.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidStateLength`] or [`Error::InvalidStateCharacter`];
    /// the board is untouched on error.
    pub fn apply_bulk_state(&mut self, token: &str) -> Result<()> {
        let wanted = parse_occupancy(token, self.place_count())?;

        for (index, occupied) in wanted.into_iter().enumerate() {
            match (occupied, self.places[index].is_occupied()) {
                (true, false) => self.occupy(index)?,
                (false, true) => self.clear(index)?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Occupy every place.
    pub(crate) fn fill(&mut self) {
        for place in &mut self.places {
            place.occupy();
        }
    }

    /// Fill the board, then clear `k` distinct places chosen uniformly at random.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmptyCount`] unless `1 <= k <= N - 2`.
    pub fn randomize_empty_places<R: Rng + ?Sized>(
        &mut self,
        k: usize,
        rng: &mut R,
    ) -> Result<()> {
        let max = self.max_empty_places();
        if k < 1 || k > max {
            return Err(Error::InvalidEmptyCount { count: k, max });
        }

        self.fill();
        let mut occupied: Vec<usize> = (0..self.place_count()).collect();
        for _ in 0..k {
            let pick = rng.random_range(0..occupied.len());
            let index = occupied.swap_remove(pick);
            self.clear(index)?;
        }
        Ok(())
    }
}

/// Validate a state string against a board of `places` places.
pub(crate) fn parse_occupancy(token: &str, places: usize) -> Result<Vec<bool>> {
    let got = token.chars().count();
    if got != places {
        return Err(Error::InvalidStateLength {
            expected: places,
            got,
        });
    }

    token
        .chars()
        .enumerate()
        .map(|(position, character)| match character {
            '1' => Ok(true),
            '0' => Ok(false),
            _ => Err(Error::InvalidStateCharacter {
                character,
                position,
            }),
        })
        .collect()
}

/// Number of places for `levels`, validating the level count.
///
/// # Errors
///
/// Returns [`Error::InvalidLevels`] below two levels or when `L(L+1)/2`
/// does not fit in a `usize`.
pub fn checked_place_count(levels: usize) -> Result<usize> {
    if levels < MIN_LEVELS {
        return Err(Error::InvalidLevels { levels });
    }
    levels
        .checked_add(1)
        .and_then(|next| next.checked_mul(levels))
        .map(|doubled| doubled / 2)
        .ok_or(Error::InvalidLevels { levels })
}
