//! The peg board exposed through the [`Environment`] port

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use super::{
    board::Board,
    codec::{GameState, encode},
    moves::Move,
};
use crate::{Error, Result, ports::Environment};

/// Reward for a move that leaves a single peg.
pub const REWARD_SOLVED: f64 = 100.0;

/// Reward for a move after which no jump remains and more than one peg is left.
pub const REWARD_STUCK: f64 = -100.0;

/// Reward for any other accepted move.
pub const REWARD_STEP: f64 = 1.0;

/// How [`Environment::reset`] chooses the number of holes of a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartMode {
    /// Draw the number of holes uniformly from `1..=N-2` on every reset, so a
    /// learner sees starts of every difficulty.
    #[default]
    ExploringStarts,
    /// Always start with exactly this many holes.
    FixedEmpty(usize),
}

/// Peg solitaire environment owning one [`Board`].
///
/// The board keeps its identity across resets; only occupancy changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EnvironmentRepr")]
pub struct PegEnvironment {
    board: Board,
    start_mode: StartMode,
}

#[derive(Deserialize)]
struct EnvironmentRepr {
    board: Board,
    start_mode: StartMode,
}

impl TryFrom<EnvironmentRepr> for PegEnvironment {
    type Error = Error;

    fn try_from(repr: EnvironmentRepr) -> Result<Self> {
        PegEnvironment::from_board(repr.board).with_start_mode(repr.start_mode)
    }
}

impl PegEnvironment {
    /// Create an environment on a full board with `levels` levels.
    ///
    /// A full board has no legal move, so call [`Environment::reset`] or
    /// [`PegEnvironment::start_game`] before playing.
    pub fn new(levels: usize) -> Result<Self> {
        Ok(Self::from_board(Board::new(levels)?))
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            start_mode: StartMode::default(),
        }
    }

    /// Set how resets pick the number of holes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidEmptyCount`] for a fixed count outside `1..=N-2`.
    pub fn with_start_mode(mut self, start_mode: StartMode) -> Result<Self> {
        if let StartMode::FixedEmpty(count) = start_mode {
            let max = self.board.max_empty_places();
            if count < 1 || count > max {
                return Err(Error::InvalidEmptyCount { count, max });
            }
        }
        self.start_mode = start_mode;
        Ok(self)
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn start_mode(&self) -> StartMode {
        self.start_mode
    }

    pub fn levels(&self) -> usize {
        self.board.levels()
    }

    /// Start a game with exactly `empty_places` holes.
    pub fn start_game(&mut self, empty_places: usize, rng: &mut StdRng) -> Result<()> {
        self.board.randomize_empty_places(empty_places, rng)
    }

    /// Overwrite the occupancy with a state string.
    pub fn load_state(&mut self, state: &str) -> Result<()> {
        self.board.apply_bulk_state(state)
    }

    /// Parse a `"<source> <target>"` action string and perform it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionRejected`] for malformed strings, out-of-range
    /// ordinals and illegal jumps.
    pub fn perform_encoded(&mut self, action: &str) -> Result<f64> {
        let mv = Move::parse(action)?;
        self.perform_action(mv)
    }

    fn reward_after_move(&self) -> f64 {
        if self.board.occupied_count() == 1 {
            REWARD_SOLVED
        } else if !self.board.has_legal_move() {
            REWARD_STUCK
        } else {
            REWARD_STEP
        }
    }
}

impl Environment for PegEnvironment {
    fn available_actions(&self) -> Vec<Move> {
        self.board.legal_moves()
    }

    fn current_state(&self) -> GameState {
        encode(&self.board)
    }

    fn perform_action(&mut self, action: Move) -> Result<f64> {
        self.board.apply_move(action).map_err(|err| match err {
            Error::MoveRejected { .. } => Error::ActionRejected {
                action: action.to_string(),
                reason: "not a legal jump on the current board".to_string(),
            },
            other => other,
        })?;
        Ok(self.reward_after_move())
    }

    fn is_terminal(&self) -> bool {
        !self.board.has_legal_move()
    }

    fn is_solved(&self) -> bool {
        self.board.occupied_count() == 1
    }

    fn reset(&mut self, rng: &mut StdRng) -> Result<()> {
        let empty_places = match self.start_mode {
            StartMode::ExploringStarts => rng.random_range(1..=self.board.max_empty_places()),
            StartMode::FixedEmpty(count) => count,
        };
        self.board.randomize_empty_places(empty_places, rng)
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn env_with(levels: usize, state: &str) -> PegEnvironment {
        let mut env = PegEnvironment::new(levels).unwrap();
        env.load_state(state).unwrap();
        env
    }

    #[test]
    fn test_single_hole_start_has_actions() {
        let mut env = PegEnvironment::new(5).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            env.start_game(1, &mut rng).unwrap();
            assert_eq!(env.board().empty_count(), 1);
            assert!(!env.available_actions().is_empty());
            assert!(!env.is_terminal());
        }
    }

    #[test]
    fn test_reward_solved() {
        let mut env = env_with(4, "1100000000");
        let reward = env.perform_encoded("1 4").unwrap();
        assert_eq!(reward, REWARD_SOLVED);
        assert!(env.is_solved());
        assert!(env.is_terminal());
    }

    #[test]
    fn test_reward_stuck() {
        // After 1 -> 4 pegs remain on 4 and 10 with no jump between them.
        let mut env = env_with(4, "1100000001");
        let reward = env.perform_encoded("1 4").unwrap();
        assert_eq!(reward, REWARD_STUCK);
        assert!(env.is_terminal());
        assert!(!env.is_solved());
    }

    #[test]
    fn test_reward_step() {
        let mut env = env_with(5, "011111111111111");
        let reward = env.perform_encoded("4 1").unwrap();
        assert_eq!(reward, REWARD_STEP);
        assert!(!env.is_terminal());
    }

    #[test]
    fn test_rejected_action_leaves_state_unchanged() {
        let mut env = env_with(5, "011111111111111");
        let before = env.current_state();

        for action in ["1 4", "2 1", "4 x", "", "16 1", "0 1"] {
            let err = env.perform_encoded(action).unwrap_err();
            assert!(matches!(err, Error::ActionRejected { .. }), "{action}: {err}");
            assert!(err.is_recoverable());
            assert_eq!(env.current_state(), before);
        }
    }

    #[test]
    fn test_reset_is_deterministic() {
        let mut a = PegEnvironment::new(5).unwrap();
        let mut b = PegEnvironment::new(5).unwrap();
        let mut rng_a = StdRng::seed_from_u64(99);
        let mut rng_b = StdRng::seed_from_u64(99);

        for _ in 0..20 {
            a.reset(&mut rng_a).unwrap();
            b.reset(&mut rng_b).unwrap();
            assert_eq!(a.current_state(), b.current_state());
            let empty = a.board().empty_count();
            assert!((1..=13).contains(&empty));
        }
    }

    #[test]
    fn test_fixed_start_mode() {
        let mut env = PegEnvironment::new(5)
            .unwrap()
            .with_start_mode(StartMode::FixedEmpty(3))
            .unwrap();
        let mut rng = StdRng::seed_from_u64(5);
        env.reset(&mut rng).unwrap();
        assert_eq!(env.board().empty_count(), 3);

        assert!(
            PegEnvironment::new(5)
                .unwrap()
                .with_start_mode(StartMode::FixedEmpty(14))
                .is_err()
        );
        assert!(
            PegEnvironment::new(5)
                .unwrap()
                .with_start_mode(StartMode::FixedEmpty(0))
                .is_err()
        );
    }

    #[test]
    fn test_deserialize_validates_board_and_start_mode() {
        let env = env_with(4, "0111111111")
            .with_start_mode(StartMode::FixedEmpty(2))
            .unwrap();
        let json = serde_json::to_string(&env).unwrap();
        let restored: PegEnvironment = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, env);
        assert_eq!(restored.available_actions(), env.available_actions());

        let empty_board = r#"{"board":{"levels":5,"places":[]},"start_mode":"ExploringStarts"}"#;
        assert!(serde_json::from_str::<PegEnvironment>(empty_board).is_err());

        let mut value = serde_json::to_value(&env).unwrap();
        value["start_mode"] = serde_json::json!({ "FixedEmpty": 9 });
        assert!(serde_json::from_value::<PegEnvironment>(value).is_err());
    }
}
