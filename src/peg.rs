//! Triangular peg solitaire board and move engine

pub mod board;
pub mod codec;
pub mod direction;
pub mod environment;
pub mod moves;
pub mod place;

pub use board::Board;
pub use codec::{GameState, decode, encode};
pub use direction::Direction;
pub use environment::{PegEnvironment, REWARD_SOLVED, REWARD_STEP, REWARD_STUCK, StartMode};
pub use moves::Move;
pub use place::Place;
