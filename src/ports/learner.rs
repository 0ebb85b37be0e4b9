//! Learner port - abstraction for trial-and-error learning algorithms
//!
//! The harness drives any learner through this trait: it asks for actions,
//! feeds back transitions and finally reads out a greedy policy. Nothing in
//! the board core depends on a concrete algorithm.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    peg::{GameState, Move},
};

/// One accepted step of an episode, as seen by a learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub state: GameState,
    pub action: Move,
    pub reward: f64,
    pub next_state: GameState,
    /// Actions available in `next_state`; empty when `done`.
    pub next_actions: Vec<Move>,
    pub done: bool,
}

/// Learner trait - unified interface for learning approaches
///
/// # Examples
///
/// ```no_run
/// use pegsolitaire::{peg::{GameState, Move}, ports::Learner};
///
/// fn first_choice<L: Learner>(learner: &mut L, state: &GameState, actions: &[Move]) -> Move {
///     learner.select_action(state, actions).expect("actions are non-empty")
/// }
/// ```
pub trait Learner: Send {
    /// Choose one of `actions` for `state`.
    ///
    /// Exploring learners may pick non-greedy actions here.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoActionsAvailable`] if `actions` is empty.
    fn select_action(&mut self, state: &GameState, actions: &[Move]) -> Result<Move>;

    /// Learn from one accepted transition.
    ///
    /// The default does nothing, for non-adaptive baselines.
    fn update(&mut self, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called once after every episode, e.g. to decay exploration.
    fn end_episode(&mut self) -> Result<()> {
        Ok(())
    }

    /// Best known action for every state the learner has an opinion about.
    ///
    /// This is what gets materialized into a [`crate::policy::GreedyPolicy`].
    /// Non-learning baselines return an empty list.
    fn greedy_actions(&self) -> Vec<(GameState, Move)> {
        Vec::new()
    }

    /// Name used in summaries and logs.
    fn name(&self) -> &str;

    /// Forget everything learned so far.
    fn reset(&mut self) -> Result<()> {
        Ok(())
    }

    /// Enable downcasting to concrete types, e.g. for checkpointing.
    fn as_any(&self) -> &dyn std::any::Any;

    /// Seed the learner's internal random number generator.
    ///
    /// Training pipelines call this when given a deterministic seed. Learners
    /// without randomness can ignore it.
    fn set_rng_seed(&mut self, _seed: u64) -> Result<()> {
        Ok(())
    }
}
