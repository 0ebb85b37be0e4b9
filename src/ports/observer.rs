//! Observer port - abstraction for training observation and data collection
//!
//! This port keeps the episode loop free of output formats: progress bars,
//! metrics, JSONL and CSV logs are all observers.

use serde::{Deserialize, Serialize};

use super::learner::Transition;
use crate::{
    Error, Result,
    peg::{GameState, Move},
};

/// How an episode ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EpisodeOutcome {
    /// One peg left.
    Solved,
    /// No legal move and more than one peg left.
    Stuck,
    /// Too many consecutive rejected actions; counted as unsolved.
    Abandoned,
}

impl EpisodeOutcome {
    pub fn is_solved(self) -> bool {
        self == EpisodeOutcome::Solved
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EpisodeOutcome::Solved => "solved",
            EpisodeOutcome::Stuck => "stuck",
            EpisodeOutcome::Abandoned => "abandoned",
        }
    }
}

/// Summary of a finished training episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub episode: usize,
    pub initial_state: GameState,
    pub final_state: GameState,
    pub steps: usize,
    pub total_reward: f64,
    pub rejections: usize,
    pub outcome: EpisodeOutcome,
}

impl EpisodeSummary {
    /// Pegs left on the board at the end of the episode.
    pub fn pegs_left(&self) -> usize {
        self.final_state.occupied_count()
    }
}

/// Observer trait for monitoring training
///
/// # Event Sequence
///
/// 1. `on_training_start(total_episodes)` once
/// 2. For each episode:
///    - `on_episode_start(episode, state)`
///    - `on_step(...)` for each accepted action,
///      `on_action_rejected(...)` for each rejected one
///    - `on_episode_end(summary)`
/// 3. `on_training_end()` once
///
/// Every hook defaults to a no-op.
///
/// # Examples
///
/// ```
/// use pegsolitaire::ports::{EpisodeSummary, Observer};
///
/// struct SolvedCounter(usize);
///
/// impl Observer for SolvedCounter {
///     fn on_episode_end(&mut self, summary: &EpisodeSummary) -> pegsolitaire::Result<()> {
///         if summary.outcome.is_solved() {
///             self.0 += 1;
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    fn on_training_start(&mut self, _total_episodes: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the environment was reset for `episode` (0-based).
    fn on_episode_start(&mut self, _episode: usize, _state: &GameState) -> Result<()> {
        Ok(())
    }

    /// Called after an action was accepted and the learner was updated.
    fn on_step(&mut self, _episode: usize, _step: usize, _transition: &Transition) -> Result<()> {
        Ok(())
    }

    /// Called when the environment rejected the learner's action.
    fn on_action_rejected(
        &mut self,
        _episode: usize,
        _state: &GameState,
        _action: Move,
        _error: &Error,
    ) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _summary: &EpisodeSummary) -> Result<()> {
        Ok(())
    }

    /// Last hook of the lifecycle; flush files or print summaries here.
    fn on_training_end(&mut self) -> Result<()> {
        Ok(())
    }
}
