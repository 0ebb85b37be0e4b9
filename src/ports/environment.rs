//! Environment port - the contract a trial-and-error learner trains against

use rand::rngs::StdRng;

use crate::{
    Result,
    peg::{GameState, Move},
};

/// A trainable, resettable decision environment.
///
/// The training pipeline and the autopilot only see this trait; the peg
/// board is one adapter behind it.
///
/// # State machine
///
/// `reset` → (`perform_action`)* → terminal. `reset` is the only way back
/// from a terminal state.
///
/// # Examples
///
/// ```
/// use pegsolitaire::{peg::PegEnvironment, ports::Environment};
/// use rand::{SeedableRng, rngs::StdRng};
///
/// let mut env = PegEnvironment::new(5)?;
/// let mut rng = StdRng::seed_from_u64(3);
/// env.reset(&mut rng)?;
/// while let Some(&action) = env.available_actions().first() {
///     env.perform_action(action)?;
/// }
/// assert!(env.is_terminal());
/// # Ok::<(), pegsolitaire::Error>(())
/// ```
pub trait Environment: Send {
    /// Actions that are legal in the current state, in a deterministic order.
    ///
    /// Empty iff the environment is terminal.
    fn available_actions(&self) -> Vec<Move>;

    /// Canonical key of the current state.
    fn current_state(&self) -> GameState;

    /// Apply an action and return its reward.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ActionRejected`] when the action is not legal.
    /// The environment is unchanged in that case and the error is recoverable.
    fn perform_action(&mut self, action: Move) -> Result<f64>;

    /// Whether no action is available.
    fn is_terminal(&self) -> bool {
        self.available_actions().is_empty()
    }

    /// Whether the current state is a successful terminal state.
    fn is_solved(&self) -> bool;

    /// Start a new episode using randomness drawn from `rng`.
    fn reset(&mut self, rng: &mut StdRng) -> Result<()>;
}
