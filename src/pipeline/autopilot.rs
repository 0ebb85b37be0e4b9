//! Step-wise replay of a greedy policy
//!
//! A host (plain loop, timer, UI event queue) owns the schedule and calls
//! [`Autopilot::step`] once per tick. The action chosen in one tick is carried
//! to the next inside [`AutopilotPhase::Move`], so the autopilot itself holds
//! no mutable state between ticks.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    peg::{GameState, Move},
    policy::GreedyPolicy,
    ports::Environment,
};

/// Why a replay stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AutopilotStop {
    /// One peg left.
    Solved,
    /// No legal move left and more than one peg.
    Stuck,
    /// The policy has no action for the current state.
    Unmapped,
    /// The environment rejected the policy's action.
    Rejected,
}

impl AutopilotStop {
    pub fn is_solved(self) -> bool {
        self == AutopilotStop::Solved
    }
}

/// Where the autopilot is between two ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AutopilotPhase {
    /// Look up the policy action for the current state.
    SelectSource,
    /// Perform the previously selected action.
    Move { action: Move },
    Finished(AutopilotStop),
}

/// One performed action in a replay trace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotStep {
    pub state: GameState,
    pub action: Move,
    pub reward: f64,
}

/// Full replay produced by [`Autopilot::run_to_end`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutopilotRun {
    pub initial_state: GameState,
    pub steps: Vec<AutopilotStep>,
    pub final_state: GameState,
    pub stop: AutopilotStop,
}

/// Replays a [`GreedyPolicy`] on an environment.
#[derive(Debug, Clone, Copy)]
pub struct Autopilot<'a> {
    policy: &'a GreedyPolicy,
}

impl<'a> Autopilot<'a> {
    pub fn new(policy: &'a GreedyPolicy) -> Self {
        Self { policy }
    }

    /// Advance one tick.
    ///
    /// `Finished` is absorbing. Rejections end the replay instead of failing.
    ///
    /// # Errors
    ///
    /// Propagates environment errors other than a rejected action.
    pub fn step(&self, env: &mut dyn Environment, phase: AutopilotPhase) -> Result<AutopilotPhase> {
        Ok(self.advance(env, phase)?.0)
    }

    /// Drive the replay until it finishes and return the trace.
    pub fn run_to_end(&self, env: &mut dyn Environment) -> Result<AutopilotRun> {
        let initial_state = env.current_state();
        let mut steps = Vec::new();
        let mut phase = AutopilotPhase::SelectSource;

        loop {
            let state = env.current_state();
            let (next, reward) = self.advance(env, phase)?;
            if let (AutopilotPhase::Move { action }, Some(reward)) = (phase, reward) {
                steps.push(AutopilotStep {
                    state,
                    action,
                    reward,
                });
            }
            if let AutopilotPhase::Finished(stop) = next {
                return Ok(AutopilotRun {
                    initial_state,
                    steps,
                    final_state: env.current_state(),
                    stop,
                });
            }
            phase = next;
        }
    }

    fn advance(
        &self,
        env: &mut dyn Environment,
        phase: AutopilotPhase,
    ) -> Result<(AutopilotPhase, Option<f64>)> {
        match phase {
            AutopilotPhase::SelectSource => {
                if env.is_terminal() {
                    let stop = if env.is_solved() {
                        AutopilotStop::Solved
                    } else {
                        AutopilotStop::Stuck
                    };
                    return Ok((AutopilotPhase::Finished(stop), None));
                }
                let next = match self.policy.get(&env.current_state()) {
                    Some(action) => AutopilotPhase::Move { action },
                    None => AutopilotPhase::Finished(AutopilotStop::Unmapped),
                };
                Ok((next, None))
            }
            AutopilotPhase::Move { action } => match env.perform_action(action) {
                Ok(reward) => Ok((AutopilotPhase::SelectSource, Some(reward))),
                Err(err) if err.is_recoverable() => {
                    Ok((AutopilotPhase::Finished(AutopilotStop::Rejected), None))
                }
                Err(err) => Err(err),
            },
            finished @ AutopilotPhase::Finished(_) => Ok((finished, None)),
        }
    }
}
