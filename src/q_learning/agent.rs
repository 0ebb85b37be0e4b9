//! ε-greedy Q-learning agent

use rand::{Rng, SeedableRng, rngs::StdRng, seq::IndexedRandom};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    error::Result,
    peg::{GameState, Move},
    ports::{Learner, Transition},
    q_learning::q_table::QTable,
};

/// Hyperparameters of [`QLearningAgent`].
///
/// The defaults (α = 0.8, γ = 0.9, ε = 0.2, no decay) are tuned for the
/// 5-level board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QLearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub epsilon: f64,
    /// Multiplicative decay applied after every episode
    pub epsilon_decay: f64,
    pub min_epsilon: f64,
    /// Initial Q-value for unseen state-action pairs
    pub q_init: f64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.8,
            discount_factor: 0.9,
            epsilon: 0.2,
            epsilon_decay: 1.0,
            min_epsilon: 0.0,
            q_init: 0.0,
        }
    }
}

impl QLearningConfig {
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_discount_factor(mut self, discount_factor: f64) -> Self {
        self.discount_factor = discount_factor;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_epsilon_decay(mut self, epsilon_decay: f64) -> Self {
        self.epsilon_decay = epsilon_decay;
        self
    }

    pub fn with_min_epsilon(mut self, min_epsilon: f64) -> Self {
        self.min_epsilon = min_epsilon;
        self
    }

    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    /// Check that every rate lies in its valid range.
    pub fn validate(&self) -> Result<()> {
        let unit = |name: &str, value: f64| {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::InvalidConfiguration {
                    message: format!("{name} must be in [0, 1], got {value}"),
                })
            }
        };
        unit("learning_rate", self.learning_rate)?;
        unit("discount_factor", self.discount_factor)?;
        unit("epsilon", self.epsilon)?;
        unit("epsilon_decay", self.epsilon_decay)?;
        unit("min_epsilon", self.min_epsilon)?;
        if !self.q_init.is_finite() {
            return Err(Error::InvalidConfiguration {
                message: format!("q_init must be finite, got {}", self.q_init),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct QAgentState {
    pub config: QLearningConfig,
    pub q_table: QTable,
    pub epsilon: f64,
    pub episodes_seen: usize,
    pub rng_seed: Option<u64>,
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Q-learning agent (off-policy TD control)
#[derive(Debug, Clone)]
pub struct QLearningAgent {
    config: QLearningConfig,
    q_table: QTable,
    epsilon: f64,
    episodes_seen: usize,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl QLearningAgent {
    /// Create an agent with an empty Q-table.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] if a rate is out of range.
    pub fn new(config: QLearningConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            q_table: QTable::new(config.learning_rate, config.discount_factor, config.q_init),
            epsilon: config.epsilon,
            episodes_seen: 0,
            rng: build_rng(None),
            rng_seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn config(&self) -> &QLearningConfig {
        &self.config
    }

    /// Current exploration rate.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn episodes_seen(&self) -> usize {
        self.episodes_seen
    }

    pub fn q_value(&self, state: &GameState, action: Move) -> f64 {
        self.q_table.get(state, action)
    }

    pub fn q_table_size(&self) -> usize {
        self.q_table.size()
    }

    pub(crate) fn export_state(&self) -> QAgentState {
        QAgentState {
            config: self.config,
            q_table: self.q_table.clone(),
            epsilon: self.epsilon,
            episodes_seen: self.episodes_seen,
            rng_seed: self.rng_seed,
        }
    }

    pub(crate) fn from_state(state: QAgentState) -> Self {
        Self {
            config: state.config,
            q_table: state.q_table,
            epsilon: state.epsilon,
            episodes_seen: state.episodes_seen,
            rng: build_rng(state.rng_seed),
            rng_seed: state.rng_seed,
        }
    }

    fn decay_epsilon(&mut self) {
        self.epsilon = (self.epsilon * self.config.epsilon_decay).max(self.config.min_epsilon);
    }
}

impl Learner for QLearningAgent {
    fn select_action(&mut self, state: &GameState, actions: &[Move]) -> Result<Move> {
        self.q_table.register(state, actions);

        let choice = if self.rng.random::<f64>() < self.epsilon {
            actions.choose(&mut self.rng).copied()
        } else {
            self.q_table.greedy_action(state, actions)
        };
        choice.ok_or_else(|| Error::NoActionsAvailable {
            state: state.to_string(),
        })
    }

    fn update(&mut self, transition: &Transition) -> Result<()> {
        self.q_table.q_learning_update(
            transition.state.clone(),
            transition.action,
            transition.reward,
            &transition.next_state,
            &transition.next_actions,
            transition.done,
        );
        Ok(())
    }

    fn end_episode(&mut self) -> Result<()> {
        self.episodes_seen += 1;
        self.decay_epsilon();
        Ok(())
    }

    fn greedy_actions(&self) -> Vec<(GameState, Move)> {
        self.q_table.greedy_policy()
    }

    fn name(&self) -> &str {
        "Q-Learning"
    }

    fn reset(&mut self) -> Result<()> {
        self.q_table.reset();
        self.epsilon = self.config.epsilon;
        self.episodes_seen = 0;
        self.rng = build_rng(self.rng_seed);
        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        Ok(())
    }
}
