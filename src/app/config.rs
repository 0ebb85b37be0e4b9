//! Configuration types for environments and agents.

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    peg::{PegEnvironment, StartMode},
    q_learning::QLearningConfig,
};

/// Board size and how games start.
///
/// # Examples
///
/// ```
/// use pegsolitaire::app::BoardConfig;
/// use pegsolitaire::peg::StartMode;
///
/// let config = BoardConfig::new(6).with_start_mode(StartMode::FixedEmpty(1));
/// assert!(config.validate().is_ok());
/// assert!(BoardConfig::new(1).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardConfig {
    /// Number of levels, at least 2
    pub levels: usize,
    pub start_mode: StartMode,
}

impl BoardConfig {
    pub fn new(levels: usize) -> Self {
        Self {
            levels,
            start_mode: StartMode::default(),
        }
    }

    pub fn with_start_mode(mut self, start_mode: StartMode) -> Self {
        self.start_mode = start_mode;
        self
    }

    /// Check the configuration by building an environment from it.
    pub fn validate(&self) -> Result<()> {
        self.build().map(|_| ())
    }

    pub(crate) fn build(&self) -> Result<PegEnvironment> {
        PegEnvironment::new(self.levels)?.with_start_mode(self.start_mode)
    }
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self::new(5)
    }
}

/// Configuration for creating a Q-learning agent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub q_learning: QLearningConfig,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl AgentConfig {
    pub fn new(q_learning: QLearningConfig) -> Self {
        Self {
            q_learning,
            seed: None,
        }
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
