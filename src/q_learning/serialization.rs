//! MessagePack checkpoints for Q-learning agents.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::{
    policy::RunMetadata,
    q_learning::agent::{QAgentState, QLearningAgent},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedQAgent {
    pub version: u32,
    state: QAgentState,
    pub metadata: RunMetadata,
}

impl SavedQAgent {
    pub const VERSION: u32 = 1;

    pub fn from_agent(agent: &QLearningAgent, metadata: RunMetadata) -> Self {
        Self {
            version: Self::VERSION,
            state: agent.export_state(),
            metadata,
        }
    }

    pub fn to_agent(&self) -> Result<QLearningAgent> {
        if self.version != Self::VERSION {
            return Err(anyhow!(
                "Unsupported Q-learning save format version: {}. Expected {}",
                self.version,
                Self::VERSION
            ));
        }
        Ok(QLearningAgent::from_state(self.state.clone()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create file: {}", path.as_ref().display()))?;
        let mut writer = BufWriter::new(file);

        rmp_serde::encode::write(&mut writer, self)
            .context("Failed to serialize Q-learning agent")?;

        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open file: {}", path.as_ref().display()))?;
        let reader = BufReader::new(file);

        rmp_serde::decode::from_read(reader).context("Failed to deserialize Q-learning agent")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        peg::{GameState, Move},
        ports::{Learner, Transition},
        q_learning::QLearningConfig,
    };

    fn trained_agent() -> Result<QLearningAgent> {
        let mut agent = QLearningAgent::new(QLearningConfig::default())?.with_seed(7);
        let state = GameState::parse("011111")?;
        let actions = [Move::from_indices(3, 0), Move::from_indices(5, 0)];
        let action = agent.select_action(&state, &actions)?;
        agent.update(&Transition {
            state,
            action,
            reward: 1.0,
            next_state: GameState::parse("101110")?,
            next_actions: vec![],
            done: true,
        })?;
        agent.end_episode()?;
        Ok(agent)
    }

    #[test]
    fn test_checkpoint_roundtrip_in_memory() -> Result<()> {
        let agent = trained_agent()?;
        assert!(agent.q_table_size() > 0);

        let saved = SavedQAgent::from_agent(&agent, RunMetadata::new(3, 1, 0, 0.0));
        let bytes = rmp_serde::to_vec(&saved)?;
        let loaded: SavedQAgent = rmp_serde::from_slice(&bytes)?;
        let restored = loaded.to_agent()?;

        assert_eq!(restored.q_table_size(), agent.q_table_size());
        assert_eq!(restored.episodes_seen(), 1);
        assert_eq!(restored.greedy_actions(), agent.greedy_actions());
        assert_eq!(loaded.metadata.levels, 3);
        Ok(())
    }

    #[test]
    fn test_checkpoint_file_roundtrip() -> Result<()> {
        let agent = trained_agent()?;
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("agent.msgpack");

        SavedQAgent::from_agent(&agent, RunMetadata::default()).save_to_file(&path)?;
        let restored = SavedQAgent::load_from_file(&path)?.to_agent()?;

        assert_eq!(restored.greedy_actions(), agent.greedy_actions());
        Ok(())
    }

    #[test]
    fn test_rejects_unknown_version() -> Result<()> {
        let mut saved = SavedQAgent::from_agent(&trained_agent()?, RunMetadata::default());
        saved.version = 99;
        assert!(saved.to_agent().is_err());
        Ok(())
    }
}
