//! Dependency injection container.

use std::{path::Path, sync::Arc};

use super::config::{AgentConfig, BoardConfig};
use crate::{
    Result,
    adapters::{InMemoryRepository, MsgPackRepository, PolicyFileRepository},
    peg::PegEnvironment,
    policy::PolicyRecord,
    ports::PolicyRepository,
    q_learning::QLearningAgent,
};

/// Application with dependency injection.
///
/// # Examples
///
/// ```
/// use pegsolitaire::app::{App, BoardConfig};
///
/// let app = App::new();
/// let env = app.create_environment(&BoardConfig::new(4))?;
/// assert_eq!(env.levels(), 4);
/// # Ok::<(), pegsolitaire::Error>(())
/// ```
pub struct App {
    policy_repository: Arc<dyn PolicyRepository + Send + Sync>,
    /// Default random seed (None = non-deterministic)
    default_seed: Option<u64>,
}

impl App {
    /// Create an app that stores policies in the plain-text policy format.
    pub fn new() -> Self {
        Self {
            policy_repository: Arc::new(PolicyFileRepository::new()),
            default_seed: None,
        }
    }

    /// Create an app whose repository matches the file extension of `path`:
    /// `.msgpack` selects MessagePack, anything else the text format.
    pub fn for_policy_path(path: &Path) -> Self {
        let builder = AppBuilder::new();
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("msgpack") => builder.with_repository(MsgPackRepository::new()),
            _ => builder.with_repository(PolicyFileRepository::new()),
        }
        .build()
    }

    /// Create a builder whose repository defaults to an in-memory store.
    pub fn for_testing() -> AppBuilder {
        AppBuilder::new().with_repository(InMemoryRepository::new())
    }

    pub fn policy_repository(&self) -> Arc<dyn PolicyRepository + Send + Sync> {
        Arc::clone(&self.policy_repository)
    }

    pub fn default_seed(&self) -> Option<u64> {
        self.default_seed
    }

    /// Build a fresh environment; call `reset` or `start_game` before playing.
    pub fn create_environment(&self, config: &BoardConfig) -> Result<PegEnvironment> {
        config.build()
    }

    /// Create a Q-learning agent; the config seed wins over the app default.
    pub fn create_agent(&self, config: AgentConfig) -> Result<QLearningAgent> {
        let agent = QLearningAgent::new(config.q_learning)?;
        Ok(match config.seed.or(self.default_seed) {
            Some(seed) => agent.with_seed(seed),
            None => agent,
        })
    }

    /// Stamp the record with the current time and save it.
    pub fn save_policy(&self, record: &PolicyRecord, path: &Path) -> Result<()> {
        let mut record = record.clone();
        if record.metadata.saved_at.is_none() {
            record.metadata = record.metadata.stamped_now();
        }
        self.policy_repository.save(&record, path)
    }

    pub fn load_policy(&self, path: &Path) -> Result<PolicyRecord> {
        self.policy_repository.load(path)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`App`] with custom dependencies.
pub struct AppBuilder {
    policy_repository: Option<Arc<dyn PolicyRepository + Send + Sync>>,
    default_seed: Option<u64>,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self {
            policy_repository: None,
            default_seed: None,
        }
    }

    /// Set a custom policy repository.
    pub fn with_repository<R: PolicyRepository + Send + Sync + 'static>(mut self, repo: R) -> Self {
        self.policy_repository = Some(Arc::new(repo));
        self
    }

    /// Set a default random seed for all agents created by this container.
    pub fn with_default_seed(mut self, seed: u64) -> Self {
        self.default_seed = Some(seed);
        self
    }

    /// Build the app; without a repository the text policy format is used.
    pub fn build(self) -> App {
        App {
            policy_repository: self
                .policy_repository
                .unwrap_or_else(|| Arc::new(PolicyFileRepository::new())),
            default_seed: self.default_seed,
        }
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}
