//! In-memory policy repository for testing.
//!
//! Records are stored as MessagePack bytes in a shared map, so tests exercise
//! a real serialization round trip without touching the file system.

use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use crate::{Result, error::Error, policy::PolicyRecord, ports::PolicyRepository};

/// In-memory repository for testing.
///
/// Clones share the same underlying storage.
///
/// # Examples
///
/// ```
/// use pegsolitaire::adapters::InMemoryRepository;
/// use pegsolitaire::policy::PolicyRecord;
/// use pegsolitaire::ports::PolicyRepository;
/// use std::path::Path;
///
/// let repo = InMemoryRepository::new();
/// repo.save(&PolicyRecord::default(), Path::new("policy"))?;
/// let loaded = repo.load(Path::new("policy"))?;
/// assert!(loaded.policy.is_empty());
/// # Ok::<(), pegsolitaire::Error>(())
/// ```
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn storage(&self) -> MutexGuard<'_, HashMap<String, Vec<u8>>> {
        self.storage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of records currently stored.
    pub fn count(&self) -> usize {
        self.storage().len()
    }

    pub fn clear(&self) {
        self.storage().clear();
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.storage().contains_key(&key(path))
    }
}

fn key(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

impl PolicyRepository for InMemoryRepository {
    fn save(&self, record: &PolicyRecord, path: &Path) -> Result<()> {
        let bytes = rmp_serde::to_vec(record).map_err(|e| Error::SerializationContext {
            operation: "serialize policy for in-memory storage".to_string(),
            message: e.to_string(),
        })?;

        self.storage().insert(key(path), bytes);
        Ok(())
    }

    fn load(&self, path: &Path) -> Result<PolicyRecord> {
        let storage = self.storage();
        let bytes = storage.get(&key(path)).ok_or_else(|| Error::Io {
            operation: format!("load policy from in-memory storage at {path:?}"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "key not found in memory"),
        })?;

        rmp_serde::from_slice(bytes).map_err(|e| Error::SerializationContext {
            operation: "deserialize policy from in-memory storage".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        peg::{GameState, Move},
        policy::{GreedyPolicy, RunMetadata},
    };

    fn record() -> PolicyRecord {
        let policy: GreedyPolicy = [(GameState::parse("011111").unwrap(), Move::from_indices(3, 0))]
            .into_iter()
            .collect();
        let mut metadata = RunMetadata::new(3, 10, 5, 0.2);
        metadata.saved_at = Some(42);
        PolicyRecord::new(policy, metadata)
    }

    #[test]
    fn test_in_memory_save_and_load() {
        let repo = InMemoryRepository::new();
        let path = Path::new("policy");
        assert_eq!(repo.count(), 0);
        assert!(!repo.contains(path));

        repo.save(&record(), path).unwrap();
        assert_eq!(repo.count(), 1);
        assert!(repo.contains(path));
        assert_eq!(repo.load(path).unwrap(), record());
    }

    #[test]
    fn test_load_nonexistent_returns_error() {
        let repo = InMemoryRepository::new();
        assert!(repo.load(Path::new("nonexistent")).is_err());
    }

    #[test]
    fn test_clone_shares_storage() {
        let repo1 = InMemoryRepository::new();
        let repo2 = repo1.clone();

        repo1.save(&record(), Path::new("shared")).unwrap();
        assert_eq!(repo2.load(Path::new("shared")).unwrap().policy.len(), 1);

        repo2.clear();
        assert_eq!(repo1.count(), 0);
    }
}
