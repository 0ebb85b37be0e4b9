//! MessagePack implementation of the policy repository.
//!
//! Unlike the text format this keeps every metadata field at full precision.

use std::{fs::File, path::Path};

use crate::{Result, error::Error, policy::PolicyRecord, ports::PolicyRepository};

/// MessagePack-based policy repository.
///
/// # Examples
///
/// ```no_run
/// use pegsolitaire::adapters::MsgPackRepository;
/// use pegsolitaire::policy::PolicyRecord;
/// use pegsolitaire::ports::PolicyRepository;
/// use std::path::Path;
///
/// let repo = MsgPackRepository;
/// repo.save(&PolicyRecord::default(), Path::new("policy.msgpack"))?;
/// let loaded = repo.load(Path::new("policy.msgpack"))?;
/// # Ok::<(), pegsolitaire::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackRepository;

impl MsgPackRepository {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyRepository for MsgPackRepository {
    fn save(&self, record: &PolicyRecord, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;

        rmp_serde::encode::write(&mut file, record).map_err(|e| Error::SerializationContext {
            operation: "serialize policy to MessagePack".to_string(),
            message: e.to_string(),
        })
    }

    fn load(&self, path: &Path) -> Result<PolicyRecord> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;

        rmp_serde::decode::from_read(&file).map_err(|e| Error::SerializationContext {
            operation: "deserialize policy from MessagePack".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::{
        peg::{GameState, Move},
        policy::{GreedyPolicy, RunMetadata},
    };

    #[test]
    fn test_msgpack_roundtrip() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("policy.msgpack");
        let policy: GreedyPolicy = [(GameState::parse("011111").unwrap(), Move::from_indices(5, 0))]
            .into_iter()
            .collect();
        let record = PolicyRecord::new(policy, RunMetadata::new(3, 100, 10, 1.0 / 3.0));

        let repo = MsgPackRepository::new();
        repo.save(&record, &file_path).expect("Failed to save");
        let loaded = repo.load(&file_path).expect("Failed to load");

        assert_eq!(loaded, record);
    }

    #[test]
    fn test_save_to_invalid_path_returns_error() {
        let repo = MsgPackRepository::new();
        let result = repo.save(
            &PolicyRecord::default(),
            Path::new("/invalid_dir_12345/file.msgpack"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_state_keys() {
        #[derive(serde::Serialize)]
        struct RawPolicy {
            entries: std::collections::BTreeMap<String, Move>,
        }

        #[derive(serde::Serialize)]
        struct RawRecord {
            policy: RawPolicy,
            metadata: RunMetadata,
        }

        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file_path = temp_dir.path().join("policy.msgpack");
        let raw = RawRecord {
            policy: RawPolicy {
                entries: [("01x111".to_string(), Move::from_indices(5, 0))]
                    .into_iter()
                    .collect(),
            },
            metadata: RunMetadata::new(3, 100, 10, 0.5),
        };
        let mut file = File::create(&file_path).unwrap();
        rmp_serde::encode::write(&mut file, &raw).unwrap();

        let result = MsgPackRepository::new().load(&file_path);
        assert!(matches!(result, Err(Error::SerializationContext { .. })));
    }
}
