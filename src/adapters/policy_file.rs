//! Plain-text policy files.
//!
//! Layout:
//!
//! ```text
//! <state> <source> <target>
//! ...
//!
//! Number of levels: 5
//! Number of episodes: 2500000
//! Number of matches: 100000
//! Rate of success: 87.42%
//! Saved at (unix): 1760000000
//! ```
//!
//! The first blank or whitespace-only line ends the mapping. Everything after
//! it is metadata; unknown metadata lines are ignored when reading.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Write},
    path::Path,
};

use crate::{
    Result,
    error::Error,
    peg::{GameState, Move},
    policy::{GreedyPolicy, PolicyRecord, RunMetadata},
    ports::PolicyRepository,
    types::place_count,
};

const LEVELS_KEY: &str = "Number of levels";
const EPISODES_KEY: &str = "Number of episodes";
const MATCHES_KEY: &str = "Number of matches";
const SUCCESS_KEY: &str = "Rate of success";
const SAVED_AT_KEY: &str = "Saved at (unix)";

/// Policy repository using the plain-text policy file format.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyFileRepository;

impl PolicyFileRepository {
    pub fn new() -> Self {
        Self
    }

    /// Write a record in policy file format to any writer.
    pub fn write_to<W: Write>(&self, record: &PolicyRecord, mut writer: W) -> std::io::Result<()> {
        for (state, action) in &record.policy {
            writeln!(writer, "{state} {action}")?;
        }
        writeln!(writer)?;

        let metadata = &record.metadata;
        writeln!(writer, "{LEVELS_KEY}: {}", metadata.levels)?;
        writeln!(writer, "{EPISODES_KEY}: {}", metadata.episodes)?;
        writeln!(writer, "{MATCHES_KEY}: {}", metadata.matches)?;
        writeln!(writer, "{SUCCESS_KEY}: {:.2}%", metadata.success_rate * 100.0)?;
        if let Some(saved_at) = metadata.saved_at {
            writeln!(writer, "{SAVED_AT_KEY}: {saved_at}")?;
        }
        writer.flush()
    }

    /// Read a record from any buffered reader.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPolicyLine`] for a mapping line that is not
    /// `"<state> <source> <target>"` or whose state length differs from the
    /// first entry.
    pub fn read_from<R: BufRead>(&self, reader: R) -> Result<PolicyRecord> {
        let mut lines = reader.lines().enumerate();
        let mut policy = GreedyPolicy::new();
        let mut state_len = None;

        for (index, line) in lines.by_ref() {
            let line = line?;
            if line.trim().is_empty() {
                break;
            }
            let (state, action) = parse_entry(&line).ok_or_else(|| Error::InvalidPolicyLine {
                line_number: index + 1,
                line: line.clone(),
            })?;
            if *state_len.get_or_insert(state.len()) != state.len() {
                return Err(Error::InvalidPolicyLine {
                    line_number: index + 1,
                    line,
                });
            }
            policy.insert(state, action);
        }

        let mut metadata = RunMetadata::default();
        for (_, line) in lines {
            let line = line?;
            let Some((key, value)) = line.split_once(": ") else {
                continue;
            };
            let value = value.trim();
            match key {
                LEVELS_KEY => metadata.levels = value.parse().unwrap_or_default(),
                EPISODES_KEY => metadata.episodes = value.parse().unwrap_or_default(),
                MATCHES_KEY => metadata.matches = value.parse().unwrap_or_default(),
                SUCCESS_KEY => {
                    metadata.success_rate = value
                        .trim_end_matches('%')
                        .parse::<f64>()
                        .map(|percent| percent / 100.0)
                        .unwrap_or_default()
                }
                SAVED_AT_KEY => metadata.saved_at = value.parse().ok(),
                _ => {}
            }
        }

        if metadata.levels == 0 {
            metadata.levels = state_len.and_then(levels_for).unwrap_or_default();
        }

        Ok(PolicyRecord::new(policy, metadata))
    }
}

fn parse_entry(line: &str) -> Option<(GameState, Move)> {
    let (state, action) = line.split_once(' ')?;
    Some((GameState::parse(state).ok()?, Move::parse(action).ok()?))
}

/// Level count of a board with `places` places, if `places` is triangular.
fn levels_for(places: usize) -> Option<usize> {
    (1..=places).find(|&levels| place_count(levels) == places)
}

impl PolicyRepository for PolicyFileRepository {
    fn save(&self, record: &PolicyRecord, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|source| Error::Io {
            operation: format!("create file {path:?}"),
            source,
        })?;
        self.write_to(record, BufWriter::new(file))
            .map_err(|source| Error::Io {
                operation: format!("write policy to {path:?}"),
                source,
            })
    }

    fn load(&self, path: &Path) -> Result<PolicyRecord> {
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open file {path:?}"),
            source,
        })?;
        self.read_from(BufReader::new(file))
    }
}
