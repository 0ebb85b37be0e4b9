//! Greedy policies extracted from learners, plus the metadata saved with them

use std::{
    collections::BTreeMap,
    time::{SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::{
    peg::{GameState, Move},
    ports::Learner,
};

/// Deterministic `state -> action` map.
///
/// Entries are kept sorted by state so that iteration, and therefore every
/// file written from a policy, is reproducible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GreedyPolicy {
    entries: BTreeMap<GameState, Move>,
}

impl GreedyPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize the learner's current greedy choices.
    pub fn extract(learner: &dyn Learner) -> Self {
        learner.greedy_actions().into_iter().collect()
    }

    /// Action for `state`, if the policy covers it.
    pub fn get(&self, state: &GameState) -> Option<Move> {
        self.entries.get(state).copied()
    }

    /// Insert or replace the action for `state`. Returns the previous action.
    pub fn insert(&mut self, state: GameState, action: Move) -> Option<Move> {
        self.entries.insert(state, action)
    }

    pub fn contains(&self, state: &GameState) -> bool {
        self.entries.contains_key(state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GameState, &Move)> {
        self.entries.iter()
    }
}

impl FromIterator<(GameState, Move)> for GreedyPolicy {
    fn from_iter<I: IntoIterator<Item = (GameState, Move)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a GreedyPolicy {
    type Item = (&'a GameState, &'a Move);
    type IntoIter = std::collections::btree_map::Iter<'a, GameState, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Facts about the run that produced a policy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetadata {
    pub levels: usize,
    pub episodes: usize,
    pub matches: usize,
    /// Fraction of evaluation matches solved, in `[0, 1]`.
    pub success_rate: f64,
    /// Seconds since the Unix epoch.
    pub saved_at: Option<u64>,
}

impl RunMetadata {
    pub fn new(levels: usize, episodes: usize, matches: usize, success_rate: f64) -> Self {
        Self {
            levels,
            episodes,
            matches,
            success_rate,
            saved_at: None,
        }
    }

    /// Stamp the metadata with the current wall-clock time.
    pub fn stamped_now(mut self) -> Self {
        self.saved_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .ok();
        self
    }
}

/// What the harness hands to a [`crate::ports::PolicyRepository`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyRecord {
    pub policy: GreedyPolicy,
    pub metadata: RunMetadata,
}

impl PolicyRecord {
    pub fn new(policy: GreedyPolicy, metadata: RunMetadata) -> Self {
        Self { policy, metadata }
    }
}
