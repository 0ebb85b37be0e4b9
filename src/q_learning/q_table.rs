//! Q-table for tabular temporal difference learning

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::peg::{GameState, Move};

/// Q-table mapping (state, action) pairs to Q-values
///
/// Actions are registered per state the first time the state is seen, so the
/// greedy choice always ranges over every legal action, visited or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QTable {
    q_values: HashMap<GameState, HashMap<Move, f64>>,
    /// Learning rate α
    learning_rate: f64,
    /// Discount factor γ
    discount_factor: f64,
    /// Initial Q-value for unseen state-action pairs
    q_init: f64,
}

impl QTable {
    pub fn new(learning_rate: f64, discount_factor: f64, q_init: f64) -> Self {
        Self {
            q_values: HashMap::new(),
            learning_rate,
            discount_factor,
            q_init,
        }
    }

    /// Get Q-value for a state-action pair
    pub fn get(&self, state: &GameState, action: Move) -> f64 {
        self.q_values
            .get(state)
            .and_then(|actions| actions.get(&action))
            .copied()
            .unwrap_or(self.q_init)
    }

    /// Set Q-value for a state-action pair
    pub fn set(&mut self, state: GameState, action: Move, value: f64) {
        self.q_values.entry(state).or_default().insert(action, value);
    }

    /// Make sure every legal action of `state` has an entry.
    pub fn register(&mut self, state: &GameState, legal_actions: &[Move]) {
        if !self.q_values.contains_key(state) {
            self.q_values.insert(state.clone(), HashMap::new());
        }
        if let Some(entries) = self.q_values.get_mut(state) {
            for &action in legal_actions {
                entries.entry(action).or_insert(self.q_init);
            }
        }
    }

    /// Maximum Q-value over legal actions; `None` if there are none.
    pub fn max_q(&self, state: &GameState, legal_actions: &[Move]) -> Option<f64> {
        legal_actions
            .iter()
            .map(|&action| self.get(state, action))
            .max_by(f64::total_cmp)
    }

    /// Greedy action among `legal_actions`; ties go to the smallest move.
    pub fn greedy_action(&self, state: &GameState, legal_actions: &[Move]) -> Option<Move> {
        best_of(
            legal_actions
                .iter()
                .map(|&action| (action, self.get(state, action))),
        )
    }

    /// Greedy action for every state in the table, sorted by state.
    pub fn greedy_policy(&self) -> Vec<(GameState, Move)> {
        let mut policy: Vec<(GameState, Move)> = self
            .q_values
            .iter()
            .filter_map(|(state, actions)| {
                best_of(actions.iter().map(|(&a, &q)| (a, q))).map(|a| (state.clone(), a))
            })
            .collect();
        policy.sort();
        policy
    }

    /// Q-learning update: off-policy TD control
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') - Q(s,a)]
    pub fn q_learning_update(
        &mut self,
        state: GameState,
        action: Move,
        reward: f64,
        next_state: &GameState,
        next_legal_actions: &[Move],
        done: bool,
    ) {
        let current_q = self.get(&state, action);
        let max_next_q = if done {
            0.0
        } else {
            self.max_q(next_state, next_legal_actions).unwrap_or(0.0)
        };
        let td_target = reward + self.discount_factor * max_next_q;
        let new_q = current_q + self.learning_rate * (td_target - current_q);
        self.set(state, action, new_q);
    }

    pub fn reset(&mut self) {
        self.q_values.clear();
    }

    /// Number of states with at least one registered action
    pub fn state_count(&self) -> usize {
        self.q_values.len()
    }

    /// Total number of Q-values stored
    pub fn size(&self) -> usize {
        self.q_values.values().map(HashMap::len).sum()
    }
}

fn best_of(candidates: impl Iterator<Item = (Move, f64)>) -> Option<Move> {
    candidates
        .fold(None, |best: Option<(Move, f64)>, (action, q)| match best {
            Some((best_action, best_q))
                if best_q > q || (best_q == q && best_action < action) =>
            {
                Some((best_action, best_q))
            }
            _ => Some((action, q)),
        })
        .map(|(action, _)| action)
}
