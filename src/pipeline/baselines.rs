//! Baseline learners

use rand::{SeedableRng, rngs::StdRng, seq::IndexedRandom};

use crate::{
    Error, Result,
    peg::{GameState, Move},
    ports::Learner,
};

/// Uniform random learner
///
/// Picks any legal action with equal probability and never learns, so its
/// extracted policy is empty.
pub struct RandomLearner {
    name: String,
    rng: StdRng,
}

impl RandomLearner {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::from_rng(&mut rand::rng()),
        }
    }

    /// Create a new random learner with a deterministic seed
    pub fn with_seed(name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Learner for RandomLearner {
    fn select_action(&mut self, state: &GameState, actions: &[Move]) -> Result<Move> {
        actions
            .choose(&mut self.rng)
            .copied()
            .ok_or_else(|| Error::NoActionsAvailable {
                state: state.to_string(),
            })
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn set_rng_seed(&mut self, seed: u64) -> Result<()> {
        self.rng = StdRng::seed_from_u64(seed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_learner_picks_legal_action() {
        let mut learner = RandomLearner::with_seed("Random", 4);
        let state = GameState::parse("011111").unwrap();
        let actions = [Move::from_indices(3, 0), Move::from_indices(5, 0)];

        for _ in 0..20 {
            let action = learner.select_action(&state, &actions).unwrap();
            assert!(actions.contains(&action));
        }
        assert!(learner.greedy_actions().is_empty());
    }

    #[test]
    fn test_random_learner_without_actions() {
        let mut learner = RandomLearner::with_seed("Random", 4);
        let state = GameState::parse("100000").unwrap();
        assert!(matches!(
            learner.select_action(&state, &[]),
            Err(Error::NoActionsAvailable { .. })
        ));
    }
}
