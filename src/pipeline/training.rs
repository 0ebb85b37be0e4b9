//! Episode loop that trains a learner against an environment

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    ports::{EpisodeOutcome, EpisodeSummary, Environment, Learner, Observer, Transition},
};

/// Training configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Number of training episodes
    pub episodes: usize,

    /// Random seed for resets; the learner is seeded with `seed + 1`
    pub seed: Option<u64>,

    /// Consecutive rejected actions after which an episode is abandoned
    pub max_rejections: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            episodes: 10_000,
            seed: None,
            max_rejections: 100,
        }
    }
}

impl TrainingConfig {
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_max_rejections(mut self, max_rejections: usize) -> Self {
        self.max_rejections = max_rejections;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rejections == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_rejections must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Result of a training run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingResult {
    pub episodes: usize,
    pub solved: usize,
    pub stuck: usize,
    pub abandoned: usize,
    /// Rejected actions over all episodes
    pub rejected_actions: usize,
    /// Accepted actions over all episodes
    pub total_steps: usize,
    pub total_reward: f64,
}

impl TrainingResult {
    fn empty() -> Self {
        Self {
            episodes: 0,
            solved: 0,
            stuck: 0,
            abandoned: 0,
            rejected_actions: 0,
            total_steps: 0,
            total_reward: 0.0,
        }
    }

    fn record(&mut self, summary: &EpisodeSummary) {
        self.episodes += 1;
        match summary.outcome {
            EpisodeOutcome::Solved => self.solved += 1,
            EpisodeOutcome::Stuck => self.stuck += 1,
            EpisodeOutcome::Abandoned => self.abandoned += 1,
        }
        self.rejected_actions += summary.rejections;
        self.total_steps += summary.steps;
        self.total_reward += summary.total_reward;
    }

    /// Fraction of training episodes that ended solved
    pub fn solve_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.solved as f64 / self.episodes as f64
        }
    }

    pub fn mean_reward(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.total_reward / self.episodes as f64
        }
    }

    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }

    /// Load result from JSON file
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let result = serde_json::from_reader(file)?;
        Ok(result)
    }
}

/// Training pipeline for a single learner on one environment
pub struct TrainingPipeline {
    config: TrainingConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the pipeline
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run `config.episodes` episodes.
    ///
    /// # Errors
    ///
    /// Fails on invalid configuration, on learner errors and on any
    /// environment error other than a rejected action.
    pub fn run(
        &mut self,
        env: &mut dyn Environment,
        learner: &mut dyn Learner,
    ) -> Result<TrainingResult> {
        self.config.validate()?;
        let mut rng = self.seed_run(learner)?;
        let mut result = TrainingResult::empty();

        for observer in &mut self.observers {
            observer.on_training_start(self.config.episodes)?;
        }

        for episode in 0..self.config.episodes {
            let summary = self.run_episode(episode, env, learner, &mut rng)?;
            learner.end_episode()?;
            result.record(&summary);

            for observer in &mut self.observers {
                observer.on_episode_end(&summary)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_training_end()?;
        }

        if result.abandoned > 0 {
            eprintln!(
                "Warning: {} of {} episodes were abandoned after {} consecutive rejected actions.",
                result.abandoned, result.episodes, self.config.max_rejections
            );
        }

        Ok(result)
    }

    fn seed_run(&self, learner: &mut dyn Learner) -> Result<StdRng> {
        match self.config.seed {
            Some(seed) => {
                learner.set_rng_seed(seed.wrapping_add(1))?;
                Ok(StdRng::seed_from_u64(seed))
            }
            None => Ok(StdRng::from_rng(&mut rand::rng())),
        }
    }

    fn run_episode(
        &mut self,
        episode: usize,
        env: &mut dyn Environment,
        learner: &mut dyn Learner,
        rng: &mut StdRng,
    ) -> Result<EpisodeSummary> {
        env.reset(rng)?;
        let initial_state = env.current_state();
        for observer in &mut self.observers {
            observer.on_episode_start(episode, &initial_state)?;
        }

        let mut steps = 0;
        let mut total_reward = 0.0;
        let mut rejections = 0;
        let mut consecutive_rejections = 0;
        let mut abandoned = false;

        while !env.is_terminal() {
            let state = env.current_state();
            let actions = env.available_actions();
            let action = learner.select_action(&state, &actions)?;

            match env.perform_action(action) {
                Ok(reward) => {
                    consecutive_rejections = 0;
                    let next_actions = env.available_actions();
                    let transition = Transition {
                        state,
                        action,
                        reward,
                        next_state: env.current_state(),
                        done: next_actions.is_empty(),
                        next_actions,
                    };
                    learner.update(&transition)?;
                    for observer in &mut self.observers {
                        observer.on_step(episode, steps, &transition)?;
                    }
                    steps += 1;
                    total_reward += reward;
                }
                Err(err) if err.is_recoverable() => {
                    rejections += 1;
                    consecutive_rejections += 1;
                    for observer in &mut self.observers {
                        observer.on_action_rejected(episode, &state, action, &err)?;
                    }
                    if consecutive_rejections >= self.config.max_rejections {
                        abandoned = true;
                        break;
                    }
                }
                Err(err) => return Err(err),
            }
        }

        let outcome = if abandoned {
            EpisodeOutcome::Abandoned
        } else if env.is_solved() {
            EpisodeOutcome::Solved
        } else {
            EpisodeOutcome::Stuck
        };

        Ok(EpisodeSummary {
            episode,
            initial_state,
            final_state: env.current_state(),
            steps,
            total_reward,
            rejections,
            outcome,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        peg::{GameState, Move, PegEnvironment},
        pipeline::{MetricsObserver, RandomLearner},
    };

    /// Always proposes a move that is never legal.
    struct StubbornLearner;

    impl Learner for StubbornLearner {
        fn select_action(&mut self, _state: &GameState, _actions: &[Move]) -> Result<Move> {
            Ok(Move::from_indices(0, 1))
        }

        fn name(&self) -> &str {
            "Stubborn"
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_every_episode_ends_terminal() {
        let mut env = PegEnvironment::new(4).unwrap();
        let mut learner = RandomLearner::new("Random");
        let mut pipeline = TrainingPipeline::new(
            TrainingConfig::default()
                .with_episodes(50)
                .with_seed(Some(1)),
        );

        let result = pipeline.run(&mut env, &mut learner).unwrap();

        assert_eq!(result.episodes, 50);
        assert_eq!(result.solved + result.stuck, 50);
        assert_eq!(result.abandoned, 0);
        assert_eq!(result.rejected_actions, 0);
        assert!(env.is_terminal());
    }

    #[test]
    fn test_rejected_actions_abandon_episode() {
        let mut env = PegEnvironment::new(5).unwrap();
        let mut pipeline = TrainingPipeline::new(
            TrainingConfig::default()
                .with_episodes(3)
                .with_seed(Some(2))
                .with_max_rejections(4),
        );

        let result = pipeline.run(&mut env, &mut StubbornLearner).unwrap();

        // A random start may already be terminal; it then counts as stuck.
        assert_eq!(result.total_steps, 0);
        assert_eq!(result.solved, 0);
        assert_eq!(result.abandoned + result.stuck, 3);
        assert_eq!(result.rejected_actions, result.abandoned * 4);
    }

    #[test]
    fn test_zero_max_rejections_is_invalid() {
        let mut env = PegEnvironment::new(4).unwrap();
        let mut learner = RandomLearner::new("Random");
        let mut pipeline =
            TrainingPipeline::new(TrainingConfig::default().with_max_rejections(0));
        assert!(pipeline.run(&mut env, &mut learner).is_err());
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = || {
            let mut env = PegEnvironment::new(5).unwrap();
            let mut learner = RandomLearner::new("Random");
            TrainingPipeline::new(
                TrainingConfig::default()
                    .with_episodes(40)
                    .with_seed(Some(77)),
            )
            .with_observer(Box::new(MetricsObserver::new()))
            .run(&mut env, &mut learner)
            .unwrap()
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn test_result_json_roundtrip() {
        let mut env = PegEnvironment::new(4).unwrap();
        let mut learner = RandomLearner::new("Random");
        let result = TrainingPipeline::new(
            TrainingConfig::default()
                .with_episodes(5)
                .with_seed(Some(3)),
        )
        .run(&mut env, &mut learner)
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("result.json");
        result.save(&path).unwrap();
        assert_eq!(TrainingResult::load(&path).unwrap(), result);
    }
}
