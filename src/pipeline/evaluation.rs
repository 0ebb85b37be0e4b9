//! Evaluation of a frozen greedy policy

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};

use super::autopilot::{Autopilot, AutopilotStop};
use crate::{Error, Result, policy::GreedyPolicy, ports::Environment};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Number of evaluation matches
    pub matches: usize,
    pub seed: Option<u64>,
    /// Coverage of the reported confidence interval, in `(0, 1)`
    pub confidence_level: f64,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            matches: 1_000,
            seed: None,
            confidence_level: 0.95,
        }
    }
}

impl EvaluationConfig {
    pub fn with_matches(mut self, matches: usize) -> Self {
        self.matches = matches;
        self
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_confidence_level(mut self, confidence_level: f64) -> Self {
        self.confidence_level = confidence_level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "confidence_level must be in (0, 1), got {}",
                    self.confidence_level
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub matches: usize,
    pub solved: usize,
    pub stuck: usize,
    /// Matches that reached a state the policy does not cover
    pub unmapped: usize,
    /// Matches where the policy proposed an illegal action
    pub rejected: usize,
    pub success_rate: f64,
    pub confidence_level: f64,
    /// Wilson score interval for `success_rate`
    pub confidence_interval: (f64, f64),
}

impl EvaluationResult {
    /// Save result to JSON file
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Plays matches with a greedy policy only; no learning happens here.
pub struct Evaluator {
    config: EvaluationConfig,
}

impl Evaluator {
    pub fn new(config: EvaluationConfig) -> Self {
        Self { config }
    }

    /// Play `config.matches` matches and count how many end solved.
    ///
    /// An unmapped state or a rejected action ends the match unsolved.
    pub fn run(
        &self,
        env: &mut dyn Environment,
        policy: &GreedyPolicy,
    ) -> Result<EvaluationResult> {
        self.config.validate()?;
        let mut rng = match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };
        let autopilot = Autopilot::new(policy);

        let (mut solved, mut stuck, mut unmapped, mut rejected) = (0, 0, 0, 0);
        for _ in 0..self.config.matches {
            env.reset(&mut rng)?;
            match autopilot.run_to_end(env)?.stop {
                AutopilotStop::Solved => solved += 1,
                AutopilotStop::Stuck => stuck += 1,
                AutopilotStop::Unmapped => unmapped += 1,
                AutopilotStop::Rejected => rejected += 1,
            }
        }

        let matches = self.config.matches;
        let success_rate = if matches == 0 {
            0.0
        } else {
            solved as f64 / matches as f64
        };

        Ok(EvaluationResult {
            matches,
            solved,
            stuck,
            unmapped,
            rejected,
            success_rate,
            confidence_level: self.config.confidence_level,
            confidence_interval: wilson_interval(solved, matches, self.config.confidence_level)?,
        })
    }
}

/// Wilson score interval for `successes` out of `trials`.
///
/// Returns `(0, 1)` when there are no trials.
pub fn wilson_interval(successes: usize, trials: usize, confidence_level: f64) -> Result<(f64, f64)> {
    if trials == 0 {
        return Ok((0.0, 1.0));
    }
    let normal = Normal::new(0.0, 1.0).map_err(|e| Error::InvalidConfiguration {
        message: e.to_string(),
    })?;
    let z = normal.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0);

    let n = trials as f64;
    let p = successes as f64 / n;
    let z2 = z * z;
    let denominator = 1.0 + z2 / n;
    let center = (p + z2 / (2.0 * n)) / denominator;
    let half_width = z / denominator * (p * (1.0 - p) / n + z2 / (4.0 * n * n)).sqrt();

    Ok(((center - half_width).max(0.0), (center + half_width).min(1.0)))
}
