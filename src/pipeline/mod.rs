//! Training and evaluation pipeline
//!
//! This module provides:
//! - the episode loop that trains a learner on an environment
//! - evaluation of a frozen greedy policy
//! - step-wise policy replay (autopilot)
//! - observers recording what happens during training

pub mod autopilot;
pub mod baselines;
pub mod evaluation;
pub mod observers;
pub mod training;

pub use autopilot::{Autopilot, AutopilotPhase, AutopilotRun, AutopilotStep, AutopilotStop};
pub use baselines::RandomLearner;
pub use evaluation::{EvaluationConfig, EvaluationResult, Evaluator, wilson_interval};
pub use observers::{
    CsvObserver, EpisodeRecord, JsonlObserver, MetricsObserver, MetricsSummary, Observation,
    ProgressObserver, StepObservation,
};
pub use training::{TrainingConfig, TrainingPipeline, TrainingResult};

pub use crate::ports::{Environment, Learner, Observer};
