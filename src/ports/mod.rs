//! Ports (trait boundaries) for external dependencies.
//!
//! The board core and the harness only talk to learners, environments,
//! observers and storage through these traits; adapters implement them.

pub mod environment;
pub mod learner;
pub mod observer;
pub mod repository;

pub use environment::Environment;
pub use learner::{Learner, Transition};
pub use observer::{EpisodeOutcome, EpisodeSummary, Observer};
pub use repository::PolicyRepository;
