//! Tabular Q-learning behind the [`crate::ports::Learner`] port
//!
//! Off-policy TD control with ε-greedy exploration:
//!
//! ```text
//! Q(s,a) ← Q(s,a) + α[r + γ max_a' Q(s',a') − Q(s,a)]
//! ```
//!
//! The future term is zero on terminal transitions.
//!
//! ## Usage Example
//!
//! ```no_run
//! use pegsolitaire::q_learning::{QLearningAgent, QLearningConfig};
//!
//! let agent = QLearningAgent::new(
//!     QLearningConfig::default()
//!         .with_epsilon(0.3)
//!         .with_epsilon_decay(0.9995)
//!         .with_min_epsilon(0.05),
//! )?
//! .with_seed(42);
//! # Ok::<(), pegsolitaire::Error>(())
//! ```

pub mod agent;
pub mod q_table;
pub mod serialization;

pub use agent::{QLearningAgent, QLearningConfig};
pub use q_table::QTable;
pub use serialization::SavedQAgent;
