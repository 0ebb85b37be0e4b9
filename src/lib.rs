//! Triangular peg solitaire as a reinforcement-learning environment
//!
//! This crate provides:
//! - The board engine: places, six jump directions, move legality and the
//!   canonical `'0'`/`'1'` state encoding
//! - An RL environment with solved/stuck/step rewards and exploring starts
//! - A tabular Q-learning agent behind a generic learner port
//! - Training and evaluation pipelines, greedy-policy extraction and a
//!   step-wise autopilot for replaying policies
//! - Policy persistence in a plain-text format and in MessagePack

pub mod adapters;
pub mod app;
pub mod cli;
pub mod error;
pub mod peg;
pub mod pipeline;
pub mod policy;
pub mod ports;
pub mod q_learning;
pub mod types;

pub use error::{Error, ErrorKind, Result};
