//! Command-line interface for training, evaluating and replaying policies

pub mod commands;
pub mod config;
pub mod output;
