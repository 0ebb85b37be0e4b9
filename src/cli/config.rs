//! Argument groups shared across commands

use clap::Args;

use crate::{app::BoardConfig, peg::StartMode};

/// How evaluation and replay games start
#[derive(Args, Debug, Clone)]
pub struct StartArgs {
    /// Number of empty places at the start of every game
    #[arg(long, default_value_t = 1)]
    pub start_empty: usize,

    /// Draw the number of empty places at random for every game instead
    #[arg(long, conflicts_with = "start_empty")]
    pub exploring_starts: bool,
}

impl StartArgs {
    pub fn start_mode(&self) -> StartMode {
        if self.exploring_starts {
            StartMode::ExploringStarts
        } else {
            StartMode::FixedEmpty(self.start_empty)
        }
    }

    pub fn board_config(&self, levels: usize) -> BoardConfig {
        BoardConfig::new(levels).with_start_mode(self.start_mode())
    }
}

impl Default for StartArgs {
    fn default() -> Self {
        Self {
            start_empty: 1,
            exploring_starts: false,
        }
    }
}
