//! Observer implementations for training pipelines
//!
//! Observers allow composable data collection during training without coupling
//! the episode loop to specific output formats.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    peg::{GameState, Move},
    ports::{EpisodeOutcome, EpisodeSummary, Observer, Transition},
};

/// Observation of a single accepted step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepObservation {
    pub step: usize,
    pub state: String,
    pub action: String,
    pub reward: f64,
    /// Number of actions available after the step
    pub next_actions: usize,
}

/// Complete observation of a training episode, one JSONL line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Observation {
    pub episode: usize,
    pub outcome: EpisodeOutcome,
    pub initial_state: String,
    pub final_state: String,
    pub pegs_left: usize,
    pub total_reward: f64,
    pub rejections: usize,
    pub steps: Vec<StepObservation>,
}

/// Progress bar observer - Shows training progress
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    solved: usize,
    stuck: usize,
    abandoned: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            solved: 0,
            stuck: 0,
            abandoned: 0,
        }
    }

    fn message(&self) -> String {
        if self.abandoned > 0 {
            format!(
                "solved:{} stuck:{} abandoned:{}",
                self.solved, self.stuck, self.abandoned
            )
        } else {
            format!("solved:{} stuck:{}", self.solved, self.stuck)
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_training_start(&mut self, total_episodes: usize) -> Result<()> {
        let pb = ProgressBar::new(total_episodes as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} episodes ({msg})")
                .map_err(|e| Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        match summary.outcome {
            EpisodeOutcome::Solved => self.solved += 1,
            EpisodeOutcome::Stuck => self.stuck += 1,
            EpisodeOutcome::Abandoned => self.abandoned += 1,
        }

        if let Some(pb) = &self.progress_bar {
            pb.set_position(summary.episode as u64 + 1);
            pb.set_message(self.message());
        }
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(self.message());
        }
        Ok(())
    }
}

/// Metrics observer - Tracks training metrics in memory
pub struct MetricsObserver {
    episodes: usize,
    solved: usize,
    stuck: usize,
    abandoned: usize,
    rejected_actions: usize,
    episode_lengths: Vec<usize>,
    pegs_left: Vec<usize>,
    /// Episode index of the first solve
    first_solved: Option<usize>,
}

impl MetricsObserver {
    pub fn new() -> Self {
        Self {
            episodes: 0,
            solved: 0,
            stuck: 0,
            abandoned: 0,
            rejected_actions: 0,
            episode_lengths: Vec::new(),
            pegs_left: Vec::new(),
            first_solved: None,
        }
    }

    pub fn solve_rate(&self) -> f64 {
        if self.episodes == 0 {
            0.0
        } else {
            self.solved as f64 / self.episodes as f64
        }
    }

    pub fn avg_episode_length(&self) -> f64 {
        mean(&self.episode_lengths)
    }

    pub fn avg_pegs_left(&self) -> f64 {
        mean(&self.pegs_left)
    }

    /// Solve rate over the last `window` episodes
    pub fn recent_solve_rate(&self, window: usize) -> f64 {
        let recent: Vec<usize> = self.pegs_left.iter().rev().take(window).copied().collect();
        if recent.is_empty() {
            0.0
        } else {
            recent.iter().filter(|&&pegs| pegs == 1).count() as f64 / recent.len() as f64
        }
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            episodes: self.episodes,
            solved: self.solved,
            stuck: self.stuck,
            abandoned: self.abandoned,
            rejected_actions: self.rejected_actions,
            solve_rate: self.solve_rate(),
            avg_episode_length: self.avg_episode_length(),
            avg_pegs_left: self.avg_pegs_left(),
            first_solved: self.first_solved,
        }
    }
}

fn mean(values: &[usize]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<usize>() as f64 / values.len() as f64
    }
}

/// Summary of training metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub episodes: usize,
    pub solved: usize,
    pub stuck: usize,
    pub abandoned: usize,
    pub rejected_actions: usize,
    pub solve_rate: f64,
    pub avg_episode_length: f64,
    pub avg_pegs_left: f64,
    pub first_solved: Option<usize>,
}

impl Default for MetricsObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for MetricsObserver {
    fn on_action_rejected(
        &mut self,
        _episode: usize,
        _state: &GameState,
        _action: Move,
        _error: &Error,
    ) -> Result<()> {
        self.rejected_actions += 1;
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.episodes += 1;
        match summary.outcome {
            EpisodeOutcome::Solved => {
                self.solved += 1;
                self.first_solved.get_or_insert(summary.episode);
            }
            EpisodeOutcome::Stuck => self.stuck += 1,
            EpisodeOutcome::Abandoned => self.abandoned += 1,
        }
        self.episode_lengths.push(summary.steps);
        self.pegs_left.push(summary.pegs_left());
        Ok(())
    }
}

/// JSONL observer - Exports one JSON object per episode
pub struct JsonlObserver {
    writer: BufWriter<File>,
    current_steps: Vec<StepObservation>,
}

impl JsonlObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            current_steps: Vec::new(),
        })
    }
}

impl Observer for JsonlObserver {
    fn on_episode_start(&mut self, _episode: usize, _state: &GameState) -> Result<()> {
        self.current_steps.clear();
        Ok(())
    }

    fn on_step(&mut self, _episode: usize, step: usize, transition: &Transition) -> Result<()> {
        self.current_steps.push(StepObservation {
            step,
            state: transition.state.to_string(),
            action: transition.action.to_string(),
            reward: transition.reward,
            next_actions: transition.next_actions.len(),
        });
        Ok(())
    }

    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        let observation = Observation {
            episode: summary.episode,
            outcome: summary.outcome,
            initial_state: summary.initial_state.to_string(),
            final_state: summary.final_state.to_string(),
            pegs_left: summary.pegs_left(),
            total_reward: summary.total_reward,
            rejections: summary.rejections,
            steps: std::mem::take(&mut self.current_steps),
        };

        serde_json::to_writer(&mut self.writer, &observation)?;
        writeln!(&mut self.writer)?;
        self.writer.flush()?;

        Ok(())
    }
}

/// One CSV row per episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpisodeRecord {
    pub episode: usize,
    pub outcome: String,
    pub initial_empty: usize,
    pub steps: usize,
    pub pegs_left: usize,
    pub total_reward: f64,
    pub rejections: usize,
}

impl From<&EpisodeSummary> for EpisodeRecord {
    fn from(summary: &EpisodeSummary) -> Self {
        Self {
            episode: summary.episode,
            outcome: summary.outcome.as_str().to_string(),
            initial_empty: summary.initial_state.len() - summary.initial_state.occupied_count(),
            steps: summary.steps,
            pegs_left: summary.pegs_left(),
            total_reward: summary.total_reward,
            rejections: summary.rejections,
        }
    }
}

/// CSV observer - Exports per-episode summaries for spreadsheet analysis
pub struct CsvObserver {
    writer: csv::Writer<File>,
}

impl CsvObserver {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self {
            writer: csv::Writer::from_path(path)?,
        })
    }
}

impl Observer for CsvObserver {
    fn on_episode_end(&mut self, summary: &EpisodeSummary) -> Result<()> {
        self.writer.serialize(EpisodeRecord::from(summary))?;
        Ok(())
    }

    fn on_training_end(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(episode: usize, final_state: &str, outcome: EpisodeOutcome) -> EpisodeSummary {
        EpisodeSummary {
            episode,
            initial_state: GameState::parse("011111").unwrap(),
            final_state: GameState::parse(final_state).unwrap(),
            steps: 2,
            total_reward: 2.0,
            rejections: 0,
            outcome,
        }
    }

    #[test]
    fn test_metrics_observer_counts() {
        let mut metrics = MetricsObserver::new();
        metrics
            .on_episode_end(&summary(0, "101100", EpisodeOutcome::Stuck))
            .unwrap();
        metrics
            .on_episode_end(&summary(1, "000100", EpisodeOutcome::Solved))
            .unwrap();

        let summary = metrics.summary();
        assert_eq!(summary.episodes, 2);
        assert_eq!(summary.solved, 1);
        assert_eq!(summary.first_solved, Some(1));
        assert_eq!(summary.solve_rate, 0.5);
        assert_eq!(summary.avg_pegs_left, 2.0);
        assert_eq!(metrics.recent_solve_rate(1), 1.0);
    }

    #[test]
    fn test_jsonl_observer_writes_one_line_per_episode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.jsonl");
        let mut observer = JsonlObserver::new(&path).unwrap();

        for episode in 0..3 {
            observer
                .on_episode_start(episode, &GameState::parse("011111").unwrap())
                .unwrap();
            observer
                .on_step(
                    episode,
                    0,
                    &Transition {
                        state: GameState::parse("011111").unwrap(),
                        action: Move::from_indices(3, 0),
                        reward: 1.0,
                        next_state: GameState::parse("101011").unwrap(),
                        next_actions: vec![Move::from_indices(0, 5)],
                        done: false,
                    },
                )
                .unwrap();
            observer
                .on_episode_end(&summary(episode, "101011", EpisodeOutcome::Stuck))
                .unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        let first: Observation = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first.steps.len(), 1);
        assert_eq!(first.steps[0].action, "4 1");
        assert_eq!(first.outcome, EpisodeOutcome::Stuck);
    }

    #[test]
    fn test_csv_observer_writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.csv");
        let mut observer = CsvObserver::new(&path).unwrap();

        observer
            .on_episode_end(&summary(0, "000100", EpisodeOutcome::Solved))
            .unwrap();
        observer.on_training_end().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("episode,outcome,initial_empty,steps,pegs_left,total_reward,rejections")
        );
        assert_eq!(lines.next(), Some("0,solved,1,2,1,2.0,0"));
    }
}
