//! Train command - Train a Q-learning agent and save its greedy policy

use std::{
    fs::File,
    path::{Path, PathBuf},
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use serde_json::to_writer_pretty;

use crate::{
    app::{AgentConfig, App, BoardConfig},
    cli::{
        config::StartArgs,
        output::{format_number, format_percent, print_kv, print_section},
    },
    pipeline::{
        CsvObserver, EvaluationConfig, EvaluationResult, Evaluator, JsonlObserver, ProgressObserver,
        TrainingConfig, TrainingPipeline, TrainingResult,
    },
    policy::{GreedyPolicy, PolicyRecord, RunMetadata},
    ports::Learner,
    q_learning::{QLearningConfig, SavedQAgent},
};

#[derive(Parser, Debug)]
#[command(about = "Train a Q-learning agent", allow_negative_numbers = true)]
pub struct TrainArgs {
    /// Number of board levels
    #[arg(long, short = 'l', default_value_t = 5)]
    pub levels: usize,

    /// Number of training episodes
    #[arg(long, short = 'e', default_value_t = 2_500_000)]
    pub episodes: usize,

    /// Number of evaluation matches played with the greedy policy
    #[arg(long, short = 'm', default_value_t = 100_000)]
    pub matches: usize,

    /// Output file for the policy (`.msgpack` for binary, text otherwise)
    #[arg(long, short = 'O')]
    pub output: Option<PathBuf>,

    /// Optional MessagePack checkpoint of the trained agent
    #[arg(long)]
    pub checkpoint: Option<PathBuf>,

    /// Optional file for JSONL episode observations
    #[arg(long)]
    pub observations: Option<PathBuf>,

    /// Optional CSV file with one row per training episode
    #[arg(long)]
    pub episodes_csv: Option<PathBuf>,

    /// Optional path for writing a summary JSON file
    #[arg(long)]
    pub summary: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,

    /// Consecutive rejected actions before an episode is abandoned
    #[arg(long, default_value_t = 100)]
    pub max_rejections: usize,

    /// Learning rate α (0.0-1.0)
    #[arg(long, default_value_t = 0.8)]
    pub learning_rate: f64,

    /// Discount factor γ (0.0-1.0)
    #[arg(long, default_value_t = 0.9)]
    pub discount: f64,

    /// Initial exploration rate ε
    #[arg(long, default_value_t = 0.2)]
    pub epsilon: f64,

    /// Epsilon decay per episode
    #[arg(long, default_value_t = 1.0)]
    pub epsilon_decay: f64,

    /// Minimum epsilon
    #[arg(long, default_value_t = 0.0)]
    pub min_epsilon: f64,

    /// Initial Q-value
    #[arg(long, default_value_t = 0.0)]
    pub q_init: f64,

    /// How evaluation matches start
    #[command(flatten)]
    pub evaluation_start: StartArgs,
}

impl TrainArgs {
    fn q_learning_config(&self) -> QLearningConfig {
        QLearningConfig::default()
            .with_learning_rate(self.learning_rate)
            .with_discount_factor(self.discount)
            .with_epsilon(self.epsilon)
            .with_epsilon_decay(self.epsilon_decay)
            .with_min_epsilon(self.min_epsilon)
            .with_q_init(self.q_init)
    }
}

#[derive(Debug, Serialize)]
struct TrainingSummaryFile<'a> {
    training: &'a TrainingResult,
    evaluation: &'a EvaluationResult,
    policy_states: usize,
    board: BoardConfig,
    evaluation_board: BoardConfig,
    q_learning: QLearningConfig,
    seed: Option<u64>,
}

/// `policy-<L>levels-<unix seconds>.txt`
fn default_output_path(levels: usize) -> PathBuf {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    PathBuf::from(format!("policy-{levels}levels-{now}.txt"))
}

pub fn execute(args: TrainArgs) -> Result<()> {
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(args.levels));
    let app = App::for_policy_path(&output);

    let board = BoardConfig::new(args.levels);
    let evaluation_board = args.evaluation_start.board_config(args.levels);
    evaluation_board
        .validate()
        .context("Invalid evaluation start configuration")?;

    let q_config = args.q_learning_config();
    let mut agent = app.create_agent(AgentConfig::new(q_config))?;
    let mut env = app.create_environment(&board)?;

    print_section("Training");
    print_kv("Learner", agent.name());
    print_kv("Levels", &args.levels.to_string());
    print_kv("Episodes", &format_number(args.episodes));
    print_kv(
        "α / γ / ε",
        &format!("{} / {} / {}", q_config.learning_rate, q_config.discount_factor, q_config.epsilon),
    );
    if let Some(seed) = args.seed {
        print_kv("Seed", &seed.to_string());
    }

    let training_config = TrainingConfig::default()
        .with_episodes(args.episodes)
        .with_seed(args.seed)
        .with_max_rejections(args.max_rejections);
    let mut pipeline = TrainingPipeline::new(training_config);
    if !args.no_progress {
        pipeline = pipeline.with_observer(Box::new(ProgressObserver::new()));
    }
    if let Some(path) = &args.observations {
        let observer = JsonlObserver::new(path)
            .with_context(|| format!("Failed to create observations file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }
    if let Some(path) = &args.episodes_csv {
        let observer = CsvObserver::new(path)
            .with_context(|| format!("Failed to create CSV file {}", path.display()))?;
        pipeline = pipeline.with_observer(Box::new(observer));
    }

    let training = pipeline.run(&mut env, &mut agent)?;

    print_section("Training Complete");
    print_kv("Episodes", &format_number(training.episodes));
    print_kv("Solved", &format_percent(training.solve_rate()));
    print_kv("Mean reward", &format!("{:.2}", training.mean_reward()));
    if training.rejected_actions > 0 {
        print_kv("Rejected actions", &format_number(training.rejected_actions));
    }

    let policy = GreedyPolicy::extract(&agent);
    print_kv("Policy states", &format_number(policy.len()));

    let mut evaluation_env = app.create_environment(&evaluation_board)?;
    let evaluation = Evaluator::new(
        EvaluationConfig::default()
            .with_matches(args.matches)
            .with_seed(args.seed.map(|s| s.wrapping_add(2))),
    )
    .run(&mut evaluation_env, &policy)?;

    print_section("Evaluation");
    print_kv("Matches", &format_number(evaluation.matches));
    print_kv("Rate of success", &format_percent(evaluation.success_rate));
    let (low, high) = evaluation.confidence_interval;
    print_kv(
        &format!("{:.0}% CI", evaluation.confidence_level * 100.0),
        &format!("[{}, {}]", format_percent(low), format_percent(high)),
    );
    if evaluation.unmapped > 0 {
        print_kv("Unmapped", &format_number(evaluation.unmapped));
    }

    let metadata = RunMetadata::new(
        args.levels,
        training.episodes,
        evaluation.matches,
        evaluation.success_rate,
    );
    let record = PolicyRecord::new(policy, metadata.clone());
    app.save_policy(&record, &output)
        .with_context(|| format!("Failed to save policy to {}", output.display()))?;
    println!("\nPolicy saved to {}", output.display());

    if let Some(path) = &args.checkpoint {
        SavedQAgent::from_agent(&agent, metadata.stamped_now()).save_to_file(path)?;
        println!("Agent checkpoint saved to {}", path.display());
    }

    if let Some(path) = &args.summary {
        write_summary(
            path,
            &TrainingSummaryFile {
                training: &training,
                evaluation: &evaluation,
                policy_states: record.policy.len(),
                board,
                evaluation_board,
                q_learning: q_config,
                seed: args.seed,
            },
        )?;
        println!("Summary saved to {}", path.display());
    }

    Ok(())
}

fn write_summary(path: &Path, summary: &TrainingSummaryFile<'_>) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create summary file {}", path.display()))?;
    to_writer_pretty(file, summary).context("Failed to write training summary")?;
    Ok(())
}
