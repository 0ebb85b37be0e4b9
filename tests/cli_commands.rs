use clap::Parser;
use pegsolitaire::{
    adapters::PolicyFileRepository,
    cli::commands::{
        evaluate::{self, EvaluateArgs},
        replay::{self, ReplayArgs},
        train::{self, TrainArgs},
    },
    ports::PolicyRepository,
};
use tempfile::tempdir;

fn read_json(path: &std::path::Path) -> serde_json::Value {
    let contents = std::fs::read_to_string(path).unwrap();
    serde_json::from_str(&contents).unwrap()
}

#[test]
fn train_writes_policy_summary_csv_and_checkpoint() {
    let tmp = tempdir().unwrap();
    let policy = tmp.path().join("policy.txt");
    let summary = tmp.path().join("summary.json");
    let csv = tmp.path().join("episodes.csv");
    let checkpoint = tmp.path().join("agent.msgpack");

    let args = TrainArgs::parse_from([
        "pegsolitaire-train",
        "--levels",
        "4",
        "--episodes",
        "60",
        "--matches",
        "20",
        "--seed",
        "3",
        "--no-progress",
        "--output",
        policy.to_str().unwrap(),
        "--summary",
        summary.to_str().unwrap(),
        "--episodes-csv",
        csv.to_str().unwrap(),
        "--checkpoint",
        checkpoint.to_str().unwrap(),
    ]);
    train::execute(args).expect("training should succeed");

    let record = PolicyFileRepository::new().load(&policy).unwrap();
    assert_eq!(record.metadata.levels, 4);
    assert_eq!(record.metadata.episodes, 60);
    assert_eq!(record.metadata.matches, 20);
    assert!(record.metadata.saved_at.is_some());
    assert!(!record.policy.is_empty());

    let parsed = read_json(&summary);
    assert_eq!(parsed["training"]["episodes"], 60);
    assert_eq!(parsed["evaluation"]["matches"], 20);
    assert_eq!(parsed["board"]["levels"], 4);
    assert_eq!(parsed["seed"], 3);

    let rows = std::fs::read_to_string(&csv).unwrap();
    assert!(rows.starts_with("episode,outcome,initial_empty,steps,pegs_left,total_reward,rejections"));
    assert_eq!(rows.lines().count(), 61);

    assert!(checkpoint.exists());
}

#[test]
fn evaluate_and_replay_a_trained_policy() {
    let tmp = tempdir().unwrap();
    let policy = tmp.path().join("policy.msgpack");
    let export = tmp.path().join("evaluation.json");

    train::execute(TrainArgs::parse_from([
        "pegsolitaire-train",
        "--levels",
        "4",
        "--episodes",
        "40",
        "--matches",
        "10",
        "--seed",
        "8",
        "--no-progress",
        "--output",
        policy.to_str().unwrap(),
    ]))
    .unwrap();

    evaluate::execute(EvaluateArgs::parse_from([
        "pegsolitaire-evaluate",
        policy.to_str().unwrap(),
        "--matches",
        "25",
        "--seed",
        "1",
        "--start-empty",
        "2",
        "--export",
        export.to_str().unwrap(),
    ]))
    .expect("evaluation should succeed");

    let parsed = read_json(&export);
    assert_eq!(parsed["result"]["matches"], 25);
    assert_eq!(parsed["board"]["levels"], 4);
    assert_eq!(parsed["trained"]["episodes"], 40);

    replay::execute(ReplayArgs::parse_from([
        "pegsolitaire-replay",
        policy.to_str().unwrap(),
        "--state",
        "1100000000",
    ]))
    .expect("replay should succeed");

    replay::execute(ReplayArgs::parse_from([
        "pegsolitaire-replay",
        policy.to_str().unwrap(),
        "--seed",
        "2",
        "--exploring-starts",
    ]))
    .expect("replay from a random start should succeed");
}

#[test]
fn evaluate_rejects_mismatched_levels() {
    let tmp = tempdir().unwrap();
    let policy = tmp.path().join("policy.txt");
    std::fs::write(&policy, "0111111111 4 1\n\nNumber of levels: 4\n").unwrap();

    let result = evaluate::execute(EvaluateArgs::parse_from([
        "pegsolitaire-evaluate",
        policy.to_str().unwrap(),
        "--levels",
        "5",
        "--matches",
        "5",
    ]));
    assert!(result.is_err());
}

#[test]
fn evaluate_rejects_levels_whose_place_count_overflows() {
    let tmp = tempdir().unwrap();
    let policy = tmp.path().join("policy.txt");
    std::fs::write(&policy, "0111111111 4 1\n\nNumber of levels: 4\n").unwrap();
    let huge = usize::MAX.to_string();

    let result = evaluate::execute(EvaluateArgs::parse_from([
        "pegsolitaire-evaluate",
        policy.to_str().unwrap(),
        "--levels",
        huge.as_str(),
        "--matches",
        "5",
    ]));
    assert!(result.is_err());
}

#[test]
fn start_arguments_conflict() {
    let parsed = EvaluateArgs::try_parse_from([
        "pegsolitaire-evaluate",
        "policy.txt",
        "--start-empty",
        "2",
        "--exploring-starts",
    ]);
    assert!(parsed.is_err());
}

#[test]
fn train_rejects_invalid_evaluation_start() {
    let tmp = tempdir().unwrap();
    let policy = tmp.path().join("policy.txt");
    let result = train::execute(TrainArgs::parse_from([
        "pegsolitaire-train",
        "--levels",
        "4",
        "--episodes",
        "5",
        "--no-progress",
        "--start-empty",
        "9",
        "--output",
        policy.to_str().unwrap(),
    ]));
    assert!(result.is_err());
    assert!(!policy.exists());
}
