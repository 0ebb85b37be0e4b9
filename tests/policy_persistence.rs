//! Saving and loading policies through the app container

use pegsolitaire::{
    app::App,
    peg::{GameState, Move},
    policy::{GreedyPolicy, PolicyRecord, RunMetadata},
    q_learning::{QLearningAgent, QLearningConfig, SavedQAgent},
};
use tempfile::tempdir;

fn sample_record() -> PolicyRecord {
    let policy: GreedyPolicy = [
        ("0111111111", Move::from_indices(3, 0)),
        ("1011111111", Move::from_indices(6, 1)),
        ("1101111111", Move::from_indices(5, 2)),
    ]
    .into_iter()
    .map(|(state, action)| (GameState::parse(state).unwrap(), action))
    .collect();
    let mut metadata = RunMetadata::new(4, 2_000, 500, 0.5);
    metadata.saved_at = Some(1_760_000_000);
    PolicyRecord::new(policy, metadata)
}

#[test]
fn text_policy_file_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("policy-4levels.txt");
    let app = App::for_policy_path(&path);

    let record = sample_record();
    app.save_policy(&record, &path).unwrap();
    let loaded = app.load_policy(&path).unwrap();

    assert_eq!(loaded, record);

    let contents = std::fs::read_to_string(&path).unwrap();
    let mut lines = contents.lines();
    assert_eq!(lines.next(), Some("0111111111 4 1"));
    assert!(contents.contains("\n\nNumber of levels: 4\n"));
    assert!(contents.contains("Rate of success: 50.00%"));
}

#[test]
fn msgpack_policy_round_trips() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("policy.msgpack");
    let app = App::for_policy_path(&path);

    let mut record = sample_record();
    record.metadata.success_rate = 0.123_456_789;
    app.save_policy(&record, &path).unwrap();

    assert_eq!(app.load_policy(&path).unwrap(), record);
}

#[test]
fn save_stamps_missing_timestamp() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("policy.txt");
    let app = App::for_policy_path(&path);

    let mut record = sample_record();
    record.metadata.saved_at = None;
    app.save_policy(&record, &path).unwrap();

    let loaded = app.load_policy(&path).unwrap();
    assert!(loaded.metadata.saved_at.is_some());
    assert_eq!(loaded.policy, record.policy);
}

#[test]
fn loading_a_missing_file_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing.txt");
    assert!(App::for_policy_path(&path).load_policy(&path).is_err());
}

#[test]
fn agent_checkpoint_restores_q_values() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("agent.msgpack");

    let mut agent = QLearningAgent::new(QLearningConfig::default())
        .unwrap()
        .with_seed(4);
    let mut env = pegsolitaire::peg::PegEnvironment::new(4).unwrap();
    pegsolitaire::pipeline::TrainingPipeline::new(
        pegsolitaire::pipeline::TrainingConfig::default()
            .with_episodes(50)
            .with_seed(Some(4)),
    )
    .run(&mut env, &mut agent)
    .unwrap();

    SavedQAgent::from_agent(&agent, RunMetadata::new(4, 50, 0, 0.0))
        .save_to_file(&path)
        .unwrap();
    let restored = SavedQAgent::load_from_file(&path)
        .unwrap()
        .to_agent()
        .unwrap();

    assert_eq!(restored.q_table_size(), agent.q_table_size());
    assert_eq!(restored.episodes_seen(), 50);
    assert_eq!(
        GreedyPolicy::extract(&restored),
        GreedyPolicy::extract(&agent)
    );
}
