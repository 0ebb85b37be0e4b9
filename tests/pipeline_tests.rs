//! End-to-end tests for training, policy extraction and evaluation

use pegsolitaire::{
    app::{AgentConfig, App, BoardConfig},
    peg::{GameState, Move, PegEnvironment, StartMode},
    pipeline::{
        Autopilot, AutopilotStop, EvaluationConfig, Evaluator, MetricsObserver, RandomLearner,
        TrainingConfig, TrainingPipeline,
    },
    policy::GreedyPolicy,
    q_learning::{QLearningAgent, QLearningConfig},
};

fn train_q_agent(levels: usize, episodes: usize, seed: u64) -> (QLearningAgent, GreedyPolicy) {
    let app = App::for_testing().build();
    let mut env = app.create_environment(&BoardConfig::new(levels)).unwrap();
    let mut agent = app
        .create_agent(AgentConfig::new(QLearningConfig::default()))
        .unwrap();

    let config = TrainingConfig::default()
        .with_episodes(episodes)
        .with_seed(Some(seed));
    let result = TrainingPipeline::new(config)
        .run(&mut env, &mut agent)
        .unwrap();
    assert_eq!(result.episodes, episodes);

    let policy = GreedyPolicy::extract(&agent);
    (agent, policy)
}

#[test]
fn test_outcomes_account_for_every_episode() {
    let mut env = PegEnvironment::new(5).unwrap();
    let mut agent = QLearningAgent::new(QLearningConfig::default()).unwrap();
    let config = TrainingConfig::default()
        .with_episodes(300)
        .with_seed(Some(11));

    let result = TrainingPipeline::new(config)
        .with_observer(Box::new(MetricsObserver::new()))
        .run(&mut env, &mut agent)
        .unwrap();

    assert_eq!(result.episodes, 300);
    assert_eq!(result.solved + result.stuck + result.abandoned, 300);
    assert_eq!(result.abandoned, 0);
    assert_eq!(result.rejected_actions, 0);
    assert!(result.solve_rate() >= 0.0 && result.solve_rate() <= 1.0);
    assert_eq!(agent.episodes_seen(), 300);
}

#[test]
fn test_seeded_training_is_reproducible() {
    let (first_agent, first_policy) = train_q_agent(4, 400, 5);
    let (second_agent, second_policy) = train_q_agent(4, 400, 5);

    assert_eq!(first_policy, second_policy);
    assert_eq!(first_agent.q_table_size(), second_agent.q_table_size());
    assert!(!first_policy.is_empty());
}

#[test]
fn test_extracted_policy_only_holds_legal_actions() {
    let (_, policy) = train_q_agent(4, 500, 21);

    for (state, action) in &policy {
        let mut env = PegEnvironment::new(4).unwrap();
        env.load_state(state.as_str()).unwrap();
        assert!(
            env.board().is_legal_move(*action),
            "policy maps {state} to illegal action {action}"
        );
    }
}

#[test]
fn test_trained_policy_finishes_a_two_peg_position() {
    // Exploring starts on six places reach every two-peg position quickly.
    let (_, policy) = train_q_agent(3, 2000, 9);
    let state = GameState::parse("110000").unwrap();
    assert_eq!(policy.get(&state), Some(Move::from_indices(0, 3)));

    let mut env = PegEnvironment::new(3).unwrap();
    env.load_state(state.as_str()).unwrap();
    let run = Autopilot::new(&policy).run_to_end(&mut env).unwrap();

    assert_eq!(run.stop, AutopilotStop::Solved);
    assert_eq!(run.steps.len(), 1);
    assert_eq!(run.final_state.as_str(), "000100");
}

#[test]
fn test_random_learner_trains_without_a_policy() {
    let mut env = PegEnvironment::new(5).unwrap();
    let mut learner = RandomLearner::with_seed("random", 3);
    let config = TrainingConfig::default()
        .with_episodes(100)
        .with_seed(Some(3));

    let result = TrainingPipeline::new(config)
        .run(&mut env, &mut learner)
        .unwrap();

    assert_eq!(result.solved + result.stuck, 100);
    assert!(GreedyPolicy::extract(&learner).is_empty());
}

#[test]
fn test_empty_policy_never_solves() {
    let mut env = PegEnvironment::new(5)
        .unwrap()
        .with_start_mode(StartMode::FixedEmpty(1))
        .unwrap();
    let result = Evaluator::new(
        EvaluationConfig::default()
            .with_matches(50)
            .with_seed(Some(1)),
    )
    .run(&mut env, &GreedyPolicy::new())
    .unwrap();

    assert_eq!(result.matches, 50);
    assert_eq!(result.solved, 0);
    assert_eq!(result.unmapped, 50);
    assert_eq!(result.success_rate, 0.0);
    assert!(result.confidence_interval.0.abs() < 1e-12);
    assert!(result.confidence_interval.1 > 0.0);
}

#[test]
fn test_evaluation_is_reproducible_with_seed() {
    let (_, policy) = train_q_agent(4, 500, 13);
    let board = BoardConfig::new(4).with_start_mode(StartMode::FixedEmpty(2));
    let app = App::for_testing().build();
    let evaluate = || {
        let mut env = app.create_environment(&board).unwrap();
        Evaluator::new(
            EvaluationConfig::default()
                .with_matches(200)
                .with_seed(Some(77)),
        )
        .run(&mut env, &policy)
        .unwrap()
    };

    let first = evaluate();
    let second = evaluate();
    assert_eq!(first.solved, second.solved);
    assert_eq!(first.unmapped, second.unmapped);
    assert_eq!(
        first.solved + first.stuck + first.unmapped + first.rejected,
        200
    );
}
