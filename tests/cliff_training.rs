//! End-to-end training run on the simulated cliff world.

use cvarq::{
    AtomConfig, CliffWorld, CliffWorldConfig, CvarQLearner, CvarqError, ExplorationStrategy,
    LearningConfig, TrainingConfig,
};

#[test]
fn training_produces_usable_grids() {
    let world_config = CliffWorldConfig {
        height: 3,
        width: 4,
        random_action_p: 0.1,
        step_reward: -1.0,
        fall_reward: -20.0,
    };
    let world = CliffWorld::new(world_config);

    let mut learner = CvarQLearner::new(
        world,
        &AtomConfig {
            nb_atoms: 4,
            spacing: 2,
            log_spacing: false,
        },
        LearningConfig {
            beta: 0.05,
            gamma: 0.9,
        },
        TrainingConfig {
            alpha: 0.1,
            max_episodes: 20,
            max_episode_steps: 40,
            exploration: ExplorationStrategy::EpsilonGreedy { eps: 0.2 },
            log_every: 10,
        },
    )
    .unwrap();

    // The divergence guard aborting a run is legitimate behavior of the
    // update rule, whose monotonicity holds only asymptotically; anything
    // else failing is a bug.
    match learner.run() {
        Ok(()) => assert_eq!(learner.stats().episodes, 20),
        Err(CvarqError::MonotonicityViolation { .. }) => {}
        Err(e) => panic!("training failed: {e}"),
    }

    let stats = *learner.stats();
    assert!(stats.steps > 0);
    assert_eq!(stats.steps, stats.updates);

    let table = learner.into_table();
    let value = table.expected_value_grid();
    let policy = table.greedy_action_grid();

    assert_eq!(value.len(), 3);
    assert_eq!(policy.len(), 3);
    for (value_row, policy_row) in value.iter().zip(&policy) {
        assert_eq!(value_row.len(), 4);
        assert_eq!(policy_row.len(), 4);
        assert!(value_row.iter().all(|v| v.is_finite()));
        assert!(policy_row.iter().all(|&a| a < 4));
    }
}

#[test]
fn greedy_policies_stay_valid_after_training() {
    let world = CliffWorld::new(CliffWorldConfig::default());

    let mut learner = CvarQLearner::new(
        world,
        &AtomConfig {
            nb_atoms: 4,
            spacing: 2,
            log_spacing: true,
        },
        LearningConfig {
            beta: 0.05,
            gamma: 0.9,
        },
        TrainingConfig {
            alpha: 0.2,
            max_episodes: 5,
            max_episode_steps: 30,
            exploration: ExplorationStrategy::EpsilonGreedy { eps: 0.3 },
            log_every: 5,
        },
    )
    .unwrap();

    match learner.run() {
        Ok(()) | Err(CvarqError::MonotonicityViolation { .. }) => {}
        Err(e) => panic!("training failed: {e}"),
    }

    let table = learner.into_table();
    for row in 0..4 {
        for col in 0..6 {
            let state = cvarq::GridState::new(row, col);
            assert!(table.next_action_alpha(state, 0.2).unwrap() < 4);
            assert!(table.next_action_s(state, -3.0) < 4);
        }
    }
}
