use anyhow::Result;
use pokegym::battle_env::{
    BattleAct, BattleEnv, BattleEnvConfig, OpponentMode, PokemonConfig, Variant,
};
use pokegym::rl_core::{
    record::BufferedRecorder, Agent, Configurable, DefaultEvaluator, Env as _, Evaluator as _,
    Trainer, TrainerConfig, Transition,
};
use pokegym::tabular_agent::bandit::{ContextualBandit, ContextualBanditConfig};
use pokegym::tabular_agent::qlearning::{EpsilonGreedy, QLearning, QLearningConfig};
use tempdir::TempDir;

type Evaluator = DefaultEvaluator<BattleEnv, QLearning<BattleEnv>>;

const N_TYPES: usize = 4;
const MAX_OPTS: usize = 200;
const EVAL_INTERVAL: usize = 100;
const N_EPISODES_PER_EVAL: usize = 20;

fn types_map() -> Vec<String> {
    ["fire", "water", "grass", "electric"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn env_config(variant: Variant) -> BattleEnvConfig {
    BattleEnvConfig::default()
        .variant(variant)
        .pokemon1(PokemonConfig::default().types_map(types_map()))
        .pokemon2(PokemonConfig::default().types_map(types_map()))
        .effectiveness(vec![
            vec![1.0, 0.0, 2.0, 1.0],
            vec![2.0, 1.0, 0.0, 1.0],
            vec![0.0, 2.0, 1.0, 1.0],
            vec![1.0, 2.0, 1.0, 0.0],
        ])
        .opponent(OpponentMode::RandomPerfect)
}

fn agent_config() -> QLearningConfig {
    QLearningConfig::default()
        .space_size(vec![N_TYPES, N_TYPES])
        .n_actions(N_TYPES)
        .gamma(0.9)
        .lr(0.1)
        .explorer(EpsilonGreedy::with_final_step(MAX_OPTS))
}

#[test]
fn test_train_eval_qlearning() -> Result<()> {
    let tmp_dir = TempDir::new("q_battle")?;
    let model_dir = match tmp_dir.as_ref().to_str() {
        Some(s) => s,
        None => panic!("Failed to get string of temporary directory"),
    };
    let env_config = env_config(Variant::V1);

    let trainer_config = TrainerConfig::default()
        .max_opts(MAX_OPTS)
        .opt_interval(1)
        .eval_interval(EVAL_INTERVAL)
        .flush_record_interval(EVAL_INTERVAL)
        .save_interval(MAX_OPTS)
        .model_dir(model_dir);
    let mut trainer = Trainer::<BattleEnv>::build(trainer_config, env_config.clone());
    let mut agent = QLearning::build(agent_config());
    let mut recorder = BufferedRecorder::new();
    let mut evaluator = Evaluator::new(&env_config, 1, N_EPISODES_PER_EVAL)?;

    trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

    // Evaluation regularly improved on f32::MIN, so a best model exists.
    let mut agent_ = QLearning::<BattleEnv>::build(agent_config());
    agent_.load(model_dir.to_owned() + "/best")?;
    agent_.eval();
    let reward = Evaluator::new(&env_config, 0, N_EPISODES_PER_EVAL)?.evaluate(&mut agent_)?;
    assert!(reward.is_finite());

    Ok(())
}

#[test]
fn test_transition_rewards_are_per_step() -> Result<()> {
    // the battle outlasts the rollout, so no step is terminal
    let pkm = PokemonConfig::default().health(10_000);
    let env_config = BattleEnvConfig::default().pokemon1(pkm.clone()).pokemon2(pkm);
    let mut env = BattleEnv::build(&env_config, 3)?;

    let mut prev_obs = env.reset(None)?;
    let mut prev_total = 0f32;

    for i in 0..12 {
        let (step, _) = env.step(&BattleAct::new(i % 3))?;
        assert!(!step.is_done());
        let transition = Transition::from_step(prev_obs.clone(), &step, prev_total);

        // a non-terminal v0 step adds only the shaping term
        assert!(
            transition.reward == -1.0 || transition.reward == 0.0 || transition.reward == 1.0,
            "reward = {}",
            transition.reward
        );
        // the per-step rewards telescope back to the cumulative total
        assert_eq!(prev_total + transition.reward, step.reward[0]);

        prev_total = step.reward[0];
        prev_obs = step.obs;
    }

    Ok(())
}

#[test]
fn test_train_bandit_with_trainer() -> Result<()> {
    const MAX_OPTS: usize = 300;

    // the default v0 environment: 3 types, 3 moves
    let env_config = BattleEnvConfig::default();
    let bandit_config = ContextualBanditConfig::default()
        .n_arms(3)
        .context_dims(vec![3])
        .epsilon(0.2);
    let mut agent: ContextualBandit<BattleEnv> = ContextualBandit::build(bandit_config);

    let trainer_config = TrainerConfig::default()
        .max_opts(MAX_OPTS)
        .opt_interval(1)
        .eval_interval(150)
        .flush_record_interval(150);
    let mut trainer = Trainer::<BattleEnv>::build(trainer_config, env_config.clone());
    let mut recorder = BufferedRecorder::new();
    let mut evaluator: DefaultEvaluator<BattleEnv, ContextualBandit<BattleEnv>> =
        DefaultEvaluator::new(&env_config, 1, 10)?;

    trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

    // every optimization step updated exactly one arm
    let total_count: f32 = (0..3).map(|a| agent.action_count(a)).sum();
    assert_eq!(total_count, MAX_OPTS as f32);

    // per-step rewards are the shaping term, or the survivor's health on
    // the terminal step, so the running means stay within those bounds
    for context in 0..3 {
        for arm in 0..3 {
            let v = agent.value(arm, &[context]);
            assert!((-1.0..=100.0).contains(&v), "value = {}", v);
        }
    }

    Ok(())
}
