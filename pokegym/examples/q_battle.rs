use anyhow::Result;
use clap::Parser;
use pokegym_battle_env::{BattleEnv, BattleEnvConfig, OpponentMode, PokemonConfig, Variant};
use pokegym_core::{
    record::BufferedRecorder, Agent, Configurable, DefaultEvaluator, Evaluator as _, Trainer,
    TrainerConfig,
};
use pokegym_tabular_agent::qlearning::{EpsilonGreedy, QLearning, QLearningConfig};

const N_TYPES: usize = 4;
const GAMMA: f32 = 0.9;
const LR: f32 = 0.1;
const OPT_INTERVAL: usize = 1;
const MAX_OPTS: usize = 30000;
const EVAL_INTERVAL: usize = 1000;
const FINAL_STEP_EXPLORER: usize = 20000;
const N_EPISODES_PER_EVAL: usize = 100;
const MODEL_DIR: &str = "./pokegym/examples/model/q_battle";

type Evaluator = DefaultEvaluator<BattleEnv, QLearning<BattleEnv>>;

mod config {
    use super::*;

    fn types_map() -> Vec<String> {
        ["fire", "water", "grass", "electric"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn create_env_config() -> BattleEnvConfig {
        // The opponent in v1 always draws its random move from four moves,
        // so the type catalog must have four entries.
        BattleEnvConfig::default()
            .variant(Variant::V1)
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

    pub fn create_agent_config() -> QLearningConfig {
        QLearningConfig::default()
            .space_size(vec![N_TYPES, N_TYPES])
            .n_actions(N_TYPES)
            .gamma(GAMMA)
            .lr(LR)
            .explorer(EpsilonGreedy::with_final_step(FINAL_STEP_EXPLORER))
    }

    pub fn create_trainer_config(
        max_opts: usize,
        model_dir: &str,
        eval_interval: usize,
    ) -> TrainerConfig {
        TrainerConfig::default()
            .max_opts(max_opts)
            .opt_interval(OPT_INTERVAL)
            .eval_interval(eval_interval)
            .flush_record_interval(eval_interval)
            .save_interval(max_opts)
            .model_dir(model_dir)
    }
}

/// Train/eval Q-learning agent in the battle environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Train Q-learning agent, not evaluate
    #[arg(short, long, default_value_t = false)]
    train: bool,

    /// Evaluate Q-learning agent, not train
    #[arg(short, long, default_value_t = false)]
    eval: bool,
}

fn train(max_opts: usize, model_dir: &str, eval_interval: usize) -> Result<()> {
    let env_config = config::create_env_config();
    let mut trainer = Trainer::<BattleEnv>::build(
        config::create_trainer_config(max_opts, model_dir, eval_interval),
        env_config.clone(),
    );
    let mut agent = QLearning::build(config::create_agent_config());
    let mut recorder = BufferedRecorder::new();
    let mut evaluator = Evaluator::new(&env_config, 1, N_EPISODES_PER_EVAL)?;

    trainer.train(&mut agent, &mut recorder, &mut evaluator)?;

    Ok(())
}

fn eval(model_dir: &str) -> Result<()> {
    let env_config = config::create_env_config();
    let mut agent = {
        let mut agent = QLearning::<BattleEnv>::build(config::create_agent_config());
        agent.load(model_dir)?;
        agent.eval();
        agent
    };

    let reward = Evaluator::new(&env_config, 0, N_EPISODES_PER_EVAL)?.evaluate(&mut agent)?;
    println!("average return: {}", reward);

    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.train {
        train(MAX_OPTS, MODEL_DIR, EVAL_INTERVAL)?;
    } else if args.eval {
        eval(&(MODEL_DIR.to_owned() + "/best"))?;
    } else {
        train(MAX_OPTS, MODEL_DIR, EVAL_INTERVAL)?;
        eval(&(MODEL_DIR.to_owned() + "/best"))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{eval, train};
    use anyhow::Result;
    use tempdir::TempDir;

    #[test]
    fn test_q_battle() -> Result<()> {
        let tmp_dir = TempDir::new("q_battle")?;
        let model_dir = match tmp_dir.as_ref().to_str() {
            Some(s) => s,
            None => panic!("Failed to get string of temporary directory"),
        };
        train(100, model_dir, 50)?;
        eval(&(model_dir.to_owned() + "/best"))?;
        Ok(())
    }
}
