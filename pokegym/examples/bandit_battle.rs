use anyhow::{anyhow, Result};
use clap::Parser;
use pokegym_battle_env::{BattleAct, BattleEnv, BattleEnvConfig};
use pokegym_core::{Configurable, Env as _};
use pokegym_tabular_agent::bandit::{ContextualBandit, ContextualBanditConfig};

const N_ARMS: usize = 3;
const N_TYPES: usize = 3;
const LOG_INTERVAL: usize = 1000;

/// Train a contextual bandit in the battle environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Number of training episodes
    #[arg(long, default_value_t = 10000)]
    episodes: usize,

    /// Exploration probability
    #[arg(long, default_value_t = 0.1)]
    epsilon: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let env_config = BattleEnvConfig::from_env_id("PokemonBattleEnv-v0")
        .ok_or_else(|| anyhow!("unknown environment id"))?;
    let mut env = BattleEnv::build(&env_config, 42)?;

    let bandit_config = ContextualBanditConfig::default()
        .n_arms(N_ARMS)
        .context_dims(vec![N_TYPES])
        .epsilon(args.epsilon);
    let mut bandit: ContextualBandit<BattleEnv> = ContextualBandit::build(bandit_config);

    let mut returns_sum = 0f32;
    for ep in 0..args.episodes {
        let mut obs = env.reset(None)?;
        let mut prev_total = 0f32;

        loop {
            let context = obs.as_slice().to_vec();
            let arm = bandit.select_action(&context);
            let (step, _) = env.step(&BattleAct::new(arm))?;

            // The environment reports the cumulative episode reward, while
            // the bandit estimates per-step rewards.
            let reward = step.reward[0] - prev_total;
            bandit.update(arm, &context, reward);
            prev_total = step.reward[0];

            if step.is_done() {
                returns_sum += step.reward[0];
                break;
            }
            obs = step.obs;
        }

        if (ep + 1) % LOG_INTERVAL == 0 {
            log::info!(
                "episode {}: average return {}",
                ep + 1,
                returns_sum / LOG_INTERVAL as f32
            );
            returns_sum = 0.0;
        }
    }

    for context in 0..N_TYPES {
        let values: Vec<f32> = (0..N_ARMS).map(|a| bandit.value(a, &[context])).collect();
        println!("context {}: arm values {:?}", context, values);
    }

    Ok(())
}
