use anyhow::{anyhow, Result};
use clap::Parser;
use pokegym_battle_env::{BattleAct, BattleEnv, BattleEnvConfig, BattleObs};
use pokegym_core::{Configurable, Env as _, Policy};
use serde::Deserialize;

#[derive(Clone, Deserialize)]
struct RandomPolicyConfig {
    pub n_acts: usize,
    pub seed: u64,
}

struct RandomPolicy {
    n_acts: usize,
    rng: fastrand::Rng,
}

impl Policy<BattleEnv> for RandomPolicy {
    fn sample(&mut self, _: &BattleObs) -> BattleAct {
        self.rng.usize(..self.n_acts).into()
    }
}

impl Configurable for RandomPolicy {
    type Config = RandomPolicyConfig;

    fn build(config: Self::Config) -> Self {
        Self {
            n_acts: config.n_acts,
            rng: fastrand::Rng::with_seed(config.seed),
        }
    }
}

/// Run a random policy in the battle environment
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Environment identifier
    #[arg(long, default_value = "PokemonBattleEnv-v0")]
    env_id: String,

    /// Number of episodes
    #[arg(long, default_value_t = 5)]
    episodes: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let env_config = BattleEnvConfig::from_env_id(&args.env_id)
        .ok_or_else(|| anyhow!("unknown environment id: {}", args.env_id))?;
    let mut env = BattleEnv::build(&env_config, 42)?;

    // The action space is the agent's moveset
    let mut policy = {
        let policy_config = RandomPolicyConfig {
            n_acts: env.pokemon1().moveset().len(),
            seed: 42,
        };
        RandomPolicy::build(policy_config)
    };

    for ep in 0..args.episodes {
        let mut obs = env.reset_with_index(ep)?;
        println!("Episode {}: {}", ep, env.render());

        loop {
            let act = policy.sample(&obs);
            let (step, record) = env.step(&act)?;
            println!(
                "  {} / {} => {}",
                record.get_string("agent_move")?,
                record.get_string("opponent_move")?,
                env.render()
            );
            if step.is_done() {
                println!("  return: {}", step.reward[0]);
                break;
            }
            obs = step.obs;
        }
    }

    Ok(())
}
