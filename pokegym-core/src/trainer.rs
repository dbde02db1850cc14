//! Train [`Agent`].
mod config;
use crate::{
    record::{Record, RecordValue::Scalar, Recorder},
    Agent, Env, Evaluator, Transition,
};
use anyhow::Result;
pub use config::TrainerConfig;
use log::info;

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Manages training loop and related objects.
///
/// # Training loop
///
/// Training loop looks like following:
///
/// 0. Given an agent implementing [`Agent`] and a recorder implementing
///    [`Recorder`].
/// 1. Build an instance of [`Env`] and reset it.
///    * Reset a counter of the environment steps: `env_steps = 0`
///    * Reset a counter of the optimization steps: `opt_steps = 0`
/// 2. Sample an action with the agent, do an environment step and create a
///    [`Transition`] from the step.
/// 3. `env_steps += 1`
/// 4. If `env_steps % opt_interval == 0`:
///     1. Do an optimization step for the agent with the transition.
///        * NOTE: the agent can skip an optimization step, for example when
///          it is in evaluation mode. In this case, the following steps are
///          skipped as well.
///     2. `opt_steps += 1`
///     3. If `opt_steps % eval_interval == 0`:
///         * Do an evaluation of the agent and add the result to the record
///          as `"eval_reward"`.
///         * If the evaluation result is the best so far, agent's parameters
///           are saved in directory `(model_dir)/best`.
///     4. If `opt_steps % save_interval == 0`, agent's parameters are saved
///        in directory `(model_dir)/(opt_steps)`.
///     5. If `opt_steps == max_opts`, finish training loop.
/// 5. Back to step 2.
///
/// # Interaction of objects
///
/// In [`Trainer::train()`] method, objects interact as shown below:
///
/// ```mermaid
/// graph LR
///     A[Agent]-->|Env::Act|B[Env]
///     B -->|Env::Obs|A
///     B -->|"Step&lt;E: Env&gt;"|C["Transition&lt;E: Env&gt;"]
///     C -->|"opt()"|A
/// ```
///
/// There is no replay buffer: each [`Transition`] is consumed by the agent
/// as soon as the environment produces it.
pub struct Trainer<E>
where
    E: Env,
{
    /// Configuration of the environment for training.
    env_config_train: E::Config,

    /// Where to save the trained model.
    model_dir: Option<String>,

    /// Interval of optimization in environment steps.
    opt_interval: usize,

    /// Interval of flushing records in optimization steps.
    flush_records_interval: usize,

    /// Interval of evaluation in optimization steps.
    eval_interval: usize,

    /// Interval of saving the model in optimization steps.
    save_interval: usize,

    /// The maximal number of optimization steps.
    max_opts: usize,

    /// Random seed of the training environment.
    seed: i64,
}

impl<E> Trainer<E>
where
    E: Env,
{
    /// Constructs a trainer.
    pub fn build(config: TrainerConfig, env_config_train: E::Config) -> Self {
        Self {
            env_config_train,
            model_dir: config.model_dir,
            opt_interval: config.opt_interval,
            flush_records_interval: config.flush_record_interval,
            eval_interval: config.eval_interval,
            save_interval: config.save_interval,
            max_opts: config.max_opts,
            seed: config.seed,
        }
    }

    fn save_model<A: Agent<E>>(agent: &A, model_dir: String) {
        match agent.save(&model_dir) {
            Ok(()) => info!("Saved the model in {:?}.", &model_dir),
            Err(_) => info!("Failed to save model in {:?}.", &model_dir),
        }
    }

    fn save_best_model<A: Agent<E>>(agent: &A, model_dir: String) {
        let model_dir = model_dir + "/best";
        Self::save_model(agent, model_dir);
    }

    fn save_model_with_steps<A: Agent<E>>(agent: &A, model_dir: String, steps: usize) {
        let model_dir = model_dir + format!("/{}", steps).as_str();
        Self::save_model(agent, model_dir);
    }

    /// Performs a training step.
    ///
    /// It performes an environment step once, creates a [`Transition`] and,
    /// if the number of environment steps reached the optimization interval
    /// `opt_interval`, performes an optimization step with it.
    ///
    /// The second return value in the tuple is if an optimization step was
    /// done (`true`).
    pub fn train_step<A: Agent<E>>(
        &mut self,
        agent: &mut A,
        env: &mut E,
        prev_obs: &mut E::Obs,
        prev_reward_total: &mut f32,
        env_steps: &mut usize,
        opt_steps: &mut usize,
    ) -> Result<(Record, bool)> {
        // Environment step
        let act = agent.sample(prev_obs);
        let (step, mut record) = env.step(&act)?;
        let transition = Transition::from_step(prev_obs.clone(), &step, *prev_reward_total);
        *env_steps += 1;

        // The environment reports the cumulative episode reward; the
        // running total restarts with the episode.
        if step.is_done() {
            *prev_obs = env.reset(None)?;
            *prev_reward_total = 0.0;
        } else {
            *prev_reward_total = step.reward[0];
            *prev_obs = step.obs;
        };

        // Optimization step
        if *env_steps % self.opt_interval != 0 {
            return Ok((record, false));
        }

        match agent.opt(&transition) {
            None => Ok((record, false)),
            Some(record_agent) => {
                *opt_steps += 1;
                record = record.merge(record_agent);
                Ok((record, true))
            }
        }
    }

    /// Train the agent.
    pub fn train<A, R, D>(&mut self, agent: &mut A, recorder: &mut R, evaluator: &mut D) -> Result<()>
    where
        A: Agent<E>,
        R: Recorder,
        D: Evaluator<E, A>,
    {
        let mut env = E::build(&self.env_config_train, self.seed)?;
        let mut prev_obs = env.reset(None)?;
        let mut prev_reward_total = 0f32;
        let mut max_eval_reward = f32::MIN;
        let mut env_steps: usize = 0;
        let mut opt_steps: usize = 0;
        agent.train();

        loop {
            let (mut record, is_opt) = self.train_step(
                agent,
                &mut env,
                &mut prev_obs,
                &mut prev_reward_total,
                &mut env_steps,
                &mut opt_steps,
            )?;

            // Postprocessing after each training step
            if is_opt {
                // Evaluation
                if opt_steps % self.eval_interval == 0 {
                    info!("Starts evaluation of the trained model");
                    agent.eval();
                    let eval_reward = evaluator.evaluate(agent)?;
                    agent.train();
                    record.insert("eval_reward", Scalar(eval_reward));

                    // Save the best model up to the current iteration
                    if eval_reward > max_eval_reward {
                        max_eval_reward = eval_reward;
                        if let Some(model_dir) = self.model_dir.as_ref() {
                            Self::save_best_model(agent, model_dir.clone())
                        }
                    }
                };

                // Save the current model
                if (self.save_interval > 0) && (opt_steps % self.save_interval == 0) {
                    if let Some(model_dir) = self.model_dir.as_ref() {
                        Self::save_model_with_steps(agent, model_dir.clone(), opt_steps);
                    }
                }

                // End loop
                if opt_steps == self.max_opts {
                    break;
                }
            }

            // Store record to the recorder
            if !record.is_empty() {
                recorder.store(record);
            }

            // Flush records
            if is_opt && ((opt_steps - 1) % self.flush_records_interval == 0) {
                recorder.flush(opt_steps as _);
            }
        }

        Ok(())
    }
}
