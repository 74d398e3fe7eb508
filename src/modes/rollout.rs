//! Headless evaluation of a policy over many episodes

use anyhow::{Context, Result};
use log::{debug, info};

use crate::game::GameConfig;
use crate::metrics::GameMetrics;
use crate::rl::{Policy, SnakeEnvironment};

/// Totals over a finished rollout
#[derive(Debug, Clone, PartialEq)]
pub struct RolloutSummary {
    pub episodes: u32,
    pub high_score: u32,
    pub mean_score: f64,
    pub mean_steps: f64,
    pub total_reward: f64,
    /// Episodes cut off by the step limit rather than a collision
    pub truncated: u32,
}

/// Runs episodes back to back without rendering
pub struct RolloutMode {
    env: SnakeEnvironment,
    policy: Box<dyn Policy>,
    episodes: usize,
    max_steps: u32,
}

impl RolloutMode {
    pub fn new(
        config: GameConfig,
        policy: Box<dyn Policy>,
        episodes: usize,
        max_steps: u32,
    ) -> Result<Self> {
        let env = SnakeEnvironment::new(config).context("Failed to create environment")?;

        Ok(Self {
            env,
            policy,
            episodes,
            max_steps,
        })
    }

    pub fn run(&mut self) -> Result<RolloutSummary> {
        let mut metrics = GameMetrics::new();
        let mut truncated = 0;

        for episode in 1..=self.episodes {
            let mut observation = self.env.reset();
            let mut done = false;

            while !done && self.env.state().steps < self.max_steps {
                let action = self.policy.select_action(&observation);
                let (next_observation, reward, terminated) = self.env.step(action)?;
                metrics.on_step(reward);
                observation = next_observation;
                done = terminated;
            }

            let state = self.env.state();
            if !done {
                truncated += 1;
                debug!("episode {} hit the step limit of {}", episode, self.max_steps);
            }
            metrics.on_game_over(state.score, state.steps);
            info!(
                "episode {}/{}: score {}, steps {}",
                episode, self.episodes, state.score, state.steps
            );
        }

        Ok(RolloutSummary {
            episodes: metrics.games_played,
            high_score: metrics.high_score,
            mean_score: metrics.mean_score(),
            mean_steps: metrics.mean_steps(),
            total_reward: metrics.total_reward,
            truncated,
        })
    }

    pub fn policy_name(&self) -> &'static str {
        self.policy.name()
    }
}
