//! Watch a policy play
//!
//! # Controls
//!
//! - Space: Pause/unpause
//! - R: Restart the episode
//! - Q/Esc: Quit

use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use tokio::time::interval;

use super::terminal::{TuiTerminal, restore_terminal, setup_terminal, tick_interval};
use crate::game::GameConfig;
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Controls, Renderer};
use crate::rl::{Observation, Policy, SnakeEnvironment};

/// Rendered episodes driven by a [`Policy`]
pub struct AgentMode {
    env: SnakeEnvironment,
    policy: Box<dyn Policy>,
    observation: Observation,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    /// Quit after this many finished episodes
    max_episodes: Option<usize>,
    /// Cut an episode short after this many steps
    max_steps: u32,
}

impl AgentMode {
    pub fn new(
        config: GameConfig,
        policy: Box<dyn Policy>,
        max_episodes: Option<usize>,
        max_steps: u32,
    ) -> Result<Self> {
        let mut env = SnakeEnvironment::new(config).context("Failed to create environment")?;
        let observation = env.reset();
        let renderer = Renderer::new(format!("Snake - {} policy", policy.name()), Controls::Agent);

        Ok(Self {
            env,
            policy,
            observation,
            metrics: GameMetrics::new(),
            renderer,
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            max_episodes,
            max_steps,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_loop(&mut self, terminal: &mut TuiTerminal) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(tick_interval());

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                _ = tick_timer.tick() => {
                    if !self.paused {
                        self.tick()?;
                    }
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, self.env.state(), &self.metrics);
                    }).context("Failed to draw frame")?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        if let Event::Key(key) = event {
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Pause => self.paused = !self.paused,
                KeyAction::Restart => self.restart(),
                KeyAction::Quit => self.should_quit = true,
                KeyAction::Move(_) | KeyAction::None => {}
            }
        }
    }

    /// Advance one step, or start the next episode once the last one is over
    ///
    /// The finished board stays on screen for one tick before the reset.
    fn tick(&mut self) -> Result<()> {
        if self.should_quit {
            return Ok(());
        }

        if !self.env.state().is_alive {
            self.restart();
            return Ok(());
        }

        let action = self.policy.select_action(&self.observation);
        let (observation, reward, done) = self.env.step(action)?;
        self.observation = observation;
        self.metrics.on_step(reward);

        let state = self.env.state();
        if done || state.steps >= self.max_steps {
            let (score, steps) = (state.score, state.steps);
            self.metrics.on_game_over(score, steps);
            info!(
                "episode {} finished: score {}, steps {}{}",
                self.metrics.games_played,
                score,
                steps,
                if done { "" } else { " (step limit)" }
            );

            if self.episode_cap_reached() {
                self.should_quit = true;
            } else if !done {
                // Truncated episodes end here, the driver starts a fresh one
                self.restart();
            }
        }

        Ok(())
    }

    fn episode_cap_reached(&self) -> bool {
        self.max_episodes
            .is_some_and(|max| self.metrics.games_played as usize >= max)
    }

    fn restart(&mut self) {
        self.observation = self.env.reset();
        self.metrics.on_game_start();
    }
}
