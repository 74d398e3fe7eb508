use anyhow::{Context, Result};
use crossterm::event::{Event, EventStream, KeyEventKind};
use futures::StreamExt;
use log::info;
use tokio::time::interval;

use super::terminal::{TuiTerminal, restore_terminal, setup_terminal, tick_interval};
use crate::game::{Direction, GameConfig};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Controls, Renderer};
use crate::rl::SnakeEnvironment;

/// Keyboard play through the same environment an agent uses
pub struct HumanMode {
    env: SnakeEnvironment,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
    paused: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let env = SnakeEnvironment::new(config).context("Failed to create environment")?;

        Ok(Self {
            env,
            metrics: GameMetrics::new(),
            renderer: Renderer::new("Snake", Controls::Human),
            input_handler: InputHandler::new(),
            should_quit: false,
            paused: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = setup_terminal()?;

        let result = self.run_game_loop(&mut terminal).await;

        restore_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(&mut self, terminal: &mut TuiTerminal) -> Result<()> {
        let mut event_stream = EventStream::new();
        let mut tick_timer = interval(tick_interval());

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                // Step, then draw the settled state
                _ = tick_timer.tick() => {
                    self.update_game()?;
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
            // Only process key press events, not release
            if key.kind != KeyEventKind::Press {
                return;
            }

            match self.input_handler.handle_key_event(key) {
                KeyAction::Move(direction) => {
                    self.pending_direction = Some(direction);
                }
                KeyAction::Pause => {
                    self.paused = !self.paused;
                }
                KeyAction::Restart => {
                    self.reset_game();
                }
                KeyAction::Quit => {
                    self.should_quit = true;
                }
                KeyAction::None => {}
            }
        }
    }

    fn update_game(&mut self) -> Result<()> {
        if self.paused || !self.env.state().is_alive {
            return Ok(());
        }

        // No key pressed this tick: keep heading the same way
        let direction = self
            .pending_direction
            .take()
            .unwrap_or(self.env.state().snake.direction);

        let (_observation, reward, done) = self.env.step(direction.index())?;
        self.metrics.on_step(reward);

        if done {
            let state = self.env.state();
            self.metrics.on_game_over(state.score, state.steps);
            info!("game over: score {} after {} steps", state.score, state.steps);
        }

        Ok(())
    }

    fn reset_game(&mut self) {
        self.env.reset();
        self.metrics.on_game_start();
        self.pending_direction = None;
        self.paused = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default().with_seed(1)).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert!(mode.env.state().is_alive);
        assert_eq!(mode.env.state().score, 0);
    }

    #[test]
    fn test_pending_direction_is_applied_once() {
        let mut mode = mode();
        mode.pending_direction = Some(Direction::Down);

        mode.update_game().unwrap();
        assert_eq!(mode.env.state().snake.direction, Direction::Down);
        assert_eq!(mode.env.state().snake.head(), Position::new(100, 60));
        assert_eq!(mode.pending_direction, None);

        mode.update_game().unwrap();
        assert_eq!(mode.env.state().snake.head(), Position::new(100, 70));
    }

    #[test]
    fn test_pause_freezes_the_game() {
        let mut mode = mode();
        mode.paused = true;

        mode.update_game().unwrap();

        assert_eq!(mode.env.state().steps, 0);
    }

    #[test]
    fn test_game_over_is_recorded_and_reset() {
        let mut mode = mode();
        mode.pending_direction = Some(Direction::Up);

        // y = 50 reaches the top wall on the sixth step
        for _ in 0..6 {
            mode.update_game().unwrap();
        }
        assert!(!mode.env.state().is_alive);
        assert_eq!(mode.metrics.games_played, 1);

        // A finished game ignores further ticks
        mode.update_game().unwrap();
        assert_eq!(mode.metrics.games_played, 1);

        mode.reset_game();
        assert!(mode.env.state().is_alive);
        assert_eq!(mode.env.state().score, 0);
    }
}
