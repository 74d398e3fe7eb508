use super::observation::{Observation, encode};
use crate::game::{GameConfig, GameEngine, GameError, GridState};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and provides the standard RL interface:
/// - 9-element feature vector observations
/// - Discrete action space (4 actions: Up, Down, Left, Right)
/// - `reset` / `step`, with no automatic reset after a terminal step
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GridState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        let mut engine = GameEngine::new(config)?;
        let state = engine.reset();
        Ok(Self { engine, state })
    }

    /// Reset the environment and return initial observation
    pub fn reset(&mut self) -> Observation {
        self.state = self.engine.reset();
        encode(&self.state)
    }

    /// Step the environment with a discrete action
    ///
    /// Actions:
    /// - 0: Move Up
    /// - 1: Move Down
    /// - 2: Move Left
    /// - 3: Move Right
    ///
    /// Returns: (observation, reward, done)
    ///
    /// Any other index fails with [`GameError::InvalidAction`] and leaves the
    /// episode untouched.
    pub fn step(&mut self, action: usize) -> Result<(Observation, f32, bool), GameError> {
        let step_result = self.engine.step_index(&mut self.state, action)?;

        Ok((
            encode(&self.state),
            step_result.reward as f32,
            step_result.terminated,
        ))
    }

    /// Get current observation without stepping
    pub fn observation(&self) -> Observation {
        encode(&self.state)
    }

    /// Get reference to current game state
    pub fn state(&self) -> &GridState {
        &self.state
    }

    /// Owned copy of the current state, for readers that outlive the next step
    pub fn snapshot(&self) -> GridState {
        self.state.clone()
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake};

    fn environment() -> SnakeEnvironment {
        SnakeEnvironment::new(GameConfig::default().with_seed(11)).unwrap()
    }

    #[test]
    fn test_environment_creation() {
        let env = environment();

        assert!(env.state().is_alive);
        assert_eq!(env.state().score, 0);
        assert_eq!(env.state().steps, 0);
    }

    #[test]
    fn test_reset_returns_valid_observation() {
        let mut env = environment();
        let obs = env.reset();

        // Moving right at (100, 50)
        assert_eq!(&obs[0..4], &[0.0, 0.0, 0.0, 1.0]);
        let fruit = env.state().fruit.unwrap();
        assert_eq!(obs[4], (fruit.x - 100) as f32);
        assert_eq!(obs[5], (fruit.y - 50) as f32);
        assert_eq!(obs, env.observation());
    }

    #[test]
    fn test_step_scenario_moving_right() {
        let mut env = environment();
        env.reset();
        env.state.fruit = Some(Position::new(400, 400));

        let (obs, reward, done) = env.step(3).unwrap();

        assert_eq!(
            env.state().snake.body,
            vec![
                Position::new(110, 50),
                Position::new(100, 50),
                Position::new(90, 50)
            ]
        );
        assert_eq!(reward, 1.0);
        assert!(!done);
        assert_eq!(obs[4], 290.0);
        assert_eq!(obs[5], 350.0);
    }

    #[test]
    fn test_invalid_action() {
        let mut env = environment();
        let before = env.snapshot();

        assert_eq!(env.step(4), Err(GameError::InvalidAction(4)));
        assert_eq!(env.state(), &before);
    }

    #[test]
    fn test_terminal_state_handling() {
        let mut env = environment();
        env.state.snake = Snake::new(Position::new(710, 50), Direction::Right, 3, 10);

        let (obs, reward, done) = env.step(3).unwrap();

        assert!(done);
        assert_eq!(reward, -10.0);
        assert!(!env.state().is_alive);
        assert_eq!(env.state().snake.head(), Position::new(720, 50));
        assert_eq!(obs[3], 1.0);

        // No automatic reset
        let (_, reward, done) = env.step(0).unwrap();
        assert!(done);
        assert_eq!(reward, 0.0);

        env.reset();
        assert!(env.state().is_alive);
    }

    #[test]
    fn test_fruit_reward() {
        let mut env = environment();
        let head = env.state().snake.head();
        env.state.fruit = Some(head.moved_in_direction(Direction::Right, 10));

        let (_, reward, done) = env.step(3).unwrap();

        assert!(!done);
        assert_eq!(reward, 11.0);
        assert_eq!(env.state().score, 10);
        assert_eq!(env.state().snake.len(), 4);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut env = environment();
        let snapshot = env.snapshot();

        env.step(1).unwrap();

        assert_eq!(snapshot.steps, 0);
        assert_eq!(env.state().steps, 1);
    }

    #[test]
    fn test_multiple_episodes() {
        let mut env = environment();

        // Heading up from y = 50 hits the wall within six steps
        for _ in 0..2 {
            env.reset();
            let mut steps = 0;
            let mut done = false;

            while !done && steps < 100 {
                let (_obs, _reward, terminated) = env.step(0).unwrap();
                done = terminated;
                steps += 1;
            }

            assert!(done);
            assert_eq!(steps, 6);
        }
    }
}
