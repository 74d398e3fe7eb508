use log::{debug, trace};
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};

use super::{
    action::Direction,
    config::GameConfig,
    error::GameError,
    state::{CollisionType, GridState, Position, Snake},
};

/// Score added for every fruit eaten
pub const SCORE_PER_FRUIT: u32 = 10;

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate fruit this step
    pub ate_fruit: bool,
    /// Type of collision if one occurred
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: i32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all state transitions
///
/// Owns the random generator used for fruit placement, so a seeded engine
/// replays the same episode for the same actions.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self { config, rng })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GridState {
        let snake = Snake::new(
            self.config.start,
            Direction::Right,
            self.config.initial_length,
            self.config.cell_size,
        );

        let mut state = GridState::new(
            snake,
            None,
            self.config.width,
            self.config.height,
            self.config.cell_size,
        );
        state.fruit = self.place_fruit(&state);

        state
    }

    /// Decode an action index and execute one step
    pub fn step_index(
        &mut self,
        state: &mut GridState,
        action: usize,
    ) -> Result<StepResult, GameError> {
        let direction = Direction::from_index(action)?;
        Ok(self.step(state, direction))
    }

    /// Execute one step of the game
    ///
    /// A finished state is left untouched; the caller has to reset it.
    pub fn step(&mut self, state: &mut GridState, requested: Direction) -> StepResult {
        if !state.is_alive {
            return StepResult {
                reward: 0,
                terminated: true,
                info: StepInfo::default(),
            };
        }

        // A reversal would put the head on the neck
        if !state.snake.direction.is_opposite(requested) {
            state.snake.direction = requested;
        }

        let new_head = state
            .snake
            .head()
            .moved_in_direction(state.snake.direction, state.cell_size);
        let ate_fruit = state.fruit == Some(new_head);

        state.snake.move_snake(ate_fruit, state.cell_size);
        state.steps += 1;

        let mut reward = 0;
        if ate_fruit {
            state.score += SCORE_PER_FRUIT;
            reward += self.config.fruit_reward;
            state.fruit = self.place_fruit(state);

            match state.fruit {
                Some(fruit) => debug!(
                    "fruit eaten at ({}, {}), score {}, next fruit at ({}, {})",
                    new_head.x, new_head.y, state.score, fruit.x, fruit.y
                ),
                None => debug!("board full after {} steps, no fruit placed", state.steps),
            }
        }

        if let Some(collision_type) = state.collision_at_head() {
            state.is_alive = false;
            debug!(
                "episode over: {:?} at ({}, {}) after {} steps, score {}",
                collision_type, new_head.x, new_head.y, state.steps, state.score
            );

            return StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                info: StepInfo {
                    ate_fruit,
                    collision_type: Some(collision_type),
                },
            };
        }

        reward += self.config.survival_reward;
        trace!(
            "step {}: head ({}, {}) {:?}, reward {}",
            state.steps, new_head.x, new_head.y, state.snake.direction, reward
        );

        StepResult {
            reward,
            terminated: false,
            info: StepInfo {
                ate_fruit,
                collision_type: None,
            },
        }
    }

    /// Pick a uniformly random free cell, `None` when the board is full
    fn place_fruit(&mut self, state: &GridState) -> Option<Position> {
        state.free_cells().choose(&mut self.rng).copied()
    }
}
