use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::GameError;
use super::state::Position;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width in board units
    pub width: i32,
    /// Board height in board units
    pub height: i32,
    /// Size of one grid cell; every coordinate is a multiple of it
    pub cell_size: i32,
    /// Initial length of the snake
    pub initial_length: usize,
    /// Head position of a freshly reset snake
    pub start: Position,

    // Rewards (for RL)
    /// Score and reward for eating fruit
    pub fruit_reward: i32,
    /// Reward for every step survived
    pub survival_reward: i32,
    /// Reward for hitting a wall or the snake's own body
    pub death_penalty: i32,

    /// Seed for fruit placement; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 720,
            height: 480,
            cell_size: 10,
            initial_length: 3,
            start: Position::new(100, 50),
            fruit_reward: 10,
            survival_reward: 1,
            death_penalty: -10,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom board size
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Create a small board for testing
    pub fn small() -> Self {
        Self {
            start: Position::new(50, 50),
            ..Self::new(100, 100)
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of cell columns on the board
    pub fn columns(&self) -> i32 {
        self.width / self.cell_size
    }

    /// Number of cell rows on the board
    pub fn rows(&self) -> i32 {
        self.height / self.cell_size
    }

    /// Load a configuration from a JSON file
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read game config from {:?}", path))?;
        let config: GameConfig =
            serde_json::from_str(&json).context("Failed to deserialize game config")?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce a valid starting state
    pub fn validate(&self) -> Result<(), GameError> {
        if self.cell_size <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }

        if self.width <= 0 || self.height <= 0 {
            return Err(GameError::InvalidConfig(format!(
                "board must have a positive size, got {}x{}",
                self.width, self.height
            )));
        }

        if self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return Err(GameError::InvalidConfig(format!(
                "board size {}x{} is not a multiple of cell_size {}",
                self.width, self.height, self.cell_size
            )));
        }

        if self.initial_length < 3 {
            return Err(GameError::InvalidConfig(format!(
                "initial_length must be at least 3, got {}",
                self.initial_length
            )));
        }

        if self.start.x % self.cell_size != 0 || self.start.y % self.cell_size != 0 {
            return Err(GameError::InvalidConfig(format!(
                "start ({}, {}) is not aligned to cell_size {}",
                self.start.x, self.start.y, self.cell_size
            )));
        }

        // The snake starts moving right, its body trails to the left of the head
        let tail_x = self.start.x - (self.initial_length as i32 - 1) * self.cell_size;
        if tail_x < 0
            || self.start.x > self.width - self.cell_size
            || self.start.y < 0
            || self.start.y > self.height - self.cell_size
        {
            return Err(GameError::InvalidConfig(format!(
                "starting snake of length {} at ({}, {}) does not fit a {}x{} board",
                self.initial_length, self.start.x, self.start.y, self.width, self.height
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 720);
        assert_eq!(config.height, 480);
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.initial_length, 3);
        assert_eq!(config.start, Position::new(100, 50));
        assert_eq!(config.columns(), 72);
        assert_eq!(config.rows(), 48);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(300, 200);
        assert_eq!(config.width, 300);
        assert_eq!(config.height, 200);
        assert!(config.validate().is_ok());
        assert!(GameConfig::small().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_geometry() {
        let mut config = GameConfig::new(725, 480);
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig(_))
        ));

        config = GameConfig::default();
        config.cell_size = 0;
        assert!(config.validate().is_err());

        config = GameConfig::default();
        config.initial_length = 2;
        assert!(config.validate().is_err());

        // Tail would start at x = -10
        config = GameConfig::default();
        config.start = Position::new(10, 50);
        assert!(config.validate().is_err());

        config = GameConfig::default();
        config.start = Position::new(720, 50);
        assert!(config.validate().is_err());

        config = GameConfig::default();
        config.start = Position::new(105, 50);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_json_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{ "width": 200, "height": 100, "seed": 7 }"#).unwrap();

        let config = GameConfig::from_json_file(&path).unwrap();
        assert_eq!(config.width, 200);
        assert_eq!(config.height, 100);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.fruit_reward, 10);
    }

    #[test]
    fn test_load_rejects_invalid_config() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.json");
        std::fs::write(&path, r#"{ "width": 15 }"#).unwrap();

        assert!(GameConfig::from_json_file(&path).is_err());
        assert!(GameConfig::from_json_file(&dir.path().join("missing.json")).is_err());
    }
}
