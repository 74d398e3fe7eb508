//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! It can be driven programmatically for both human play and RL agents.

pub mod action;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, NUM_ACTIONS};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use error::GameError;
pub use state::{CollisionType, GridState, Position, Snake};
