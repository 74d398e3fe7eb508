//! Grid Snake - a deterministic Snake environment for reinforcement learning
//!
//! This library provides:
//! - Core game logic with seeded fruit placement (game module)
//! - The agent-facing environment, state encoder and Q-network (rl module)
//! - TUI rendering and keyboard input (render, input modules)
//! - Human play, watched agents and headless rollouts (modes module)
//!
//! ```
//! use grid_snake::game::GameConfig;
//! use grid_snake::rl::SnakeEnvironment;
//!
//! let mut env = SnakeEnvironment::new(GameConfig::default().with_seed(0)).unwrap();
//! let observation = env.reset();
//! assert_eq!(observation.len(), 9);
//!
//! let (_observation, reward, done) = env.step(3).unwrap();
//! assert!(!done);
//! assert!(reward >= 1.0);
//! ```

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
