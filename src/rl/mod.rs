//! Reinforcement learning interface for the Snake game
//!
//! Provides:
//! - 9-element feature vector observations
//! - The `reset` / `step` environment contract
//! - A configurable Q-network and policies that drive the environment
//! - Saving and loading network weights

pub mod backend;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod policy;

pub use backend::{InferenceBackend, default_device};
pub use environment::SnakeEnvironment;
pub use network::{Activation, Dqn, DqnConfig};
pub use observation::{OBSERVATION_SIZE, Observation, encode, observations_to_tensor};
pub use persistence::{NetworkMetadata, load_network, save_network};
pub use policy::{GreedyPolicy, Policy, RandomPolicy};
