//! Terminal presentation of the game state

pub mod renderer;

pub use renderer::{Controls, Renderer};
