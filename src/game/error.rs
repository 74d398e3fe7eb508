/// Errors raised by the simulation core
///
/// Collisions are not errors; they end the episode through the normal step
/// result.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Action index outside the discrete action space
    #[error("invalid action index {0}, expected 0..=3")]
    InvalidAction(usize),
    /// Configuration that cannot produce a valid starting state
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}
