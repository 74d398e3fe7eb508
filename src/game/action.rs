use serde::{Deserialize, Serialize};

use super::error::GameError;

/// Number of discrete actions exposed to an agent
pub const NUM_ACTIONS: usize = 4;

/// Direction the snake can move
///
/// The declaration order is also the action index order: 0 Up, 1 Down,
/// 2 Left, 3 Right.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in action index order
    pub const ALL: [Direction; NUM_ACTIONS] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Decode a discrete action index
    pub fn from_index(index: usize) -> Result<Self, GameError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(GameError::InvalidAction(index))
    }

    /// Action index of this direction
    pub fn index(&self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Returns true if turning from self to other would be a 180-degree turn
    pub fn is_opposite(&self, other: Direction) -> bool {
        matches!(
            (self, other),
            (Direction::Up, Direction::Down)
                | (Direction::Down, Direction::Up)
                | (Direction::Left, Direction::Right)
                | (Direction::Right, Direction::Left)
        )
    }

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the unit delta (dx, dy) for moving in this direction
    ///
    /// Screen coordinates: y grows downwards.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

impl TryFrom<usize> for Direction {
    type Error = GameError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Direction::from_index(index)
    }
}
