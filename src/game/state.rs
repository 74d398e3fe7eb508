use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::action::Direction;

/// A position on the board, in board units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Move position one cell in a direction
    pub fn moved_in_direction(&self, direction: Direction, cell_size: i32) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx * cell_size, dy * cell_size)
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Create a new snake with its body trailing behind the head
    pub fn new(head: Position, direction: Direction, length: usize, cell_size: i32) -> Self {
        let mut body = vec![head];

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(prev.moved_in_direction(back, cell_size));
        }

        Self { body, direction }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Move snake one cell in current direction, growing if should_grow is true
    pub fn move_snake(&mut self, should_grow: bool, cell_size: i32) {
        let new_head = self.head().moved_in_direction(self.direction, cell_size);
        self.body.insert(0, new_head);

        if !should_grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Type of collision that occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake left the board
    Wall,
    /// Snake hit itself
    SelfCollision,
}

/// Complete game state
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    pub snake: Snake,
    /// Current fruit, `None` once the snake fills the whole board
    pub fruit: Option<Position>,
    pub width: i32,
    pub height: i32,
    pub cell_size: i32,
    /// Points from fruit eaten this episode
    pub score: u32,
    pub steps: u32,
    pub is_alive: bool,
}

impl GridState {
    pub fn new(
        snake: Snake,
        fruit: Option<Position>,
        width: i32,
        height: i32,
        cell_size: i32,
    ) -> Self {
        Self {
            snake,
            fruit,
            width,
            height,
            cell_size,
            score: 0,
            steps: 0,
            is_alive: true,
        }
    }

    /// Check if a cell lies on the board
    pub fn is_in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.x <= self.width - self.cell_size
            && pos.y >= 0
            && pos.y <= self.height - self.cell_size
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.body.contains(&pos)
    }

    /// Collision at the current head, walls first
    pub fn collision_at_head(&self) -> Option<CollisionType> {
        let head = self.snake.head();

        if !self.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if self.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Collision that moving one cell in `direction` would cause
    ///
    /// Evaluated against the body as it would look after the move: the tail
    /// only stays in place when the move lands on the fruit.
    pub fn lookahead(&self, direction: Direction) -> Option<CollisionType> {
        let next = self.snake.head().moved_in_direction(direction, self.cell_size);

        if !self.is_in_bounds(next) {
            return Some(CollisionType::Wall);
        }

        let grows = self.fruit == Some(next);
        let kept = if grows {
            self.snake.len()
        } else {
            self.snake.len() - 1
        };

        if self.snake.body[..kept].contains(&next) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }

    /// Every board cell not covered by the snake, row by row
    pub fn free_cells(&self) -> Vec<Position> {
        let occupied: HashSet<Position> = self.snake.body.iter().copied().collect();
        let step = self.cell_size as usize;

        (0..self.height)
            .step_by(step)
            .flat_map(|y| (0..self.width).step_by(step).map(move |x| Position::new(x, y)))
            .filter(|pos| !occupied.contains(pos))
            .collect()
    }
}
