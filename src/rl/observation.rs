use burn::tensor::{Tensor, TensorData, backend::Backend};

use crate::game::GridState;

/// Length of the encoded state vector
pub const OBSERVATION_SIZE: usize = 9;

/// Fixed-length feature vector handed to an agent
pub type Observation = [f32; OBSERVATION_SIZE];

const DANGER_STRAIGHT: usize = 6;

/// Encode a game state as a feature vector
///
/// Layout:
/// - 0..=3: one-hot direction (Up, Down, Left, Right)
/// - 4..=5: fruit minus head, x then y, in board units (zero when no fruit is left)
/// - 6: 1.0 if one more step straight ahead would end the episode
/// - 7: danger left, reserved (always 0.0)
/// - 8: danger right, reserved (always 0.0)
pub fn encode(state: &GridState) -> Observation {
    let mut observation = [0.0; OBSERVATION_SIZE];

    let direction = state.snake.direction;
    observation[direction.index()] = 1.0;

    let head = state.snake.head();
    if let Some(fruit) = state.fruit {
        observation[4] = (fruit.x - head.x) as f32;
        observation[5] = (fruit.y - head.y) as f32;
    }

    if state.lookahead(direction).is_some() {
        observation[DANGER_STRAIGHT] = 1.0;
    }

    observation
}

/// Stack observations into a `[batch, OBSERVATION_SIZE]` tensor
pub fn observations_to_tensor<B: Backend>(
    observations: &[Observation],
    device: &B::Device,
) -> Tensor<B, 2> {
    let data: Vec<f32> = observations.iter().flatten().copied().collect();
    let tensor_data = TensorData::new(data, [observations.len(), OBSERVATION_SIZE]);

    Tensor::<B, 2>::from_data(tensor_data, device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Direction, Position, Snake};
    use burn::backend::NdArray;
    use burn::backend::ndarray::NdArrayDevice;

    type TestBackend = NdArray<f32>;

    fn state(head: Position, direction: Direction, fruit: Option<Position>) -> GridState {
        GridState::new(Snake::new(head, direction, 3, 10), fruit, 720, 480, 10)
    }

    #[test]
    fn test_direction_one_hot() {
        for direction in Direction::ALL {
            let obs = encode(&state(Position::new(300, 300), direction, None));
            let one_hot = &obs[0..4];

            assert_eq!(one_hot.iter().sum::<f32>(), 1.0);
            assert_eq!(one_hot[direction.index()], 1.0);
        }
    }

    #[test]
    fn test_fruit_delta_is_signed_and_unnormalized() {
        let obs = encode(&state(
            Position::new(100, 50),
            Direction::Right,
            Some(Position::new(30, 200)),
        ));

        assert_eq!(obs[4], -70.0);
        assert_eq!(obs[5], 150.0);
    }

    #[test]
    fn test_missing_fruit_encodes_zero_delta() {
        let obs = encode(&state(Position::new(100, 50), Direction::Right, None));
        assert_eq!(obs[4], 0.0);
        assert_eq!(obs[5], 0.0);
    }

    #[test]
    fn test_initial_state_encoding() {
        let obs = encode(&state(
            Position::new(100, 50),
            Direction::Right,
            Some(Position::new(200, 100)),
        ));

        assert_eq!(obs, [0.0, 0.0, 0.0, 1.0, 100.0, 50.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_danger_straight_at_wall() {
        let obs = encode(&state(Position::new(710, 50), Direction::Right, None));
        assert_eq!(obs[DANGER_STRAIGHT], 1.0);

        let obs = encode(&state(Position::new(100, 0), Direction::Up, None));
        assert_eq!(obs[DANGER_STRAIGHT], 1.0);

        let obs = encode(&state(Position::new(700, 50), Direction::Right, None));
        assert_eq!(obs[DANGER_STRAIGHT], 0.0);
    }

    #[test]
    fn test_danger_straight_at_body() {
        // Head (40,60) moving Up into (40,50), which stays part of the body
        let snake = Snake {
            body: vec![
                Position::new(40, 60),
                Position::new(50, 60),
                Position::new(50, 50),
                Position::new(40, 50),
                Position::new(30, 50),
            ],
            direction: Direction::Up,
        };
        let state = GridState::new(snake, None, 720, 480, 10);

        assert_eq!(encode(&state)[DANGER_STRAIGHT], 1.0);
    }

    #[test]
    fn test_reserved_slots_stay_zero() {
        let cases = [
            state(Position::new(710, 50), Direction::Right, None),
            state(Position::new(0, 0), Direction::Up, Some(Position::new(300, 300))),
            state(Position::new(300, 300), Direction::Left, Some(Position::new(0, 0))),
        ];

        for case in cases {
            let obs = encode(&case);
            assert_eq!(obs[7], 0.0);
            assert_eq!(obs[8], 0.0);
        }
    }

    #[test]
    fn test_observations_to_tensor() {
        let device = NdArrayDevice::default();
        let first = encode(&state(
            Position::new(100, 50),
            Direction::Right,
            Some(Position::new(200, 100)),
        ));
        let second = encode(&state(Position::new(710, 50), Direction::Right, None));

        let tensor = observations_to_tensor::<TestBackend>(&[first, second], &device);
        assert_eq!(tensor.dims(), [2, OBSERVATION_SIZE]);

        let data = tensor.to_data();
        let values = data.as_slice::<f32>().unwrap();
        assert_eq!(&values[..OBSERVATION_SIZE], &first);
        assert_eq!(&values[OBSERVATION_SIZE..], &second);
    }
}
