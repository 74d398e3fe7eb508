use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::Direction;

/// What a key press asks the running mode to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Move(Direction),
    Pause,
    Restart,
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => KeyAction::Move(Direction::Up),
            KeyCode::Down => KeyAction::Move(Direction::Down),
            KeyCode::Left => KeyAction::Move(Direction::Left),
            KeyCode::Right => KeyAction::Move(Direction::Right),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => KeyAction::Move(Direction::Up),
            KeyCode::Char('s') | KeyCode::Char('S') => KeyAction::Move(Direction::Down),
            KeyCode::Char('a') | KeyCode::Char('A') => KeyAction::Move(Direction::Left),
            KeyCode::Char('d') | KeyCode::Char('D') => KeyAction::Move(Direction::Right),

            // Controls
            KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => KeyAction::Pause,
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => KeyAction::Quit,
            KeyCode::Char('r') | KeyCode::Char('R') => KeyAction::Restart,

            _ => KeyAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(handler: &InputHandler, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        handler.handle_key_event(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn test_movement_keys() {
        let handler = InputHandler::new();
        let bindings = [
            (KeyCode::Up, Direction::Up),
            (KeyCode::Down, Direction::Down),
            (KeyCode::Left, Direction::Left),
            (KeyCode::Right, Direction::Right),
            (KeyCode::Char('w'), Direction::Up),
            (KeyCode::Char('s'), Direction::Down),
            (KeyCode::Char('a'), Direction::Left),
            (KeyCode::Char('d'), Direction::Right),
        ];

        for (code, direction) in bindings {
            assert_eq!(
                press(&handler, code, KeyModifiers::NONE),
                KeyAction::Move(direction)
            );
        }
    }

    #[test]
    fn test_wasd_uppercase() {
        let handler = InputHandler::new();

        assert_eq!(
            press(&handler, KeyCode::Char('W'), KeyModifiers::SHIFT),
            KeyAction::Move(Direction::Up)
        );
        assert_eq!(
            press(&handler, KeyCode::Char('D'), KeyModifiers::SHIFT),
            KeyAction::Move(Direction::Right)
        );
    }

    #[test]
    fn test_control_keys() {
        let handler = InputHandler::new();
        let bindings = [
            (KeyCode::Char('q'), KeyAction::Quit),
            (KeyCode::Char('Q'), KeyAction::Quit),
            (KeyCode::Esc, KeyAction::Quit),
            (KeyCode::Char('r'), KeyAction::Restart),
            (KeyCode::Char('R'), KeyAction::Restart),
            (KeyCode::Char(' '), KeyAction::Pause),
            (KeyCode::Char('p'), KeyAction::Pause),
            (KeyCode::Char('x'), KeyAction::None),
        ];

        for (code, expected) in bindings {
            assert_eq!(press(&handler, code, KeyModifiers::NONE), expected);
        }
    }

    #[test]
    fn test_moves_map_to_action_indices() {
        let handler = InputHandler::new();
        let keys = [KeyCode::Up, KeyCode::Down, KeyCode::Left, KeyCode::Right];

        for (expected, code) in keys.into_iter().enumerate() {
            match handler.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE)) {
                KeyAction::Move(direction) => assert_eq!(direction.index(), expected),
                other => panic!("unexpected key action {:?}", other),
            }
        }
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        assert_eq!(
            press(&handler, KeyCode::Char('c'), KeyModifiers::CONTROL),
            KeyAction::Quit
        );
    }
}
