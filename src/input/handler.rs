use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Direction, InputEvent};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Queue for the next game tick
    Game(InputEvent),
    /// Leave the program
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
            KeyCode::Up => KeyAction::Game(InputEvent::Move(Direction::Up)),
            KeyCode::Down => KeyAction::Game(InputEvent::Move(Direction::Down)),
            KeyCode::Left => KeyAction::Game(InputEvent::Move(Direction::Left)),
            KeyCode::Right => KeyAction::Game(InputEvent::Move(Direction::Right)),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => {
                KeyAction::Game(InputEvent::Move(Direction::Up))
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                KeyAction::Game(InputEvent::Move(Direction::Down))
            }
            KeyCode::Char('a') | KeyCode::Char('A') => {
                KeyAction::Game(InputEvent::Move(Direction::Left))
            }
            KeyCode::Char('d') | KeyCode::Char('D') => {
                KeyAction::Game(InputEvent::Move(Direction::Right))
            }

            // Screens
            KeyCode::Enter
            | KeyCode::Char('p')
            | KeyCode::Char('P')
            | KeyCode::Char('r')
            | KeyCode::Char('R') => KeyAction::Game(InputEvent::StartGame),
            KeyCode::Char('h') | KeyCode::Char('H') => KeyAction::Game(InputEvent::ViewHighScores),
            KeyCode::Char('o') | KeyCode::Char('O') => {
                KeyAction::Game(InputEvent::ToggleObstacleMode)
            }
            KeyCode::Esc => KeyAction::Game(InputEvent::Cancel),

            KeyCode::Char('q') | KeyCode::Char('Q') => KeyAction::Quit,

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

    fn press(code: KeyCode) -> KeyAction {
        InputHandler::new().handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_arrow_keys() {
        assert_eq!(
            press(KeyCode::Up),
            KeyAction::Game(InputEvent::Move(Direction::Up))
        );
        assert_eq!(
            press(KeyCode::Down),
            KeyAction::Game(InputEvent::Move(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Left),
            KeyAction::Game(InputEvent::Move(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Right),
            KeyAction::Game(InputEvent::Move(Direction::Right))
        );
    }

    #[test]
    fn test_wasd_keys() {
        assert_eq!(
            press(KeyCode::Char('w')),
            KeyAction::Game(InputEvent::Move(Direction::Up))
        );
        assert_eq!(
            press(KeyCode::Char('a')),
            KeyAction::Game(InputEvent::Move(Direction::Left))
        );
        assert_eq!(
            press(KeyCode::Char('s')),
            KeyAction::Game(InputEvent::Move(Direction::Down))
        );
        assert_eq!(
            press(KeyCode::Char('D')),
            KeyAction::Game(InputEvent::Move(Direction::Right))
        );
    }

    #[test]
    fn test_screen_keys() {
        assert_eq!(press(KeyCode::Char('p')), KeyAction::Game(InputEvent::StartGame));
        assert_eq!(press(KeyCode::Enter), KeyAction::Game(InputEvent::StartGame));
        assert_eq!(press(KeyCode::Char('R')), KeyAction::Game(InputEvent::StartGame));
        assert_eq!(
            press(KeyCode::Char('h')),
            KeyAction::Game(InputEvent::ViewHighScores)
        );
        assert_eq!(
            press(KeyCode::Char('o')),
            KeyAction::Game(InputEvent::ToggleObstacleMode)
        );
        assert_eq!(press(KeyCode::Esc), KeyAction::Game(InputEvent::Cancel));
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(press(KeyCode::Char('q')), KeyAction::Quit);

        let handler = InputHandler::new();
        let q_upper = KeyEvent::new(KeyCode::Char('Q'), KeyModifiers::SHIFT);
        assert_eq!(handler.handle_key_event(q_upper), KeyAction::Quit);
    }

    #[test]
    fn test_unknown_key() {
        assert_eq!(press(KeyCode::Char('x')), KeyAction::None);
    }

    #[test]
    fn test_ctrl_c() {
        let handler = InputHandler::new();

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(handler.handle_key_event(ctrl_c), KeyAction::Quit);
    }
}
