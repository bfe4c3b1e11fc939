//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Map keyboard input to game actions.
///
/// Arrow keys are the primary binding; vi keys (`hjkl`) and `wasd` are aliases.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    match key.code {
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('a') | KeyCode::Char('A') => {
            Some(GameAction::MoveLeft)
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') | KeyCode::Char('d') | KeyCode::Char('D') => {
            Some(GameAction::MoveRight)
        }
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(GameAction::MoveUp)
        }
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') | KeyCode::Char('s') | KeyCode::Char('S') => {
            Some(GameAction::MoveDown)
        }

        // New game
        KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('n') | KeyCode::Char('N') => {
            Some(GameAction::Restart)
        }

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> Option<GameAction> {
        handle_key_event(KeyEvent::from(code))
    }

    #[test]
    fn every_direction_has_arrow_vi_and_wasd_bindings() {
        let table = [
            (GameAction::MoveLeft, [KeyCode::Left, KeyCode::Char('h'), KeyCode::Char('A')]),
            (GameAction::MoveRight, [KeyCode::Right, KeyCode::Char('L'), KeyCode::Char('d')]),
            (GameAction::MoveUp, [KeyCode::Up, KeyCode::Char('k'), KeyCode::Char('W')]),
            (GameAction::MoveDown, [KeyCode::Down, KeyCode::Char('J'), KeyCode::Char('s')]),
        ];
        for (action, codes) in table {
            for code in codes {
                assert_eq!(press(code), Some(action), "{code:?}");
            }
        }
    }

    #[test]
    fn restart_keys_and_unmapped_keys() {
        assert_eq!(press(KeyCode::Char('r')), Some(GameAction::Restart));
        assert_eq!(press(KeyCode::Char('N')), Some(GameAction::Restart));
        for code in [KeyCode::Char(' '), KeyCode::Enter, KeyCode::Char('x'), KeyCode::Tab] {
            assert_eq!(press(code), None, "{code:?}");
        }
    }

    #[test]
    fn quit_on_q_escape_and_ctrl_c() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::from(KeyCode::Esc)));
        assert!(should_quit(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert!(!should_quit(KeyEvent::from(KeyCode::Left)));
    }
}
