//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map keyboard input to game actions.
///
/// Layout: A/D move, S soft drop, W hard drop, Left/N rotate
/// counter-clockwise, Right/M rotate clockwise, E hold, Esc pause.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    match key.code {
        // Movement
        KeyCode::Char('a') | KeyCode::Char('A') => Some(GameAction::MoveLeft),
        KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameAction::SoftDrop),
        KeyCode::Char(' ') | KeyCode::Char('w') | KeyCode::Char('W') => {
            Some(GameAction::HardDrop)
        }

        // Rotation
        KeyCode::Left | KeyCode::Char('n') | KeyCode::Char('N') => Some(GameAction::RotateCcw),
        KeyCode::Right | KeyCode::Up | KeyCode::Char('m') | KeyCode::Char('M') => {
            Some(GameAction::RotateCw)
        }

        // Actions
        KeyCode::Char('e') | KeyCode::Char('E') => Some(GameAction::Hold),
        KeyCode::Esc => Some(GameAction::Pause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(GameAction::Restart),

        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Lines for the instructions screen, matching [`handle_key_event`].
pub const CONTROLS: [&str; 9] = [
    "A / D        move",
    "S / Down     soft drop",
    "W / Space    hard drop",
    "Left / N     rotate ccw",
    "Right / M    rotate cw",
    "E            hold",
    "Esc          pause",
    "R            restart",
    "Q            quit",
];
