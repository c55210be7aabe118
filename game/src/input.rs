use serde::{Deserialize, Serialize};
use winit::event::VirtualKeyCode;

use crate::twenty48_core::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
}

impl InputAction {
    pub fn direction(self) -> Direction {
        match self {
            InputAction::MoveLeft => Direction::Left,
            InputAction::MoveRight => Direction::Right,
            InputAction::MoveUp => Direction::Up,
            InputAction::MoveDown => Direction::Down,
        }
    }
}

impl From<Direction> for InputAction {
    fn from(dir: Direction) -> Self {
        match dir {
            Direction::Left => InputAction::MoveLeft,
            Direction::Right => InputAction::MoveRight,
            Direction::Up => InputAction::MoveUp,
            Direction::Down => InputAction::MoveDown,
        }
    }
}

/// Keys that drive the home and game-over screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MenuCommand {
    Confirm,
    Quit,
}

pub fn map_key_to_action(key: VirtualKeyCode) -> Option<InputAction> {
    match key {
        VirtualKeyCode::Left | VirtualKeyCode::A => Some(InputAction::MoveLeft),
        VirtualKeyCode::Right | VirtualKeyCode::D => Some(InputAction::MoveRight),
        VirtualKeyCode::Up | VirtualKeyCode::W => Some(InputAction::MoveUp),
        VirtualKeyCode::Down | VirtualKeyCode::S => Some(InputAction::MoveDown),
        _ => None,
    }
}

pub fn map_key_to_command(key: VirtualKeyCode) -> Option<MenuCommand> {
    match key {
        VirtualKeyCode::Return | VirtualKeyCode::NumpadEnter => Some(MenuCommand::Confirm),
        VirtualKeyCode::Escape => Some(MenuCommand::Quit),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrows_and_wasd_map_to_moves() {
        assert_eq!(
            map_key_to_action(VirtualKeyCode::Left),
            Some(InputAction::MoveLeft)
        );
        assert_eq!(
            map_key_to_action(VirtualKeyCode::D),
            Some(InputAction::MoveRight)
        );
        assert_eq!(
            map_key_to_action(VirtualKeyCode::Up),
            Some(InputAction::MoveUp)
        );
        assert_eq!(
            map_key_to_action(VirtualKeyCode::S),
            Some(InputAction::MoveDown)
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        assert_eq!(map_key_to_action(VirtualKeyCode::Space), None);
        assert_eq!(map_key_to_action(VirtualKeyCode::Return), None);
        assert_eq!(map_key_to_command(VirtualKeyCode::Left), None);
    }

    #[test]
    fn menu_keys() {
        assert_eq!(
            map_key_to_command(VirtualKeyCode::Return),
            Some(MenuCommand::Confirm)
        );
        assert_eq!(
            map_key_to_command(VirtualKeyCode::NumpadEnter),
            Some(MenuCommand::Confirm)
        );
        assert_eq!(
            map_key_to_command(VirtualKeyCode::Escape),
            Some(MenuCommand::Quit)
        );
    }

    #[test]
    fn action_direction_round_trips() {
        for dir in Direction::ALL {
            assert_eq!(InputAction::from(dir).direction(), dir);
        }
    }
}
