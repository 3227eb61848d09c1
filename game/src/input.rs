use winit::event::VirtualKeyCode;

use crate::state::Intent;

pub fn map_key(key: VirtualKeyCode) -> Option<Intent> {
    match key {
        VirtualKeyCode::Left | VirtualKeyCode::A => Some(Intent::MoveLeft),
        VirtualKeyCode::Right | VirtualKeyCode::D => Some(Intent::MoveRight),
        VirtualKeyCode::Down | VirtualKeyCode::S => Some(Intent::SoftDrop),
        VirtualKeyCode::Up | VirtualKeyCode::W | VirtualKeyCode::X => Some(Intent::RotateCw),
        VirtualKeyCode::Z => Some(Intent::RotateCcw),
        VirtualKeyCode::Space => Some(Intent::HardDrop),
        VirtualKeyCode::P | VirtualKeyCode::Escape => Some(Intent::TogglePause),
        VirtualKeyCode::R => Some(Intent::Restart),
        _ => None,
    }
}

/// Whether holding the key down should keep firing the intent.
pub fn accepts_repeat(intent: Intent) -> bool {
    matches!(
        intent,
        Intent::MoveLeft | Intent::MoveRight | Intent::SoftDrop
    )
}
