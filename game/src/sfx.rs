use std::time::Duration;

use crate::piece::PieceKind;
use crate::tetris_core::GameEvent;

/// Volume constants (0.0..=1.0) shared by the headful client and tests.
pub const LOCK_SFX_VOLUME: f32 = 0.25;
pub const LINE_CLEAR_SFX_VOLUME: f32 = 0.45;
pub const GAME_OVER_SFX_VOLUME: f32 = 0.5;

/// A short synthesized tone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cue {
    pub freq_hz: f32,
    pub duration: Duration,
    pub volume: f32,
}

pub fn cue_for_event(event: &GameEvent) -> Cue {
    match *event {
        GameEvent::PieceLocked(kind) => Cue {
            // Each piece gets its own pitch so stacks are audible.
            freq_hz: 196.0 + 22.0 * f32::from(kind.color_id()),
            duration: Duration::from_millis(40),
            volume: LOCK_SFX_VOLUME,
        },
        GameEvent::LinesCleared(rows) => Cue {
            freq_hz: 523.25 * (1.0 + 0.25 * rows.saturating_sub(1).min(3) as f32),
            duration: Duration::from_millis(90 + 30 * u64::from(rows.min(4))),
            volume: LINE_CLEAR_SFX_VOLUME,
        },
        GameEvent::GameOver => Cue {
            freq_hz: 110.0,
            duration: Duration::from_millis(600),
            volume: GAME_OVER_SFX_VOLUME,
        },
    }
}
