use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::Board;
use crate::drop_clock::DropClock;
use crate::piece::RotationDir;
use crate::settings::GameConfig;
use crate::tetris_core::{GameEvent, HorizontalDir, TetrisCore};

/// Everything a player (or a script) can ask the game to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    RotateCw,
    RotateCcw,
    TogglePause,
    Restart,
}

/// One play session: the controller, its gravity clock, and the session-wide high score.
#[derive(Debug, Clone)]
pub struct GameState {
    tetris: TetrisCore,
    clock: DropClock,
    paused: bool,
    high_score: u32,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self::with_core(TetrisCore::new(seed))
    }

    pub fn from_config(config: &GameConfig, seed: u64) -> Self {
        let mut tetris = TetrisCore::with_board(Board::new(config.rows, config.cols), seed);
        tetris.set_rules(config.score);
        Self::with_core(tetris)
    }

    /// Wraps an already configured controller and starts a fresh game on it.
    pub fn with_core(mut tetris: TetrisCore) -> Self {
        tetris.initialize_game();
        // Nothing has been shown to a player yet; spawn noise is not worth reporting.
        tetris.drain_events();
        let clock = DropClock::new(tetris.rules().initial_drop_interval);
        Self {
            tetris,
            clock,
            paused: false,
            high_score: 0,
        }
    }

    pub fn tetris(&self) -> &TetrisCore {
        &self.tetris
    }

    pub fn tetris_mut(&mut self) -> &mut TetrisCore {
        &mut self.tetris
    }

    pub fn clock(&self) -> &DropClock {
        &self.clock
    }

    pub fn drop_interval(&self) -> Duration {
        self.clock.interval()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn is_game_over(&self) -> bool {
        self.tetris.is_game_over()
    }

    pub fn score(&self) -> u32 {
        self.tetris.score()
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    fn is_running(&self) -> bool {
        !self.paused && !self.tetris.is_game_over()
    }

    /// Single entry point for player intents. Returns the events the intent caused.
    pub fn apply(&mut self, intent: Intent) -> Vec<GameEvent> {
        match intent {
            Intent::Restart => {
                self.reset();
                return self.collect_events();
            }
            Intent::TogglePause => {
                self.toggle_pause();
                return Vec::new();
            }
            _ => {}
        }

        if !self.is_running() {
            return Vec::new();
        }

        match intent {
            Intent::MoveLeft => {
                self.tetris.move_horizontal(HorizontalDir::Left);
            }
            Intent::MoveRight => {
                self.tetris.move_horizontal(HorizontalDir::Right);
            }
            Intent::SoftDrop => {
                self.tetris.soft_drop();
                self.clock.reset();
            }
            Intent::HardDrop => {
                self.tetris.hard_drop();
                self.clock.reset();
            }
            Intent::RotateCw => {
                self.tetris.rotate(RotationDir::Cw);
            }
            Intent::RotateCcw => {
                self.tetris.rotate(RotationDir::Ccw);
            }
            Intent::TogglePause | Intent::Restart => {}
        }

        self.collect_events()
    }

    /// Advances gravity by `dt`. At most one soft drop happens per call.
    pub fn tick(&mut self, dt: Duration) -> Vec<GameEvent> {
        let running = self.is_running();
        if self.clock.tick_if_running(dt, running) {
            self.tetris.soft_drop();
        }
        self.collect_events()
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.tetris.is_game_over() || self.paused == paused {
            return;
        }
        self.paused = paused;
        info!(paused, "pause toggled");
    }

    pub fn toggle_pause(&mut self) {
        self.set_paused(!self.paused);
    }

    /// Starts over on the same board size and rules. The high score survives.
    pub fn reset(&mut self) {
        self.tetris.initialize_game();
        self.clock = DropClock::new(self.tetris.rules().initial_drop_interval);
        self.paused = false;
        info!(high_score = self.high_score, "game restarted");
    }

    fn collect_events(&mut self) -> Vec<GameEvent> {
        let events = self.tetris.drain_events();
        let rules = self.tetris.rules();
        for event in &events {
            if let GameEvent::LinesCleared(rows) = *event {
                let interval = rules.accelerate(self.clock.interval(), rows);
                self.clock.set_interval(interval);
            }
        }
        self.high_score = self.high_score.max(self.tetris.score());
        events
    }
}
