use std::time::Duration;

use engine::GameLogic;

use crate::settings::GameConfig;
use crate::state::GameState;
use crate::tetris_core::GameEvent;

pub use crate::state::Intent;

/// One step of input for the headless runner: a player intent or a slice of wall time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Intent(Intent),
    Tick(Duration),
}

impl From<Intent> for Input {
    fn from(intent: Intent) -> Self {
        Input::Intent(intent)
    }
}

#[derive(Debug, Clone)]
pub struct BlockLogic {
    config: GameConfig,
    seed: u64,
}

impl BlockLogic {
    pub fn new(seed: u64) -> Self {
        Self::with_config(GameConfig::default(), seed)
    }

    pub fn with_config(config: GameConfig, seed: u64) -> Self {
        Self { config, seed }
    }
}

impl GameLogic for BlockLogic {
    type State = GameState;
    type Input = Input;
    type Event = GameEvent;

    fn initial_state(&self) -> Self::State {
        GameState::from_config(&self.config, self.seed)
    }

    fn step(&self, state: &mut Self::State, input: Self::Input) -> Vec<Self::Event> {
        match input {
            Input::Intent(intent) => state.apply(intent),
            Input::Tick(dt) => state.tick(dt),
        }
    }
}
