pub mod board;
pub mod drop_clock;
pub mod input;
pub mod logic;
pub mod piece;
pub mod scoring;
pub mod serde_duration;
pub mod settings;
pub mod sfx;
pub mod state;
pub mod tetris_core;
pub mod view;
