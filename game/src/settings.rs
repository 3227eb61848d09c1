use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::{DEFAULT_COLS, DEFAULT_ROWS};
use crate::scoring::ScoreRules;

pub const MIN_BOARD_DIM: usize = 4;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioSettings {
    pub sfx_volume: f32,
    pub mute_all: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sfx_volume: 1.0,
            mute_all: false,
        }
    }
}

impl AudioSettings {
    pub fn clamp(mut self) -> Self {
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    pub fn effective_sfx_gain(self) -> f32 {
        if self.mute_all { 0.0 } else { self.sfx_volume }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameConfig {
    pub rows: usize,
    pub cols: usize,
    pub score: ScoreRules,
    pub seed: Option<u64>,
    pub audio: AudioSettings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            score: ScoreRules::default(),
            seed: None,
            audio: AudioSettings::default(),
        }
    }
}

impl GameConfig {
    /// Rejects configurations the game cannot run with; clamps the ones it can.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        if self.rows < MIN_BOARD_DIM || self.cols < MIN_BOARD_DIM {
            return Err(ConfigError::Invalid(format!(
                "board must be at least {MIN_BOARD_DIM}x{MIN_BOARD_DIM}, got {}x{}",
                self.rows, self.cols
            )));
        }
        if self.score.min_drop_interval > self.score.initial_drop_interval {
            return Err(ConfigError::Invalid(format!(
                "min_drop_interval ({:?}) exceeds initial_drop_interval ({:?})",
                self.score.min_drop_interval, self.score.initial_drop_interval
            )));
        }
        self.audio = self.audio.clamp();
        Ok(self)
    }
}

/// Read-only view of the on-disk config file.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("BLOCKDROP_CONFIG") {
            return Self::at(PathBuf::from(explicit));
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("blockdrop");
        path.push("config.json");
        Self::at(path)
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Missing file means defaults; anything unreadable or malformed is an error.
    pub fn load(&self) -> Result<GameConfig, ConfigError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(GameConfig::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let config: GameConfig =
            serde_json::from_slice(&bytes).map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })?;
        config.validated()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        let mut dir = std::env::temp_dir();
        dir.push(format!("blockdrop-settings-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).expect("create scratch dir");
        dir.push("config.json");
        dir
    }

    #[test]
    fn audio_gain_respects_mute() {
        let mut audio = AudioSettings {
            sfx_volume: 0.4,
            mute_all: false,
        };
        assert!((audio.effective_sfx_gain() - 0.4).abs() < 1e-6);
        audio.mute_all = true;
        assert_eq!(audio.effective_sfx_gain(), 0.0);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: GameConfig =
            serde_json::from_str(r#"{"cols":12,"score":{"base_points":5}}"#).expect("parse");
        assert_eq!(parsed.rows, DEFAULT_ROWS);
        assert_eq!(parsed.cols, 12);
        assert_eq!(parsed.score.base_points, 5);
        assert_eq!(parsed.score.initial_drop_interval, Duration::from_millis(1000));
        assert_eq!(parsed.seed, None);
    }

    #[test]
    fn validation_rejects_tiny_boards_and_inverted_intervals() {
        let tiny = GameConfig {
            rows: 3,
            ..GameConfig::default()
        };
        assert!(matches!(tiny.validated(), Err(ConfigError::Invalid(_))));

        let mut inverted = GameConfig::default();
        inverted.score.min_drop_interval = Duration::from_secs(5);
        assert!(matches!(inverted.validated(), Err(ConfigError::Invalid(_))));

        let loud = GameConfig {
            audio: AudioSettings {
                sfx_volume: 4.0,
                mute_all: false,
            },
            ..GameConfig::default()
        };
        assert_eq!(loud.validated().expect("valid").audio.sfx_volume, 1.0);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = ConfigStore::at(scratch_path("missing").with_file_name("absent.json"));
        assert_eq!(store.load().expect("defaults"), GameConfig::default());
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let path = scratch_path("malformed");
        fs::write(&path, "{ not json").expect("write");
        let err = ConfigStore::at(&path).load().expect_err("should fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("config.json"));
    }

    #[test]
    fn file_values_are_loaded() {
        let path = scratch_path("valid");
        fs::write(&path, r#"{"rows":22,"seed":9}"#).expect("write");
        let config = ConfigStore::at(&path).load().expect("load");
        assert_eq!(config.rows, 22);
        assert_eq!(config.seed, Some(9));
    }
}
