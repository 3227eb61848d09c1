use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use blockdrop::input::{accepts_repeat, map_key};
use blockdrop::settings::{ConfigStore, GameConfig};
use blockdrop::sfx::{Cue, cue_for_event};
use blockdrop::state::GameState;
use blockdrop::tetris_core::GameEvent;
use blockdrop::view::{GameSnapshot, draw_frame, frame_size};
use clap::Parser;
use engine::app::{AppConfig, AppControl, GameApp, KeyInput, run_game};
use engine::surface::SurfaceSize;
use rodio::source::SineWave;
use rodio::{OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use winit::event::VirtualKeyCode;

#[derive(Debug, Parser)]
#[command(name = "headful", about = "Play blockdrop in a window")]
struct Args {
    /// Seed for the piece sequence; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Config file; defaults to $BLOCKDROP_CONFIG or the XDG config dir.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, default_value_t = 1)]
    scale: u32,
    #[arg(long)]
    no_vsync: bool,
    #[arg(long)]
    mute: bool,
}

struct Sfx {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    gain: f32,
}

impl Sfx {
    fn new(gain: f32) -> Result<Self, Box<dyn Error>> {
        let (stream, handle) = OutputStream::try_default()?;
        Ok(Self {
            _stream: stream,
            handle,
            gain,
        })
    }

    fn play(&self, cue: Cue) {
        let Ok(sink) = Sink::try_new(&self.handle) else {
            return;
        };
        sink.set_volume(cue.volume * self.gain);
        sink.append(SineWave::new(cue.freq_hz).take_duration(cue.duration));
        sink.detach();
    }
}

struct HeadfulApp {
    state: GameState,
    sfx: Option<Sfx>,
}

impl HeadfulApp {
    fn play_events(&self, events: &[GameEvent]) {
        let Some(sfx) = &self.sfx else {
            return;
        };
        for event in events {
            sfx.play(cue_for_event(event));
        }
    }
}

impl GameApp for HeadfulApp {
    fn on_key(&mut self, input: KeyInput) -> AppControl {
        if input.key == VirtualKeyCode::Q {
            return AppControl::Exit;
        }
        let Some(intent) = map_key(input.key) else {
            return AppControl::Continue;
        };
        if input.repeat && !accepts_repeat(intent) {
            return AppControl::Continue;
        }
        let events = self.state.apply(intent);
        self.play_events(&events);
        AppControl::Continue
    }

    fn update(&mut self, dt: Duration) {
        let events = self.state.tick(dt);
        self.play_events(&events);
    }

    fn render(&mut self, frame: &mut [u8], size: SurfaceSize) {
        draw_frame(frame, size, &GameSnapshot::capture(&self.state));
    }

    fn title(&self) -> Option<String> {
        let mut title = format!(
            "blockdrop | score {} | high {} | lines {}",
            self.state.score(),
            self.state.high_score(),
            self.state.tetris().lines_cleared()
        );
        if self.state.is_game_over() {
            title.push_str(" | game over (R to restart)");
        } else if self.state.is_paused() {
            title.push_str(" | paused");
        }
        Some(title)
    }

    fn on_focus_lost(&mut self) {
        self.state.set_paused(true);
    }
}

fn load_config(args: &Args) -> GameConfig {
    let store = match &args.config {
        Some(path) => ConfigStore::at(path.clone()),
        None => ConfigStore::from_env(),
    };
    match store.load() {
        Ok(config) => config,
        Err(err) => {
            warn!(%err, "using default config");
            GameConfig::default()
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args);
    let seed = args.seed.or(config.seed).unwrap_or_else(rand::random);
    info!(seed, rows = config.rows, cols = config.cols, "starting");

    let gain = if args.mute { 0.0 } else { config.audio.effective_sfx_gain() };
    let sfx = if gain > 0.0 {
        match Sfx::new(gain) {
            Ok(sfx) => Some(sfx),
            Err(err) => {
                warn!(%err, "audio unavailable; continuing without sound");
                None
            }
        }
    } else {
        None
    };

    let app = HeadfulApp {
        state: GameState::from_config(&config, seed),
        sfx,
    };
    let app_config = AppConfig {
        title: "blockdrop".to_string(),
        buffer_size: frame_size(config.rows, config.cols),
        scale: args.scale,
        clamp_to_monitor: true,
        vsync: !args.no_vsync,
    };
    run_game(app_config, app)
}
