use std::collections::HashSet;
use std::error::Error;
use std::time::{Duration, Instant};

use pixels::{PixelsBuilder, SurfaceTexture};
use tracing::warn;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use crate::surface::{PixelsSurface, Surface, SurfaceSize};

pub struct AppConfig {
    pub title: String,
    /// Logical framebuffer size; the window starts at `buffer_size * scale`.
    pub buffer_size: SurfaceSize,
    pub scale: u32,
    pub clamp_to_monitor: bool,
    pub vsync: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: VirtualKeyCode,
    /// Set for OS auto-repeat presses of a key that is already held.
    pub repeat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppControl {
    Continue,
    Exit,
}

pub trait GameApp {
    fn on_key(&mut self, input: KeyInput) -> AppControl;

    fn update(&mut self, dt: Duration);

    fn render(&mut self, frame: &mut [u8], size: SurfaceSize);

    /// Polled every frame; the window title is only touched when it changes.
    fn title(&self) -> Option<String> {
        None
    }

    fn on_focus_lost(&mut self) {}
}

pub fn run_game<G: GameApp + 'static>(config: AppConfig, mut game: G) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let scale = config.scale.max(1);
    let desired = PhysicalSize::new(
        config.buffer_size.width.saturating_mul(scale),
        config.buffer_size.height.saturating_mul(scale),
    );
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = match monitor_size {
        Some(monitor) => PhysicalSize::new(
            desired.width.min(monitor.width),
            desired.height.min(monitor.height),
        ),
        None => desired,
    };

    let window = WindowBuilder::new()
        .with_title(config.title.clone())
        .with_inner_size(initial_size)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_texture = SurfaceTexture::new(window_size.width, window_size.height, &window);
    let pixels = PixelsBuilder::new(
        config.buffer_size.width,
        config.buffer_size.height,
        surface_texture,
    )
    .enable_vsync(config.vsync)
    .build()?;
    let mut surface = PixelsSurface::new(pixels, config.buffer_size);

    let mut held: HashSet<VirtualKeyCode> = HashSet::new();
    let mut last_frame = Instant::now();
    let mut last_title = config.title;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Poll;

        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    if let Err(err) = surface.resize_window(size.width, size.height) {
                        warn!(%err, "resize failed");
                    }
                    window.request_redraw();
                }
                WindowEvent::Focused(false) => {
                    held.clear();
                    game.on_focus_lost();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            state,
                            virtual_keycode: Some(key),
                            ..
                        },
                    ..
                } => match state {
                    ElementState::Pressed => {
                        let repeat = !held.insert(key);
                        if game.on_key(KeyInput { key, repeat }) == AppControl::Exit {
                            *control_flow = ControlFlow::Exit;
                        }
                    }
                    ElementState::Released => {
                        held.remove(&key);
                    }
                },
                _ => {}
            },
            Event::MainEventsCleared => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                game.update(dt);
                if let Some(title) = game.title() {
                    if title != last_title {
                        window.set_title(&title);
                        last_title = title;
                    }
                }
                window.request_redraw();
            }
            Event::RedrawRequested(_) => {
                let size = surface.size();
                game.render(surface.frame_mut(), size);
                if let Err(err) = surface.present() {
                    warn!(%err, "present failed; exiting");
                    *control_flow = ControlFlow::Exit;
                }
            }
            _ => {}
        }
    });

    #[allow(unreachable_code)]
    Ok(())
}
