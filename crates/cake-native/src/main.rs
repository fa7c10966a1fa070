use std::sync::Arc;
use std::time::{Duration, Instant};

use cake_core::constants::{MAX_CANDLES, SAMPLER_INTERVAL_MS};
use cake_core::{BlowSession, CakeView, SceneInputs, SessionEvent};
use cake_render::GpuState;
use clap::Parser;
use winit::dpi::PhysicalPosition;
use winit::event::*;
use winit::event_loop::EventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

mod cli;
mod mic;

const ORBIT_RADIANS_PER_PX: f32 = 0.005;
const ZOOM_PER_LINE: f32 = 0.1;
const TITLE: &str = "Birthday Cake";

/// Window-thread state: view, blow session and the optional microphone.
struct App {
    window: Arc<Window>,
    gpu: GpuState<'static>,
    view: CakeView,
    session: BlowSession,
    mic: Option<mic::MicInput>,
    last_sample: Instant,
    drag_from: Option<PhysicalPosition<f64>>,
    cursor: PhysicalPosition<f64>,
}

impl App {
    fn publish(&mut self, event: Option<SessionEvent>) {
        self.view.sync_lit(self.session.lit().as_slice());
        let lit = self.session.lit();
        let title = match event {
            Some(SessionEvent::AllOut { wish }) => {
                log::info!("[session] {}", wish);
                format!("{TITLE} - all candles out! {wish}")
            }
            _ => format!("{TITLE} - {} of {} blown out", lit.blown_count(), lit.len()),
        };
        self.window.set_title(&title);
    }

    fn blow_once(&mut self) {
        let event = self.session.blow_once();
        if event.is_some() {
            self.publish(event);
        }
    }

    fn reset_round(&mut self) {
        self.session.reset();
        if self.mic.is_some() {
            self.session.start_listening();
        }
        self.publish(None);
    }

    fn set_candle_count(&mut self, count: usize) {
        let count = count.clamp(1, MAX_CANDLES);
        self.session.set_candle_count(count);
        self.view.set_candle_count(count);
        if self.mic.is_some() {
            self.session.start_listening();
        }
        self.publish(None);
    }

    /// Feed the sampler at the same cadence as the browser interval.
    fn poll_mic(&mut self) {
        let Some(mic) = &self.mic else {
            return;
        };
        if self.last_sample.elapsed() < Duration::from_millis(SAMPLER_INTERVAL_MS as u64) {
            return;
        }
        self.last_sample = Instant::now();
        let event = self.session.on_strength(mic.strength());
        if event.is_some() {
            self.publish(event);
        }
    }

    fn handle_key(&mut self, key: &Key) {
        match key {
            Key::Named(NamedKey::Space) => self.blow_once(),
            Key::Named(NamedKey::ArrowUp) => {
                self.set_candle_count(self.view.inputs().candle_count + 1)
            }
            Key::Named(NamedKey::ArrowDown) => {
                self.set_candle_count(self.view.inputs().candle_count.saturating_sub(1))
            }
            Key::Character(c) => match c.as_str() {
                "r" | "R" => self.reset_round(),
                "a" | "A" => {
                    let on = !self.view.inputs().auto_rotate;
                    self.view.set_auto_rotate(on);
                    log::info!("[view] auto-rotate {}", if on { "on" } else { "off" });
                }
                "t" | "T" => {
                    let next = self.view.inputs().theme.next();
                    self.view.set_theme(next);
                    log::info!("[view] theme {} ({})", next, next.theme().display_name);
                }
                _ => {}
            },
            _ => {}
        }
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        self.cursor = position;
        if let Some(from) = self.drag_from {
            let dx = (position.x - from.x) as f32 * ORBIT_RADIANS_PER_PX;
            let dy = (position.y - from.y) as f32 * ORBIT_RADIANS_PER_PX;
            self.view.camera_mut().orbit(-dx, -dy);
            self.drag_from = Some(position);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = cli::Cli::parse();
    let config = args.share_config()?;
    if args.print_token {
        println!("{}", config.encode()?);
        return Ok(());
    }
    let theme = config.theme_id()?;

    let event_loop = EventLoop::new()?;
    let window = Arc::new(WindowBuilder::new().with_title(TITLE).build(&event_loop)?);

    let instance = wgpu::Instance::default();
    let surface = instance.create_surface(Arc::clone(&window))?;
    let size = window.inner_size();
    let gpu = pollster::block_on(GpuState::new(&instance, surface, size.width, size.height))?;

    let mut view = CakeView::new(SceneInputs {
        candle_count: config.candles,
        theme,
        auto_rotate: !args.no_auto_rotate,
        device_constrained: args.constrained,
    });
    view.mount();

    let mut session = BlowSession::new(config.candles);
    let mic = if args.mic {
        let mic = mic::MicInput::start();
        if mic.is_none() {
            log::warn!("[mic] no usable input device; use Space to blow");
        }
        mic
    } else {
        None
    };
    if mic.is_some() {
        session.start_listening();
    }
    if !config.recipient_name.is_empty() {
        log::info!("Happy Birthday, {}!", config.recipient_name);
    }

    let mut app = App {
        window,
        gpu,
        view,
        session,
        mic,
        last_sample: Instant::now(),
        drag_from: None,
        cursor: PhysicalPosition::new(0.0, 0.0),
    };

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => app.gpu.resize_if_needed(size.width, size.height),
            WindowEvent::CloseRequested => {
                app.view.unmount();
                elwt.exit();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key,
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => app.handle_key(&logical_key),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                app.drag_from = (state == ElementState::Pressed).then_some(app.cursor);
            }
            WindowEvent::CursorMoved { position, .. } => app.cursor_moved(position),
            WindowEvent::MouseWheel { delta, .. } => {
                let lines = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                app.view.camera_mut().zoom(1.0 - lines * ZOOM_PER_LINE);
            }
            _ => {}
        },
        Event::AboutToWait => {
            app.poll_mic();
            match app.view.frame(&mut app.gpu) {
                Ok(()) => app.window.request_redraw(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("[gpu] out of memory");
                    elwt.exit();
                }
                Err(e) => log::warn!("[gpu] {:?}", e),
            }
        }
        _ => {}
    })?;
    Ok(())
}
