//! Window lifecycle and the per-frame loop.
//!
//! The event loop drives everything: each `RedrawRequested` ticks the
//! simulation once, renders, and immediately requests the next redraw.

use std::sync::Arc;

use log::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::config::BackdropConfig;
use crate::cursor::CursorTracker;
use crate::error::BackdropError;
use crate::render::GpuState;
use crate::scene::{SphereScene, Starfield};
use crate::time::FrameClock;

struct ActiveState {
    window: Arc<Window>,
    gpu: GpuState,
    scene: SphereScene,
    starfield: Starfield,
    cursor: CursorTracker,
    clock: FrameClock,
}

pub struct BackdropApp {
    config: BackdropConfig,
    state: Option<ActiveState>,
    /// Window or GPU acquisition failure, handed back by [`run`] after the
    /// event loop stops.
    init_error: Option<BackdropError>,
}

impl BackdropApp {
    pub fn new(config: BackdropConfig) -> Self {
        Self {
            config,
            state: None,
            init_error: None,
        }
    }
}

impl ApplicationHandler for BackdropApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let attributes = Window::default_attributes().with_title("Holofield");
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("Failed to create window: {err}");
                self.init_error = Some(BackdropError::Window(err));
                event_loop.exit();
                return;
            }
        };

        let scene = SphereScene::new(&self.config);
        let starfield = Starfield::new(&self.config.starfield);
        let size = window.inner_size();

        let gpu = match pollster::block_on(GpuState::new(
            window.clone(),
            &self.config,
            &scene,
            &starfield,
        )) {
            Ok(gpu) => gpu,
            Err(err) => {
                error!("Failed to initialize GPU: {err}");
                self.init_error = Some(BackdropError::Gpu(err));
                event_loop.exit();
                return;
            }
        };

        info!(
            "Backdrop started: {} sphere particles, {} mark particles, {} stars",
            scene.sphere.len(),
            scene.marks.len(),
            starfield.positions.len()
        );

        window.request_redraw();
        self.state = Some(ActiveState {
            window,
            gpu,
            scene,
            starfield,
            cursor: CursorTracker::new(size.width, size.height),
            clock: FrameClock::new(),
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(state) = self.state.as_mut() else {
            return;
        };

        state.cursor.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(new_size) => state.gpu.resize(new_size),
            WindowEvent::RedrawRequested => {
                let elapsed = state.clock.tick();
                state.scene.tick(&state.cursor, elapsed);
                state.starfield.tick();

                if state.clock.frame() % 600 == 0 {
                    debug!("{:.1} fps", state.clock.fps());
                }

                match state.gpu.render(&state.scene, &state.starfield) {
                    Ok(()) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        let size = state.window.inner_size();
                        state.gpu.resize(size);
                    }
                    Err(wgpu::SurfaceError::Timeout) => {
                        warn!("Surface timeout, skipping frame");
                    }
                    Err(err) => {
                        error!("Unrecoverable surface error: {err}");
                        event_loop.exit();
                    }
                }

                state.window.request_redraw();
            }
            _ => {}
        }
    }
}

/// Build the event loop and run the backdrop until the window closes.
pub fn run(config: BackdropConfig) -> Result<(), BackdropError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = BackdropApp::new(config);
    event_loop.run_app(&mut app)?;
    match app.init_error {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
