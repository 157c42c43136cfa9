//! Gerstner water demo
//!
//! A 100m ground plane rippled by up to three Gerstner waves on the GPU,
//! with a lit sphere floating above it. Drag or use the arrow keys to orbit,
//! scroll to zoom, ESC to quit.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use gerstner_water::cli::Args;
use gerstner_water::clock::FrameClock;
use gerstner_water::params::AppConfig;
use gerstner_water::rendering::{FrameOutcome, RenderContext};
use gerstner_water::scene::Scene;
use gerstner_water::wave::build_program_source;
use gerstner_water::WaterError;

/// Main application state
struct App {
    config: AppConfig,

    // Window and rendering, created on resume
    window: Option<Arc<Window>>,
    context: Option<RenderContext>,
    scene: Option<Scene>,

    clock: FrameClock,
    mouse_pressed: bool,

    // First fatal error; reported after the event loop stops
    error: Option<WaterError>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        Self {
            config,
            window: None,
            context: None,
            scene: None,
            clock: FrameClock::new(),
            mouse_pressed: false,
            error: None,
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), WaterError> {
        let render = &self.config.render;
        let window_attributes = Window::default_attributes()
            .with_title("Gerstner Water")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                render.window_width,
                render.window_height,
            ));

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let context = pollster::block_on(RenderContext::new(
            Arc::clone(&window),
            render,
            self.config.capture.clone(),
        ))?;
        let scene = Scene::new(&context, &self.config)?;

        log::info!("Gerstner water is running (ESC to quit)");

        self.window = Some(window);
        self.context = Some(context);
        self.scene = Some(scene);
        self.clock = FrameClock::new();
        Ok(())
    }

    /// Stop the loop; the error is reported once `run` returns
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: WaterError) {
        self.error.get_or_insert(error);
        event_loop.exit();
    }

    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(context), Some(scene)) = (self.context.as_mut(), self.scene.as_mut()) else {
            return;
        };

        let time = self.clock.tick();
        scene.update(&context.queue, time, context.aspect_ratio());

        match context.render(scene, time.elapsed) {
            Ok(FrameOutcome::Presented) => {}
            Ok(FrameOutcome::Captured(path)) => {
                log::info!("Captured {}, exiting", path.display());
                event_loop.exit();
            }
            Err(WaterError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                context.resize(context.size);
            }
            Err(WaterError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                self.fail(event_loop, WaterError::Surface(wgpu::SurfaceError::OutOfMemory));
            }
            Err(WaterError::Surface(e)) => log::warn!("Render error: {:?}", e),
            Err(e) => self.fail(event_loop, e),
        }
    }
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        if let Err(e) = self.init(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state,
                        ..
                    },
                ..
            } => {
                if let Some(scene) = &mut self.scene {
                    scene.camera.process_keyboard(key, state);
                }
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state,
                ..
            } => {
                self.mouse_pressed = state == ElementState::Pressed;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(scene) = &mut self.scene {
                    scene.camera.process_scroll(&delta);
                }
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(context) = &mut self.context {
                    context.resize(physical_size);
                }
            }
            WindowEvent::RedrawRequested => self.render_frame(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            if self.mouse_pressed {
                if let Some(scene) = &mut self.scene {
                    scene.camera.process_mouse(delta.0, delta.1);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        // Scene resources go before the device they were created on
        self.scene = None;
        if let Some(context) = self.context.take() {
            context.teardown();
        }
    }
}

fn run(args: Args) -> Result<(), WaterError> {
    if args.dump_shader {
        let source = build_program_source();
        println!("// ---- vertex ----\n{}", source.vertex);
        println!("// ---- fragment ----\n{}", source.fragment);
        return Ok(());
    }

    let config = args.into_config()?;
    log::info!("Waves: {:?}", config.waves.waves());
    if let Some(capture) = &config.capture {
        log::info!(
            "Screenshot {} after {:.1}s",
            capture.path.display(),
            capture.at_secs
        );
    }

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
