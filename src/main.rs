//! Glyphburst
//!
//! A wall of faintly tiled text that charges toward the pointer while
//! held down, bursts apart on release, and fades back into place.

mod atlas;
mod gpu;
mod typeset;
mod vertex;

use std::sync::Arc;

use glam::Vec2;
use glyph_physics::constants::SOURCE_TEXT;
use glyph_physics::EffectParams;
use glyph_render::{GlyphCanvas, GlyphQuad, GlyphRenderer};
use glyph_simulation::EffectSession;
use gpu::GpuState;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

const SURFACE_WIDTH: f32 = 600.0;
const SURFACE_HEIGHT: f32 = 800.0;

/// Per-frame quad collector handed to the renderer, drained by the GPU.
#[derive(Default)]
struct FrameQuads {
    quads: Vec<GlyphQuad>,
}

impl GlyphCanvas for FrameQuads {
    fn clear(&mut self) {
        self.quads.clear();
    }

    fn draw_glyph(&mut self, quad: GlyphQuad) {
        self.quads.push(quad);
    }
}

struct App {
    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    session: Option<EffectSession>,
    renderer: GlyphRenderer,
    frame: FrameQuads,
    params: EffectParams,

    cursor_pos: Option<Vec2>,
}

impl App {
    fn new(params: EffectParams) -> Self {
        Self {
            window: None,
            gpu: None,
            session: None,
            renderer: GlyphRenderer::default(),
            frame: FrameQuads::default(),
            params,
            cursor_pos: None,
        }
    }

    /// Physical window coordinates to the logical surface space the
    /// simulation runs in.
    fn to_surface(&self, position: winit::dpi::PhysicalPosition<f64>) -> Vec2 {
        let scale = self
            .window
            .as_ref()
            .map(|w| w.scale_factor())
            .unwrap_or(1.0);
        let logical = position.to_logical::<f64>(scale);
        Vec2::new(logical.x as f32, logical.y as f32)
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let window_attributes = Window::default_attributes()
                .with_title("Glyphburst")
                .with_inner_size(winit::dpi::LogicalSize::new(SURFACE_WIDTH, SURFACE_HEIGHT))
                .with_resizable(false);

            let window = Arc::new(event_loop.create_window(window_attributes).unwrap());
            self.window = Some(window.clone());

            let mut gpu = pollster::block_on(GpuState::new(window));
            let bounds = Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT);
            self.session = Some(EffectSession::new(
                SOURCE_TEXT,
                bounds,
                self.params.clone(),
                gpu.typesetter_mut(),
            ));
            self.gpu = Some(gpu);
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
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),

            WindowEvent::Resized(physical_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(physical_size);
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                let point = self.to_surface(position);
                self.cursor_pos = Some(point);
                if let Some(session) = &mut self.session {
                    session.pointer_move(point);
                }
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                if let Some(session) = &mut self.session {
                    match state {
                        ElementState::Pressed => {
                            if let Some(point) = self.cursor_pos {
                                session.pointer_down(point);
                            }
                        }
                        ElementState::Released => session.pointer_up(),
                    }
                }
            }

            WindowEvent::Touch(touch) => {
                let point = self.to_surface(touch.location);
                if let Some(session) = &mut self.session {
                    match touch.phase {
                        TouchPhase::Started => session.pointer_down(point),
                        TouchPhase::Moved => session.pointer_move(point),
                        TouchPhase::Ended | TouchPhase::Cancelled => session.pointer_up(),
                    }
                }
            }

            WindowEvent::RedrawRequested => {
                if let (Some(gpu), Some(session)) = (&mut self.gpu, &mut self.session) {
                    session.advance_frame();
                    self.renderer
                        .draw(session.particles(), session.params(), &mut self.frame);

                    let bounds = Vec2::new(SURFACE_WIDTH, SURFACE_HEIGHT);
                    match gpu.render(&self.frame.quads, session.params().font_px, bounds) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::Lost) => {
                            if let Some(window) = &self.window {
                                gpu.resize(window.inner_size());
                            }
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => event_loop.exit(),
                        Err(e) => eprintln!("Render error: {:?}", e),
                    }
                }
            }

            _ => {}
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() {
    // Initialize logger (RUST_LOG=debug for verbose output)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // `--flicker` swaps in the shimmer preset; the default is the
    // classic linear fade.
    let params = if std::env::args().any(|arg| arg == "--flicker") {
        log::info!("Starting with the flicker preset");
        EffectParams::flicker()
    } else {
        EffectParams::classic()
    };

    let event_loop = EventLoop::new().unwrap();
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(params);
    event_loop.run_app(&mut app).unwrap();
}
