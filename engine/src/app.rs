use std::collections::HashSet;
use std::error::Error;
use std::panic::AssertUnwindSafe;
use std::time::{Duration, Instant};

use pixels::{Pixels, PixelsBuilder, SurfaceTexture};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, KeyboardInput, MouseButton, VirtualKeyCode, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::{Window, WindowBuilder};

use crate::graphics::Renderer2d;
use crate::pixels_renderer::PixelsRenderer2d;
use crate::surface::SurfaceSize;
use crate::view_tree::{UiInput, ViewTree, hit_test_actions};

pub struct AppConfig {
    pub title: String,
    pub desired_size: PhysicalSize<u32>,
    pub clamp_to_monitor: bool,
    pub resizable: bool,
    pub vsync: Option<bool>,
    pub present_mode: Option<pixels::wgpu::PresentMode>,
    /// Redraw continuously instead of sleeping until the next input event.
    pub poll: bool,
}

pub struct AppContext {
    pub window: Window,
    pub renderer: PixelsRenderer2d,
    pub surface_size: SurfaceSize,
}

/// Input gathered between two redraws.
#[derive(Debug, Clone, Default)]
pub struct InputFrame {
    pub mouse_pos: Option<(u32, u32)>,
    pub mouse_down: bool,
    pub mouse_up: bool,
    /// Fresh key presses in arrival order. OS auto-repeat of a held key is not included.
    pub keys_pressed: Vec<VirtualKeyCode>,
    pub keys_down: HashSet<VirtualKeyCode>,
}

impl InputFrame {
    pub fn ui_input(&self) -> UiInput {
        UiInput {
            mouse_pos: self.mouse_pos,
            mouse_down: self.mouse_down,
            mouse_up: self.mouse_up,
        }
    }

    /// Records a key transition. Returns `true` for a fresh press.
    pub fn on_key(&mut self, key: VirtualKeyCode, state: ElementState) -> bool {
        match state {
            ElementState::Pressed => {
                if !self.keys_down.insert(key) {
                    return false;
                }
                self.keys_pressed.push(key);
                true
            }
            ElementState::Released => {
                self.keys_down.remove(&key);
                false
            }
        }
    }

    /// Clears the per-frame edges while keeping held keys and the cursor position.
    pub fn end_frame(&mut self) {
        self.mouse_down = false;
        self.mouse_up = false;
        self.keys_pressed.clear();
    }
}

pub trait GameApp {
    type State;
    type Action: Clone;
    type Effect;

    fn init_state(&mut self, _ctx: &mut AppContext) -> Self::State;

    fn build_view(&self, state: &Self::State, _ctx: &AppContext) -> ViewTree<Self::Action>;

    fn update_state(
        &mut self,
        state: &mut Self::State,
        input: &InputFrame,
        dt: Duration,
        actions: &[Self::Action],
        _ctx: &mut AppContext,
    ) -> Vec<Self::Effect>;

    fn render(
        &mut self,
        state: &Self::State,
        view: &ViewTree<Self::Action>,
        input: &InputFrame,
        renderer: &mut dyn Renderer2d,
    );

    fn handle_effects(&mut self, _effects: Vec<Self::Effect>, _ctx: &mut AppContext) {}

    /// Checked after every frame; returning `true` ends the event loop.
    fn exit_requested(&self) -> bool {
        false
    }
}

fn build_pixels(
    window: &Window,
    size: SurfaceSize,
    vsync: Option<bool>,
    present_mode: Option<pixels::wgpu::PresentMode>,
) -> Result<Pixels, pixels::Error> {
    let surface_texture = SurfaceTexture::new(size.width, size.height, window);
    let mut builder = PixelsBuilder::new(size.width, size.height, surface_texture);
    if let Some(vsync) = vsync {
        builder = builder.enable_vsync(vsync);
    }
    if let Some(mode) = present_mode {
        builder = builder.present_mode(mode);
    }
    builder.build()
}

pub fn run_game<G: GameApp + 'static>(
    config: AppConfig,
    mut game: G,
) -> Result<(), Box<dyn Error>> {
    let event_loop = EventLoop::new();
    let monitor_size = if config.clamp_to_monitor {
        event_loop.primary_monitor().map(|m| m.size())
    } else {
        None
    };
    let initial_size = match monitor_size {
        Some(monitor) => PhysicalSize::new(
            config.desired_size.width.min(monitor.width),
            config.desired_size.height.min(monitor.height),
        ),
        None => config.desired_size,
    };
    let window = WindowBuilder::new()
        .with_title(config.title)
        .with_inner_size(initial_size)
        .with_resizable(config.resizable)
        .build(&event_loop)?;

    let window_size = window.inner_size();
    let surface_size = SurfaceSize::new(window_size.width.max(1), window_size.height.max(1));

    let pixels = match config.present_mode {
        Some(mode) => match std::panic::catch_unwind(AssertUnwindSafe(|| {
            build_pixels(&window, surface_size, config.vsync, Some(mode))
        })) {
            Ok(res) => res?,
            Err(_) => {
                tracing::warn!(?mode, "requested present mode is not supported; falling back");
                build_pixels(&window, surface_size, config.vsync, None)?
            }
        },
        None => build_pixels(&window, surface_size, config.vsync, None)?,
    };

    let renderer = PixelsRenderer2d::new(pixels, surface_size)?;

    let mut ctx = AppContext {
        window,
        renderer,
        surface_size,
    };
    let mut state = game.init_state(&mut ctx);
    let mut input = InputFrame::default();
    let mut last_frame = Instant::now();
    let idle_flow = if config.poll {
        ControlFlow::Poll
    } else {
        ControlFlow::Wait
    };

    event_loop.run(move |event, _, control_flow| {
        if *control_flow != ControlFlow::Exit {
            *control_flow = idle_flow;
        }

        match &event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    tracing::info!("window close requested");
                    *control_flow = ControlFlow::Exit;
                }
                WindowEvent::Resized(size) => {
                    ctx.surface_size = SurfaceSize::new(size.width, size.height);
                    if let Err(err) = ctx.renderer.resize(ctx.surface_size) {
                        tracing::error!(%err, "resize failed");
                    }
                    ctx.window.request_redraw();
                }
                WindowEvent::Focused(false) => {
                    input.keys_down.clear();
                }
                WindowEvent::KeyboardInput {
                    input:
                        KeyboardInput {
                            virtual_keycode: Some(key),
                            state: key_state,
                            ..
                        },
                    ..
                } => {
                    if input.on_key(*key, *key_state) {
                        ctx.window.request_redraw();
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    let new_pos = (position.x.max(0.0) as u32, position.y.max(0.0) as u32);
                    if input.mouse_pos != Some(new_pos) {
                        input.mouse_pos = Some(new_pos);
                        ctx.window.request_redraw();
                    }
                }
                WindowEvent::CursorLeft { .. } => {
                    input.mouse_pos = None;
                    ctx.window.request_redraw();
                }
                WindowEvent::MouseInput {
                    state: mouse_state,
                    button: MouseButton::Left,
                    ..
                } => {
                    match mouse_state {
                        ElementState::Pressed => input.mouse_down = true,
                        ElementState::Released => input.mouse_up = true,
                    }
                    ctx.window.request_redraw();
                }
                _ => {}
            },
            Event::RedrawRequested(_) => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_frame);
                last_frame = now;

                let view_for_input = game.build_view(&state, &ctx);
                let actions = hit_test_actions(&view_for_input, input.ui_input());
                let effects = game.update_state(&mut state, &input, dt, &actions, &mut ctx);

                let view_for_render = game.build_view(&state, &ctx);
                ctx.renderer.draw_frame(|gfx| {
                    game.render(&state, &view_for_render, &input, gfx);
                });
                if let Err(err) = ctx.renderer.present() {
                    tracing::error!(%err, "present failed");
                }

                game.handle_effects(effects, &mut ctx);
                input.end_frame();

                if game.exit_requested() {
                    *control_flow = ControlFlow::Exit;
                }
            }
            Event::MainEventsCleared => {
                if config.poll {
                    ctx.window.request_redraw();
                }
            }
            _ => {}
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_key_counts_once_until_released() {
        let mut input = InputFrame::default();
        assert!(input.on_key(VirtualKeyCode::Left, ElementState::Pressed));
        assert!(!input.on_key(VirtualKeyCode::Left, ElementState::Pressed));
        assert_eq!(input.keys_pressed, vec![VirtualKeyCode::Left]);

        input.end_frame();
        assert!(input.keys_pressed.is_empty());
        assert!(input.keys_down.contains(&VirtualKeyCode::Left));

        input.on_key(VirtualKeyCode::Left, ElementState::Released);
        assert!(input.on_key(VirtualKeyCode::Left, ElementState::Pressed));
    }

    #[test]
    fn presses_keep_arrival_order() {
        let mut input = InputFrame::default();
        input.on_key(VirtualKeyCode::Up, ElementState::Pressed);
        input.on_key(VirtualKeyCode::Right, ElementState::Pressed);
        assert_eq!(
            input.keys_pressed,
            vec![VirtualKeyCode::Up, VirtualKeyCode::Right]
        );
    }

    #[test]
    fn end_frame_keeps_cursor_but_clears_clicks() {
        let mut input = InputFrame {
            mouse_pos: Some((3, 4)),
            mouse_down: true,
            mouse_up: true,
            ..InputFrame::default()
        };
        input.end_frame();
        assert_eq!(input.mouse_pos, Some((3, 4)));
        assert!(!input.mouse_down && !input.mouse_up);
    }
}
