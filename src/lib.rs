//! A circular weight-picker dial widget.
//!
//! The dial shows a rotating ring of weight labels behind a fixed pointer.
//! Dragging horizontally across the window rotates the ring; two round
//! buttons step the value by five units. The selected weight is shown on a
//! badge below the needle hub and reported to an optional listener.
//!
//! ```no_run
//! use weight_dial::{DialConfig, Theme, WeightDial};
//!
//! let config = DialConfig::builder()
//!     .title("Weight".to_string())
//!     .theme(Theme::dark_amber())
//!     .initial_weight(72.0)
//!     .build();
//! WeightDial::new(config)
//!     .show_with_listener(|weight| println!("picked {weight}"))
//!     .unwrap();
//! ```

mod draw;
pub mod state;
pub mod theme;

pub use state::DialState;
pub use theme::{Color, Theme};

use bon::Builder;
use log::{debug, info, trace};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use thiserror::Error;

use std::time::{Duration, Instant};

use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, MouseButton, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use draw::Canvas;

// ============================================================================
// PUBLIC API
// ============================================================================

#[derive(Debug, Error)]
pub enum DialError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("window creation failed: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("pixel surface error: {0}")]
    Surface(#[from] pixels::Error),
    #[error("embedded font could not be parsed")]
    FontLoad,
}

/// Widget configuration. Geometry knobs are factors of the dial or face
/// radius so the layout scales with the window.
#[derive(Debug, Clone, Builder)]
pub struct DialConfig {
    #[builder(default = "Weight".to_string())]
    pub title: String,
    #[builder(default)]
    pub theme: Theme,
    /// Starting weight; defaults to the dial's initial angle (displays 20).
    pub initial_weight: Option<f32>,

    // Window configuration
    #[builder(default = 480)]
    pub window_width: usize,
    #[builder(default = 480)]
    pub window_height: usize,
    #[builder(default = 60.0)]
    pub max_framerate: f64,

    /// Degrees of rotation per pixel of horizontal drag.
    #[builder(default = state::DRAG_SENSITIVITY)]
    pub drag_sensitivity: f32,

    // Dial geometry
    #[builder(default = 16)]
    pub dial_margin: i32,
    #[builder(default = 390.0 / 450.0)]
    pub ring_factor: f64,
    #[builder(default = 360.0 / 450.0)]
    pub face_factor: f64,
    #[builder(default = 0.64)]
    pub label_ring_factor: f64,
    #[builder(default = 24.0)]
    pub label_font_size: f32,

    // Needle and hub
    #[builder(default = 0.47)]
    pub needle_length_factor: f64,
    #[builder(default = 4.5)]
    pub needle_width: f32,
    #[builder(default = 26.0 / 450.0)]
    pub hub_radius_factor: f64,
    #[builder(default = 12.0 / 450.0)]
    pub hub_dot_radius_factor: f64,

    // Readout badge
    #[builder(default = 32.0)]
    pub badge_font_size: f32,
    #[builder(default = 0.55)]
    pub badge_offset_factor: f64,

    // Step buttons
    #[builder(default = 0.12)]
    pub button_radius_factor: f64,
    #[builder(default = 18.0)]
    pub button_font_size: f32,
}

/// The dial widget: configuration plus rotation state.
#[derive(Debug)]
pub struct WeightDial {
    config: DialConfig,
    state: DialState,
}

impl WeightDial {
    pub fn new(config: DialConfig) -> Self {
        let state = match config.initial_weight {
            Some(weight) => DialState::from_weight(weight),
            None => DialState::new(),
        };
        Self { config, state }
    }

    pub fn state(&self) -> &DialState {
        &self.state
    }

    /// Jump the dial to a weight before showing it.
    pub fn set_weight(&mut self, weight: f32) {
        self.state.set_weight(weight);
    }

    /// Open the window and run until it is closed.
    pub fn show(self) -> Result<(), DialError> {
        self.run_window(None)
    }

    /// Like [`show`](Self::show), but invokes `listener` with the new display
    /// weight after every successful drag or step mutation.
    pub fn show_with_listener(self, listener: impl FnMut(f32) + 'static) -> Result<(), DialError> {
        self.run_window(Some(Box::new(listener)))
    }

    fn run_window(self, mut listener: Option<Box<dyn FnMut(f32)>>) -> Result<(), DialError> {
        let WeightDial { config, mut state } = self;
        let font =
            Font::try_from_vec(config.theme.font_data.to_vec()).ok_or(DialError::FontLoad)?;

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(false)
            .build(&event_loop)?;
        let window = std::sync::Arc::new(window);
        let window_clone = window.clone();

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        info!(
            "opening weight dial \"{}\" at {}x{}, starting weight {}",
            config.title,
            fb_width,
            fb_height,
            state.display_weight()
        );

        let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate);
        let mut last_frame = Instant::now();
        let mut cursor = (0.0f64, 0.0f64);
        let mut dragging = false;

        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        fb_width = new_size.width as usize;
                        fb_height = new_size.height as usize;
                        let _ = pixels.resize_buffer(new_size.width, new_size.height);
                        let _ = pixels.resize_surface(new_size.width, new_size.height);
                    }
                    WindowEvent::CursorMoved { position, .. } => {
                        if dragging {
                            let delta = (position.x - cursor.0) as f32;
                            if state.rotate_by(delta * config.drag_sensitivity) {
                                trace!(
                                    "drag {:+.1}px -> angle {:.2}",
                                    delta,
                                    state.rotation_angle()
                                );
                                if let Some(cb) = listener.as_mut() {
                                    cb(state.display_weight() as f32);
                                }
                            }
                        }
                        cursor = (position.x, position.y);
                    }
                    WindowEvent::MouseInput {
                        state: button_state,
                        button: MouseButton::Left,
                        ..
                    } => match button_state {
                        ElementState::Pressed => {
                            let layout = DialLayout::new(fb_width, fb_height, &config);
                            let stepped = if layout.hits_step_down(cursor.0, cursor.1) {
                                state.step_down()
                            } else if layout.hits_step_up(cursor.0, cursor.1) {
                                state.step_up()
                            } else {
                                dragging = true;
                                false
                            };
                            if stepped {
                                debug!("stepped to {}", state.display_weight());
                                if let Some(cb) = listener.as_mut() {
                                    cb(state.display_weight() as f32);
                                }
                            }
                        }
                        ElementState::Released => {
                            dragging = false;
                        }
                    },
                    WindowEvent::RedrawRequested => {
                        let layout = DialLayout::new(fb_width, fb_height, &config);
                        let scene = build_scene(&state, &config, &layout, &font);
                        let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                        scene.render(&mut canvas, &font);
                        let _ = pixels.render();
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}

// ============================================================================
// LAYOUT
// ============================================================================

// Fixed arc window the label ring shows through, in screen degrees
// (270 is the top of the dial).
const ARC_START_DEG: f64 = 225.0;
const ARC_SPAN_DEG: f64 = 90.0;
// Labels drawn slightly past the window edges so they slide out, not pop.
const LABEL_WINDOW_MARGIN_DEG: f64 = 10.0;

// 16 labels spread over the full circle, one per ten units.
const LABEL_COUNT: usize = 16;
const LABEL_STEP_DEG: f64 = 360.0 / 16.0;
// The ring spins faster than the stored angle so that one label pitch
// corresponds to ten units of weight.
const LABEL_SPIN_FACTOR: f64 = 360.0 / 150.0;

const TICK_COUNT: usize = 5;

/// Pixel geometry of the dial, derived from the framebuffer size. Shared by
/// the renderer and hit testing so the two cannot disagree.
#[derive(Debug, Clone, Copy)]
struct DialLayout {
    cx: f64,
    cy: f64,
    dial_radius: f64,
    ring_radius: f64,
    face_radius: f64,
    label_radius: f64,
    arc_radius: f64,
    arc_thickness: f64,
    tick_inner_radius: f64,
    tick_outer_radius: f64,
    needle_length: f64,
    hub_radius: f64,
    hub_dot_radius: f64,
    badge_center_y: f64,
    button_radius: f64,
    button_down: (f64, f64),
    button_up: (f64, f64),
}

impl DialLayout {
    fn new(width: usize, height: usize, config: &DialConfig) -> Self {
        let cx = width as f64 / 2.0;
        let cy = height as f64 / 2.0;
        let dial_radius = (width.min(height) as f64 / 2.0 - config.dial_margin as f64).max(1.0);
        let ring_radius = dial_radius * config.ring_factor;
        let face_radius = dial_radius * config.face_factor;
        let button_y = cy + face_radius * 0.12;
        Self {
            cx,
            cy,
            dial_radius,
            ring_radius,
            face_radius,
            label_radius: face_radius * config.label_ring_factor,
            arc_radius: face_radius * 0.88,
            arc_thickness: face_radius * 0.5,
            tick_inner_radius: face_radius * 0.78,
            tick_outer_radius: face_radius * 0.88,
            needle_length: face_radius * config.needle_length_factor,
            hub_radius: dial_radius * config.hub_radius_factor,
            hub_dot_radius: dial_radius * config.hub_dot_radius_factor,
            badge_center_y: cy + face_radius * config.badge_offset_factor,
            button_radius: dial_radius * config.button_radius_factor,
            button_down: (cx - face_radius * 0.5, button_y),
            button_up: (cx + face_radius * 0.5, button_y),
        }
    }

    fn hits_step_down(&self, x: f64, y: f64) -> bool {
        in_circle(x, y, self.button_down, self.button_radius)
    }

    fn hits_step_up(&self, x: f64, y: f64) -> bool {
        in_circle(x, y, self.button_up, self.button_radius)
    }
}

fn in_circle(x: f64, y: f64, center: (f64, f64), radius: f64) -> bool {
    let dx = x - center.0;
    let dy = y - center.1;
    dx * dx + dy * dy <= radius * radius
}

/// Screen angle of label `index` for a given dial rotation, in degrees.
fn label_angle(rotation_angle: f32, index: usize) -> f64 {
    -90.0 + rotation_angle as f64 * LABEL_SPIN_FACTOR + LABEL_STEP_DEG * index as f64
}

/// Whether a label at `angle_deg` falls inside the visible arc window.
fn label_visible(angle_deg: f64) -> bool {
    let normalized = angle_deg.rem_euclid(360.0);
    normalized >= ARC_START_DEG - LABEL_WINDOW_MARGIN_DEG
        && normalized <= ARC_START_DEG + ARC_SPAN_DEG + LABEL_WINDOW_MARGIN_DEG
}

// ============================================================================
// SCENE CONSTRUCTION
// ============================================================================

#[derive(Clone, Debug)]
enum DrawCommand {
    Clear(Color),
    Disc {
        cx: f64,
        cy: f64,
        radius: f64,
        color: Color,
    },
    ArcBand {
        cx: f64,
        cy: f64,
        radius: f64,
        thickness: f64,
        start_angle: f64,
        arc_span: f64,
        color: Color,
    },
    Tick {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        thickness: f32,
        color: Color,
    },
    Needle {
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
        width: f32,
        color: Color,
    },
    RoundedRect {
        cx: f64,
        cy: f64,
        width: f64,
        height: f64,
        corner: f64,
        color: Color,
    },
    Label {
        x: f64,
        y: f64,
        rotation: f64,
        text: String,
        font_size: f32,
        color: Color,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f32,
        color: Color,
    },
}

struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn render(&self, canvas: &mut Canvas, font: &Font) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(color.as_tuple()),
                DrawCommand::Disc {
                    cx,
                    cy,
                    radius,
                    color,
                } => canvas.fill_circle(*cx, *cy, *radius, color.as_tuple()),
                DrawCommand::ArcBand {
                    cx,
                    cy,
                    radius,
                    thickness,
                    start_angle,
                    arc_span,
                    color,
                } => canvas.stroke_arc(
                    *cx,
                    *cy,
                    *radius,
                    *thickness,
                    *start_angle,
                    *arc_span,
                    color.as_tuple(),
                ),
                DrawCommand::Tick {
                    x0,
                    y0,
                    x1,
                    y1,
                    thickness,
                    color,
                } => canvas.thick_line(*x0, *y0, *x1, *y1, *thickness, color.as_tuple()),
                DrawCommand::Needle {
                    x0,
                    y0,
                    x1,
                    y1,
                    width,
                    color,
                } => canvas.tapered_line(*x0, *y0, *x1, *y1, *width, color.as_tuple()),
                DrawCommand::RoundedRect {
                    cx,
                    cy,
                    width,
                    height,
                    corner,
                    color,
                } => {
                    canvas.fill_rounded_rect(*cx, *cy, *width, *height, *corner, color.as_tuple())
                }
                DrawCommand::Label {
                    x,
                    y,
                    rotation,
                    text,
                    font_size,
                    color,
                } => {
                    canvas.rotated_text(*x, *y, *rotation, text, font, *font_size, color.as_tuple())
                }
                DrawCommand::Text {
                    x,
                    y,
                    text,
                    font_size,
                    color,
                } => canvas.text(*x, *y, text, font, *font_size, color.as_tuple()),
            }
        }
    }
}

fn build_scene(state: &DialState, config: &DialConfig, layout: &DialLayout, font: &Font) -> Scene {
    let theme = &config.theme;
    let mut scene = Scene::new();
    scene.push(DrawCommand::Clear(theme.background));

    // Concentric rings
    for (radius, color) in [
        (layout.dial_radius, theme.rim),
        (layout.ring_radius, theme.ring),
        (layout.face_radius, theme.face),
    ] {
        scene.push(DrawCommand::Disc {
            cx: layout.cx,
            cy: layout.cy,
            radius,
            color,
        });
    }

    // Arc window the labels show through
    scene.push(DrawCommand::ArcBand {
        cx: layout.cx,
        cy: layout.cy,
        radius: layout.arc_radius,
        thickness: layout.arc_thickness,
        start_angle: ARC_START_DEG.to_radians(),
        arc_span: ARC_SPAN_DEG.to_radians(),
        color: theme.arc_window,
    });

    // Tick marks along the window, the centre position left open for the needle
    let tick_step = ARC_SPAN_DEG / (TICK_COUNT as f64 - 1.0);
    for i in 0..TICK_COUNT {
        if i == TICK_COUNT / 2 {
            continue;
        }
        let angle = (ARC_START_DEG + tick_step * i as f64).to_radians();
        scene.push(DrawCommand::Tick {
            x0: layout.cx + angle.cos() * layout.tick_inner_radius,
            y0: layout.cy + angle.sin() * layout.tick_inner_radius,
            x1: layout.cx + angle.cos() * layout.tick_outer_radius,
            y1: layout.cy + angle.sin() * layout.tick_outer_radius,
            thickness: 2.0,
            color: theme.tick,
        });
    }

    // Rotating label ring, clipped to the window by angle
    for index in 0..LABEL_COUNT {
        let angle = label_angle(state.rotation_angle(), index);
        if !label_visible(angle) {
            continue;
        }
        let rad = angle.to_radians();
        scene.push(DrawCommand::Label {
            x: layout.cx + rad.cos() * layout.label_radius,
            y: layout.cy + rad.sin() * layout.label_radius,
            rotation: (angle + 90.0).to_radians(),
            text: (index * 10).to_string(),
            font_size: config.label_font_size,
            color: theme.label_text,
        });
    }

    // Hub and fixed needle
    scene.push(DrawCommand::Disc {
        cx: layout.cx,
        cy: layout.cy,
        radius: layout.hub_radius,
        color: theme.hub,
    });
    scene.push(DrawCommand::Disc {
        cx: layout.cx,
        cy: layout.cy,
        radius: layout.hub_dot_radius,
        color: theme.hub_dot,
    });
    scene.push(DrawCommand::Needle {
        x0: layout.cx,
        y0: layout.cy,
        x1: layout.cx,
        y1: layout.cy - layout.needle_length,
        width: config.needle_width,
        color: theme.needle,
    });

    // Readout badge
    let readout = state.display_weight().to_string();
    let text_w = draw::text_width(&readout, font, config.badge_font_size);
    let badge_h = config.badge_font_size as f64 * 1.5;
    scene.push(DrawCommand::RoundedRect {
        cx: layout.cx,
        cy: layout.badge_center_y,
        width: text_w + config.badge_font_size as f64 * 1.8,
        height: badge_h,
        corner: badge_h / 2.0,
        color: theme.badge,
    });
    scene.push(DrawCommand::Text {
        x: layout.cx,
        y: layout.badge_center_y,
        text: readout,
        font_size: config.badge_font_size,
        color: theme.badge_text,
    });

    // Step buttons
    for (label, (bx, by)) in [("-5", layout.button_down), ("+5", layout.button_up)] {
        scene.push(DrawCommand::Disc {
            cx: bx,
            cy: by,
            radius: layout.button_radius,
            color: theme.button,
        });
        scene.push(DrawCommand::Text {
            x: bx,
            y: by,
            text: label.to_string(),
            font_size: config.button_font_size,
            color: theme.button_text,
        });
    }

    scene
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> DialConfig {
        DialConfig::builder().build()
    }

    fn default_layout() -> DialLayout {
        let config = default_config();
        DialLayout::new(config.window_width, config.window_height, &config)
    }

    #[test]
    fn buttons_sit_inside_the_dial() {
        let layout = default_layout();
        for (bx, by) in [layout.button_down, layout.button_up] {
            let dist = ((bx - layout.cx).powi(2) + (by - layout.cy).powi(2)).sqrt();
            assert!(dist + layout.button_radius <= layout.dial_radius);
        }
    }

    #[test]
    fn buttons_are_symmetric_about_the_centre() {
        let layout = default_layout();
        assert!(
            ((layout.cx - layout.button_down.0) - (layout.button_up.0 - layout.cx)).abs() < 1e-9
        );
        assert_eq!(layout.button_down.1, layout.button_up.1);
    }

    #[test]
    fn hit_testing_matches_button_geometry() {
        let layout = default_layout();
        assert!(layout.hits_step_down(layout.button_down.0, layout.button_down.1));
        assert!(layout.hits_step_up(layout.button_up.0, layout.button_up.1));
        assert!(!layout.hits_step_down(layout.cx, layout.cy));
        assert!(!layout.hits_step_up(layout.cx, layout.cy));
        // Just outside the rim of the up button.
        assert!(!layout.hits_step_up(
            layout.button_up.0 + layout.button_radius + 1.0,
            layout.button_up.1
        ));
    }

    #[test]
    fn visible_labels_at_rest_are_the_low_and_high_ends() {
        let state = DialState::from_weight(0.0);
        let visible: Vec<usize> = (0..LABEL_COUNT)
            .filter(|&i| label_visible(label_angle(state.rotation_angle(), i)))
            .map(|i| i * 10)
            .collect();
        assert_eq!(visible, vec![0, 10, 20, 140, 150]);
    }

    #[test]
    fn label_under_the_pointer_matches_the_display_weight() {
        let mut state = DialState::new();
        for weight in (0..=150).step_by(10) {
            state.set_weight(weight as f32);
            let index = weight / 10;
            let angle = label_angle(state.rotation_angle(), index).rem_euclid(360.0);
            // 270 degrees is the top of the dial, where the pointer sits.
            assert!(
                (angle - 270.0).abs() < 0.01,
                "weight {weight}: label at {angle}"
            );
        }
    }

    #[test]
    fn scene_badge_shows_the_display_weight() {
        let config = default_config();
        let layout = default_layout();
        let font = Font::try_from_bytes(theme::REGULAR_FONT).expect("embedded font parses");
        let state = DialState::new();
        let scene = build_scene(&state, &config, &layout, &font);

        assert!(matches!(
            scene.commands.first(),
            Some(DrawCommand::Clear(_))
        ));
        let badge_text = scene
            .commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "20"));
        assert!(badge_text);
        let needles = scene
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Needle { .. }))
            .count();
        assert_eq!(needles, 1);
    }
}
