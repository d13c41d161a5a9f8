#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for the Fleetdeck world map.
//!
//! Macroquad's optional audio stack depends on native ALSA development
//! libraries, which are unavailable in the containerised CI environment. To
//! keep `cargo test` usable everywhere we depend on macroquad without its
//! default `audio` feature; this adapter never plays sound anyway.

mod theme;

pub use theme::Theme;

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    input::{
        is_key_pressed, is_mouse_button_pressed, is_mouse_button_released, mouse_position,
        mouse_wheel, KeyCode, MouseButton,
    },
    shapes::{draw_rectangle, draw_rectangle_lines},
    text::draw_text,
};
use std::time::Duration;

use fleetdeck_rendering::{
    Color, FrameInput, Presentation, RenderingBackend, Scene, HOVER_BORDER,
};

/// Snapshot of edge-triggered keyboard shortcuts observed during a single frame.
#[derive(Clone, Copy, Debug, Default)]
struct KeyboardShortcuts {
    /// `Q` or `Escape` to quit the render loop.
    quit_requested: bool,
    /// `+`/`=` zooms the map in.
    zoom_in: bool,
    /// `-` zooms the map out.
    zoom_out: bool,
    /// `R` resets zoom and pan.
    reset_view: bool,
    /// `H` scans the selected bot's world for harvest-ready tiles.
    harvest_scan: bool,
    /// `E` toggles transport-event mirroring for the selected bot.
    toggle_enet: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        let quit_requested = is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q);
        let zoom_in = is_key_pressed(KeyCode::Equal) || is_key_pressed(KeyCode::KpAdd);
        let zoom_out = is_key_pressed(KeyCode::Minus) || is_key_pressed(KeyCode::KpSubtract);
        let reset_view = is_key_pressed(KeyCode::R);
        let harvest_scan = is_key_pressed(KeyCode::H);
        let toggle_enet = is_key_pressed(KeyCode::E);

        Self {
            quit_requested,
            zoom_in,
            zoom_out,
            reset_view,
            harvest_scan,
            toggle_enet,
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
    theme: Theme,
}

impl Default for MacroquadBackend {
    fn default() -> Self {
        Self {
            swap_interval: None,
            show_fps: false,
            theme: Theme::default(),
        }
    }
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display
    /// refresh rate or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend draws a frames-per-second readout.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }

    /// Overrides the default color theme.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
            theme,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: 1280,
            window_height: 720,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let background = to_macroquad_color(theme.background.unwrap_or(clear_color));
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                if keyboard.quit_requested {
                    break;
                }

                macroquad::window::clear_background(background);

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let frame_input = gather_frame_input(keyboard);

                update_scene(frame_dt, frame_input, &mut scene);

                draw_scene(&scene, &theme);

                if show_fps {
                    let _ = fps_counter.record_frame(frame_dt);
                    fps_counter.draw();
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

fn gather_frame_input(keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let (_, wheel_y) = mouse_wheel();

    FrameInput {
        cursor: Some(Vec2::new(cursor_x, cursor_y)),
        drag_started: is_mouse_button_pressed(MouseButton::Left),
        drag_ended: is_mouse_button_released(MouseButton::Left),
        zoom_in: keyboard.zoom_in || wheel_y > 0.0,
        zoom_out: keyboard.zoom_out || wheel_y < 0.0,
        reset_view: keyboard.reset_view,
        harvest_scan: keyboard.harvest_scan,
        toggle_enet: keyboard.toggle_enet,
    }
}

fn draw_scene(scene: &Scene, theme: &Theme) {
    let view = scene.view;

    for quad in &scene.quads {
        let origin = view.to_screen(Vec2::new(quad.x, quad.y));
        draw_rectangle(
            origin.x,
            origin.y,
            quad.width * view.zoom,
            quad.height * view.zoom,
            to_macroquad_color(quad.color),
        );
    }

    if let Some(hover) = &scene.hover {
        let origin = view.to_screen(Vec2::new(hover.x, hover.y));
        let width = hover.width * view.zoom;
        let height = hover.height * view.zoom;
        draw_rectangle(
            origin.x,
            origin.y,
            width,
            height,
            to_macroquad_color(hover.color),
        );
        draw_rectangle_lines(
            origin.x - 0.5,
            origin.y - 0.5,
            width + 1.0,
            height + 1.0,
            1.0,
            to_macroquad_color(theme.hover_border.unwrap_or(HOVER_BORDER)),
        );
    }
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Clone, Copy, Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    last_fps: f32,
}

impl FpsCounter {
    /// Records a rendered frame and returns the average once one second has
    /// elapsed.
    fn record_frame(&mut self, frame: Duration) -> Option<f32> {
        self.elapsed += frame;
        self.frames = self.frames.saturating_add(1);

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        if seconds > f32::EPSILON {
            self.last_fps = self.frames as f32 / seconds;
        }
        self.elapsed = Duration::ZERO;
        self.frames = 0;
        Some(self.last_fps)
    }

    fn draw(&self) {
        let _ = draw_text(&format!("{:.0} fps", self.last_fps), 8.0, 16.0, 16.0, {
            to_macroquad_color(Color::from_rgb_u8(0xFF, 0xFF, 0xFF))
        });
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
