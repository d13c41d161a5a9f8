#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Fleetdeck map adapters.
//!
//! The world map is drawn as flat colored quads in a logical pixel space
//! (tiles are wider than tall) that a per-frame view transform pans and
//! zooms. Everything here is backend-agnostic: scene construction, the view
//! state machine and color resolution are pure so they can be tested without
//! a window.

mod palette;
mod scene;
mod view;

pub use palette::{packed_base_color, terrain_color, tile_color};
pub use scene::{build_scene, Quad, Scene, TileTooltip};
pub use view::{ViewState, ViewTransform, MAX_ZOOM, MIN_ZOOM, ZOOM_STEP};

use anyhow::Result as AnyResult;
use glam::Vec2;
use std::time::Duration;

/// Logical pixel width of one tile before zoom.
pub const TILE_WIDTH: f32 = 8.5;

/// Logical pixel height of one tile before zoom.
pub const TILE_HEIGHT: f32 = 6.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }
}

/// Sky color used to clear the map behind the tiles.
pub const SKY_COLOR: Color = Color::from_rgb_u8(0x84, 0xC5, 0xE2);

/// Translucent black drawn over background-layer tiles to push them back.
pub const BACKGROUND_SHADE: Color = Color::new(0.0, 0.0, 0.0, 0.3);

/// Translucent white drawn over the hovered tile.
pub const HOVER_FILL: Color = Color::new(1.0, 1.0, 1.0, 0.4);

/// Border color of the hovered tile.
pub const HOVER_BORDER: Color = Color::from_rgb_u8(0xFF, 0xFF, 0xFF);

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Cursor position in screen pixels relative to the map viewport.
    pub cursor: Option<Vec2>,
    /// Whether the pan button was pressed on this frame.
    pub drag_started: bool,
    /// Whether the pan button was released (or the cursor left) on this frame.
    pub drag_ended: bool,
    /// Whether the adapter detected a zoom-in request on this frame.
    pub zoom_in: bool,
    /// Whether the adapter detected a zoom-out request on this frame.
    pub zoom_out: bool,
    /// Whether the adapter detected a view-reset request on this frame.
    pub reset_view: bool,
    /// Whether the adapter detected a harvest-scan request on this frame.
    pub harvest_scan: bool,
    /// Whether the adapter detected a transport-mirroring toggle on this frame.
    pub toggle_enet: bool,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Fleetdeck map scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, and may rebuild the scene
    /// before it is rendered.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) + 'static;
}
