//! Pan/zoom view state and cursor-to-tile resolution.

use glam::Vec2;

use fleetdeck_core::{Tile, WorldSnapshot};

use crate::{TILE_HEIGHT, TILE_WIDTH};

/// Smallest permitted zoom factor.
pub const MIN_ZOOM: f32 = 0.5;

/// Largest permitted zoom factor.
pub const MAX_ZOOM: f32 = 5.0;

/// Multiplicative step applied per zoom request.
pub const ZOOM_STEP: f32 = 1.2;

/// Affine map between logical map pixels and screen pixels.
///
/// Screen position is `logical * zoom + pan`; the inverse feeds hover
/// resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    /// Uniform scale factor.
    pub zoom: f32,
    /// Screen-pixel offset of the map origin.
    pub pan: Vec2,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl ViewTransform {
    /// Maps a logical map position to screen pixels.
    #[must_use]
    pub fn to_screen(&self, logical: Vec2) -> Vec2 {
        logical * self.zoom + self.pan
    }

    /// Maps a screen position back to logical map pixels.
    #[must_use]
    pub fn to_logical(&self, screen: Vec2) -> Vec2 {
        (screen - self.pan) / self.zoom
    }
}

/// Per-selection view state of the world map: zoom, pan, drag and hover.
///
/// Reset whenever the selection is cleared so a freshly selected bot never
/// inherits the previous bot's viewport.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewState {
    zoom: f32,
    pan: Vec2,
    drag_anchor: Option<Vec2>,
    hovered: Option<Tile>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewState {
    /// Creates a view at identity zoom with no pan.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
            drag_anchor: None,
            hovered: None,
        }
    }

    /// Current affine transform for drawing and hit-testing.
    #[must_use]
    pub fn transform(&self) -> ViewTransform {
        ViewTransform {
            zoom: self.zoom,
            pan: self.pan,
        }
    }

    /// Zoom factor rounded to a whole percentage for display.
    #[must_use]
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }

    /// Steps the zoom in, clamped to [`MAX_ZOOM`].
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(MAX_ZOOM);
    }

    /// Steps the zoom out, clamped to [`MIN_ZOOM`].
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(MIN_ZOOM);
    }

    /// Restores identity zoom and zero pan; the hover is left alone.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.pan = Vec2::ZERO;
    }

    /// Starts a pan drag at the provided cursor position.
    pub fn begin_drag(&mut self, cursor: Vec2) {
        self.drag_anchor = Some(cursor - self.pan);
    }

    /// Updates the pan while a drag is active.
    pub fn drag_to(&mut self, cursor: Vec2) {
        if let Some(anchor) = self.drag_anchor {
            self.pan = cursor - anchor;
        }
    }

    /// Ends the active drag, if any.
    pub fn end_drag(&mut self) {
        self.drag_anchor = None;
    }

    /// Reports whether a pan drag is in progress.
    #[must_use]
    pub const fn is_dragging(&self) -> bool {
        self.drag_anchor.is_some()
    }

    /// Tile currently under the cursor, if any.
    #[must_use]
    pub fn hovered(&self) -> Option<&Tile> {
        self.hovered.as_ref()
    }

    /// Resolves which tile the cursor is over, returning whether the hover
    /// changed (callers redraw on `true`).
    ///
    /// Lookup trusts row-major tile order (`index = x + y * width`) and falls
    /// back to a linear coordinate scan when the indexed tile disagrees.
    /// In-bounds positions with no tile entry hover a synthetic empty tile;
    /// out-of-bounds positions and active drags clear the hover.
    pub fn resolve_hover(&mut self, cursor: Option<Vec2>, world: &WorldSnapshot) -> bool {
        if self.is_dragging() {
            return false;
        }
        let next = cursor.and_then(|cursor| self.tile_under(cursor, world));
        if next == self.hovered {
            return false;
        }
        self.hovered = next;
        true
    }

    fn tile_under(&self, cursor: Vec2, world: &WorldSnapshot) -> Option<Tile> {
        let logical = self.transform().to_logical(cursor);
        if logical.x < 0.0 || logical.y < 0.0 {
            return None;
        }

        let tile_x = (logical.x / TILE_WIDTH).floor() as u32;
        let tile_y = (logical.y / TILE_HEIGHT).floor() as u32;
        if tile_x >= world.width || tile_y >= world.height {
            return None;
        }

        let index = (tile_x + tile_y * world.width) as usize;
        let direct = world
            .tiles
            .get(index)
            .filter(|tile| tile.x == tile_x && tile.y == tile_y);
        let found = direct.or_else(|| {
            world
                .tiles
                .iter()
                .find(|tile| tile.x == tile_x && tile.y == tile_y)
        });

        Some(found.cloned().unwrap_or_else(|| Tile::empty_at(tile_x, tile_y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_core::ItemId;

    fn world_with(tiles: Vec<Tile>) -> WorldSnapshot {
        WorldSnapshot {
            width: 100,
            height: 60,
            tiles,
            ..WorldSnapshot::default()
        }
    }

    fn tile(x: u32, y: u32, fg: u32) -> Tile {
        Tile {
            x,
            y,
            fg_id: ItemId::new(fg),
            ..Tile::default()
        }
    }

    fn row_major(width: u32, height: u32) -> Vec<Tile> {
        let mut tiles = Vec::new();
        for y in 0..height {
            for x in 0..width {
                tiles.push(tile(x, y, 0));
            }
        }
        tiles
    }

    #[test]
    fn zoom_steps_are_clamped_at_both_ends() {
        let mut view = ViewState::new();
        for _ in 0..20 {
            view.zoom_in();
        }
        assert_eq!(view.transform().zoom, MAX_ZOOM);

        for _ in 0..30 {
            view.zoom_out();
        }
        assert_eq!(view.transform().zoom, MIN_ZOOM);

        view.reset();
        assert_eq!(view.transform().zoom, 1.0);
        assert_eq!(view.transform().pan, Vec2::ZERO);
    }

    #[test]
    fn zoom_percent_rounds_for_display() {
        let mut view = ViewState::new();
        view.zoom_in();
        view.zoom_in();
        assert_eq!(view.zoom_percent(), 144);
    }

    #[test]
    fn dragging_translates_the_pan_by_cursor_delta() {
        let mut view = ViewState::new();
        view.begin_drag(Vec2::new(10.0, 10.0));
        view.drag_to(Vec2::new(25.0, 4.0));
        view.end_drag();

        assert_eq!(view.transform().pan, Vec2::new(15.0, -6.0));

        // Movement after release does not pan.
        view.drag_to(Vec2::new(100.0, 100.0));
        assert_eq!(view.transform().pan, Vec2::new(15.0, -6.0));
    }

    #[test]
    fn hover_hit_test_inverts_pan_and_zoom() {
        let mut tiles = row_major(100, 60);
        tiles[(3 + 4 * 100) as usize] = tile(3, 4, 10);
        let world = world_with(tiles);

        let mut view = ViewState::new();
        view.begin_drag(Vec2::ZERO);
        view.drag_to(Vec2::new(-10.0, 20.0));
        view.end_drag();
        for _ in 0..4 {
            view.zoom_in();
        }
        // zoom = 1.2^4; pan = (-10, 20). Aim at the center of tile (3, 4).
        let zoom = view.transform().zoom;
        let cursor = Vec2::new(3.5 * TILE_WIDTH, 4.5 * TILE_HEIGHT) * zoom
            + Vec2::new(-10.0, 20.0);

        assert!(view.resolve_hover(Some(cursor), &world));
        let hovered = view.hovered().expect("tile under cursor");
        assert_eq!((hovered.x, hovered.y), (3, 4));
        assert_eq!(hovered.fg_id, ItemId::new(10));

        // Same tile again: no change reported.
        assert!(!view.resolve_hover(Some(cursor), &world));
    }

    #[test]
    fn reordered_tile_arrays_fall_back_to_a_coordinate_scan() {
        // Tiles arrive in reverse order, so the row-major index is wrong for
        // every position.
        let mut tiles = row_major(100, 60);
        tiles.reverse();
        let expected = tile(3, 4, 10);
        let position = tiles
            .iter()
            .position(|t| t.x == 3 && t.y == 4)
            .expect("tile present");
        tiles[position] = expected.clone();
        let world = world_with(tiles);

        let mut view = ViewState::new();
        let cursor = Vec2::new(3.5 * TILE_WIDTH, 4.5 * TILE_HEIGHT);
        assert!(view.resolve_hover(Some(cursor), &world));
        assert_eq!(view.hovered(), Some(&expected));
    }

    #[test]
    fn missing_entries_hover_a_synthetic_empty_tile() {
        let world = world_with(Vec::new());
        let mut view = ViewState::new();

        let cursor = Vec2::new(0.5 * TILE_WIDTH, 0.5 * TILE_HEIGHT);
        assert!(view.resolve_hover(Some(cursor), &world));
        assert_eq!(view.hovered(), Some(&Tile::empty_at(0, 0)));
    }

    #[test]
    fn out_of_bounds_and_dragging_produce_no_hover() {
        let world = world_with(row_major(100, 60));
        let mut view = ViewState::new();

        let inside = Vec2::new(0.5 * TILE_WIDTH, 0.5 * TILE_HEIGHT);
        assert!(view.resolve_hover(Some(inside), &world));

        // Past the right edge.
        let outside = Vec2::new(100.5 * TILE_WIDTH, 0.5 * TILE_HEIGHT);
        assert!(view.resolve_hover(Some(outside), &world));
        assert!(view.hovered().is_none());

        // Negative logical coordinates after panning right.
        view.begin_drag(Vec2::ZERO);
        view.drag_to(Vec2::new(50.0, 0.0));
        view.end_drag();
        assert!(!view.resolve_hover(Some(Vec2::new(10.0, 10.0)), &world));
        assert!(view.hovered().is_none());

        // Hover is frozen mid-drag.
        view.begin_drag(Vec2::ZERO);
        assert!(!view.resolve_hover(Some(inside), &world));
    }
}
