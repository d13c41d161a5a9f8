//! Scene construction: world snapshot in, colored quads out.

use fleetdeck_core::{Effect, ItemId, Tile, WorldSnapshot};
use fleetdeck_session::ItemCache;

use crate::{
    palette::tile_color, Color, ViewTransform, BACKGROUND_SHADE, HOVER_FILL, SKY_COLOR,
    TILE_HEIGHT, TILE_WIDTH,
};

/// Axis-aligned colored rectangle in logical map pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    /// Left edge in logical pixels.
    pub x: f32,
    /// Top edge in logical pixels.
    pub y: f32,
    /// Width in logical pixels.
    pub width: f32,
    /// Height in logical pixels.
    pub height: f32,
    /// Fill color, possibly translucent.
    pub color: Color,
}

impl Quad {
    fn tile(x: u32, y: u32, color: Color) -> Self {
        Self {
            x: x as f32 * TILE_WIDTH,
            y: y as f32 * TILE_HEIGHT,
            width: TILE_WIDTH,
            height: TILE_HEIGHT,
            color,
        }
    }
}

/// Declarative map scene consumed by rendering backends.
///
/// Quads are listed in paint order and expressed in logical pixels; backends
/// apply the view transform when drawing. An empty scene (no selected bot or
/// no world) draws nothing but the clear color.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    /// Logical pixel width of the world, before zoom.
    pub width: f32,
    /// Logical pixel height of the world, before zoom.
    pub height: f32,
    /// Filled rectangles in paint order, starting with the sky.
    pub quads: Vec<Quad>,
    /// Hovered tile outline, drawn last.
    pub hover: Option<Quad>,
    /// Pan/zoom transform backends apply when drawing.
    pub view: ViewTransform,
}

impl Scene {
    /// Creates a scene that renders nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Builds the scene for one world snapshot.
///
/// Layer order per tile matches the dashboard map: background color, then a
/// translucent shade to push the background back, then the foreground color.
/// Layers whose color cannot be resolved yet are skipped for this frame; the
/// cache lookups inside [`tile_color`] emit the fetches that fill them in.
#[must_use]
pub fn build_scene(
    world: &WorldSnapshot,
    items: &ItemCache,
    view: ViewTransform,
    hovered: Option<&Tile>,
    out_effects: &mut Vec<Effect>,
) -> Scene {
    let width = world.width as f32 * TILE_WIDTH;
    let height = world.height as f32 * TILE_HEIGHT;

    let mut quads = Vec::with_capacity(world.tiles.len() + 1);
    quads.push(Quad {
        x: 0.0,
        y: 0.0,
        width,
        height,
        color: SKY_COLOR,
    });

    for tile in &world.tiles {
        if !tile.bg_id.is_empty() {
            if let Some(color) = tile_color(tile.bg_id, items, out_effects) {
                quads.push(Quad::tile(tile.x, tile.y, color));
                quads.push(Quad::tile(tile.x, tile.y, BACKGROUND_SHADE));
            }
        }
        if !tile.fg_id.is_empty() {
            if let Some(color) = tile_color(tile.fg_id, items, out_effects) {
                quads.push(Quad::tile(tile.x, tile.y, color));
            }
        }
    }

    let hover = hovered.map(|tile| Quad::tile(tile.x, tile.y, HOVER_FILL));

    Scene {
        width,
        height,
        quads,
        hover,
        view,
    }
}

/// Text content of the hovered-tile tooltip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileTooltip {
    /// Column of the described tile.
    pub x: u32,
    /// Row of the described tile.
    pub y: u32,
    /// Foreground layer label.
    pub foreground: String,
    /// Background layer label.
    pub background: String,
}

impl TileTooltip {
    /// Describes a tile for display, fetching unknown item names on miss.
    #[must_use]
    pub fn for_tile(tile: &Tile, items: &ItemCache, out_effects: &mut Vec<Effect>) -> Self {
        Self {
            x: tile.x,
            y: tile.y,
            foreground: layer_label(tile.fg_id, items, out_effects),
            background: layer_label(tile.bg_id, items, out_effects),
        }
    }
}

fn layer_label(id: ItemId, items: &ItemCache, out_effects: &mut Vec<Effect>) -> String {
    if id.is_empty() {
        return "Empty".to_owned();
    }
    match items.lookup(id, out_effects) {
        Some(item) => item.name.clone(),
        None => format!("ID: {}", id.get()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdeck_core::ItemDefinition;

    fn world_with(tiles: Vec<Tile>) -> WorldSnapshot {
        WorldSnapshot {
            width: 10,
            height: 6,
            tiles,
            ..WorldSnapshot::default()
        }
    }

    #[test]
    fn background_layers_get_a_shade_quad_foregrounds_do_not() {
        let world = world_with(vec![Tile {
            x: 1,
            y: 2,
            fg_id: ItemId::new(2),
            bg_id: ItemId::new(14),
            ..Tile::default()
        }]);

        let mut effects = Vec::new();
        let scene = build_scene(&world, &ItemCache::new(), ViewTransform::default(), None, &mut effects);

        // Sky, background fill, background shade, foreground fill.
        assert_eq!(scene.quads.len(), 4);
        assert_eq!(scene.quads[0].color, SKY_COLOR);
        assert_eq!(scene.quads[2].color, BACKGROUND_SHADE);
        assert_eq!(scene.quads[3].color, Color::from_rgb_u8(0x8B, 0x45, 0x13));
        assert_eq!(scene.quads[3].x, TILE_WIDTH);
        assert_eq!(scene.quads[3].y, 2.0 * TILE_HEIGHT);
        assert!(effects.is_empty());
    }

    #[test]
    fn unresolved_layers_are_skipped_this_frame() {
        let world = world_with(vec![Tile {
            x: 0,
            y: 0,
            fg_id: ItemId::new(7000),
            ..Tile::default()
        }]);

        let mut effects = Vec::new();
        let scene = build_scene(&world, &ItemCache::new(), ViewTransform::default(), None, &mut effects);

        assert_eq!(scene.quads.len(), 1);
        assert_eq!(effects.len(), 1);
    }

    #[test]
    fn hover_quad_covers_the_hovered_tile() {
        let world = world_with(Vec::new());
        let hovered = Tile::empty_at(4, 3);

        let mut effects = Vec::new();
        let scene = build_scene(
            &world,
            &ItemCache::new(),
            ViewTransform::default(),
            Some(&hovered),
            &mut effects,
        );

        let hover = scene.hover.expect("hover quad");
        assert_eq!(hover.x, 4.0 * TILE_WIDTH);
        assert_eq!(hover.y, 3.0 * TILE_HEIGHT);
        assert_eq!(hover.color, HOVER_FILL);
    }

    #[test]
    fn tooltip_labels_cover_named_unknown_and_empty_layers() {
        let mut items = ItemCache::new();
        items.insert(ItemDefinition {
            id: ItemId::new(2),
            name: "Dirt".to_owned(),
            ..ItemDefinition::default()
        });

        let tile = Tile {
            x: 5,
            y: 1,
            fg_id: ItemId::new(2),
            bg_id: ItemId::new(7000),
            ..Tile::default()
        };

        let mut effects = Vec::new();
        let tooltip = TileTooltip::for_tile(&tile, &items, &mut effects);
        assert_eq!(tooltip.foreground, "Dirt");
        assert_eq!(tooltip.background, "ID: 7000");
        assert_eq!(effects.len(), 1);

        let empty = Tile::empty_at(0, 0);
        let tooltip = TileTooltip::for_tile(&empty, &items, &mut effects);
        assert_eq!(tooltip.foreground, "Empty");
        assert_eq!(tooltip.background, "Empty");
    }
}
