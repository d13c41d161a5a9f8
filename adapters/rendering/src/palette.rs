//! Tile color resolution: terrain overrides, then item base colors.

use fleetdeck_core::{Effect, ItemDefinition, ItemId};
use fleetdeck_session::ItemCache;

use crate::Color;

/// Hand-tuned colors for the terrain blocks that dominate most worlds.
///
/// These override whatever the item database reports because the packed base
/// colors of terrain items read poorly at map scale. Seed variants share
/// their block's color.
#[must_use]
pub fn terrain_color(id: ItemId) -> Option<Color> {
    let color = match id.get() {
        0 => Color::from_rgb_u8(0x84, 0xC5, 0xE2),
        2 | 3 => Color::from_rgb_u8(0x8B, 0x45, 0x13),
        4 | 5 => Color::from_rgb_u8(0xFD, 0x86, 0x07),
        6 => Color::from_rgb_u8(0x8A, 0x2B, 0xE2),
        8 => Color::from_rgb_u8(0x22, 0x22, 0x22),
        10 | 11 => Color::from_rgb_u8(0xB9, 0xC2, 0xC6),
        12 | 13 => Color::from_rgb_u8(0x86, 0x48, 0x01),
        14 | 15 => Color::from_rgb_u8(0x5E, 0x40, 0x1B),
        20 => Color::from_rgb_u8(0xEF, 0xDE, 0xC4),
        22 | 24 => Color::from_rgb_u8(0x65, 0x43, 0x21),
        340 | 341 => Color::from_rgb_u8(0xDE, 0xBC, 0x22),
        4584 | 4585 => Color::from_rgb_u8(0x00, 0xFF, 0x26),
        5666 | 5667 => Color::from_rgb_u8(0xFF, 0x00, 0x00),
        _ => return None,
    };
    Some(color)
}

/// Extracts the displayable color packed into an item definition.
///
/// The database packs colors as `0xAARRGGBB`; the alpha byte is discarded and
/// a zero value means the item carries no color at all.
#[must_use]
pub fn packed_base_color(item: &ItemDefinition) -> Option<Color> {
    if item.base_color == 0 {
        return None;
    }
    let value = item.base_color;
    let red = ((value >> 16) & 0xFF) as u8;
    let green = ((value >> 8) & 0xFF) as u8;
    let blue = (value & 0xFF) as u8;
    Some(Color::from_rgb_u8(red, green, blue))
}

/// Resolves the map color for an item layer.
///
/// Resolution order: terrain override, then the cached definition's packed
/// base color. Uncached items resolve to `None` for this frame while the
/// cache emits a fetch; the tile fills in once the definition arrives.
#[must_use]
pub fn tile_color(id: ItemId, items: &ItemCache, out_effects: &mut Vec<Effect>) -> Option<Color> {
    if let Some(color) = terrain_color(id) {
        return Some(color);
    }
    items.lookup(id, out_effects).and_then(packed_base_color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_overrides_win_over_the_item_database() {
        let mut items = ItemCache::new();
        items.insert(ItemDefinition {
            id: ItemId::new(2),
            name: "Dirt".to_owned(),
            base_color: 0xFF00_FF00,
            ..ItemDefinition::default()
        });

        let mut effects = Vec::new();
        let color = tile_color(ItemId::new(2), &items, &mut effects).expect("terrain color");
        assert_eq!(color, Color::from_rgb_u8(0x8B, 0x45, 0x13));
        assert!(effects.is_empty());
    }

    #[test]
    fn packed_base_color_drops_the_alpha_byte() {
        let item = ItemDefinition {
            id: ItemId::new(7000),
            base_color: 0xFF12_3456,
            ..ItemDefinition::default()
        };
        assert_eq!(
            packed_base_color(&item),
            Some(Color::from_rgb_u8(0x12, 0x34, 0x56))
        );
    }

    #[test]
    fn zero_base_color_means_no_color() {
        let item = ItemDefinition {
            id: ItemId::new(7000),
            base_color: 0,
            ..ItemDefinition::default()
        };
        assert!(packed_base_color(&item).is_none());
    }

    #[test]
    fn uncached_items_resolve_to_none_and_fetch() {
        let items = ItemCache::new();
        let mut effects = Vec::new();

        assert!(tile_color(ItemId::new(7000), &items, &mut effects).is_none());
        assert_eq!(effects.len(), 1);
    }
}
