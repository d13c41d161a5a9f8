#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Harvest-eligibility scan over a bot's world snapshot.
//!
//! The scan walks every planted seed tile and reports the ones ready to
//! harvest, either because the server flagged them or because enough time
//! elapsed against the crop's grow time. Grow times come from the shared
//! item cache, so an incomplete cache yields fetch effects and a partial
//! (never wrong) result; the excluded tiles qualify on a later pass once
//! their definitions arrive.

use fleetdeck_core::{BotAction, Effect, ItemId, Tile, WorldSnapshot};
use fleetdeck_session::ItemCache;

/// One seed tile that is ready to harvest right now.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HarvestCandidate {
    /// Column of the tile.
    pub x: u32,
    /// Row of the tile.
    pub y: u32,
    /// Foreground item planted on the tile.
    pub item_id: ItemId,
    /// Crop name for display.
    pub item_name: String,
}

impl HarvestCandidate {
    /// Builds the bot action that harvests this tile.
    #[must_use]
    pub fn harvest_action(&self) -> BotAction {
        BotAction::HarvestTile {
            x: self.x,
            y: self.y,
        }
    }
}

/// Scans a world for harvest-ready seed tiles, in tile-array order.
///
/// A tile qualifies when it carries a planted seed whose definition is
/// cached and either the server marked it `ready_to_harvest` or its elapsed
/// time reached the crop's grow time. Tiles with uncached crops are excluded
/// from this pass; the cache lookup emits the fetch that admits them next
/// time.
#[must_use]
pub fn scan(
    world: &WorldSnapshot,
    items: &ItemCache,
    out_effects: &mut Vec<Effect>,
) -> Vec<HarvestCandidate> {
    world
        .tiles
        .iter()
        .filter(|tile| !tile.fg_id.is_empty() && tile.is_seed())
        .filter_map(|tile| candidate(tile, items, out_effects))
        .collect()
}

fn candidate(
    tile: &Tile,
    items: &ItemCache,
    out_effects: &mut Vec<Effect>,
) -> Option<HarvestCandidate> {
    let item = items.lookup(tile.fg_id, out_effects)?;
    let extra = tile.extra.as_ref();

    let flagged = extra.is_some_and(|extra| extra.ready_to_harvest);
    let grown =
        item.grow_time > 0 && extra.is_some_and(|extra| extra.time_passed >= item.grow_time);
    if !(flagged || grown) {
        return None;
    }

    Some(HarvestCandidate {
        x: tile.x,
        y: tile.y,
        item_id: tile.fg_id,
        item_name: item.name.clone(),
    })
}
