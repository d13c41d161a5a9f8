#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Fleetdeck dashboard.
//!
//! This crate defines the data model pushed by the fleet server and the typed
//! message surface that connects the transport adapter, the session state and
//! the pure systems. Inbound frames decode into [`ServerMessage`] values,
//! session mutations respond with [`Effect`] values, and outbound traffic is
//! expressed as [`ClientMessage`] values encoded back into wire envelopes.

mod protocol;

pub use protocol::{
    decode_frame, encode_frame, AddBotRequest, BotAction, BotActionRequest, BotConfigPatch,
    ClientMessage, InventorySubAction, ItemQuery, ProtocolError, ServerMessage,
};

use serde::{Deserialize, Serialize};

/// Tile type marker the server uses for planted seeds.
pub const SEED_TILE_TYPE: u8 = 4;

/// Stable identifier the server assigns to a managed bot.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct BotId(String);

impl BotId {
    /// Creates a new bot identifier from its wire representation.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: Into<String>,
    {
        Self(value.into())
    }

    /// Borrows the wire representation of the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Numeric identifier of a game item definition.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct ItemId(u32);

impl ItemId {
    /// Creates a new item identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Reports whether the identifier denotes the empty item (air).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// Full-replace snapshot of one managed bot, pushed with every `UPDATE_LIST`.
///
/// The server never patches individual fields; each inbound list update
/// replaces the whole set, so every field defaults when absent rather than
/// failing the decode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct BotSnapshot {
    /// Stable identity of the bot.
    pub id: BotId,
    /// Login name of the underlying game account.
    #[serde(default)]
    pub name: String,
    /// Preferred display name, when the server resolved one.
    #[serde(default)]
    pub display_name: String,
    /// Account flavour (`legacy`, `gmail`, `apple`).
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Human-readable connection status reported by the bot runner.
    #[serde(default)]
    pub status: String,
    /// Whether the bot currently holds a game connection.
    #[serde(default)]
    pub connected: bool,
    /// Account e-mail, present for token-based account flavours.
    #[serde(default)]
    pub email: String,
    /// In-game character name once the bot logged in.
    #[serde(default)]
    pub ingame_name: String,
    /// Current experience level.
    #[serde(default)]
    pub level: u32,
    /// Premium currency balance.
    #[serde(default)]
    pub gems: i64,
    /// Round-trip latency to the game server in milliseconds.
    #[serde(default)]
    pub ping: u32,
    /// Total play time formatted by the server (for example `3h`).
    #[serde(default)]
    pub play_time: String,
    /// Account age in days.
    #[serde(default)]
    pub age: u32,
    /// Name of the world the bot currently occupies.
    #[serde(default)]
    pub world: String,
    /// World-space X position of the bot.
    #[serde(default)]
    pub pos_x: f32,
    /// World-space Y position of the bot.
    #[serde(default)]
    pub pos_y: f32,
    /// Configured growtopia-login token, echoed back for the config form.
    #[serde(default)]
    pub glog: String,
    /// Configured proxy address, echoed back for the config form.
    #[serde(default)]
    pub proxy: String,
    /// Whether low-level transport events are mirrored into the debug log.
    #[serde(default)]
    pub show_enet: bool,
    /// Nested live state captured from the bot's game session.
    #[serde(default)]
    pub local: BotLocal,
}

/// Live game-session state nested under a [`BotSnapshot`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct BotLocal {
    /// Items currently held by the bot.
    #[serde(default)]
    pub inventory: Vec<InventoryEntry>,
    /// Total inventory capacity in slots.
    #[serde(default)]
    pub inventory_slots: u32,
    /// Gems counted inside the current session.
    #[serde(default)]
    pub gem_count: i64,
    /// Players visible to the bot in its current world.
    #[serde(default)]
    pub players: Vec<PlayerSnapshot>,
    /// Tile map of the world the bot occupies, when one was parsed.
    #[serde(default)]
    pub world: Option<WorldSnapshot>,
}

/// One stack of items inside a bot's inventory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct InventoryEntry {
    /// Item definition referenced by the stack.
    pub id: ItemId,
    /// Number of items in the stack.
    #[serde(default)]
    pub count: u32,
    /// Whether the item is currently equipped.
    #[serde(default)]
    pub is_active: bool,
    /// Resolved item name, when the bot runner already knew it.
    #[serde(default)]
    pub name: String,
}

/// Player visible to a bot, overwritten wholesale with each bot update.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct PlayerSnapshot {
    /// Display name of the player.
    #[serde(default)]
    pub name: String,
    /// Per-world network identifier.
    #[serde(default)]
    pub netid: i64,
    /// Account identifier.
    #[serde(default)]
    pub userid: i64,
    /// Whether this entry describes the bot itself.
    #[serde(default)]
    pub is_local: bool,
    /// Whether the player is flagged as a moderator.
    #[serde(rename = "mod", default)]
    pub moderator: bool,
    /// Country code reported by the player.
    #[serde(default)]
    pub country: String,
    /// World-space X position.
    #[serde(default)]
    pub pos_x: f32,
    /// World-space Y position.
    #[serde(default)]
    pub pos_y: f32,
}

/// Tile map of one game world as parsed by a bot.
///
/// Tiles are expected in row-major order (`index = x + y * width`) but the
/// model tolerates sparse and reordered arrays; consumers must fall back to a
/// coordinate scan when the direct index disagrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct WorldSnapshot {
    /// Name of the world.
    #[serde(default)]
    pub name: String,
    /// Grid width in tiles.
    #[serde(default)]
    pub width: u32,
    /// Grid height in tiles.
    #[serde(default)]
    pub height: u32,
    /// Tile count reported by the server.
    #[serde(default)]
    pub tile_count: u32,
    /// Tiles of the grid, nominally row-major.
    #[serde(default)]
    pub tiles: Vec<Tile>,
}

/// One cell of a world grid with independent foreground/background layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct Tile {
    /// Zero-based column of the tile.
    #[serde(default)]
    pub x: u32,
    /// Zero-based row of the tile.
    #[serde(default)]
    pub y: u32,
    /// Foreground item reference, zero when empty.
    #[serde(default)]
    pub fg_id: ItemId,
    /// Background item reference, zero when empty.
    #[serde(default)]
    pub bg_id: ItemId,
    /// Server tile classification ([`SEED_TILE_TYPE`] marks planted seeds).
    #[serde(default)]
    pub tile_type: Option<u8>,
    /// Seed-growth metadata, present on planted tiles.
    #[serde(default)]
    pub extra: Option<TileExtra>,
}

impl Tile {
    /// Synthesises an explicit empty tile at the provided coordinates.
    ///
    /// Hover and tooltip logic treat "no entry in the tile array" as this
    /// value so downstream code never needs a null-tile special case.
    #[must_use]
    pub fn empty_at(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    /// Reports whether the tile is a planted seed.
    #[must_use]
    pub fn is_seed(&self) -> bool {
        self.tile_type == Some(SEED_TILE_TYPE)
    }
}

/// Seed-growth metadata attached to planted tiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct TileExtra {
    /// Whether the server already flagged the tile as harvestable.
    #[serde(default)]
    pub ready_to_harvest: bool,
    /// Seconds elapsed since the seed was planted.
    #[serde(default)]
    pub time_passed: u32,
}

/// Diagnostic event emitted by a bot runner.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct DebugLogEntry {
    /// Bot the event belongs to.
    pub bot_id: BotId,
    /// Wall-clock timestamp formatted by the server (`HH:MM:SS`).
    #[serde(default)]
    pub time: String,
    /// Event category (for example `LOGIN`, `HTTPS`, `WORLD`).
    #[serde(default)]
    pub category: String,
    /// Human-readable message.
    #[serde(default)]
    pub message: String,
    /// Whether the event describes a failure.
    #[serde(default)]
    pub is_error: bool,
}

/// Status payload describing the server-side item database.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DatabaseInfo {
    /// Whether the item database finished loading.
    #[serde(default)]
    pub loaded: bool,
    /// Version stamp of the loaded `items.dat`.
    #[serde(default)]
    pub version: u32,
    /// Number of item definitions available.
    #[serde(default)]
    pub item_count: u32,
}

/// Boolean capability flags carried by an item definition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ItemFlags {
    /// Item sprite may be mirrored when placed facing left.
    pub flippable: bool,
    /// Item exposes an edit dialog once placed.
    pub editable: bool,
    /// Item never drops a seed when broken.
    pub seedless: bool,
    /// Item cannot be broken once placed.
    pub permanent: bool,
    /// Item never drops itself when broken.
    pub dropless: bool,
    /// Item cannot be used on its wielder.
    pub no_self: bool,
    /// Item renders without a drop shadow.
    pub no_shadow: bool,
    /// Item locks the world it is placed in.
    pub world_locked: bool,
    /// Item originates from the beta catalogue.
    pub beta: bool,
    /// Item is collected automatically on contact.
    pub auto_pickup: bool,
    /// Item is restricted to moderators.
    pub mod_flag: bool,
    /// Seed growth duration is randomised.
    pub random_grow: bool,
    /// Item is publicly usable in locked worlds.
    pub public: bool,
    /// Item occupies the foreground layer.
    pub foreground: bool,
    /// Item belongs to a holiday event.
    pub holiday: bool,
    /// Item cannot be traded between players.
    pub untradeable: bool,
}

/// Static definition of one game item, keyed by [`ItemId`].
///
/// Definitions are immutable once cached: the game's item catalogue does not
/// change within a session, which is what makes the fill-on-miss item cache
/// sound. Field names mirror the server's `items.dat` records.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "PascalCase", default)]
pub struct ItemDefinition {
    /// Primary key of the definition.
    #[serde(rename = "ID")]
    pub id: ItemId,
    /// Display name; also the secondary (case-insensitive) cache key.
    pub name: String,
    /// Capability flags.
    pub flags: ItemFlags,
    /// Interaction class of the item.
    pub action_type: u8,
    /// Material class used for break effects.
    pub material: u8,
    /// Sprite sheet file name.
    pub texture_file_name: String,
    /// Hash of the sprite sheet contents.
    pub texture_hash: u32,
    /// Item id consumed when cooking with this item.
    pub cooking_ingredient: u32,
    /// Visual effect applied while equipped.
    pub visual_effect: u8,
    /// Sprite column inside the sheet.
    pub texture_x: u8,
    /// Sprite row inside the sheet.
    pub texture_y: u8,
    /// Rendering style selector.
    pub render_type: u8,
    /// Whether the wallpaper renders with the striped variant.
    pub is_stripey_wallpaper: u8,
    /// Collision behaviour when placed.
    pub collision_type: u8,
    /// Hits required to break the placed block.
    pub block_health: u8,
    /// Seed drop chance when the block breaks.
    pub drop_chance: u32,
    /// Equipment slot the item occupies, zero when not wearable.
    pub clothing_type: u8,
    /// Rarity tier.
    pub rarity: u16,
    /// Maximum stack size.
    pub max_item: u8,
    /// Auxiliary asset file name.
    pub file_name: String,
    /// Hash of the auxiliary asset.
    pub file_hash: u32,
    /// Playback volume for the item's audio cue.
    pub audio_volume: u32,
    /// Pet display name, when the item spawns a pet.
    pub pet_name: String,
    /// Pet name prefix.
    pub pet_prefix: String,
    /// Pet name suffix.
    pub pet_suffix: String,
    /// Pet ability description.
    pub pet_ability: String,
    /// Base sprite index for the planted seed.
    pub seed_base_sprite: u8,
    /// Overlay sprite index for the planted seed.
    pub seed_overlay_sprite: u8,
    /// Base sprite index for the grown tree.
    pub tree_base_sprite: u8,
    /// Overlay sprite index for the grown tree.
    pub tree_overlay_sprite: u8,
    /// Packed seed base color (RGB in the low 24 bits).
    pub base_color: u32,
    /// Packed seed overlay color (RGB in the low 24 bits).
    pub overlay_color: u32,
    /// Item id required as a splicing ingredient.
    pub ingredient: u32,
    /// Seconds a planted seed needs before it can be harvested.
    pub grow_time: u32,
    /// Whether the item belongs to the Rayman collaboration set.
    pub is_rayman: u16,
    /// Free-form extra options blob.
    pub extra_options: String,
    /// Secondary sprite sheet path.
    #[serde(rename = "TexturePath2")]
    pub texture_path_2: String,
    /// Second free-form options blob.
    #[serde(rename = "ExtraOption2")]
    pub extra_option_2: String,
    /// Punch behaviour override.
    pub punch_option: String,
    /// Catalogue description shown in the item detail panel.
    pub description: String,
}

/// Side effects requested by session mutations and pure systems.
///
/// Effects are the dashboard's counterpart to a command/event batch: state
/// transitions never perform IO themselves, they append effects for the
/// controller to drain after each pump.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Outbound frame to write when the connection is open; dropped otherwise.
    Send(ClientMessage),
    /// The previously selected bot disappeared; per-selection view state must reset.
    SelectionCleared,
    /// The selected bot received fresh data; its dashboard view should re-derive.
    RefreshDashboard(BotId),
    /// Fresh bulk search results arrived for the database panel.
    SearchResults(Vec<ItemDefinition>),
    /// Server-reported error that must surface to the user immediately.
    ServerError(String),
    /// Database status payload for the database panel.
    DatabaseInfo(DatabaseInfo),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bot_snapshot_decodes_with_missing_optional_fields() {
        let snapshot: BotSnapshot =
            serde_json::from_str(r#"{"id":"bot-1","name":"alpha"}"#).expect("decode");

        assert_eq!(snapshot.id, BotId::new("bot-1"));
        assert_eq!(snapshot.name, "alpha");
        assert_eq!(snapshot.level, 0);
        assert!(!snapshot.connected);
        assert!(snapshot.local.world.is_none());
        assert!(snapshot.local.inventory.is_empty());
    }

    #[test]
    fn item_definition_decodes_from_wire_field_names() {
        let item: ItemDefinition = serde_json::from_str(
            r#"{"ID":4584,"Name":"Pepper Tree","GrowTime":600,"BaseColor":4280616736,"Flags":{"Foreground":true}}"#,
        )
        .expect("decode");

        assert_eq!(item.id, ItemId::new(4584));
        assert_eq!(item.name, "Pepper Tree");
        assert_eq!(item.grow_time, 600);
        assert!(item.flags.foreground);
        assert!(!item.flags.flippable);
    }

    #[test]
    fn player_snapshot_maps_reserved_mod_field() {
        let player: PlayerSnapshot =
            serde_json::from_str(r#"{"name":"guard","netid":7,"mod":true}"#).expect("decode");

        assert!(player.moderator);
        assert_eq!(player.netid, 7);
    }

    #[test]
    fn synthetic_empty_tile_has_zero_layers() {
        let tile = Tile::empty_at(3, 9);

        assert_eq!((tile.x, tile.y), (3, 9));
        assert!(tile.fg_id.is_empty());
        assert!(tile.bg_id.is_empty());
        assert!(!tile.is_seed());
    }

    #[test]
    fn seed_detection_requires_the_seed_tile_type() {
        let mut tile = Tile::empty_at(0, 0);
        tile.tile_type = Some(SEED_TILE_TYPE);
        assert!(tile.is_seed());

        tile.tile_type = Some(1);
        assert!(!tile.is_seed());
    }
}
