//! Wire envelopes exchanged with the fleet server.
//!
//! Every frame is a JSON-text envelope `{"type": …, "data": …}` dispatched by
//! exact string match. Inbound envelopes with an unknown `type` are inert so
//! newer servers can talk to older dashboards; malformed payloads for a known
//! `type` are rejected here, before they can reach store logic.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{BotId, BotSnapshot, DatabaseInfo, DebugLogEntry, ItemDefinition, ItemId};

/// Envelope types this dashboard understands; anything else is ignored.
const KNOWN_SERVER_TYPES: [&str; 6] = [
    "UPDATE_LIST",
    "ERROR",
    "DEBUG_LOG",
    "ITEMS_DATA",
    "ITEM_DATA",
    "DATABASE_INFO",
];

/// Typed inbound frames pushed by the fleet server.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    /// Full replacement of the bot collection, pushed every server tick.
    UpdateList(Vec<BotSnapshot>),
    /// Server-reported failure to surface to the user.
    Error(String),
    /// One diagnostic event for a bot's debug log.
    DebugLog(DebugLogEntry),
    /// Bulk item definitions answering a search request.
    ItemsData(Vec<ItemDefinition>),
    /// Single item definition answering a miss-triggered fetch.
    ItemData(ItemDefinition),
    /// Status of the server-side item database.
    DatabaseInfo(DatabaseInfo),
}

/// Typed outbound frames sent by the dashboard.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Requests one item definition by id or by name.
    GetItem(ItemQuery),
    /// Requests item definitions matching a free-text query.
    SearchItems {
        /// Free-text search query, at least two characters.
        query: String,
    },
    /// Requests the item database status for the database panel.
    GetDatabaseInfo,
    /// Registers a new bot with the fleet.
    AddBot(AddBotRequest),
    /// Removes a bot from the fleet.
    RemoveBot {
        /// Bot to remove.
        id: BotId,
    },
    /// Instructs one bot to perform a game action.
    BotAction(BotActionRequest),
    /// Patches a bot's persisted configuration.
    UpdateBotConfig(BotConfigPatch),
    /// Runs a Lua script inside a bot's scripting sandbox.
    ExecuteLua {
        /// Bot that should execute the script.
        id: BotId,
        /// Script source text.
        script: String,
    },
}

/// Lookup key for a single item definition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemQuery {
    /// Resolve directly by numeric id.
    ById {
        /// Item id to fetch.
        id: ItemId,
    },
    /// Resolve through the server's name index.
    ByName {
        /// Item name to fetch, matched case-insensitively by the server.
        name: String,
    },
}

impl From<ItemId> for ItemQuery {
    fn from(id: ItemId) -> Self {
        Self::ById { id }
    }
}

impl From<&str> for ItemQuery {
    fn from(name: &str) -> Self {
        Self::ByName {
            name: name.to_owned(),
        }
    }
}

impl From<String> for ItemQuery {
    fn from(name: String) -> Self {
        Self::ByName { name }
    }
}

/// Credentials and settings for registering a new bot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct AddBotRequest {
    /// Account flavour (`legacy`, `gmail`, `apple`).
    #[serde(rename = "type")]
    pub kind: String,
    /// Account name, or the token prefix for token-based flavours.
    pub name: String,
    /// Password or combined token blob.
    pub pass: String,
    /// Optional growtopia-login token.
    #[serde(default)]
    pub glog: String,
    /// Optional proxy address.
    #[serde(default)]
    pub proxy: String,
}

/// Outbound `BOT_ACTION` payload addressed to one bot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotActionRequest {
    /// Bot that should perform the action.
    pub id: BotId,
    /// Action to perform, flattened into the payload.
    #[serde(flatten)]
    pub action: BotAction,
}

impl BotActionRequest {
    /// Creates a new action request addressed to the provided bot.
    #[must_use]
    pub fn new(id: BotId, action: BotAction) -> Self {
        Self { id, action }
    }
}

/// Game actions a bot can be instructed to perform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BotAction {
    /// Connect (or force-reconnect) the bot to the game server.
    Connect,
    /// Drop the bot's game connection.
    Disconnect,
    /// Leave the current world.
    Leave,
    /// Warp into the named world.
    Warp {
        /// Destination world name.
        world: String,
    },
    /// Say a line of chat in the current world.
    Say {
        /// Chat text to send.
        text: String,
    },
    /// Manipulate one inventory stack.
    InventoryAction {
        /// Manipulation to apply.
        sub_action: InventorySubAction,
        /// Item stack to manipulate.
        item_id: ItemId,
    },
    /// Punch-harvest the tile at the provided grid coordinates.
    HarvestTile {
        /// Zero-based tile column.
        x: u32,
        /// Zero-based tile row.
        y: u32,
    },
}

/// Inventory manipulations available through `INVENTORY_ACTION`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InventorySubAction {
    /// Equip the item.
    Wear,
    /// Unequip the item.
    Unwear,
    /// Drop the stack in the current world.
    Drop,
    /// Destroy the stack.
    Trash,
}

/// Partial update of a bot's persisted configuration.
///
/// Absent fields are omitted from the wire payload so the server only touches
/// what the dashboard actually edited.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Default)]
pub struct BotConfigPatch {
    /// Bot whose configuration is patched.
    pub id: BotId,
    /// New growtopia-login token, when edited.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub glog: Option<String>,
    /// New proxy address, when edited.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub proxy: Option<String>,
    /// New transport-event mirroring flag, when toggled.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub show_enet: Option<bool>,
}

impl BotConfigPatch {
    /// Creates an empty patch for the provided bot.
    #[must_use]
    pub fn new(id: BotId) -> Self {
        Self {
            id,
            glog: None,
            proxy: None,
            show_enet: None,
        }
    }

    /// Records a new growtopia-login token.
    #[must_use]
    pub fn with_glog<T>(mut self, glog: T) -> Self
    where
        T: Into<String>,
    {
        self.glog = Some(glog.into());
        self
    }

    /// Records a new proxy address.
    #[must_use]
    pub fn with_proxy<T>(mut self, proxy: T) -> Self
    where
        T: Into<String>,
    {
        self.proxy = Some(proxy.into());
        self
    }

    /// Records a new transport-event mirroring flag.
    #[must_use]
    pub const fn with_show_enet(mut self, show_enet: bool) -> Self {
        self.show_enet = Some(show_enet);
        self
    }

    /// Reports whether the patch carries any edited field.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.glog.is_none() && self.proxy.is_none() && self.show_enet.is_none()
    }
}

/// Errors produced at the wire boundary.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Frame was not valid JSON or did not match the payload schema of its type.
    #[error("malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
    /// Frame parsed as JSON but carried no string `type` field.
    #[error("frame is missing a string `type` field")]
    MissingType,
}

/// Decodes one inbound frame into a typed message.
///
/// Returns `Ok(None)` for envelopes whose `type` this dashboard does not
/// know, keeping unknown traffic inert. Known types with malformed payloads
/// are rejected with [`ProtocolError`].
pub fn decode_frame(text: &str) -> Result<Option<ServerMessage>, ProtocolError> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    let kind = value
        .get("type")
        .and_then(serde_json::Value::as_str)
        .ok_or(ProtocolError::MissingType)?;

    if !KNOWN_SERVER_TYPES.contains(&kind) {
        return Ok(None);
    }

    let message = serde_json::from_value(value)?;
    Ok(Some(message))
}

/// Encodes one outbound message into its wire envelope.
pub fn encode_frame(message: &ClientMessage) -> Result<String, ProtocolError> {
    Ok(serde_json::to_string(message)?)
}
