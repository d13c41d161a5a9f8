#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative client-side session state for the Fleetdeck dashboard.
//!
//! The session owns the fleet snapshot, the item cache and the per-bot log
//! buffers. All inbound mutation flows through the [`apply`] entry point,
//! which consumes one typed server message and appends [`Effect`] values for
//! the controller to drain; nothing in this crate performs IO.

mod items;
mod logs;

pub use items::ItemCache;
pub use logs::{LogFilter, LogStore, DEFAULT_LOG_LIMIT, SECURE_TRANSPORT_CATEGORY};

use std::collections::HashSet;

use fleetdeck_core::{BotId, BotSnapshot, ClientMessage, Effect, ServerMessage};

/// Client-side session state, created at dashboard start and torn down with it.
#[derive(Debug)]
pub struct Session {
    bots: Vec<BotSnapshot>,
    selected: Option<BotId>,
    items: ItemCache,
    logs: LogStore,
    log_limit: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session with the default log retention limit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            bots: Vec::new(),
            selected: None,
            items: ItemCache::new(),
            logs: LogStore::new(),
            log_limit: DEFAULT_LOG_LIMIT,
        }
    }

    /// Snapshot of every tracked bot, in server order.
    #[must_use]
    pub fn bots(&self) -> &[BotSnapshot] {
        &self.bots
    }

    /// Resolves one bot by id.
    #[must_use]
    pub fn bot(&self, id: &BotId) -> Option<&BotSnapshot> {
        self.bots.iter().find(|bot| &bot.id == id)
    }

    /// Identifier of the currently selected bot, if any.
    #[must_use]
    pub fn selected_id(&self) -> Option<&BotId> {
        self.selected.as_ref()
    }

    /// Snapshot of the currently selected bot, if any.
    #[must_use]
    pub fn selected_bot(&self) -> Option<&BotSnapshot> {
        self.selected.as_ref().and_then(|id| self.bot(id))
    }

    /// Selects a bot for the detail view; ignored when the id is not active.
    ///
    /// Returns whether the selection changed.
    pub fn select(&mut self, id: BotId, out_effects: &mut Vec<Effect>) -> bool {
        if self.bot(&id).is_none() || self.selected.as_ref() == Some(&id) {
            return false;
        }
        out_effects.push(Effect::RefreshDashboard(id.clone()));
        self.selected = Some(id);
        true
    }

    /// Clears the selection and asks the view to reset per-selection state.
    pub fn deselect(&mut self, out_effects: &mut Vec<Effect>) {
        if self.selected.take().is_some() {
            out_effects.push(Effect::SelectionCleared);
        }
    }

    /// Removes a bot: emits the outbound request, drops its logs and clears
    /// the selection when it pointed at the removed bot.
    pub fn remove_bot(&mut self, id: BotId, out_effects: &mut Vec<Effect>) {
        out_effects.push(Effect::Send(ClientMessage::RemoveBot { id: id.clone() }));
        self.logs.purge(&id);
        if self.selected.as_ref() == Some(&id) {
            self.deselect(out_effects);
        }
    }

    /// Shared item definition cache.
    #[must_use]
    pub fn items(&self) -> &ItemCache {
        &self.items
    }

    /// Mutable access to the item cache for direct fills.
    pub fn items_mut(&mut self) -> &mut ItemCache {
        &mut self.items
    }

    /// Per-bot diagnostic log buffers.
    #[must_use]
    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    /// Empties the selected bot's log buffer (the dashboard's clear button).
    pub fn clear_selected_logs(&mut self) {
        if let Some(id) = self.selected.clone() {
            self.logs.clear(&id);
        }
    }

    /// Current per-bot log retention limit.
    #[must_use]
    pub const fn log_limit(&self) -> usize {
        self.log_limit
    }

    /// Retunes the per-bot log retention limit; takes effect on the next
    /// append and the next render.
    pub fn set_log_limit(&mut self, limit: usize) {
        self.log_limit = limit;
    }

    fn replace_fleet(&mut self, bots: Vec<BotSnapshot>, out_effects: &mut Vec<Effect>) {
        let active: HashSet<&BotId> = bots.iter().map(|bot| &bot.id).collect();

        let stale: Vec<BotId> = self
            .bots
            .iter()
            .map(|bot| bot.id.clone())
            .filter(|id| !active.contains(id))
            .collect();
        for id in &stale {
            self.logs.purge(id);
        }

        let selection_lost = self
            .selected
            .as_ref()
            .is_some_and(|id| !active.contains(id));

        self.bots = bots;

        if selection_lost {
            self.deselect(out_effects);
        } else if let Some(id) = &self.selected {
            out_effects.push(Effect::RefreshDashboard(id.clone()));
        }
    }
}

/// Applies one inbound server message to the session.
///
/// The server is the sole source of truth: list updates replace the whole
/// fleet rather than patching individual bots, and no handler here is
/// permitted to panic on missing or malformed optional data.
pub fn apply(session: &mut Session, message: ServerMessage, out_effects: &mut Vec<Effect>) {
    match message {
        ServerMessage::UpdateList(bots) => session.replace_fleet(bots, out_effects),
        ServerMessage::Error(message) => out_effects.push(Effect::ServerError(message)),
        ServerMessage::DebugLog(entry) => {
            let limit = session.log_limit;
            session.logs.append(entry, limit);
        }
        ServerMessage::ItemsData(items) => {
            session.items.insert_bulk(items.iter().cloned());
            out_effects.push(Effect::SearchResults(items));
        }
        ServerMessage::ItemData(item) => session.items.insert(item),
        ServerMessage::DatabaseInfo(info) => out_effects.push(Effect::DatabaseInfo(info)),
    }
}
