//! Bidirectional item definition cache with fill-on-miss.

use std::collections::HashMap;

use fleetdeck_core::{ClientMessage, Effect, ItemDefinition, ItemId, ItemQuery};

/// Session-lifetime cache of item definitions, keyed by id and by name.
///
/// Items are large, static and queried hundreds of times per render (every
/// tile, every inventory row), so a miss answers `None` immediately and emits
/// one background fetch instead of blocking the caller. Entries are never
/// evicted within a session.
#[derive(Debug, Default)]
pub struct ItemCache {
    by_id: HashMap<ItemId, ItemDefinition>,
    by_name: HashMap<String, ItemId>,
}

impl ItemCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves a definition by id or by case-insensitive name.
    ///
    /// On a miss this synchronously returns `None` and appends exactly one
    /// `GET_ITEM` send effect for the queried identifier. Repeated misses
    /// emit repeated fetches; callers that re-query before the fill arrives
    /// must expect that.
    pub fn lookup<Q>(&self, query: Q, out_effects: &mut Vec<Effect>) -> Option<&ItemDefinition>
    where
        Q: Into<ItemQuery>,
    {
        let query = query.into();
        let resolved = match &query {
            ItemQuery::ById { id } => self.by_id.get(id),
            ItemQuery::ByName { name } => self
                .by_name
                .get(&name.to_lowercase())
                .and_then(|id| self.by_id.get(id)),
        };

        if resolved.is_none() {
            out_effects.push(Effect::Send(ClientMessage::GetItem(query)));
        }
        resolved
    }

    /// Resolves a definition by id without triggering a fetch on miss.
    #[must_use]
    pub fn peek(&self, id: ItemId) -> Option<&ItemDefinition> {
        self.by_id.get(&id)
    }

    /// Inserts one definition; idempotent, last write wins.
    ///
    /// Named items also register `lowercase(name) → id` so each name maps to
    /// exactly one id.
    pub fn insert(&mut self, item: ItemDefinition) {
        if !item.name.is_empty() {
            let _ = self.by_name.insert(item.name.to_lowercase(), item.id);
        }
        let _ = self.by_id.insert(item.id, item);
    }

    /// Inserts every definition of a bulk payload.
    pub fn insert_bulk<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = ItemDefinition>,
    {
        for item in items {
            self.insert(item);
        }
    }

    /// Number of cached definitions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Reports whether the cache holds no definitions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
