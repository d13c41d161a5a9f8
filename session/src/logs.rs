//! Per-bot bounded diagnostic log buffers.

use std::collections::{HashMap, VecDeque};

use fleetdeck_core::{BotId, DebugLogEntry};

/// Default per-bot retention limit, matching the dashboard's limit field.
pub const DEFAULT_LOG_LIMIT: usize = 100;

/// Log category carrying secure-transport traffic, hidden by default.
pub const SECURE_TRANSPORT_CATEGORY: &str = "HTTPS";

/// Render-time visibility filter for a bot's log view.
///
/// Filtering happens when entries are read, never when they are stored, so
/// toggling the filter changes what is shown without losing history within
/// capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LogFilter {
    /// Show every category regardless of the per-category toggles.
    pub show_all: bool,
    /// Show the secure-transport category.
    pub show_secure: bool,
}

impl LogFilter {
    /// Reports whether the filter admits the provided entry.
    #[must_use]
    pub fn admits(&self, entry: &DebugLogEntry) -> bool {
        if self.show_all || self.show_secure {
            return true;
        }
        !entry
            .category
            .eq_ignore_ascii_case(SECURE_TRANSPORT_CATEGORY)
    }
}

/// Append-only, capacity-bounded log buffers keyed by bot.
///
/// The capacity limit is supplied on every call rather than fixed at buffer
/// creation because the user can retune it at any moment; both appends and
/// reads honour whatever the limit currently is.
#[derive(Debug, Default)]
pub struct LogStore {
    buffers: HashMap<BotId, VecDeque<DebugLogEntry>>,
}

impl LogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one entry to its bot's buffer, then truncates the oldest
    /// entries so the buffer holds exactly the most recent `limit`.
    pub fn append(&mut self, entry: DebugLogEntry, limit: usize) {
        let buffer = self.buffers.entry(entry.bot_id.clone()).or_default();
        buffer.push_back(entry);
        while buffer.len() > limit {
            let _ = buffer.pop_front();
        }
    }

    /// Discards a bot's buffer entirely; logs are not retained for removed bots.
    pub fn purge(&mut self, bot_id: &BotId) {
        let _ = self.buffers.remove(bot_id);
    }

    /// Empties a bot's buffer while keeping the bot tracked.
    pub fn clear(&mut self, bot_id: &BotId) {
        if let Some(buffer) = self.buffers.get_mut(bot_id) {
            buffer.clear();
        }
    }

    /// Reports whether a buffer exists for the provided bot.
    #[must_use]
    pub fn has_buffer(&self, bot_id: &BotId) -> bool {
        self.buffers.contains_key(bot_id)
    }

    /// Number of retained entries for the provided bot.
    #[must_use]
    pub fn len(&self, bot_id: &BotId) -> usize {
        self.buffers.get(bot_id).map_or(0, VecDeque::len)
    }

    /// Reports whether no entries are retained for the provided bot.
    #[must_use]
    pub fn is_empty(&self, bot_id: &BotId) -> bool {
        self.len(bot_id) == 0
    }

    /// Iterates a bot's retained entries in arrival order, unfiltered.
    pub fn entries(&self, bot_id: &BotId) -> impl Iterator<Item = &DebugLogEntry> {
        self.buffers.get(bot_id).into_iter().flatten()
    }

    /// Returns the most recent `limit` entries admitted by the filter, in
    /// original order.
    #[must_use]
    pub fn visible(
        &self,
        bot_id: &BotId,
        filter: LogFilter,
        limit: usize,
    ) -> Vec<&DebugLogEntry> {
        let Some(buffer) = self.buffers.get(bot_id) else {
            return Vec::new();
        };
        let start = buffer.len().saturating_sub(limit);
        buffer
            .iter()
            .skip(start)
            .filter(|entry| filter.admits(entry))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(bot: &str, n: usize, category: &str) -> DebugLogEntry {
        DebugLogEntry {
            bot_id: BotId::new(bot),
            time: format!("00:00:{n:02}"),
            category: category.to_owned(),
            message: format!("event {n}"),
            is_error: false,
        }
    }

    #[test]
    fn append_keeps_exactly_the_most_recent_entries() {
        let mut store = LogStore::new();
        for n in 0..7 {
            store.append(entry("bot-1", n, "LOGIN"), 3);
        }

        assert_eq!(store.len(&BotId::new("bot-1")), 3);
        let messages: Vec<&str> = store
            .entries(&BotId::new("bot-1"))
            .map(|e| e.message.as_str())
            .collect();
        assert_eq!(messages, vec!["event 4", "event 5", "event 6"]);
    }

    #[test]
    fn shrinking_the_limit_truncates_on_next_append() {
        let mut store = LogStore::new();
        for n in 0..10 {
            store.append(entry("bot-1", n, "LOGIN"), 10);
        }
        store.append(entry("bot-1", 10, "LOGIN"), 4);

        assert_eq!(store.len(&BotId::new("bot-1")), 4);
        let first = store
            .entries(&BotId::new("bot-1"))
            .next()
            .expect("non-empty");
        assert_eq!(first.message, "event 7");
    }

    #[test]
    fn purge_removes_the_buffer_entirely() {
        let mut store = LogStore::new();
        store.append(entry("bot-1", 0, "LOGIN"), 10);
        store.purge(&BotId::new("bot-1"));

        assert!(!store.has_buffer(&BotId::new("bot-1")));
        assert!(store.is_empty(&BotId::new("bot-1")));
    }

    #[test]
    fn clear_empties_but_keeps_the_buffer() {
        let mut store = LogStore::new();
        store.append(entry("bot-1", 0, "LOGIN"), 10);
        store.clear(&BotId::new("bot-1"));

        assert!(store.has_buffer(&BotId::new("bot-1")));
        assert_eq!(store.len(&BotId::new("bot-1")), 0);
    }

    #[test]
    fn secure_transport_entries_are_hidden_unless_toggled() {
        let mut store = LogStore::new();
        store.append(entry("bot-1", 0, "LOGIN"), 10);
        store.append(entry("bot-1", 1, "HTTPS"), 10);
        store.append(entry("bot-1", 2, "https"), 10);

        let hidden = store.visible(&BotId::new("bot-1"), LogFilter::default(), 10);
        assert_eq!(hidden.len(), 1);

        let shown = store.visible(
            &BotId::new("bot-1"),
            LogFilter {
                show_all: true,
                show_secure: false,
            },
            10,
        );
        assert_eq!(shown.len(), 3);

        // Storage retained all three; the filter only changed the view.
        assert_eq!(store.len(&BotId::new("bot-1")), 3);
    }

    #[test]
    fn visible_honours_the_current_limit_not_the_append_time_one() {
        let mut store = LogStore::new();
        for n in 0..8 {
            store.append(entry("bot-1", n, "LOGIN"), 100);
        }

        let view = store.visible(&BotId::new("bot-1"), LogFilter::default(), 2);
        let messages: Vec<&str> = view.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["event 6", "event 7"]);
    }
}
