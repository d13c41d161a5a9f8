#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Form-input systems: debounced config saves, debounced item search and
//! add-bot validation.
//!
//! Keystroke-driven inputs must not produce one outbound frame per keystroke.
//! Each editor here accumulates input against a deadline and emits a single
//! [`Effect::Send`] when the deadline fires, when focus leaves the field, or
//! immediately for toggle-style inputs.

use std::time::{Duration, Instant};

use fleetdeck_core::{
    AddBotRequest, BotConfigPatch, BotId, ClientMessage, Effect,
};
use thiserror::Error;

/// Quiet period after the last config keystroke before the patch is sent.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Quiet period after the last search keystroke before the query is sent.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Minimum search query length; shorter input clears the results instead.
pub const MIN_QUERY_LEN: usize = 2;

/// Single-shot deadline timer driven by the caller's clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct DebounceTimer {
    deadline: Option<Instant>,
}

impl DebounceTimer {
    /// Arms (or re-arms) the timer to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    /// Disarms the timer without firing.
    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    /// Returns `true` exactly once when the deadline has passed, disarming
    /// the timer in the process.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Reports whether a deadline is armed.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }
}

/// Debounced editor for a bot's persisted configuration fields.
///
/// Edits accumulate into one [`BotConfigPatch`] per bot; switching the edited
/// bot flushes the previous bot's patch immediately so edits never leak
/// across bots.
#[derive(Debug, Default)]
pub struct ConfigEditor {
    pending: Option<BotConfigPatch>,
    timer: DebounceTimer,
}

impl ConfigEditor {
    /// Creates an editor with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a growtopia-login token edit.
    pub fn edit_glog<T>(&mut self, bot: BotId, glog: T, now: Instant, out_effects: &mut Vec<Effect>)
    where
        T: Into<String>,
    {
        let glog = glog.into();
        self.edit(bot, now, out_effects, |patch| patch.glog = Some(glog));
    }

    /// Records a proxy address edit.
    pub fn edit_proxy<T>(
        &mut self,
        bot: BotId,
        proxy: T,
        now: Instant,
        out_effects: &mut Vec<Effect>,
    ) where
        T: Into<String>,
    {
        let proxy = proxy.into();
        self.edit(bot, now, out_effects, |patch| patch.proxy = Some(proxy));
    }

    fn edit<F>(&mut self, bot: BotId, now: Instant, out_effects: &mut Vec<Effect>, write: F)
    where
        F: FnOnce(&mut BotConfigPatch),
    {
        if self
            .pending
            .as_ref()
            .is_some_and(|patch| patch.id != bot)
        {
            self.flush(out_effects);
        }
        let patch = self
            .pending
            .get_or_insert_with(|| BotConfigPatch::new(bot));
        write(patch);
        self.timer.schedule(now, SAVE_DEBOUNCE);
    }

    /// Fires the pending save once its quiet period elapses.
    pub fn tick(&mut self, now: Instant, out_effects: &mut Vec<Effect>) {
        if self.timer.fire(now) {
            self.flush(out_effects);
        }
    }

    /// Focus left the config fields: send whatever is pending right away.
    pub fn blur(&mut self, out_effects: &mut Vec<Effect>) {
        self.timer.cancel();
        self.flush(out_effects);
    }

    /// Reports whether an unsent edit is buffered.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn flush(&mut self, out_effects: &mut Vec<Effect>) {
        if let Some(patch) = self.pending.take() {
            if !patch.is_empty() {
                out_effects.push(Effect::Send(ClientMessage::UpdateBotConfig(patch)));
            }
        }
    }
}

/// Sends a `show_enet` toggle immediately; checkbox input needs no debounce.
pub fn toggle_show_enet(bot: BotId, enabled: bool, out_effects: &mut Vec<Effect>) {
    out_effects.push(Effect::Send(ClientMessage::UpdateBotConfig(
        BotConfigPatch::new(bot).with_show_enet(enabled),
    )));
}

/// Debounced free-text item search box.
#[derive(Debug, Default)]
pub struct ItemSearch {
    query: String,
    timer: DebounceTimer,
}

impl ItemSearch {
    /// Creates an empty search box.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the box's current text, ignoring surrounding whitespace.
    ///
    /// Trimmed input shorter than [`MIN_QUERY_LEN`] cancels any pending query
    /// and clears the result panel instead of hitting the server.
    pub fn input<T>(&mut self, text: T, now: Instant, out_effects: &mut Vec<Effect>)
    where
        T: Into<String>,
    {
        let text = text.into();
        self.query = text.trim().to_owned();
        if self.query.chars().count() < MIN_QUERY_LEN {
            self.timer.cancel();
            out_effects.push(Effect::SearchResults(Vec::new()));
            return;
        }
        self.timer.schedule(now, SEARCH_DEBOUNCE);
    }

    /// Fires the pending query once its quiet period elapses.
    pub fn tick(&mut self, now: Instant, out_effects: &mut Vec<Effect>) {
        if self.timer.fire(now) {
            out_effects.push(Effect::Send(ClientMessage::SearchItems {
                query: self.query.clone(),
            }));
        }
    }
}

/// Rejection reasons for the add-bot form.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// Neither a name nor a pass/token was provided.
    #[error("either a name or a pass/token is required")]
    MissingCredentials,
}

/// Validates an add-bot form and builds the outbound registration message.
pub fn submit_add_bot(request: AddBotRequest) -> Result<ClientMessage, FormError> {
    if request.name.trim().is_empty() && request.pass.trim().is_empty() {
        return Err(FormError::MissingCredentials);
    }
    Ok(ClientMessage::AddBot(request))
}
