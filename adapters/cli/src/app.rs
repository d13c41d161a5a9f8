//! Per-frame controller tying transport, connection, session and scene
//! together.

use std::time::Instant;

use fleetdeck_core::{encode_frame, BotActionRequest, ClientMessage, Effect, ServerMessage};
use fleetdeck_rendering::{build_scene, FrameInput, Scene, TileTooltip, ViewState};
use fleetdeck_session::{apply, LogFilter, Session};
use fleetdeck_system_connection::Connection;
use fleetdeck_system_forms::toggle_show_enet;
use fleetdeck_system_growscan::scan;
use fleetdeck_transport_ws::{TransportEvent, WsTransport};
use tracing::{debug, info, warn};

/// Transport seam so the pump can be driven by scripted events in tests.
pub(crate) trait ServerLink {
    /// Drains buffered socket events.
    fn poll(&mut self, out_events: &mut Vec<TransportEvent>);
    /// Attempts one dial.
    fn dial(&mut self, out_events: &mut Vec<TransportEvent>);
    /// Writes one text frame.
    fn send_frame(&mut self, text: &str, out_events: &mut Vec<TransportEvent>) -> bool;
}

impl ServerLink for WsTransport {
    fn poll(&mut self, out_events: &mut Vec<TransportEvent>) {
        WsTransport::poll(self, out_events);
    }

    fn dial(&mut self, out_events: &mut Vec<TransportEvent>) {
        WsTransport::dial(self, out_events);
    }

    fn send_frame(&mut self, text: &str, out_events: &mut Vec<TransportEvent>) -> bool {
        WsTransport::send(self, text, out_events)
    }
}

/// Dashboard controller: one instance drives the whole render loop.
pub(crate) struct App<L> {
    link: L,
    session: Session,
    connection: Connection,
    view: ViewState,
    log_filter: LogFilter,
    effects: Vec<Effect>,
}

impl<L> App<L>
where
    L: ServerLink,
{
    pub(crate) fn new(link: L, log_filter: LogFilter, log_limit: usize) -> Self {
        let mut session = Session::new();
        session.set_log_limit(log_limit);
        Self {
            link,
            session,
            connection: Connection::new(),
            view: ViewState::new(),
            log_filter,
            effects: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn session(&self) -> &Session {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Performs the initial dial.
    pub(crate) fn dial_now(&mut self, now: Instant) {
        let mut events = Vec::new();
        self.link.dial(&mut events);
        self.process_events(events, now);
        self.drain_effects();
    }

    /// Runs one frame: network pump, input handling and scene rebuild.
    pub(crate) fn frame(&mut self, now: Instant, input: FrameInput, scene: &mut Scene) {
        self.pump(now);
        self.handle_view_input(&input);
        self.handle_enet_toggle(&input);
        self.rebuild_scene(&input, scene);
        self.drain_effects();
    }

    /// Drains the socket, applies inbound messages and fires due redials.
    pub(crate) fn pump(&mut self, now: Instant) {
        let mut events = Vec::new();
        self.link.poll(&mut events);
        self.process_events(events, now);

        if self.connection.poll_reconnect(now) {
            let mut events = Vec::new();
            self.link.dial(&mut events);
            self.process_events(events, now);
        }

        self.ensure_selection();
        self.drain_effects();
    }

    fn process_events(&mut self, events: Vec<TransportEvent>, now: Instant) {
        for event in events {
            match event {
                TransportEvent::Opened => self.connection.opened(),
                TransportEvent::Closed => self.connection.closed(now),
                TransportEvent::Frame(text) => self.process_frame(&text),
            }
        }
    }

    fn process_frame(&mut self, text: &str) {
        let mut messages = Vec::new();
        if let Err(error) = self.connection.frame(text, &mut messages) {
            warn!(%error, "discarding malformed frame");
            return;
        }
        for message in messages {
            self.observe(&message);
            apply(&mut self.session, message, &mut self.effects);
        }
    }

    fn observe(&self, message: &ServerMessage) {
        if let ServerMessage::DebugLog(entry) = message {
            if self.log_filter.admits(entry) {
                info!(
                    bot = entry.bot_id.as_str(),
                    category = %entry.category,
                    error = entry.is_error,
                    "{}",
                    entry.message
                );
            }
        }
    }

    /// Keeps the detail view pointed at something while bots exist.
    fn ensure_selection(&mut self) {
        if self.session.selected_id().is_some() {
            return;
        }
        if let Some(first) = self.session.bots().first().map(|bot| bot.id.clone()) {
            let _ = self.session.select(first, &mut self.effects);
        }
    }

    fn handle_view_input(&mut self, input: &FrameInput) {
        if input.reset_view {
            self.view.reset();
        }
        if input.zoom_in {
            self.view.zoom_in();
        }
        if input.zoom_out {
            self.view.zoom_out();
        }
        if let Some(cursor) = input.cursor {
            if input.drag_started {
                self.view.begin_drag(cursor);
            }
            self.view.drag_to(cursor);
        }
        if input.drag_ended {
            self.view.end_drag();
        }
    }

    /// Flips transport-event mirroring for the selected bot.
    fn handle_enet_toggle(&mut self, input: &FrameInput) {
        if !input.toggle_enet {
            return;
        }
        let Some(bot_id) = self.session.selected_id().cloned() else {
            return;
        };
        let Some(bot) = self.session.bot(&bot_id) else {
            return;
        };
        toggle_show_enet(bot_id, !bot.show_enet, &mut self.effects);
    }

    fn rebuild_scene(&mut self, input: &FrameInput, scene: &mut Scene) {
        let selected = self.session.selected_id().cloned();
        let Some(bot_id) = selected else {
            *scene = Scene::empty();
            return;
        };

        let Some(world) = self
            .session
            .bot(&bot_id)
            .and_then(|bot| bot.local.world.clone())
        else {
            *scene = Scene::empty();
            return;
        };

        if self.view.resolve_hover(input.cursor, &world) {
            if let Some(tile) = self.view.hovered() {
                let tooltip = TileTooltip::for_tile(tile, self.session.items(), &mut self.effects);
                debug!(
                    x = tooltip.x,
                    y = tooltip.y,
                    fg = %tooltip.foreground,
                    bg = %tooltip.background,
                    zoom = self.view.zoom_percent(),
                    "hover"
                );
            }
        }

        if input.harvest_scan {
            let candidates = scan(&world, self.session.items(), &mut self.effects);
            info!(count = candidates.len(), "harvest scan");
            for candidate in candidates {
                self.effects
                    .push(Effect::Send(ClientMessage::BotAction(BotActionRequest::new(
                        bot_id.clone(),
                        candidate.harvest_action(),
                    ))));
            }
        }

        *scene = build_scene(
            &world,
            self.session.items(),
            self.view.transform(),
            self.view.hovered(),
            &mut self.effects,
        );
    }

    fn drain_effects(&mut self) {
        while !self.effects.is_empty() {
            for effect in std::mem::take(&mut self.effects) {
                self.run_effect(effect);
            }
        }
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Send(message) => self.send(&message),
            Effect::SelectionCleared => {
                // A fresh selection must not inherit the old viewport.
                self.view = ViewState::new();
            }
            Effect::RefreshDashboard(bot_id) => {
                debug!(bot = bot_id.as_str(), "dashboard refresh");
            }
            Effect::SearchResults(items) => {
                info!(count = items.len(), "search results");
            }
            Effect::ServerError(message) => {
                warn!("server error: {message}");
            }
            Effect::DatabaseInfo(info) => {
                info!(
                    loaded = info.loaded,
                    version = info.version,
                    items = info.item_count,
                    "item database"
                );
            }
        }
    }

    /// Writes one outbound message, dropping it when the connection is not
    /// open.
    fn send(&mut self, message: &ClientMessage) {
        if !self.connection.is_open() {
            debug!("dropping outbound frame while disconnected");
            return;
        }
        let text = match encode_frame(message) {
            Ok(text) => text,
            Err(error) => {
                warn!(%error, "failed to encode outbound frame");
                return;
            }
        };

        let mut events = Vec::new();
        if !self.link.send_frame(&text, &mut events) {
            debug!("outbound frame lost to a dying socket");
        }
        // A fatal write surfaces as a Closed event; fold it in immediately so
        // the redial clock starts this frame.
        self.process_events(events, Instant::now());
    }

    /// Clears the selected bot, notifying the server side state too.
    #[cfg(test)]
    pub(crate) fn remove_selected(&mut self) {
        if let Some(id) = self.session.selected_id().cloned() {
            self.session.remove_bot(id, &mut self.effects);
            self.drain_effects();
        }
    }

    #[cfg(test)]
    pub(crate) fn selected_id(&self) -> Option<&fleetdeck_core::BotId> {
        self.session.selected_id()
    }
}
