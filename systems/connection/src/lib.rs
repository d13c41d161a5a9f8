#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Server connection lifecycle and inbound frame gating.
//!
//! This system owns the connecting / open / closed state machine and the
//! fixed-delay reconnect schedule. It never performs IO itself: the transport
//! adapter reports socket events, and this system decides which frames reach
//! the session and when a redial is due.

use std::time::{Duration, Instant};

use fleetdeck_core::{decode_frame, ProtocolError, ServerMessage};

/// Fixed delay between a connection closing and the next dial attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_millis(2000);

/// Lifecycle phase of the dashboard's single server connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    /// A dial attempt is in flight.
    Connecting,
    /// The socket is established; frames flow in both directions.
    Open,
    /// The socket is gone; a redial is due at `retry_at`.
    Closed {
        /// Moment the next dial attempt becomes due.
        retry_at: Instant,
    },
}

/// Connection state machine with a fixed reconnect backoff.
#[derive(Clone, Copy, Debug)]
pub struct Connection {
    state: ConnectionState,
}

impl Default for Connection {
    fn default() -> Self {
        Self::new()
    }
}

impl Connection {
    /// Starts in the connecting phase; the first dial is assumed in flight.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ConnectionState::Connecting,
        }
    }

    /// Current lifecycle phase.
    #[must_use]
    pub const fn state(&self) -> ConnectionState {
        self.state
    }

    /// Reports whether frames may be sent right now.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.state, ConnectionState::Open)
    }

    /// Records a successful dial.
    pub fn opened(&mut self) {
        self.state = ConnectionState::Open;
    }

    /// Records the socket closing, for any reason, and schedules the redial.
    ///
    /// Closing an already-closed connection keeps the earlier deadline; a
    /// burst of close events must not push the retry further out.
    pub fn closed(&mut self, now: Instant) {
        if let ConnectionState::Closed { .. } = self.state {
            return;
        }
        self.state = ConnectionState::Closed {
            retry_at: now + RECONNECT_DELAY,
        };
    }

    /// Returns `true` exactly once per closed period when the redial is due,
    /// moving the machine back to connecting. The caller dials on `true`.
    pub fn poll_reconnect(&mut self, now: Instant) -> bool {
        match self.state {
            ConnectionState::Closed { retry_at } if now >= retry_at => {
                self.state = ConnectionState::Connecting;
                true
            }
            _ => false,
        }
    }

    /// Decodes one inbound text frame into zero or one server messages.
    ///
    /// Frames arriving outside the open phase are dropped: a late frame from
    /// a dying socket must not mutate session state. Unknown message types
    /// decode to nothing and malformed payloads surface as errors without
    /// touching the state machine.
    pub fn frame(
        &self,
        text: &str,
        out_messages: &mut Vec<ServerMessage>,
    ) -> Result<(), ProtocolError> {
        if !self.is_open() {
            return Ok(());
        }
        if let Some(message) = decode_frame(text)? {
            out_messages.push(message);
        }
        Ok(())
    }
}
