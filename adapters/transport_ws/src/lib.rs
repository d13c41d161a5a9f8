#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Non-blocking WebSocket transport for the dashboard's server link.
//!
//! The render loop cannot block on the network, so the socket is switched to
//! non-blocking mode after the handshake and drained once per frame through
//! [`WsTransport::poll`]. The transport reports plain lifecycle events and
//! text frames; deciding what the frames mean (and when to redial) is the
//! connection system's job, not this adapter's.

use std::io::ErrorKind;
use std::net::TcpStream;

use tracing::{debug, info, warn};
use tungstenite::{
    stream::MaybeTlsStream, Error as WsError, Message, WebSocket,
};

/// Socket-level event surfaced to the connection system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// The handshake completed and frames may flow.
    Opened,
    /// The socket is gone, cleanly or otherwise.
    Closed,
    /// One inbound text frame.
    Frame(String),
}

/// Single WebSocket client connection with frame-at-a-time polling.
#[derive(Debug)]
pub struct WsTransport {
    url: String,
    socket: Option<WebSocket<MaybeTlsStream<TcpStream>>>,
}

impl WsTransport {
    /// Creates a transport that will dial the provided URL.
    #[must_use]
    pub fn new<T>(url: T) -> Self
    where
        T: Into<String>,
    {
        Self {
            url: url.into(),
            socket: None,
        }
    }

    /// URL this transport dials.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Reports whether a socket is currently established.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.socket.is_some()
    }

    /// Attempts one blocking dial, emitting [`TransportEvent::Opened`] on
    /// success.
    ///
    /// A failed dial only logs; the caller's reconnect schedule decides when
    /// to try again.
    pub fn dial(&mut self, out_events: &mut Vec<TransportEvent>) {
        match tungstenite::connect(&self.url) {
            Ok((socket, _response)) => {
                if let MaybeTlsStream::Plain(stream) = socket.get_ref() {
                    if let Err(error) = stream.set_nonblocking(true) {
                        warn!(url = %self.url, %error, "failed to switch socket to non-blocking");
                    }
                }
                info!(url = %self.url, "connected to fleet server");
                self.socket = Some(socket);
                out_events.push(TransportEvent::Opened);
            }
            Err(error) => {
                warn!(url = %self.url, %error, "dial failed");
            }
        }
    }

    /// Drains every frame currently buffered on the socket.
    ///
    /// Non-text frames are ignored (tungstenite answers pings itself on the
    /// next read or write). A close frame or a fatal read error tears the
    /// socket down and emits [`TransportEvent::Closed`].
    pub fn poll(&mut self, out_events: &mut Vec<TransportEvent>) {
        let Some(socket) = self.socket.as_mut() else {
            return;
        };

        loop {
            match socket.read() {
                Ok(Message::Text(text)) => out_events.push(TransportEvent::Frame(text)),
                Ok(Message::Close(_)) => {
                    debug!(url = %self.url, "server closed the connection");
                    self.teardown(out_events);
                    return;
                }
                Ok(_) => {}
                Err(WsError::Io(error)) if error.kind() == ErrorKind::WouldBlock => return,
                Err(error) => {
                    warn!(url = %self.url, %error, "socket read failed");
                    self.teardown(out_events);
                    return;
                }
            }
        }
    }

    /// Writes one text frame, returning whether the write succeeded.
    ///
    /// A fatal write error tears the socket down and emits
    /// [`TransportEvent::Closed`].
    pub fn send(&mut self, text: &str, out_events: &mut Vec<TransportEvent>) -> bool {
        let Some(socket) = self.socket.as_mut() else {
            return false;
        };

        match socket.send(Message::Text(text.to_owned())) {
            Ok(()) => true,
            Err(WsError::Io(error)) if error.kind() == ErrorKind::WouldBlock => {
                // The frame is queued inside tungstenite and flushes with the
                // next read or write.
                true
            }
            Err(error) => {
                warn!(url = %self.url, %error, "socket write failed");
                self.teardown(out_events);
                false
            }
        }
    }

    fn teardown(&mut self, out_events: &mut Vec<TransportEvent>) {
        self.socket = None;
        out_events.push(TransportEvent::Closed);
    }
}
