//! The bridge server: accept loop, dispatcher, broadcaster, lifecycle.
//!
//! # Concurrency model
//!
//! There is no internal thread and no lock.  The host calls
//! [`BridgeServer::on_tick`] once per scheduler tick; one tick performs, in
//! order:
//!
//! 1. Drain all pending accepts (each new peer joins the connection list and
//!    a `client_connected` notification is emitted).
//! 2. For every connection in list order: remove it first if its status
//!    turned closed/error, otherwise drain available bytes and dispatch
//!    every complete message synchronously — handler execution, broadcasts
//!    it queues, and the correlated response all complete within this tick.
//!
//! Messages from a single connection dispatch in extraction order (FIFO per
//! connection); across connections the only ordering is accept order, then
//! list order, within a tick.  Handlers must not block: the tick runs on the
//! editor's UI thread, and a hanging handler visibly freezes the editor.
//!
//! # Notifications
//!
//! Observers (UI logging panels, status bars) receive
//! [`ServerNotification`]s through the channel returned by
//! [`BridgeServer::new`] and drain it on their own schedule.

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, TcpListener};
use std::sync::mpsc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use scenebridge_core::{encode_event, encode_response, CommandRegistry, Params, Request};

use crate::connection::Connection;
use crate::host::BridgeHost;

/// Default TCP port the bridge listens on.
pub const DEFAULT_PORT: u16 = 9876;

/// Errors from server lifecycle operations.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("bind failed on {addr}: {source}")]
    BindFailed {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// `start` was called while the server was already listening.
    #[error("server already running on {0}")]
    AlreadyRunning(SocketAddr),
}

/// Lifecycle and traffic notifications emitted towards the host.
///
/// Connections are identified by their current index in the server's list;
/// indices shift when an earlier entry is removed, so a notification's index
/// is only meaningful relative to the tick that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerNotification {
    /// A new peer was accepted.
    ClientConnected { index: usize },
    /// A peer was removed after its socket closed or failed.
    ClientDisconnected { index: usize },
    /// A well-formed request was observed, regardless of dispatch outcome.
    MessageReceived {
        index: usize,
        method: String,
        params: Params,
    },
}

/// The TCP command server.
///
/// Generic over the host context `C` that handlers receive; the context is
/// passed into [`on_tick`](Self::on_tick) by the caller rather than stored,
/// so ownership of the editor state stays with the host.
pub struct BridgeServer<C> {
    listener: Option<TcpListener>,
    connections: Vec<Connection>,
    registry: CommandRegistry<C>,
    bind_address: IpAddr,
    notify_tx: mpsc::Sender<ServerNotification>,
}

impl<C: BridgeHost> BridgeServer<C> {
    /// Creates a stopped server around a fully built registry, returning it
    /// together with the notification receiver.
    ///
    /// Binds to loopback only; use [`with_bind_address`](Self::with_bind_address)
    /// to expose the bridge on other interfaces.
    pub fn new(registry: CommandRegistry<C>) -> (Self, mpsc::Receiver<ServerNotification>) {
        Self::with_bind_address(registry, IpAddr::V4(Ipv4Addr::LOCALHOST))
    }

    /// Creates a stopped server that will bind to `bind_address`.
    pub fn with_bind_address(
        registry: CommandRegistry<C>,
        bind_address: IpAddr,
    ) -> (Self, mpsc::Receiver<ServerNotification>) {
        let (notify_tx, notify_rx) = mpsc::channel();
        let server = Self {
            listener: None,
            connections: Vec::new(),
            registry,
            bind_address,
            notify_tx,
        };
        (server, notify_rx)
    }

    /// Starts listening on `port`.  Pass 0 to let the OS pick a free port
    /// (useful in tests); read it back with [`local_addr`](Self::local_addr).
    ///
    /// # Errors
    ///
    /// Returns [`ServerError::AlreadyRunning`] when the server is already
    /// listening and [`ServerError::BindFailed`] when the socket cannot be
    /// bound (port in use, missing permission).
    pub fn start(&mut self, port: u16) -> Result<(), ServerError> {
        if let Some(addr) = self.local_addr() {
            return Err(ServerError::AlreadyRunning(addr));
        }

        let addr = SocketAddr::new(self.bind_address, port);
        let listener = bind_nonblocking(addr).map_err(|source| ServerError::BindFailed {
            addr,
            source,
        })?;

        info!(
            addr = %listener.local_addr().map(|a| a.to_string()).unwrap_or_default(),
            commands = self.registry.len(),
            "bridge listening"
        );
        self.listener = Some(listener);
        Ok(())
    }

    /// Stops listening and drops every connection.
    pub fn stop(&mut self) {
        if self.listener.take().is_some() {
            info!(dropped_connections = self.connections.len(), "bridge stopped");
        }
        self.connections.clear();
    }

    /// True while the listening socket is open.
    pub fn is_running(&self) -> bool {
        self.listener.is_some()
    }

    /// The bound address, when running.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Number of peers currently in the connection list.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// One scheduler tick: drain accepts, then drain and dispatch traffic.
    ///
    /// Must be called from a single thread; all connection state is mutated
    /// only here and in [`broadcast`](Self::broadcast).
    pub fn on_tick(&mut self, ctx: &mut C) {
        if self.listener.is_none() {
            return;
        }
        self.accept_pending();
        self.service_connections(ctx);

        // Events the host queued outside any request (editor selection
        // change, captured runtime error) flush at the end of the tick.
        for event in ctx.drain_events() {
            self.broadcast(&event.name, &event.data);
        }
    }

    /// Pushes `{type:"event", event, data}` to every currently connected
    /// client, in list order.
    ///
    /// The payload is serialized once and written identically to each peer.
    /// At-most-once, best-effort: a failing write marks that peer for
    /// removal on a later tick and does not stop the fan-out.
    pub fn broadcast(&mut self, event: &str, data: &Value) {
        let line = encode_event(event, data);
        debug!(event, clients = self.connections.len(), "broadcast");
        for conn in &mut self.connections {
            conn.send_line(&line);
        }
    }

    // ── Tick internals ────────────────────────────────────────────────────────

    /// Accepts until the listener reports no pending connection.
    fn accept_pending(&mut self) {
        loop {
            let accepted = match &self.listener {
                Some(listener) => listener.accept(),
                None => return,
            };
            match accepted {
                Ok((stream, peer)) => match Connection::new(stream) {
                    Ok(conn) => {
                        self.connections.push(conn);
                        let index = self.connections.len() - 1;
                        info!(%peer, index, "client connected");
                        self.notify(ServerNotification::ClientConnected { index });
                    }
                    Err(e) => warn!(%peer, error = %e, "failed to adopt accepted socket"),
                },
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    // Accept failures just end the drain for this tick.
                    warn!(error = %e, "accept failed");
                    break;
                }
            }
        }
    }

    /// Walks the connection list in order, removing dead peers and
    /// dispatching every complete message the live ones produced.
    fn service_connections(&mut self, ctx: &mut C) {
        let mut index = 0;
        while index < self.connections.len() {
            if !self.connections[index].is_open() {
                self.remove_connection(index);
                continue;
            }

            // Messages extracted before an EOF observed during this read are
            // still dispatched; the removal happens on the next pass once
            // the status check sees the transition.
            let messages = self.connections[index].read_messages();
            for raw in messages {
                self.dispatch(index, &raw, ctx);
            }
            index += 1;
        }
    }

    fn remove_connection(&mut self, index: usize) {
        let conn = self.connections.remove(index);
        info!(peer = ?conn.peer_addr(), index, status = ?conn.status(), "client disconnected");
        self.notify(ServerNotification::ClientDisconnected { index });
    }

    /// Turns one raw message into handler execution plus, when the request
    /// carried an id, a correlated response to the originating connection.
    fn dispatch(&mut self, index: usize, raw: &str, ctx: &mut C) {
        let request = match Request::parse(raw) {
            Ok(request) => request,
            Err(e) => {
                // Deliberately silent on the wire: an unparseable payload
                // cannot be correlated to an id, so no NACK exists.
                debug!(index, error = %e, "dropping malformed message");
                return;
            }
        };

        self.notify(ServerNotification::MessageReceived {
            index,
            method: request.method.clone(),
            params: request.params.clone(),
        });
        debug!(index, method = %request.method, id = %request.id, "dispatch");

        let result = match self.registry.get(&request.method) {
            Some(handler) => handler(ctx, &request.params),
            None => {
                debug!(method = %request.method, "unknown method");
                let mut result = Map::new();
                result.insert(
                    "error".into(),
                    Value::String(format!("Unknown method: {}", request.method)),
                );
                result
            }
        };

        // Events the handler queued go out to everyone before the response,
        // so the requester sees them in the order the handler produced them.
        for event in ctx.drain_events() {
            self.broadcast(&event.name, &event.data);
        }

        if request.wants_response() {
            let line = encode_response(&request.id, &result);
            if let Some(conn) = self.connections.get_mut(index) {
                conn.send_line(&line);
            }
        }
    }

    fn notify(&self, notification: ServerNotification) {
        // The host may have dropped the receiver; notifications are advisory.
        let _ = self.notify_tx.send(notification);
    }
}

fn bind_nonblocking(addr: SocketAddr) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(addr)?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}
