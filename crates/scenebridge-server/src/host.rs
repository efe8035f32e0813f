//! The seam between the protocol engine and the host editor.
//!
//! Handlers receive the host context by explicit `&mut` reference and return
//! a result map; they have no handle back to the server, so a handler that
//! needs to notify *all* clients (not just the requester) records the event
//! on its context instead.  After each handler returns, the server drains
//! [`BridgeHost::drain_events`] and broadcasts everything it finds before
//! writing the correlated response, so on the triggering client's socket the
//! event precedes the response.

use serde_json::Value;

/// One uncorrelated event queued by a handler for broadcast to all clients.
#[derive(Debug, Clone, PartialEq)]
pub struct HostEvent {
    /// Event name, e.g. `plan_updated` or `diff_entry_added`.
    pub name: String,
    /// Arbitrary JSON payload forwarded verbatim.
    pub data: Value,
}

impl HostEvent {
    pub fn new(name: impl Into<String>, data: Value) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Contract the host context fulfils towards the bridge server.
pub trait BridgeHost {
    /// Takes every event queued since the last drain, oldest first.
    ///
    /// The default implementation queues nothing, which suits hosts whose
    /// handlers never broadcast.
    fn drain_events(&mut self) -> Vec<HostEvent> {
        Vec::new()
    }
}
