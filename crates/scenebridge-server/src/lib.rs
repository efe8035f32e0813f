//! scenebridge-server library crate.
//!
//! The bridge server owns a listening TCP socket, a list of connected peers
//! (each with its own receive buffer), an injected command registry, and a
//! broadcast mechanism.  It has no thread of its own: the host editor calls
//! [`server::BridgeServer::on_tick`] once per scheduler tick, and everything
//! — accepting, reading, dispatching, responding, broadcasting — runs to
//! completion inside that call on the host's UI thread.
//!
//! # Module layout
//!
//! ```text
//! [scenebridge-server]
//!   ├── config/      TOML config schema and load/save
//!   ├── connection/  One accepted peer: non-blocking socket + frame buffer
//!   ├── server/      Accept loop, dispatcher, broadcaster, lifecycle
//!   ├── host/        BridgeHost trait: how handler side effects become events
//!   ├── workspace/   Demo host: in-memory editor workspace model
//!   └── commands/    Command surface registered against the workspace
//! ```
//!
//! `connection` and `server` form the transport engine; `workspace` and
//! `commands` are a working stand-in for the editor-side collaborator so the
//! engine can be exercised end to end (integration tests in `tests/` drive
//! the real socket).

pub mod commands;
pub mod config;
pub mod connection;
pub mod host;
pub mod server;
pub mod workspace;

pub use config::BridgeConfig;
pub use host::{BridgeHost, HostEvent};
pub use server::{BridgeServer, ServerError, ServerNotification};
pub use workspace::EditorWorkspace;
