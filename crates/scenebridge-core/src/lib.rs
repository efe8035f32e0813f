//! # scenebridge-core
//!
//! Protocol layer for Scenebridge, a TCP command bridge that lets an external
//! process drive editor operations (scene graph edits, script I/O, project
//! file management) over newline-delimited JSON.
//!
//! This crate contains everything that can be specified without a socket:
//!
//! - **`protocol`** – The wire format.  Inbound bytes are split into discrete
//!   messages by [`protocol::FrameBuffer`]; messages parse into
//!   [`protocol::Request`] records; outbound traffic is serialized by
//!   [`protocol::encode_response`] and [`protocol::encode_event`].
//!
//! - **`params`** – A typed accessor wrapper over the untyped parameter bag
//!   carried by each request.  Every lookup takes a default, preserving the
//!   lenient missing-field contract of the wire protocol in one place.
//!
//! - **`registry`** – The name → handler command table.  Built once by the
//!   host before the server starts accepting traffic; the bridge never
//!   mutates it afterwards.
//!
//! It has zero dependencies on sockets, threads, or the host editor, so the
//! entire protocol surface is testable with plain strings.

pub mod params;
pub mod protocol;
pub mod registry;

pub use params::Params;
pub use protocol::framing::FrameBuffer;
pub use protocol::messages::{encode_event, encode_response, ProtocolError, Request};
pub use registry::{fail, ok, CommandRegistry, CommandResult, Handler};
