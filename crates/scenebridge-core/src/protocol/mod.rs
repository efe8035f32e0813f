//! Wire protocol: newline framing and message encode/decode.
//!
//! Wire format (TCP, UTF-8 JSON, one object per line):
//! ```text
//! client → server   {"id": "<opt>", "method": "<name>", "params": {...}}\n
//! server → client   {"id": "<echoed>", "type": "response", "result": {...}}\n
//! server → all      {"type": "event", "event": "<name>", "data": {...}}\n
//! ```

pub mod framing;
pub mod messages;

pub use framing::FrameBuffer;
pub use messages::{encode_event, encode_response, ProtocolError, Request};
