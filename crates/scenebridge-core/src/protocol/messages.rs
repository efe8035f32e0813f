//! Typed message records and JSON encode/decode for the bridge protocol.
//!
//! Inbound messages parse into [`Request`] with lenient defaults: a missing
//! `id` means fire-and-forget, a missing `method` dispatches as the empty
//! string (and will fail lookup), a missing `params` is an empty bag.
//! Anything that does not parse as a single JSON object is rejected with a
//! [`ProtocolError`]; the server drops such messages silently on the wire —
//! there is no NACK in this protocol.

use serde_json::{Map, Value};
use thiserror::Error;

use crate::params::Params;

/// Errors raised while decoding an inbound message.
///
/// These never travel back to the client: a payload that cannot be parsed
/// also cannot be correlated to a request `id`, so the message is dropped.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The payload is not well-formed JSON.
    #[error("malformed JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// The payload parsed, but the top-level value is not an object.
    #[error("payload is not a JSON object: {0}")]
    NotAnObject(&'static str),
}

/// One inbound command request.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Opaque correlation token.  Empty means no response is expected.
    pub id: String,
    /// Name of the registered command to invoke.
    pub method: String,
    /// The on-wire parameter bag.
    pub params: Params,
}

impl Request {
    /// Parses one raw message string into a request record.
    ///
    /// Defaults are applied field-by-field: `id=""`, `method=""`,
    /// `params={}`.  A `params` value that is present but not an object is
    /// treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError`] when the payload is not a single
    /// well-formed JSON object.
    pub fn parse(raw: &str) -> Result<Self, ProtocolError> {
        let value: Value = serde_json::from_str(raw)?;
        let Value::Object(obj) = value else {
            return Err(ProtocolError::NotAnObject(type_name(&value)));
        };

        let id = obj
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let method = obj
            .get("method")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let params = match obj.get("params") {
            Some(Value::Object(map)) => Params::from_map(map.clone()),
            _ => Params::empty(),
        };

        Ok(Self { id, method, params })
    }

    /// True when the request carries a correlation id and expects a response.
    pub fn wants_response(&self) -> bool {
        !self.id.is_empty()
    }
}

/// Serializes a correlated response, newline-terminated for the wire.
///
/// Shape: `{"id": <id>, "type": "response", "result": <result>}\n`.
pub fn encode_response(id: &str, result: &Map<String, Value>) -> String {
    let mut msg = Map::new();
    msg.insert("id".into(), Value::String(id.to_string()));
    msg.insert("type".into(), Value::String("response".into()));
    msg.insert("result".into(), Value::Object(result.clone()));
    let mut line = Value::Object(msg).to_string();
    line.push('\n');
    line
}

/// Serializes an uncorrelated broadcast event, newline-terminated.
///
/// Shape: `{"type": "event", "event": <name>, "data": <data>}\n`.  The
/// caller serializes once and writes the identical bytes to every client.
pub fn encode_event(event: &str, data: &Value) -> String {
    let mut msg = Map::new();
    msg.insert("type".into(), Value::String("event".into()));
    msg.insert("event".into(), Value::String(event.to_string()));
    msg.insert("data".into(), data.clone());
    let mut line = Value::Object(msg).to_string();
    line.push('\n');
    line
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
