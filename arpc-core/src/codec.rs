//! Codec for JSON-RPC message parsing and serialization
//!
//! This module is the wire boundary of the dispatch engine: it turns raw
//! request text into structured request records and renders response records
//! back to JSON.
//!
//! # Two-Step Decoding
//!
//! Incoming text is first parsed to a generic `serde_json::Value` to decide
//! the payload shape (single object vs. batch array), then each object is
//! parsed into a [`JsonRpcRequest`] separately. The split matters for
//! batches: a malformed element must produce an error record in its position
//! while the rest of the batch proceeds.
//!
//! # Error Mapping
//!
//! - Not JSON at all → `-32700` (Parse error)
//! - Valid JSON but bad envelope (missing `method`, scalar `params`, wrong
//!   version marker, empty batch array) → `-32600` (Invalid Request)
//!
//! # Examples
//!
//! ```rust
//! use arpc_core::codec::{self, Payload};
//!
//! let payload = codec::decode(r#"{"jsonrpc":"2.0","method":"svc.ping","id":1}"#).unwrap();
//! let value = match payload {
//!     Payload::Single(v) => v,
//!     Payload::Batch(_) => unreachable!(),
//! };
//! let request = codec::parse_request(value).unwrap();
//! assert_eq!(request.method, "svc.ping");
//! ```

use crate::error::{Error, Result};
use crate::types::{Id, JsonRpcRequest, JsonRpcResponse};
use serde::Serialize;

/// Shape of an incoming JSON-RPC message
///
/// A batch is syntactically an array; its elements stay raw
/// `serde_json::Value`s so they can be validated independently.
#[derive(Debug, Clone)]
pub enum Payload {
    /// One request object
    Single(serde_json::Value),
    /// An ordered sequence of request objects
    Batch(Vec<serde_json::Value>),
}

/// Decode raw request text into a single or batch payload
///
/// # Errors
///
/// - `Error::Parse` if the text is not well-formed JSON
/// - `Error::InvalidRequest` if the payload is an empty array (the spec
///   treats an empty batch as an invalid request, answered with a single
///   error object)
pub fn decode(data: &str) -> Result<Payload> {
    let value: serde_json::Value =
        serde_json::from_str(data).map_err(|e| Error::Parse(e.to_string()))?;

    match value {
        serde_json::Value::Array(elements) => {
            if elements.is_empty() {
                return Err(Error::InvalidRequest("Batch cannot be empty".to_string()));
            }
            Ok(Payload::Batch(elements))
        }
        other => Ok(Payload::Single(other)),
    }
}

/// Parse one payload element into a request record
///
/// Validates the envelope: `method` must be a string, `params` (if present)
/// must be an array or object, and the version marker must be `"2.0"`.
///
/// # Errors
///
/// `Error::InvalidRequest` describing the first violation found.
pub fn parse_request(value: serde_json::Value) -> Result<JsonRpcRequest> {
    let request: JsonRpcRequest =
        serde_json::from_value(value).map_err(|e| Error::InvalidRequest(e.to_string()))?;
    request.validate_envelope().map_err(Error::JsonRpc)?;
    Ok(request)
}

/// Best-effort recovery of the `id` field from a malformed request object
///
/// Used to correlate error records for requests that failed envelope
/// validation. Anything that is not a string or number degrades to
/// `Id::Null`, which the spec prescribes for undeterminable IDs.
pub fn extract_id(value: &serde_json::Value) -> Id {
    match value.get("id") {
        Some(serde_json::Value::String(s)) => Id::String(s.clone()),
        Some(serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Id::Number(i)
            } else if let Some(u) = n.as_u64() {
                Id::Unsigned(u)
            } else {
                Id::Null
            }
        }
        _ => Id::Null,
    }
}

/// Encode any serializable message to a JSON string
pub fn encode<T: Serialize>(msg: &T) -> Result<String> {
    serde_json::to_string(msg).map_err(|e| Error::Serialization(e.to_string()))
}

/// Encode a single response record to wire JSON
///
/// # Examples
///
/// ```rust
/// use arpc_core::{codec, JsonRpcResponse, Id};
/// use serde_json::json;
///
/// let response = JsonRpcResponse::success(json!(42), Id::Number(1));
/// let json = codec::encode_response(&response).unwrap();
/// assert!(json.contains("\"result\":42"));
/// ```
pub fn encode_response(resp: &JsonRpcResponse) -> Result<String> {
    encode(resp)
}

/// Encode a batch of response records to a wire JSON array
///
/// Callers are responsible for not calling this with an empty slice: an
/// all-notification batch produces no body at all, not `[]`.
pub fn encode_batch_responses(responses: &[JsonRpcResponse]) -> Result<String> {
    serde_json::to_string(responses).map_err(|e| Error::Serialization(e.to_string()))
}
