//! JSON-RPC 2.0 wire types
//!
//! This module implements the core data structures from the JSON-RPC 2.0
//! specification (https://www.jsonrpc.org/specification):
//!
//! 1. **Request**: a call to a remote method, optionally expecting a response
//! 2. **Response**: the result of processing a request (success or error)
//!
//! A request without an `id` (or with `"id": null`) is a *notification*: the
//! server executes it but never sends anything back, not even on failure.
//!
//! # Request IDs
//!
//! Request IDs correlate requests with responses. The spec allows string,
//! number, or null IDs; responses to unparseable requests use `Id::Null`.

use crate::error::JsonRpcErrorData;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON-RPC 2.0 request ID
///
/// An ID can be a string, a number, or null. The `#[serde(untagged)]`
/// attribute serializes the inner value directly, without a discriminator,
/// matching the wire format exactly.
///
/// Implements `Hash` and `Eq` so IDs can key maps of pending requests.
///
/// # Examples
///
/// ```rust
/// use arpc_core::Id;
///
/// let id1: Id = "req-123".into();
/// let id2: Id = 42i64.into();
///
/// assert_eq!(id1.to_string(), "\"req-123\"");
/// assert_eq!(id2.to_string(), "42");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    /// String identifier - useful for UUIDs or correlation tokens
    String(String),
    /// Numeric identifier - efficient for sequential request counters
    Number(i64),
    /// Numeric identifier beyond the i64 range
    ///
    /// Separate variant so any JSON integer id round-trips unchanged;
    /// in-range numbers deserialize as `Number` first.
    Unsigned(u64),
    /// Null identifier - used on error responses when the request ID
    /// could not be determined
    Null,
}

impl fmt::Display for Id {
    /// Format the ID in a JSON-like representation: strings quoted,
    /// numbers as-is, null as "null".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::String(s) => write!(f, "\"{}\"", s),
            Id::Number(n) => write!(f, "{}", n),
            Id::Unsigned(n) => write!(f, "{}", n),
            Id::Null => write!(f, "null"),
        }
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::String(s)
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::String(s.to_string())
    }
}

impl From<i64> for Id {
    fn from(n: i64) -> Self {
        Id::Number(n)
    }
}

impl From<u64> for Id {
    /// In-range values normalize to `Number` so equality with wire-parsed
    /// ids holds; only values beyond `i64::MAX` use the unsigned variant.
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(i) => Id::Number(i),
            Err(_) => Id::Unsigned(n),
        }
    }
}

/// Parameters of a JSON-RPC 2.0 request
///
/// The spec allows `params` to be either an array (bound positionally) or an
/// object (bound by parameter name). Any other JSON type is an invalid
/// request. The untagged representation matches the wire format directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Params {
    /// Ordered parameter values, bound by position
    Positional(Vec<serde_json::Value>),
    /// Parameter values keyed by declared parameter name
    Named(serde_json::Map<String, serde_json::Value>),
}

impl Params {
    /// Number of supplied arguments, regardless of representation
    pub fn len(&self) -> usize {
        match self {
            Params::Positional(values) => values.len(),
            Params::Named(map) => map.len(),
        }
    }

    /// True if no arguments were supplied
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// JSON-RPC 2.0 request message
///
/// # Spec Compliance
///
/// A request MUST contain:
/// - `jsonrpc`: must be exactly "2.0" (checked by [`validate_envelope`])
/// - `method`: the name of the method to invoke, here in the form
///   `"service.method"`
///
/// And MAY contain:
/// - `params`: positional array or named object
/// - `id`: identifier correlating the response; absent or null means the
///   request is a notification and no response will be produced
///
/// [`validate_envelope`]: JsonRpcRequest::validate_envelope
///
/// # Examples
///
/// ```rust
/// use arpc_core::{JsonRpcRequest, Params, Id};
/// use serde_json::json;
///
/// let req = JsonRpcRequest::new(
///     "calc.subtract",
///     Some(Params::Positional(vec![json!(42), json!(23)])),
///     Some(Id::Number(1)),
/// );
/// assert!(!req.is_notification());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// JSON-RPC version - always "2.0" for this specification
    pub jsonrpc: String,
    /// Name of the remote method, `"service.method"`
    pub method: String,
    /// Optional parameters to pass to the method
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Params>,
    /// Correlation identifier; `None` (absent or null on the wire) marks a
    /// notification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
}

impl JsonRpcRequest {
    /// Create a new JSON-RPC 2.0 request
    ///
    /// The `jsonrpc` field is automatically set to "2.0".
    pub fn new(method: impl Into<String>, params: Option<Params>, id: Option<Id>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Create a notification: a request with no `id`, for which the server
    /// never produces a response
    pub fn notification(method: impl Into<String>, params: Option<Params>) -> Self {
        Self::new(method, params, None)
    }

    /// True if this request is a notification (no usable correlation ID)
    ///
    /// Both an absent `id` and `"id": null` count: a null ID cannot
    /// correlate a response, so none is sent.
    pub fn is_notification(&self) -> bool {
        matches!(self.id, None | Some(Id::Null))
    }

    /// Check the protocol version marker
    ///
    /// Structural validation (method is a string, params is array or object)
    /// already happened during deserialization; the version string is the one
    /// envelope rule serde cannot express.
    pub fn validate_envelope(&self) -> Result<(), JsonRpcErrorData> {
        if self.jsonrpc != "2.0" {
            return Err(JsonRpcErrorData::invalid_request(format!(
                "Unsupported JSON-RPC version: {:?}",
                self.jsonrpc
            )));
        }
        Ok(())
    }

    /// The response-correlation ID for this request, `Id::Null` if absent
    pub fn response_id(&self) -> Id {
        self.id.clone().unwrap_or(Id::Null)
    }
}

/// JSON-RPC 2.0 response message
///
/// A response carries either a `result` (success) or an `error` (failure),
/// never both. The mutual exclusion is enforced by construction through the
/// [`success`] and [`error`] factory methods.
///
/// The `id` echoes the originating request; it is `Id::Null` when the request
/// could not be parsed far enough to recover one.
///
/// [`success`]: JsonRpcResponse::success
/// [`error`]: JsonRpcResponse::error
///
/// # Examples
///
/// ```rust
/// use arpc_core::{JsonRpcResponse, JsonRpcErrorData, Id};
/// use serde_json::json;
///
/// let ok = JsonRpcResponse::success(json!({"value": 42}), Id::Number(1));
/// assert!(ok.is_success());
///
/// let err = JsonRpcResponse::error(
///     JsonRpcErrorData::method_not_found("unknownMethod"),
///     Id::Number(2),
/// );
/// assert!(err.is_error());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// JSON-RPC version - always "2.0"
    pub jsonrpc: String,
    /// The result of the method invocation (present only on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// Error information (present only on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcErrorData>,
    /// Request ID from the original request (for correlation)
    pub id: Id,
}

impl JsonRpcResponse {
    /// Create a successful JSON-RPC 2.0 response
    pub fn success(result: serde_json::Value, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// Create an error JSON-RPC 2.0 response
    ///
    /// Use `Id::Null` when the request ID could not be determined.
    pub fn error(error: JsonRpcErrorData, id: Id) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }

    /// True if `result` is present
    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// True if `error` is present
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
