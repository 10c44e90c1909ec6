//! Error types for arpc
//!
//! Two error types live here:
//!
//! - **Error**: application-level errors for internal use (uses thiserror)
//! - **JsonRpcErrorData**: wire-format errors as defined in the JSON-RPC 2.0 spec
//!
//! # Spec-Compliant Error Codes
//!
//! JSON-RPC 2.0 defines standard error codes:
//! - `-32700`: Parse error (invalid JSON)
//! - `-32600`: Invalid request (malformed envelope)
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error
//! - `-32000 to -32099`: Server error (implementation-defined)
//!
//! Registration-time errors (`DuplicateService`, `DuplicateMethod`) never
//! reach the wire: a duplicate registration is a startup configuration bug
//! and is surfaced to the application, not to remote callers.
//!
//! # Examples
//!
//! ```rust
//! use arpc_core::{Error, JsonRpcErrorData};
//!
//! let error = Error::MethodNotFound("calc.unknown".into());
//! assert_eq!(error.to_error_data().code, -32601);
//!
//! let json_error = JsonRpcErrorData::method_not_found("calc.unknown");
//! assert_eq!(json_error.code, -32601);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for arpc operations
pub type Result<T> = std::result::Result<T, Error>;

/// Application-level error type for arpc operations
///
/// Every failure path in the dispatch pipeline converges to one of these
/// variants; the dispatcher converts them to wire-format
/// [`JsonRpcErrorData`] via [`to_error_data`](Error::to_error_data) before
/// anything crosses the `handle` boundary.
///
/// # Error Categories
///
/// - **Protocol errors**: Parse, InvalidRequest, MethodNotFound, InvalidParams
/// - **Execution errors**: Internal, Serialization
/// - **Registration errors**: DuplicateService, DuplicateMethod (never
///   wire-visible, fatal at startup)
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// JSON-RPC protocol error already in wire format
    ///
    /// Handlers can return this variant to surface a custom error code
    /// (by convention in the -32000..-32099 server range); the dispatcher
    /// passes it through verbatim.
    #[error("JSON-RPC error: {0}")]
    JsonRpc(#[from] JsonRpcErrorData),

    /// The request body is not well-formed JSON
    ///
    /// Maps to JSON-RPC error code -32700.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The JSON is valid but the request envelope is not
    ///
    /// Missing or mis-typed `method`, bad `params` shape, wrong version
    /// marker. Maps to JSON-RPC error code -32600.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No registered service/method matches the request's method name
    ///
    /// Maps to JSON-RPC error code -32601.
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    /// The method exists but the supplied parameters do not bind
    ///
    /// Wrong arity, missing or unknown names, or a value that cannot be
    /// coerced to the declared type. Maps to JSON-RPC error code -32602.
    #[error("Invalid params: {0}")]
    InvalidParams(String),

    /// Serialization or deserialization error
    ///
    /// A handler produced a value that could not be rendered to JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A method body failed during invocation
    ///
    /// Maps to JSON-RPC error code -32603.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A service with this name is already registered
    ///
    /// Registration-time only; treated as a fatal configuration error.
    #[error("Duplicate service: {0}")]
    DuplicateService(String),

    /// A service declared the same method name twice
    ///
    /// Registration-time only.
    #[error("Duplicate method: {service}.{method}")]
    DuplicateMethod {
        /// The service being registered
        service: String,
        /// The repeated method name
        method: String,
    },
}

impl Error {
    /// Convert to the wire-format error object
    ///
    /// Registration-time variants map to an internal error; they should never
    /// occur at request time given the registration invariants, but the
    /// conversion is total so no failure path can panic.
    pub fn to_error_data(&self) -> JsonRpcErrorData {
        match self {
            Error::JsonRpc(data) => data.clone(),
            Error::Parse(_) => JsonRpcErrorData::parse_error(),
            Error::InvalidRequest(msg) => JsonRpcErrorData::invalid_request(msg.clone()),
            Error::MethodNotFound(method) => JsonRpcErrorData::method_not_found(method.clone()),
            Error::InvalidParams(msg) => JsonRpcErrorData::invalid_params(msg.clone()),
            Error::Serialization(msg)
            | Error::Internal(msg) => JsonRpcErrorData::internal_error(msg.clone()),
            Error::DuplicateService(_) | Error::DuplicateMethod { .. } => {
                JsonRpcErrorData::internal_error(self.to_string())
            }
        }
    }
}

/// JSON-RPC 2.0 error data as defined in the specification
///
/// This structure is the exact wire format for JSON-RPC errors; it appears in
/// the `error` field of a response. `code` and `message` are required, `data`
/// may carry structured diagnostic detail and is omitted when `None`.
///
/// # Examples
///
/// ```rust
/// use arpc_core::JsonRpcErrorData;
/// use serde_json::json;
///
/// let error = JsonRpcErrorData::method_not_found("calc.add");
/// assert_eq!(error.code, -32601);
///
/// let custom = JsonRpcErrorData::with_data(
///     -32001,
///     "Insufficient funds",
///     json!({"balance": 50, "required": 100}),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorData {
    /// Numeric error code indicating the error type
    ///
    /// Codes from -32768 to -32000 are reserved by the spec.
    pub code: i32,

    /// Human-readable error message
    pub message: String,

    /// Optional structured diagnostic detail
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcErrorData {
    /// Create a new JSON-RPC error with code and message
    ///
    /// Use the standard factory methods (like `parse_error()`) for
    /// spec-defined errors, or this constructor for custom application errors
    /// in the -32000..-32099 server range.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Create a new JSON-RPC error carrying additional diagnostic data
    pub fn with_data(code: i32, message: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            code,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Parse error (-32700): the request body is not valid JSON
    pub fn parse_error() -> Self {
        Self::new(-32700, "Parse error")
    }

    /// Invalid request (-32600): the JSON is valid but the request envelope
    /// is malformed
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::new(-32600, msg)
    }

    /// Method not found (-32601)
    ///
    /// # Examples
    ///
    /// ```rust
    /// use arpc_core::JsonRpcErrorData;
    ///
    /// let error = JsonRpcErrorData::method_not_found("userService.nope");
    /// assert_eq!(error.message, "Method not found: userService.nope");
    /// ```
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::new(-32601, format!("Method not found: {}", method.into()))
    }

    /// Invalid params (-32602): the method exists but the parameters are
    /// wrong (arity, names, or types)
    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::new(-32602, msg)
    }

    /// Internal error (-32603): the method body failed during execution
    pub fn internal_error(msg: impl Into<String>) -> Self {
        Self::new(-32603, msg)
    }
}

impl std::fmt::Display for JsonRpcErrorData {
    /// Formats as "[code] message" for easy readability in logs
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for JsonRpcErrorData {}
