//! Core JSON-RPC 2.0 types and codec for arpc
//!
//! This crate provides the foundational types and utilities for the arpc
//! dispatch engine:
//!
//! - **Types**: JSON-RPC 2.0 data structures (requests, responses, params, ids)
//! - **Codec**: parsing raw request text and rendering response records
//! - **Error handling**: the dispatch error taxonomy and wire error objects
//!
//! # Architecture
//!
//! The crate is transport-agnostic: it handles message parsing and
//! serialization but does not dictate how messages move. The `arpc-server`
//! crate builds the service registry, parameter binder and dispatcher on top
//! of this foundation; HTTP framework bindings sit outside both.
//!
//! # Example
//!
//! ```rust
//! use arpc_core::{codec, JsonRpcRequest, Params, Id};
//! use serde_json::json;
//!
//! let request = JsonRpcRequest::new(
//!     "calc.add",
//!     Some(Params::Named(
//!         json!({"a": 5, "b": 3}).as_object().unwrap().clone(),
//!     )),
//!     Some(Id::Number(1)),
//! );
//!
//! let json = codec::encode(&request).unwrap();
//! assert!(json.contains("\"method\":\"calc.add\""));
//! ```

pub mod codec;
pub mod error;
pub mod types;

// Re-export the most commonly used types for convenience
pub use codec::Payload;
pub use error::{Error, JsonRpcErrorData, Result};
pub use types::{Id, JsonRpcRequest, JsonRpcResponse, Params};
