//! ARPC - Automatic JSON-RPC 2.0 Method Dispatch
//!
//! This is the main convenience crate that re-exports all arpc sub-crates.
//! Use this crate if you want a single dependency that provides the full
//! registry, dispatcher and client stub generation stack.
//!
//! # Architecture
//!
//! arpc is organized into modular crates:
//!
//! - **arpc-core**: Wire types, codec, error handling
//! - **arpc-server**: Service registry, parameter binder, dispatcher and
//!   client stub generator
//!
//! The dispatcher is transport-agnostic: it consumes raw request text and
//! produces raw response text, so any HTTP framework (or a test harness) can
//! sit in front of it by forwarding bodies.
//!
//! # Quick Start
//!
//! ```rust
//! use arpc::server::{
//!     Dispatcher, MethodDescriptor, ParamType, ServiceDefinition, ServiceRegistry, from_typed_fn,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut registry = ServiceRegistry::new();
//!     registry.register(
//!         ServiceDefinition::new("calc").method(
//!             MethodDescriptor::builder("add")
//!                 .param("a", ParamType::Integer)
//!                 .param("b", ParamType::Integer)
//!                 .returns(ParamType::Integer)
//!                 .handler(from_typed_fn(|(a, b): (i64, i64)| async move { Ok(a + b) })),
//!         ),
//!     )?;
//!
//!     let dispatcher = Dispatcher::new(Arc::new(registry));
//!     let response = dispatcher
//!         .handle(r#"{"jsonrpc":"2.0","method":"calc.add","params":[2,3],"id":1}"#)
//!         .await;
//!     assert!(response.unwrap().contains("\"result\":5"));
//!     Ok(())
//! }
//! ```

// Re-export all public APIs from sub-crates
// This allows users to access everything through `arpc::` prefix
pub use arpc_core as core;
pub use arpc_server as server;

// Convenience re-exports of the most commonly used types
// This avoids needing to write `arpc::server::Dispatcher`
pub use arpc_core::{Error, Id, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse, Result};
pub use arpc_server::{Dispatcher, ServiceDefinition, ServiceRegistry};
