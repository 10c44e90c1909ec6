//! # arpc-server
//!
//! Service registration and request dispatch for arpc. The crate turns a set
//! of registered service methods into a JSON-RPC 2.0 endpoint engine:
//!
//! - [`ServiceRegistry`] holds [`MethodDescriptor`]s grouped into services,
//!   resolvable by their `"service.method"` wire names
//! - [`MethodHandler`] implementations (usually built with [`from_typed_fn`]
//!   or [`from_args_fn`]) carry the actual method bodies
//! - the binder maps positional or named request params onto declared
//!   signatures with type checking
//! - [`Dispatcher`] ties it together: raw request text in, raw response text
//!   out, including batch handling and notification semantics
//! - the [`stub`] module generates JavaScript/TypeScript client code from the
//!   same descriptors
//!
//! # Quick Start
//!
//! ```rust
//! use arpc_server::{
//!     Dispatcher, MethodDescriptor, ParamType, ServiceDefinition, ServiceRegistry, from_typed_fn,
//! };
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mut registry = ServiceRegistry::new();
//! registry
//!     .register(
//!         ServiceDefinition::new("greeter").method(
//!             MethodDescriptor::builder("say_hello")
//!                 .param("name", ParamType::String)
//!                 .returns(ParamType::String)
//!                 .handler(from_typed_fn(|(name,): (String,)| async move {
//!                     Ok(format!("Hello, {}!", name))
//!                 })),
//!         ),
//!     )
//!     .unwrap();
//!
//! let dispatcher = Dispatcher::new(Arc::new(registry));
//! let body = dispatcher
//!     .handle(r#"{"jsonrpc":"2.0","method":"greeter.say_hello","params":["World"],"id":1}"#)
//!     .await;
//! assert!(body.unwrap().contains("Hello, World!"));
//! # }
//! ```

mod binder;
mod descriptor;
mod dispatcher;
mod handler;
mod registry;
pub mod stub;

pub use binder::{bind, BinderOptions};
pub use descriptor::{MethodDescriptor, MethodDescriptorBuilder, ParamSpec, ParamType};
pub use dispatcher::{DispatchOptions, Dispatcher};
pub use handler::{from_args_fn, from_typed_fn, AsyncMethodHandler, HandlerResult, MethodHandler};
pub use registry::{ServiceDefinition, ServiceRegistry};
