//! Handler traits and adapters for registered methods
//!
//! A method handler is the callable bound into a
//! [`MethodDescriptor`](crate::MethodDescriptor). By the time a handler runs,
//! the parameter binder has already validated, coerced and ordered the
//! arguments, so handlers always receive a plain `Vec<serde_json::Value>` in
//! declaration order - named and positional calls look identical from here.
//!
//! # Creating Handlers
//!
//! - [`from_args_fn`]: wrap an async closure that works with the raw bound
//!   argument vector
//! - [`from_typed_fn`]: wrap an async closure taking a typed tuple; the bound
//!   arguments are deserialized into it and the return value serialized back
//!
//! # Why Box<dyn Future>?
//!
//! Handlers return `HandlerResult`, a boxed pinned future. Different handlers
//! have different concrete future types and the registry needs one uniform
//! type to store; boxing costs little next to doing I/O per request.
//!
//! # Examples
//!
//! ```rust
//! use arpc_server::{from_args_fn, from_typed_fn};
//! use serde_json::json;
//!
//! // Raw handler
//! let echo = from_args_fn(|args| async move { Ok(json!(args)) });
//!
//! // Typed handler - one-element tuple for a single parameter
//! let hello = from_typed_fn(|(name,): (String,)| async move {
//!     Ok(format!("Hello, {}!", name))
//! });
//! ```

use arpc_core::{Error, Result};
use serde_json::Value;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Result type for handler invocations
///
/// A pinned, boxed future resolving to `Result<Value>`. `Send` so the future
/// can run on any worker thread of the runtime.
pub type HandlerResult = Pin<Box<dyn Future<Output = Result<Value>> + Send>>;

/// Trait for registered JSON-RPC method implementations
///
/// Handlers must be `Send + Sync`: the registry shares one handler instance
/// across all concurrent dispatches. Handlers should be stateless or use
/// interior mutability.
///
/// You typically don't implement this trait directly; use [`from_args_fn`]
/// or [`from_typed_fn`] instead.
pub trait MethodHandler: Send + Sync {
    /// Invoke the method with bound, coerced arguments in declaration order
    ///
    /// Errors returned here become JSON-RPC error responses: an explicit
    /// `Error::JsonRpc` passes through with its code intact (for
    /// application-defined codes in -32000..-32099), anything else maps to
    /// -32603 (Internal error).
    fn call(&self, args: Vec<Value>) -> HandlerResult;
}

/// Adapter that turns an async function into a [`MethodHandler`]
///
/// Needed because `MethodHandler` cannot be implemented for closures
/// directly; this wrapper provides an owned type to hang the impl on.
pub struct AsyncMethodHandler<F, Fut>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    func: F,
}

impl<F, Fut> AsyncMethodHandler<F, Fut>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    /// Wrap an async function taking the bound argument vector
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> MethodHandler for AsyncMethodHandler<F, Fut>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    fn call(&self, args: Vec<Value>) -> HandlerResult {
        Box::pin((self.func)(args))
    }
}

/// Create a handler from an async function over the raw bound arguments
///
/// The function receives the already-validated argument values in declaration
/// order and must return a JSON value.
///
/// # Examples
///
/// ```rust
/// use arpc_server::from_args_fn;
/// use serde_json::json;
///
/// let handler = from_args_fn(|args| async move {
///     Ok(json!({"argc": args.len()}))
/// });
/// ```
pub fn from_args_fn<F, Fut>(func: F) -> Box<dyn MethodHandler>
where
    F: Fn(Vec<Value>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    Box::new(AsyncMethodHandler::new(func))
}

/// Create a handler from an async function with typed arguments
///
/// The bound argument vector is deserialized into `P`, which should be a
/// tuple mirroring the declared parameter list (serde maps JSON arrays onto
/// Rust tuples, so a one-parameter method takes `(T,)`). The return value is
/// serialized back to JSON.
///
/// Deserialization failures map to `Error::InvalidParams`; they indicate a
/// mismatch between the declared parameter types and the tuple type, since
/// the binder has already type-checked the values.
///
/// # Examples
///
/// ```rust
/// use arpc_server::from_typed_fn;
///
/// let add = from_typed_fn(|(a, b): (i64, i64)| async move { Ok(a + b) });
///
/// let greet = from_typed_fn(|(name,): (String,)| async move {
///     Ok(format!("Hello, {}!", name))
/// });
/// ```
pub fn from_typed_fn<P, R, F, Fut>(func: F) -> Box<dyn MethodHandler>
where
    P: serde::de::DeserializeOwned + Send + 'static,
    R: serde::Serialize + Send + 'static,
    F: Fn(P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    // Arc so the closure can be cloned into each invocation's future
    let func = Arc::new(func);

    from_args_fn(move |args: Vec<Value>| {
        let func = Arc::clone(&func);
        async move {
            // A zero-parameter method deserializes its unit type from null,
            // not from an empty sequence
            let args_value = if args.is_empty() {
                Value::Null
            } else {
                Value::Array(args)
            };
            let params: P = serde_json::from_value(args_value)
                .map_err(|e| Error::InvalidParams(e.to_string()))?;

            let result = func(params).await?;

            serde_json::to_value(result).map_err(|e| Error::Serialization(e.to_string()))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_args_handler() {
        let handler = from_args_fn(|args| async move { Ok(json!({"argc": args.len()})) });

        let result = handler.call(vec![json!(1), json!(2)]).await.unwrap();
        assert_eq!(result, json!({"argc": 2}));
    }

    #[tokio::test]
    async fn test_typed_handler() {
        let handler = from_typed_fn(|(a, b): (i64, i64)| async move { Ok(a + b) });

        let result = handler.call(vec![json!(5), json!(3)]).await.unwrap();
        assert_eq!(result, json!(8));
    }

    #[tokio::test]
    async fn test_typed_handler_single_param() {
        let handler =
            from_typed_fn(|(name,): (String,)| async move { Ok(format!("Hello, {}!", name)) });

        let result = handler.call(vec![json!("World")]).await.unwrap();
        assert_eq!(result, json!("Hello, World!"));
    }

    #[tokio::test]
    async fn test_typed_handler_zero_params() {
        let handler = from_typed_fn(|(): ()| async move { Ok(42) });

        let result = handler.call(Vec::new()).await.unwrap();
        assert_eq!(result, json!(42));
    }

    #[tokio::test]
    async fn test_typed_handler_mismatch_is_invalid_params() {
        let handler = from_typed_fn(|(a,): (i64,)| async move { Ok(a) });

        let result = handler.call(vec![json!("not a number")]).await;
        assert!(matches!(result, Err(Error::InvalidParams(_))));
    }
}
