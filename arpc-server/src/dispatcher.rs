//! Request dispatcher
//!
//! The dispatcher is the raw-text-in, raw-text-out engine at the heart of
//! arpc. [`Dispatcher::handle`] accepts one JSON-RPC message (single request
//! or batch), runs every actionable element through the
//! resolve → bind → invoke pipeline, and renders the spec-compliant response
//! body - or no body at all when the input was made of notifications only.
//!
//! # Pipeline
//!
//! Each request moves through a fixed sequence of states:
//!
//! `Received → Resolved → Bound → Invoked → Succeeded | Failed`
//!
//! - **Resolved**: method lookup in the [`ServiceRegistry`]; failure is
//!   terminal with -32601
//! - **Bound**: parameter binding against the descriptor; failure is terminal
//!   with -32602
//! - **Invoked**: the handler future is awaited to completion
//! - **Failed**: handler errors become -32603, with detail withheld unless
//!   [`DispatchOptions::verbose_errors`] is set
//!
//! # Notifications
//!
//! Requests without a usable `id` run the same pipeline but never emit a
//! record; their failures are logged and discarded, so a failing
//! notification can never fail the surrounding dispatch.
//!
//! # Batches
//!
//! Batch elements are independent: each is dispatched on its own task and
//! responses are correlated by `id`, not by position. An all-notification
//! batch yields no body.
//!
//! # Errors Never Escape
//!
//! Every failure path converges to a well-formed error record; `handle`
//! cannot return an error or panic on malformed input.

use crate::binder::{self, BinderOptions};
use crate::registry::ServiceRegistry;
use crate::stub;
use arpc_core::{codec, Error, Id, JsonRpcErrorData, JsonRpcRequest, JsonRpcResponse, Payload};
use futures::future::join_all;
use serde_json::json;
use std::sync::Arc;

/// Configuration for a [`Dispatcher`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DispatchOptions {
    /// Tolerate unknown names in named params (strict rejection by default)
    pub allow_unknown_named: bool,
    /// Attach the underlying error string as `data` on internal errors
    ///
    /// Off by default: method-body failures answer with a bare
    /// "Internal error" so internal state never leaks to remote callers.
    pub verbose_errors: bool,
    /// Reject batches larger than this with a single -32600 record
    pub max_batch_size: Option<usize>,
}

/// JSON-RPC 2.0 request dispatcher
///
/// Cheaply cloneable: the registry sits behind an `Arc` and the options are
/// `Copy`, so clones share all state. Batch processing clones the dispatcher
/// into per-element tasks.
///
/// # Examples
///
/// ```rust
/// use arpc_server::{
///     Dispatcher, ServiceRegistry, ServiceDefinition, MethodDescriptor, ParamType, from_typed_fn,
/// };
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() {
/// let mut registry = ServiceRegistry::new();
/// registry
///     .register(
///         ServiceDefinition::new("greeter").method(
///             MethodDescriptor::builder("say_hello")
///                 .param("name", ParamType::String)
///                 .returns(ParamType::String)
///                 .handler(from_typed_fn(|(name,): (String,)| async move {
///                     Ok(format!("Hello, {}!", name))
///                 })),
///         ),
///     )
///     .unwrap();
///
/// let dispatcher = Dispatcher::new(Arc::new(registry));
/// let body = dispatcher
///     .handle(r#"{"jsonrpc":"2.0","method":"greeter.say_hello","params":["World"],"id":1}"#)
///     .await
///     .unwrap();
/// assert!(body.contains("Hello, World!"));
/// # }
/// ```
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<ServiceRegistry>,
    options: DispatchOptions,
}

impl Dispatcher {
    /// Create a dispatcher with default options
    pub fn new(registry: Arc<ServiceRegistry>) -> Self {
        Self::with_options(registry, DispatchOptions::default())
    }

    /// Create a dispatcher with explicit options
    pub fn with_options(registry: Arc<ServiceRegistry>, options: DispatchOptions) -> Self {
        Self { registry, options }
    }

    /// The registry this dispatcher resolves against
    pub fn registry(&self) -> &Arc<ServiceRegistry> {
        &self.registry
    }

    /// Handle one raw JSON-RPC message and produce the raw response body
    ///
    /// This is the transport adapter boundary: bindings pass the request body
    /// in and write the returned string out verbatim with content type
    /// `application/json`. `None` means no body should be written (the input
    /// consisted only of notifications).
    #[tracing::instrument(skip(self, raw), fields(len = raw.len()))]
    pub async fn handle(&self, raw: &str) -> Option<String> {
        match codec::decode(raw) {
            Ok(Payload::Single(value)) => {
                let response = self.dispatch_value(value).await?;
                Some(render_single(&response))
            }
            Ok(Payload::Batch(values)) => {
                let responses = self.dispatch_batch(values).await;
                if responses.is_empty() {
                    tracing::debug!("All-notification batch, no response body");
                    return None;
                }
                Some(render_batch(&responses))
            }
            Err(error) => {
                // Top-level parse/shape failures answer with a single error
                // object and a null id, never a batch
                tracing::debug!(error = %error, "Rejected unparseable message");
                let response = JsonRpcResponse::error(error.to_error_data(), Id::Null);
                Some(render_single(&response))
            }
        }
    }

    /// Generate the client stub script for a discovery request
    ///
    /// `filename` selects the output language by extension (`client.js`,
    /// `client.ts`); `url` is the endpoint the generated code will POST to.
    /// Returns the script and its content type, or `None` for an unknown
    /// extension.
    pub fn client_script(
        &self,
        filename: &str,
        url: &str,
    ) -> Option<arpc_core::Result<(String, &'static str)>> {
        stub::generate_client(&self.registry, filename, url)
    }

    /// Dispatch one decoded payload element
    ///
    /// Malformed elements produce an error record with a best-effort id;
    /// well-formed ones run the pipeline. `None` means the element was a
    /// notification.
    async fn dispatch_value(&self, value: serde_json::Value) -> Option<JsonRpcResponse> {
        match codec::parse_request(value.clone()) {
            Ok(request) => self.dispatch_request(request).await,
            Err(error) => {
                tracing::debug!(error = %error, "Invalid request object");
                Some(JsonRpcResponse::error(
                    error.to_error_data(),
                    codec::extract_id(&value),
                ))
            }
        }
    }

    /// Run one parsed request through resolve → bind → invoke
    async fn dispatch_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let is_notification = request.is_notification();
        let result = self.execute(&request).await;

        if is_notification {
            // Notifications never emit a record; failures are logged and
            // swallowed so they cannot fail the surrounding dispatch
            if let Err(error) = result {
                tracing::warn!(
                    method = %request.method,
                    error = %error,
                    "Notification failed"
                );
            }
            return None;
        }

        let id = request.response_id();
        match result {
            Ok(value) => Some(JsonRpcResponse::success(value, id)),
            Err(error) => Some(JsonRpcResponse::error(self.error_data(error), id)),
        }
    }

    /// The Resolved → Bound → Invoked stages
    async fn execute(&self, request: &JsonRpcRequest) -> arpc_core::Result<serde_json::Value> {
        let descriptor = self.registry.resolve(&request.method)?;

        let binder_options = BinderOptions {
            allow_unknown_named: self.options.allow_unknown_named,
        };
        let args = binder::bind(&descriptor, request.params.as_ref(), &binder_options)?;

        descriptor.invoke(args).await
    }

    /// Dispatch batch elements on independent tasks and collect the
    /// non-notification responses
    async fn dispatch_batch(&self, values: Vec<serde_json::Value>) -> Vec<JsonRpcResponse> {
        if let Some(max) = self.options.max_batch_size {
            if values.len() > max {
                tracing::warn!(
                    batch_size = values.len(),
                    max_size = max,
                    "Batch size exceeded"
                );
                return vec![JsonRpcResponse::error(
                    JsonRpcErrorData::invalid_request(format!(
                        "Batch size limit exceeded: limit={}, actual={}",
                        max,
                        values.len()
                    )),
                    Id::Null,
                )];
            }
        }

        let batch_size = values.len();
        let mut ids = Vec::with_capacity(batch_size);
        let mut tasks = Vec::with_capacity(batch_size);
        for value in values {
            // Recovered up front so a panicking element still gets a
            // correlated error record
            ids.push(codec::extract_id(&value));
            let dispatcher = self.clone();
            tasks.push(tokio::spawn(
                async move { dispatcher.dispatch_value(value).await },
            ));
        }

        let mut responses = Vec::new();
        for (fallback_id, joined) in ids.into_iter().zip(join_all(tasks).await) {
            match joined {
                Ok(Some(response)) => responses.push(response),
                Ok(None) => {}
                Err(error) => {
                    // A panicking handler must not take sibling elements down;
                    // elements without a usable id stay silent like any other
                    // failing notification
                    tracing::error!(error = %error, "Batch element task failed");
                    if fallback_id != Id::Null {
                        responses.push(JsonRpcResponse::error(
                            JsonRpcErrorData::new(-32603, "Internal error"),
                            fallback_id,
                        ));
                    }
                }
            }
        }

        tracing::debug!(
            batch_size = batch_size,
            response_count = responses.len(),
            "Batch dispatch completed"
        );
        responses
    }

    /// Map a pipeline error to its wire form, applying the verbosity policy
    fn error_data(&self, error: Error) -> JsonRpcErrorData {
        match error {
            // Explicit wire errors pass through untouched: this is how
            // handlers surface application-defined codes (-32000..-32099)
            // and how the binder attaches diagnostic data
            Error::JsonRpc(data) => data,
            Error::Parse(_)
            | Error::InvalidRequest(_)
            | Error::MethodNotFound(_)
            | Error::InvalidParams(_) => error.to_error_data(),
            other => {
                if self.options.verbose_errors {
                    JsonRpcErrorData::with_data(-32603, "Internal error", json!(other.to_string()))
                } else {
                    JsonRpcErrorData::new(-32603, "Internal error")
                }
            }
        }
    }
}

fn render_single(response: &JsonRpcResponse) -> String {
    codec::encode_response(response).unwrap_or_else(|error| {
        tracing::error!(error = %error, "Failed to serialize response");
        fallback_body()
    })
}

fn render_batch(responses: &[JsonRpcResponse]) -> String {
    codec::encode_batch_responses(responses).unwrap_or_else(|error| {
        tracing::error!(error = %error, "Failed to serialize batch response");
        fallback_body()
    })
}

// Response records contain only JSON values, so serialization cannot fail in
// practice; this keeps the handle contract total anyway.
fn fallback_body() -> String {
    r#"{"jsonrpc":"2.0","error":{"code":-32603,"message":"Internal error"},"id":null}"#.to_string()
}
