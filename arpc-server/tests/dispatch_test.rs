//! End-to-end dispatch integration tests
//!
//! Each test drives the full path a transport adapter would: raw request text
//! into [`Dispatcher::handle`], raw response text (or no body) out.

use arpc_server::{
    from_args_fn, from_typed_fn, DispatchOptions, Dispatcher, MethodDescriptor, ParamType,
    ServiceDefinition, ServiceRegistry,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn build_registry() -> ServiceRegistry {
    let mut registry = ServiceRegistry::new();
    registry
        .register(
            ServiceDefinition::new("SayHelloService")
                .doc("Greeting service.")
                .method(
                    MethodDescriptor::builder("say_hello")
                        .doc("Say hello to someone by name.")
                        .param("name", ParamType::String)
                        .returns(ParamType::String)
                        .handler(from_typed_fn(|(name,): (String,)| async move {
                            Ok(format!("Hello, {}!", name))
                        })),
                ),
        )
        .unwrap();
    registry
        .register(
            ServiceDefinition::new("MathService")
                .method(
                    MethodDescriptor::builder("add")
                        .param("a", ParamType::Number)
                        .param("b", ParamType::Number)
                        .returns(ParamType::Number)
                        .handler(from_typed_fn(|(a, b): (f64, f64)| async move { Ok(a + b) })),
                )
                .method(
                    MethodDescriptor::builder("div")
                        .param("a", ParamType::Number)
                        .param("b", ParamType::Number)
                        .returns(ParamType::Number)
                        .handler(from_typed_fn(|(a, b): (f64, f64)| async move {
                            if b == 0.0 {
                                return Err(arpc_core::Error::JsonRpc(
                                    arpc_core::JsonRpcErrorData::new(-32000, "Division by zero"),
                                ));
                            }
                            Ok(a / b)
                        })),
                ),
        )
        .unwrap();
    registry
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(Arc::new(build_registry()))
}

async fn roundtrip(dispatcher: &Dispatcher, raw: &str) -> Value {
    let body = dispatcher.handle(raw).await.expect("expected a body");
    serde_json::from_str(&body).expect("response must be valid JSON")
}

#[tokio::test]
async fn test_say_hello_roundtrip() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "SayHelloService.say_hello", "params": ["World"], "id": 1}"#,
    )
    .await;

    assert_eq!(
        response,
        json!({"jsonrpc": "2.0", "result": "Hello, World!", "id": 1})
    );
}

#[tokio::test]
async fn test_named_params_bind_by_declaration_order() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "MathService.add", "params": {"b": 1.5, "a": 2.5}, "id": 2}"#,
    )
    .await;

    assert_eq!(response["result"], json!(4.0));
    assert_eq!(response["id"], json!(2));
}

#[tokio::test]
async fn test_unknown_method_is_32601() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "SayHelloService.missing", "params": [], "id": 3}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], json!(-32601));
    assert!(response["error"]["message"]
        .as_str()
        .unwrap()
        .contains("SayHelloService.missing"));
    assert_eq!(response["id"], json!(3));
    assert!(response.get("result").is_none());
}

#[tokio::test]
async fn test_wrong_arity_is_32602() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "MathService.add", "params": [1], "id": 4}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], json!(-32602));
}

#[tokio::test]
async fn test_type_mismatch_reports_offending_parameter() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "SayHelloService.say_hello", "params": [42], "id": 5}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], json!(-32602));
    assert_eq!(response["error"]["data"]["parameter"], json!("name"));
    assert_eq!(response["error"]["data"]["expected"], json!("string"));
    assert_eq!(response["error"]["data"]["got"], json!("number"));
}

#[tokio::test]
async fn test_malformed_json_is_single_32700_with_null_id() {
    let response = roundtrip(&dispatcher(), "{not json").await;

    assert!(response.is_object());
    assert_eq!(response["error"]["code"], json!(-32700));
    assert_eq!(response["id"], json!(null));
}

#[tokio::test]
async fn test_empty_batch_is_single_32600() {
    let response = roundtrip(&dispatcher(), "[]").await;

    assert!(response.is_object());
    assert_eq!(response["error"]["code"], json!(-32600));
    assert_eq!(response["id"], json!(null));
}

#[tokio::test]
async fn test_string_ids_echo_back() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "MathService.add", "params": [1, 2], "id": "req-77"}"#,
    )
    .await;

    assert_eq!(response["id"], json!("req-77"));
    assert_eq!(response["result"], json!(3.0));
}

#[tokio::test]
async fn test_large_integer_ids_echo_back() {
    let raw = format!(
        r#"{{"jsonrpc": "2.0", "method": "MathService.add", "params": [1, 2], "id": {}}}"#,
        u64::MAX
    );
    let body = dispatcher().handle(&raw).await.unwrap();

    assert!(body.contains("\"id\":18446744073709551615"));
    let response: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(response["result"], json!(3.0));
}

#[tokio::test]
async fn test_notification_runs_but_answers_nothing() {
    let counter = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&counter);

    let mut registry = ServiceRegistry::new();
    registry
        .register(
            ServiceDefinition::new("audit").method(
                MethodDescriptor::builder("record").handler(from_args_fn(move |_| {
                    let seen = Arc::clone(&seen);
                    async move {
                        seen.fetch_add(1, Ordering::SeqCst);
                        Ok(json!(null))
                    }
                })),
            ),
        )
        .unwrap();
    let dispatcher = Dispatcher::new(Arc::new(registry));

    let body = dispatcher
        .handle(r#"{"jsonrpc": "2.0", "method": "audit.record"}"#)
        .await;

    assert!(body.is_none());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_failing_notification_is_silent() {
    let body = dispatcher()
        .handle(r#"{"jsonrpc": "2.0", "method": "MathService.div", "params": [1, 0]}"#)
        .await;
    assert!(body.is_none());
}

#[tokio::test]
async fn test_application_error_code_reaches_the_wire() {
    let response = roundtrip(
        &dispatcher(),
        r#"{"jsonrpc": "2.0", "method": "MathService.div", "params": [1, 0], "id": 6}"#,
    )
    .await;

    assert_eq!(response["error"]["code"], json!(-32000));
    assert_eq!(response["error"]["message"], json!("Division by zero"));
}

#[tokio::test]
async fn test_batch_correlates_by_id() {
    let response = roundtrip(
        &dispatcher(),
        r#"[
            {"jsonrpc": "2.0", "method": "MathService.add", "params": [1, 2], "id": 1},
            {"jsonrpc": "2.0", "method": "SayHelloService.say_hello", "params": ["Ada"], "id": "greet"},
            {"jsonrpc": "2.0", "method": "no.such", "params": [], "id": 3},
            {"jsonrpc": "2.0", "method": "MathService.add", "params": [9, 9]}
        ]"#,
    )
    .await;

    let entries = response.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let find = |id: Value| {
        entries
            .iter()
            .find(|e| e["id"] == id)
            .unwrap_or_else(|| panic!("no batch entry with id {}", id))
    };
    assert_eq!(find(json!(1))["result"], json!(3.0));
    assert_eq!(find(json!("greet"))["result"], json!("Hello, Ada!"));
    assert_eq!(find(json!(3))["error"]["code"], json!(-32601));
}

#[tokio::test]
async fn test_batch_of_notifications_has_no_body() {
    let body = dispatcher()
        .handle(
            r#"[
                {"jsonrpc": "2.0", "method": "MathService.add", "params": [1, 2]},
                {"jsonrpc": "2.0", "method": "MathService.div", "params": [1, 0]}
            ]"#,
        )
        .await;
    assert!(body.is_none());
}

#[tokio::test]
async fn test_batch_with_invalid_element_gets_per_element_error() {
    let response = roundtrip(
        &dispatcher(),
        r#"[
            {"jsonrpc": "2.0", "method": "MathService.add", "params": [1, 2], "id": 1},
            {"jsonrpc": "1.0", "method": "MathService.add", "params": [1, 2], "id": 2},
            "just a string"
        ]"#,
    )
    .await;

    let entries = response.as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let wrong_version = entries.iter().find(|e| e["id"] == json!(2)).unwrap();
    assert_eq!(wrong_version["error"]["code"], json!(-32600));

    let non_object = entries.iter().find(|e| e["id"] == json!(null)).unwrap();
    assert_eq!(non_object["error"]["code"], json!(-32600));
}

#[tokio::test]
async fn test_internal_errors_are_opaque_without_verbose() {
    let mut registry = ServiceRegistry::new();
    registry
        .register(
            ServiceDefinition::new("fragile").method(
                MethodDescriptor::builder("boom").handler(from_args_fn(|_| async {
                    Err::<Value, _>(arpc_core::Error::Internal("secret connection string".into()))
                })),
            ),
        )
        .unwrap();
    let registry = Arc::new(registry);

    let quiet = Dispatcher::new(Arc::clone(&registry));
    let response = roundtrip(
        &quiet,
        r#"{"jsonrpc": "2.0", "method": "fragile.boom", "params": [], "id": 1}"#,
    )
    .await;
    assert_eq!(response["error"]["message"], json!("Internal error"));
    assert!(!response.to_string().contains("secret connection string"));

    let verbose = Dispatcher::with_options(
        registry,
        DispatchOptions {
            verbose_errors: true,
            ..Default::default()
        },
    );
    let response = roundtrip(
        &verbose,
        r#"{"jsonrpc": "2.0", "method": "fragile.boom", "params": [], "id": 1}"#,
    )
    .await;
    assert!(response["error"]["data"]
        .as_str()
        .unwrap()
        .contains("secret connection string"));
}

#[tokio::test]
async fn test_stub_generation_matches_registry() {
    let dispatcher = dispatcher();

    let (js, content_type) = dispatcher
        .client_script("client.js", "/rpc")
        .expect("js generator exists")
        .expect("registry is not empty");
    assert_eq!(content_type, "application/javascript");
    assert!(js.contains("const SayHelloService = {"));
    assert!(js.contains("'SayHelloService.say_hello'"));
    assert!(js.contains("const MathService = {"));

    let (ts, content_type) = dispatcher
        .client_script("client.ts", "/rpc")
        .expect("ts generator exists")
        .expect("registry is not empty");
    assert_eq!(content_type, "application/typescript");
    assert!(ts.contains("public say_hello(name: string): Promise<string>"));
    assert!(ts.contains("this._call('MathService.add', [a, b])"));

    assert!(dispatcher.client_script("client.rb", "/rpc").is_none());
}

#[tokio::test]
async fn test_concurrent_dispatch_from_clones() {
    let dispatcher = dispatcher();
    let mut handles = Vec::new();
    for i in 0..16 {
        let d = dispatcher.clone();
        handles.push(tokio::spawn(async move {
            let raw = format!(
                r#"{{"jsonrpc": "2.0", "method": "MathService.add", "params": [{}, 1], "id": {}}}"#,
                i, i
            );
            let body = d.handle(&raw).await.unwrap();
            serde_json::from_str::<Value>(&body).unwrap()
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let response = handle.await.unwrap();
        assert_eq!(response["id"], json!(i));
        assert_eq!(response["result"], json!((i as f64) + 1.0));
    }
}
