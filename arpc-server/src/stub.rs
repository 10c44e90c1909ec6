//! Client stub generation
//!
//! Generates ready-to-use JavaScript or TypeScript client code from the
//! registry's method descriptors, so browser callers get one function per
//! registered method instead of hand-writing JSON-RPC envelopes. Services and
//! methods are emitted in registration order, parameters in declaration
//! order, and doc strings become block comments on the generated members.
//!
//! The generated code assumes a `fetch`-capable environment and POSTs to the
//! configured endpoint URL. Error responses are surfaced by rejecting the
//! returned promise with the error message.

use crate::descriptor::MethodDescriptor;
use crate::registry::ServiceRegistry;
use arpc_core::{Error, Result};
use std::fmt::Write;

/// Shared call helper prepended to every generated JavaScript client
const CALL_HELPER_JS: &str = r#""use strict";

function _call(rpc_url, id, method, params) {

    return fetch(rpc_url + `?method=${method}`, {
        method: 'POST',
        headers: {'Content-Type': 'application/json'},
        body: JSON.stringify({
            jsonrpc: '2.0',
            id: id,
            method: method,
            params: params,
        })
    })
    .then(response => response.json())
    .then(payload => {
        if('error' in payload) {
            throw new Error(payload.error.message);
        }
        return payload.result;
    });
}
"#;

/// Base class prepended to every generated TypeScript client; `@rpc_url@` is
/// replaced with the endpoint URL
const CLIENT_BASE_TS: &str = r#"
class JsonRpcClient {
    private _id: number = 1;
    constructor(public rpc_url: string = '@rpc_url@') {}
    protected _call(method: string, params: any[]): Promise<any> {
        return fetch(`${this.rpc_url}?method=${method}`, {
            method: 'POST',
            headers: {'Content-Type': 'application/json'},
            body: JSON.stringify({
                jsonrpc: '2.0',
                id: this._id++,
                method: method,
                params: params,
            })
        }).then(response => response.json())
        .then(payload => {
            if('error' in payload) {
                throw new Error(payload.error.message);
            }
            return payload.result;
        });
    }
}
"#;

/// Generate a client script for a discovery request, selecting the language
/// by file extension
///
/// `None` for an extension no generator exists for; callers typically turn
/// that into a 404. The second tuple element is the content type to serve
/// the script with.
pub fn generate_client(
    registry: &ServiceRegistry,
    filename: &str,
    url: &str,
) -> Option<Result<(String, &'static str)>> {
    if filename.ends_with(".js") {
        Some(generate_js(registry, url).map(|code| (code, "application/javascript")))
    } else if filename.ends_with(".ts") {
        Some(generate_ts(registry, url).map(|code| (code, "application/typescript")))
    } else {
        None
    }
}

/// Generate a plain JavaScript client: one `const` object per service with
/// one method per registered method
pub fn generate_js(registry: &ServiceRegistry, url: &str) -> Result<String> {
    check_not_empty(registry)?;

    let mut code = String::from(CALL_HELPER_JS);
    for (service, _doc, methods) in registry.iter() {
        let _ = write!(code, "\nconst {} = {{\n", service);
        let _ = write!(code, "\n    rpc_url: '{}',\n", url);
        code.push_str("\n    _id: 1,\n");
        for method in methods {
            code.push('\n');
            if let Some(doc) = &method.doc {
                code.push_str(&block_comment(doc, 4));
                code.push('\n');
            }
            let _ = write!(
                code,
                "    {}: function() {{ return _call(this.rpc_url, this._id++, '{}', Array.from(arguments)); }},\n",
                method.name,
                method.qualified_name()
            );
        }
        code.push_str("};\n");
    }
    Ok(code)
}

/// Generate a TypeScript client: a class per service extending a shared
/// `JsonRpcClient` base, with typed method signatures, plus an exported
/// instance per service
pub fn generate_ts(registry: &ServiceRegistry, url: &str) -> Result<String> {
    check_not_empty(registry)?;

    let mut code = CLIENT_BASE_TS.replace("@rpc_url@", url);
    let mut instances = Vec::new();
    for (service, doc, methods) in registry.iter() {
        code.push('\n');
        let class_name = class_case(service);
        if let Some(doc) = doc {
            code.push_str(&block_comment(doc, 0));
            code.push('\n');
        }
        let _ = write!(code, "export class {} extends JsonRpcClient {{\n", class_name);
        for method in methods {
            code.push('\n');
            if let Some(doc) = &method.doc {
                code.push_str(&block_comment(doc, 4));
                code.push('\n');
            }
            let _ = write!(
                code,
                "    public {}({}): Promise<{}> {{ return this._call('{}', [{}]) as Promise<{}>; }}\n",
                method.name,
                ts_signature(method),
                method.returns.ts_name(true),
                method.qualified_name(),
                method.param_names().join(", "),
                method.returns.ts_name(true),
            );
        }
        code.push_str("}\n");
        instances.push(format!(
            "export const {} = new {}();",
            service, class_name
        ));
    }
    code.push('\n');
    code.push_str(&instances.join("\n"));
    Ok(code)
}

fn check_not_empty(registry: &ServiceRegistry) -> Result<()> {
    if registry.is_empty() {
        return Err(Error::Internal(
            "Cannot generate a client for an empty registry".to_string(),
        ));
    }
    Ok(())
}

/// Render a multiline doc string as a JS/TS block comment at `indent` spaces
fn block_comment(text: &str, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let mut comment = format!("{}/**\n", pad);
    for line in text.trim().lines() {
        let _ = writeln!(comment, "{} * {}", pad, line.trim_end());
    }
    let _ = write!(comment, "{} */", pad);
    comment
}

/// `"service_name"` → `"Service_name"`: capitalize only the first character,
/// matching the generated class naming of the wire service name
fn class_case(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn ts_signature(method: &MethodDescriptor) -> String {
    method
        .params
        .iter()
        .map(|p| format!("{}: {}", p.name, p.ty.ts_name(false)))
        .collect::<Vec<_>>()
        .join(", ")
}
