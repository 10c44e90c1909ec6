//! Parameter binder
//!
//! The binder converts the raw `params` value of a request into the ordered,
//! type-checked argument vector a handler expects. It is the bridge between
//! the wire (positional arrays or named objects) and the declared signature
//! in the [`MethodDescriptor`](crate::MethodDescriptor).
//!
//! # Binding Rules
//!
//! - **Positional** params bind by index; the arity must match the declared
//!   parameter count exactly.
//! - **Named** params bind by declared name; every declared parameter must be
//!   present, and unknown names are rejected unless
//!   [`BinderOptions::allow_unknown_named`] is set.
//! - **Absent** params are only legal for zero-parameter methods.
//! - Every bound value is checked against its declared [`ParamType`]; a
//!   mismatch produces an invalid-params error whose `data` identifies the
//!   offending parameter and the expected type.

use crate::descriptor::{MethodDescriptor, ParamType};
use arpc_core::{Error, JsonRpcErrorData, Params, Result};
use serde_json::{json, Value};

/// Configuration for named-parameter binding
#[derive(Debug, Clone, Copy, Default)]
pub struct BinderOptions {
    /// Tolerate argument names that match no declared parameter
    ///
    /// Off by default: strict mode treats an unknown name as an
    /// invalid-params error.
    pub allow_unknown_named: bool,
}

/// Bind request params to the declared signature of `descriptor`
///
/// Returns the argument values in declaration order, each verified against
/// its declared type.
///
/// # Errors
///
/// `Error::JsonRpc` with code -32602 for every failure mode; the error
/// `data` carries `{parameter, expected, got}` for type mismatches.
pub fn bind(
    descriptor: &MethodDescriptor,
    params: Option<&Params>,
    options: &BinderOptions,
) -> Result<Vec<Value>> {
    match params {
        None => {
            if descriptor.params.is_empty() {
                Ok(Vec::new())
            } else {
                Err(invalid_params(format!(
                    "Method {} expects {} parameter(s), none supplied",
                    descriptor.qualified_name(),
                    descriptor.params.len()
                )))
            }
        }
        Some(Params::Positional(values)) => bind_positional(descriptor, values),
        Some(Params::Named(map)) => bind_named(descriptor, map, options),
    }
}

fn bind_positional(descriptor: &MethodDescriptor, values: &[Value]) -> Result<Vec<Value>> {
    if values.len() != descriptor.params.len() {
        return Err(invalid_params(format!(
            "Method {} expects {} parameter(s), got {}",
            descriptor.qualified_name(),
            descriptor.params.len(),
            values.len()
        )));
    }

    descriptor
        .params
        .iter()
        .zip(values)
        .map(|(spec, value)| check_type(&spec.name, spec.ty, value))
        .collect()
}

fn bind_named(
    descriptor: &MethodDescriptor,
    map: &serde_json::Map<String, Value>,
    options: &BinderOptions,
) -> Result<Vec<Value>> {
    if !options.allow_unknown_named {
        for name in map.keys() {
            if !descriptor.params.iter().any(|p| &p.name == name) {
                return Err(invalid_params(format!(
                    "Unknown parameter {:?} for method {}",
                    name,
                    descriptor.qualified_name()
                )));
            }
        }
    }

    descriptor
        .params
        .iter()
        .map(|spec| {
            let value = map.get(&spec.name).ok_or_else(|| {
                invalid_params(format!(
                    "Missing parameter {:?} for method {}",
                    spec.name,
                    descriptor.qualified_name()
                ))
            })?;
            check_type(&spec.name, spec.ty, value)
        })
        .collect()
}

/// Verify one value against its declared type
///
/// The returned value is a clone of the input; JSON values carry their own
/// representation, so "coercion" here is verification (integers are accepted
/// where numbers are declared by construction of [`ParamType::matches`]).
fn check_type(name: &str, ty: ParamType, value: &Value) -> Result<Value> {
    if ty.matches(value) {
        Ok(value.clone())
    } else {
        Err(Error::JsonRpc(JsonRpcErrorData::with_data(
            -32602,
            format!("Parameter {:?} is not of type {}", name, ty),
            json!({
                "parameter": name,
                "expected": ty.name(),
                "got": json_type_name(value),
            }),
        )))
    }
}

fn invalid_params(msg: String) -> Error {
    Error::JsonRpc(JsonRpcErrorData::invalid_params(msg))
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::MethodDescriptor;
    use crate::handler::from_args_fn;
    use serde_json::json;

    fn descriptor() -> MethodDescriptor {
        let mut d = MethodDescriptor::builder("add")
            .param("a", ParamType::Integer)
            .param("b", ParamType::Integer)
            .handler(from_args_fn(|_| async { Ok(json!(null)) }));
        d.service = "calc".to_string();
        d
    }

    fn named(value: serde_json::Value) -> Params {
        Params::Named(value.as_object().unwrap().clone())
    }

    #[test]
    fn test_positional_binding() {
        let args = bind(
            &descriptor(),
            Some(&Params::Positional(vec![json!(1), json!(2)])),
            &BinderOptions::default(),
        )
        .unwrap();
        assert_eq!(args, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_positional_wrong_arity() {
        let result = bind(
            &descriptor(),
            Some(&Params::Positional(vec![json!(1)])),
            &BinderOptions::default(),
        );
        match result {
            Err(Error::JsonRpc(data)) => {
                assert_eq!(data.code, -32602);
                assert!(data.message.contains("expects 2"));
            }
            other => panic!("Expected invalid params, got {:?}", other),
        }
    }

    #[test]
    fn test_named_binding_orders_by_declaration() {
        let args = bind(
            &descriptor(),
            Some(&named(json!({"b": 2, "a": 1}))),
            &BinderOptions::default(),
        )
        .unwrap();
        assert_eq!(args, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_named_missing_parameter() {
        let result = bind(
            &descriptor(),
            Some(&named(json!({"a": 1}))),
            &BinderOptions::default(),
        );
        match result {
            Err(Error::JsonRpc(data)) => assert!(data.message.contains("Missing parameter")),
            other => panic!("Expected invalid params, got {:?}", other),
        }
    }

    #[test]
    fn test_named_unknown_parameter_strict() {
        let result = bind(
            &descriptor(),
            Some(&named(json!({"a": 1, "b": 2, "c": 3}))),
            &BinderOptions::default(),
        );
        match result {
            Err(Error::JsonRpc(data)) => assert!(data.message.contains("Unknown parameter")),
            other => panic!("Expected invalid params, got {:?}", other),
        }
    }

    #[test]
    fn test_named_unknown_parameter_tolerant() {
        let options = BinderOptions {
            allow_unknown_named: true,
        };
        let args = bind(
            &descriptor(),
            Some(&named(json!({"a": 1, "b": 2, "c": 3}))),
            &options,
        )
        .unwrap();
        assert_eq!(args, vec![json!(1), json!(2)]);
    }

    #[test]
    fn test_absent_params_zero_arity() {
        let d = MethodDescriptor::builder("ping")
            .handler(from_args_fn(|_| async { Ok(json!("pong")) }));
        let args = bind(&d, None, &BinderOptions::default()).unwrap();
        assert!(args.is_empty());
    }

    #[test]
    fn test_absent_params_nonzero_arity() {
        let result = bind(&descriptor(), None, &BinderOptions::default());
        match result {
            Err(Error::JsonRpc(data)) => assert_eq!(data.code, -32602),
            other => panic!("Expected invalid params, got {:?}", other),
        }
    }

    #[test]
    fn test_type_mismatch_reports_parameter() {
        let result = bind(
            &descriptor(),
            Some(&Params::Positional(vec![json!(1), json!("two")])),
            &BinderOptions::default(),
        );
        match result {
            Err(Error::JsonRpc(data)) => {
                assert_eq!(data.code, -32602);
                let detail = data.data.unwrap();
                assert_eq!(detail["parameter"], "b");
                assert_eq!(detail["expected"], "integer");
                assert_eq!(detail["got"], "string");
            }
            other => panic!("Expected invalid params, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_accepted_as_number() {
        let d = MethodDescriptor::builder("scale")
            .param("factor", ParamType::Number)
            .handler(from_args_fn(|_| async { Ok(json!(null)) }));
        let args = bind(
            &d,
            Some(&Params::Positional(vec![json!(2)])),
            &BinderOptions::default(),
        )
        .unwrap();
        assert_eq!(args, vec![json!(2)]);
    }
}
