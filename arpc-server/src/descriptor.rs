//! Typed method descriptors
//!
//! A [`MethodDescriptor`] captures everything the engine needs to know about
//! one callable: its name, its ordered parameter names and declared types,
//! its return type, an optional doc string, and the handler itself. The
//! descriptor is built once at registration time through an explicit builder;
//! dispatch never inspects anything else, so there is no per-request
//! reflection.
//!
//! Descriptors are immutable after construction and owned by the
//! [`ServiceRegistry`](crate::ServiceRegistry) behind an `Arc`.

use crate::handler::{HandlerResult, MethodHandler};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Declared type of a parameter or return value
///
/// These are JSON types, not Rust types: binding happens against the wire
/// representation. `Any` opts a parameter out of type checking, `Null` as a
/// return type documents a method that returns nothing meaningful.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    /// JSON string
    String,
    /// Any JSON number
    Number,
    /// JSON number with an integral value
    Integer,
    /// JSON true/false
    Boolean,
    /// JSON object
    Object,
    /// JSON array
    Array,
    /// Any JSON value, no checking
    Any,
    /// JSON null; as a return type: void
    Null,
}

impl ParamType {
    /// The JSON type name, used in binding diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
            ParamType::Any => "any",
            ParamType::Null => "null",
        }
    }

    /// The TypeScript type this maps to in generated client stubs
    ///
    /// `is_return` distinguishes `void` from `null` for the unit type, the
    /// same way the original type mapping distinguished return positions.
    pub fn ts_name(&self, is_return: bool) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number | ParamType::Integer => "number",
            ParamType::Boolean => "boolean",
            ParamType::Object => "{[key: string]: any}",
            ParamType::Array => "any[]",
            ParamType::Any => "any",
            ParamType::Null => {
                if is_return {
                    "void"
                } else {
                    "null"
                }
            }
        }
    }

    /// True if `value` conforms to this declared type
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
            ParamType::Any => true,
            ParamType::Null => value.is_null(),
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One declared parameter: name and type, in signature order
#[derive(Debug, Clone)]
pub struct ParamSpec {
    /// Parameter name, used for named binding and stub generation
    pub name: String,
    /// Declared JSON type
    pub ty: ParamType,
}

/// Descriptor of one registered method
///
/// Created via [`MethodDescriptor::builder`], completed by the registry which
/// fills in the owning service name. The handler is type-erased; parameter
/// metadata lives alongside it so the binder and the stub generator share one
/// source of truth.
///
/// # Examples
///
/// ```rust
/// use arpc_server::{MethodDescriptor, ParamType, from_typed_fn};
///
/// let descriptor = MethodDescriptor::builder("say_hello")
///     .param("name", ParamType::String)
///     .returns(ParamType::String)
///     .handler(from_typed_fn(|(name,): (String,)| async move {
///         Ok(format!("Hello, {}!", name))
///     }));
///
/// assert_eq!(descriptor.name, "say_hello");
/// assert_eq!(descriptor.params.len(), 1);
/// ```
pub struct MethodDescriptor {
    /// Name of the owning service; filled in at registration
    pub service: String,
    /// Method name within the service
    pub name: String,
    /// Ordered parameter specifications
    pub params: Vec<ParamSpec>,
    /// Declared return type (documentation and stub generation only;
    /// handler results are not re-validated)
    pub returns: ParamType,
    /// Optional doc string, emitted as a comment in generated stubs
    pub doc: Option<String>,
    handler: Arc<dyn MethodHandler>,
}

impl MethodDescriptor {
    /// Start building a descriptor for the method `name`
    pub fn builder(name: impl Into<String>) -> MethodDescriptorBuilder {
        MethodDescriptorBuilder {
            name: name.into(),
            params: Vec::new(),
            returns: ParamType::Any,
            doc: None,
        }
    }

    /// The fully qualified `"service.method"` name
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.service, self.name)
    }

    /// Ordered parameter names, as declared
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }

    /// Invoke the bound handler with validated, ordered arguments
    pub fn invoke(&self, args: Vec<Value>) -> HandlerResult {
        self.handler.call(args)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("service", &self.service)
            .field("name", &self.name)
            .field("params", &self.params)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

/// Builder for [`MethodDescriptor`]
///
/// The handler is the last piece and completes the descriptor, so a
/// descriptor without a callable cannot exist.
pub struct MethodDescriptorBuilder {
    name: String,
    params: Vec<ParamSpec>,
    returns: ParamType,
    doc: Option<String>,
}

impl MethodDescriptorBuilder {
    /// Declare the next parameter; order of calls is the signature order
    pub fn param(mut self, name: impl Into<String>, ty: ParamType) -> Self {
        self.params.push(ParamSpec {
            name: name.into(),
            ty,
        });
        self
    }

    /// Declare the return type (defaults to `Any`)
    pub fn returns(mut self, ty: ParamType) -> Self {
        self.returns = ty;
        self
    }

    /// Attach a doc string, surfaced in generated client stubs
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Bind the handler and finish the descriptor
    pub fn handler(self, handler: Box<dyn MethodHandler>) -> MethodDescriptor {
        MethodDescriptor {
            // Placeholder until the registry adopts the method
            service: String::new(),
            name: self.name,
            params: self.params,
            returns: self.returns,
            doc: self.doc,
            handler: Arc::from(handler),
        }
    }
}
