//! Service registry
//!
//! The registry is the process-wide table of callable methods, keyed by
//! service name and, within a service, by method name. It is populated once
//! at application startup via [`ServiceRegistry::register`] and only read
//! afterwards: registration takes `&mut self`, dispatch reads through a
//! shared `Arc`, so steady-state lookups need no locking.
//!
//! Insertion order of services and of methods within a service is preserved;
//! the client stub generator emits entries in declaration order.
//!
//! # Examples
//!
//! ```rust
//! use arpc_server::{ServiceRegistry, ServiceDefinition, MethodDescriptor, ParamType, from_typed_fn};
//!
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
//! assert!(registry.resolve("greeter.say_hello").is_ok());
//! ```

use crate::descriptor::MethodDescriptor;
use arpc_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// A service declaration: a named group of method descriptors
///
/// This is the registration-time input; the registry consumes it, stamps
/// every descriptor with the service name and takes ownership.
pub struct ServiceDefinition {
    /// Service name, the prefix of `"service.method"` wire names
    pub name: String,
    /// Optional doc string, surfaced in generated client stubs
    pub doc: Option<String>,
    methods: Vec<MethodDescriptor>,
}

impl ServiceDefinition {
    /// Start a service declaration
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc: None,
            methods: Vec::new(),
        }
    }

    /// Attach a doc string to the service
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Add a method; declaration order is preserved
    pub fn method(mut self, descriptor: MethodDescriptor) -> Self {
        self.methods.push(descriptor);
        self
    }
}

/// One registered service inside the registry
pub(crate) struct RegisteredService {
    pub(crate) doc: Option<String>,
    /// Descriptors in declaration order
    pub(crate) methods: Vec<Arc<MethodDescriptor>>,
    /// Method name → index into `methods`
    index: HashMap<String, usize>,
}

impl RegisteredService {
    fn get(&self, method: &str) -> Option<&Arc<MethodDescriptor>> {
        self.index.get(method).map(|&i| &self.methods[i])
    }
}

/// Table of all registered services and their methods
///
/// # Lifecycle
///
/// Built at startup, then wrapped in an `Arc` and handed to the
/// [`Dispatcher`](crate::Dispatcher) and any transport adapters. There is no
/// mutation path after registration - no locking is needed for concurrent
/// dispatch, and registration itself is single-writer by virtue of
/// `&mut self`.
#[derive(Default)]
pub struct ServiceRegistry {
    services: HashMap<String, RegisteredService>,
    /// Service names in registration order, for stub generation
    order: Vec<String>,
}

impl ServiceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a service and all of its methods
    ///
    /// # Errors
    ///
    /// - `Error::DuplicateService` if a service with this name exists.
    ///   Nothing is inserted.
    /// - `Error::DuplicateMethod` if the definition declares one method name
    ///   twice. Nothing is inserted.
    ///
    /// Both are startup-time configuration errors; callers are expected to
    /// treat them as fatal.
    pub fn register(&mut self, definition: ServiceDefinition) -> Result<()> {
        if self.services.contains_key(&definition.name) {
            return Err(Error::DuplicateService(definition.name));
        }

        let mut methods = Vec::with_capacity(definition.methods.len());
        let mut index = HashMap::with_capacity(definition.methods.len());
        for mut descriptor in definition.methods {
            if index.contains_key(&descriptor.name) {
                return Err(Error::DuplicateMethod {
                    service: definition.name,
                    method: descriptor.name,
                });
            }
            descriptor.service = definition.name.clone();
            index.insert(descriptor.name.clone(), methods.len());
            methods.push(Arc::new(descriptor));
        }

        tracing::debug!(
            service = %definition.name,
            method_count = methods.len(),
            "Service registered"
        );

        self.order.push(definition.name.clone());
        self.services.insert(
            definition.name,
            RegisteredService {
                doc: definition.doc,
                methods,
                index,
            },
        );
        Ok(())
    }

    /// Resolve a fully qualified `"service.method"` name to its descriptor
    ///
    /// # Errors
    ///
    /// `Error::MethodNotFound` if the name has no `.` separator, the service
    /// is unknown, or the service has no such method.
    pub fn resolve(&self, qualified: &str) -> Result<Arc<MethodDescriptor>> {
        let (service, method) = qualified
            .split_once('.')
            .ok_or_else(|| Error::MethodNotFound(qualified.to_string()))?;

        self.services
            .get(service)
            .and_then(|s| s.get(method))
            .cloned()
            .ok_or_else(|| Error::MethodNotFound(qualified.to_string()))
    }

    /// True if no services are registered
    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    /// Registered service names, in registration order
    pub fn service_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Iterate services in registration order with their doc strings and
    /// method descriptors in declaration order
    pub fn iter(
        &self,
    ) -> impl Iterator<Item = (&str, Option<&str>, &[Arc<MethodDescriptor>])> + '_ {
        self.order.iter().map(move |name| {
            let service = &self.services[name];
            (
                name.as_str(),
                service.doc.as_deref(),
                service.methods.as_slice(),
            )
        })
    }
}
