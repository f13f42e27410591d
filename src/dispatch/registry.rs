//! Handler registry and dispatch.
//!
//! `HandlerRegistry` holds every handler the application exposes: its group,
//! its declared shape and the closure that runs it.
//!
//! ## Example
//!
//! ```
//! use entity_router::dispatch::HandlerRegistry;
//! use entity_router::model::ScalarType;
//! use entity_router::routing::HandlerDescriptor;
//! use serde_json::json;
//!
//! let registry = HandlerRegistry::new().handler(
//!     "CustomersHandler",
//!     HandlerDescriptor::new("Get").param("id", ScalarType::Int32),
//!     |call| Ok(json!({ "id": call.int32("id")? })),
//! );
//! assert_eq!(registry.groups().len(), 1);
//! ```

use serde_json::Value as Json;
use std::collections::HashMap;
use std::time::Instant;

use crate::dispatch::error::HandlerError;
use crate::model::ScalarType;
use crate::observability::metrics;
use crate::routing::{
    HandlerDescriptor, HandlerGroup, NamedValue, Resolution, ResourcePath, RouteValues, Value,
};

type HandlerFn = Box<dyn Fn(&Invocation<'_>) -> Result<Json, HandlerError> + Send + Sync>;

/// What a handler closure sees for one request.
pub struct Invocation<'a> {
    pub path: &'a ResourcePath,
    pub arguments: &'a [NamedValue],
    pub values: &'a RouteValues,
}

impl Invocation<'_> {
    pub fn argument(&self, name: &str) -> Result<&Value, HandlerError> {
        self.arguments
            .iter()
            .find(|a| a.name == name)
            .map(|a| &a.value)
            .ok_or_else(|| HandlerError::MissingArgument(name.to_string()))
    }

    pub fn int32(&self, name: &str) -> Result<i32, HandlerError> {
        self.argument(name)?.as_i32().ok_or_else(|| HandlerError::ArgumentType {
            name: name.to_string(),
            expected: ScalarType::Int32,
        })
    }

    pub fn string(&self, name: &str) -> Result<&str, HandlerError> {
        self.argument(name)?.as_str().ok_or_else(|| HandlerError::ArgumentType {
            name: name.to_string(),
            expected: ScalarType::String,
        })
    }
}

/// Registered handlers, in registration order.
#[derive(Default)]
pub struct HandlerRegistry {
    groups: Vec<HandlerGroup>,
    handlers: HashMap<String, HandlerFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler closure under `group`.
    ///
    /// Uses builder pattern; a second registration with the same group and
    /// signature replaces the closure.
    pub fn handler<F>(mut self, group: &str, descriptor: HandlerDescriptor, handle: F) -> Self
    where
        F: Fn(&Invocation<'_>) -> Result<Json, HandlerError> + Send + Sync + 'static,
    {
        let index = match self.groups.iter().position(|g| g.name() == group) {
            Some(index) => index,
            None => {
                self.groups.push(HandlerGroup::new(group));
                self.groups.len() - 1
            }
        };

        let key = self.groups[index].handler_key(&descriptor);
        if self.handlers.insert(key.clone(), Box::new(handle)).is_none() {
            self.groups[index].push(descriptor);
        } else {
            tracing::warn!(handler = %key, "Handler registered twice; keeping the latest closure");
        }
        self
    }

    /// Handler shapes grouped for synthesis.
    pub fn groups(&self) -> &[HandlerGroup] {
        &self.groups
    }

    /// Registered handler keys.
    pub fn handler_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Invoke the handler chosen by the resolver.
    pub fn dispatch(&self, resolution: &Resolution) -> Result<Json, HandlerError> {
        let key = &resolution.route.handler;
        let handle = self
            .handlers
            .get(key)
            .ok_or_else(|| HandlerError::UnknownHandler(key.clone()))?;

        let invocation = Invocation {
            path: &resolution.path,
            arguments: &resolution.arguments,
            values: &resolution.values,
        };

        let start = Instant::now();
        let result = handle(&invocation);
        metrics::record_dispatch_duration(key, start);

        let collection = resolution.path.collection();
        match &result {
            Ok(_) => tracing::debug!(handler = %key, collection, path = %resolution.path, "Handler completed"),
            Err(e) => tracing::debug!(
                handler = %key,
                collection,
                path = %resolution.path,
                error = %e,
                "Handler failed"
            ),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{KeyComponent, Schema, Collection};
    use crate::routing::{ParameterMapping, RouteTarget, RouteTemplate, SchemaElement};
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> HandlerRegistry {
        HandlerRegistry::new()
            .handler("CustomersHandler", HandlerDescriptor::new("Get"), |_| Ok(json!([])))
            .handler(
                "CustomersHandler",
                HandlerDescriptor::new("Get").param("id", ScalarType::Int32),
                |call| {
                    let id = call.int32("id")?;
                    if id == 0 {
                        return Err(HandlerError::NotFound(call.path.to_string()));
                    }
                    Ok(json!({ "id": id }))
                },
            )
    }

    fn resolution(id: Value) -> Resolution {
        let mut mapping = ParameterMapping::new();
        mapping.bind(
            SchemaElement::KeyComponent(KeyComponent::new("Id", ScalarType::Int32)),
            "id",
        );
        Resolution {
            route: Arc::new(RouteTemplate {
                collection: "Customers".into(),
                template: "Customers({id})".into(),
                handler: "CustomersHandler.Get(int32)".into(),
                target: RouteTarget::Key,
                mapping,
            }),
            values: RouteValues::new(),
            arguments: vec![NamedValue {
                name: "id".into(),
                value: id.clone(),
            }],
            path: ResourcePath::Entity {
                collection: "Customers".into(),
                key: vec![NamedValue { name: "Id".into(), value: id }],
            },
        }
    }

    #[test]
    fn test_groups_follow_registration() {
        let registry = registry();
        assert_eq!(registry.groups().len(), 1);
        assert_eq!(registry.groups()[0].handlers().len(), 2);
        assert_eq!(
            registry.handler_keys(),
            vec!["CustomersHandler.Get()", "CustomersHandler.Get(int32)"]
        );

        let schema = Schema::builder()
            .collection(Collection::new("Customers").key("Id", ScalarType::Int32))
            .build()
            .unwrap();
        assert!(registry.groups()[0].serves(schema.collections()[0].name()));
    }

    #[test]
    fn test_dispatch_by_handler_key() {
        let registry = registry();
        assert_eq!(registry.dispatch(&resolution(Value::Int32(5))).unwrap(), json!({ "id": 5 }));
        assert_eq!(
            registry.dispatch(&resolution(Value::Int32(0))).unwrap_err(),
            HandlerError::NotFound("Customers(0)".into())
        );
    }

    #[test]
    fn test_argument_type_mismatch() {
        let err = registry().dispatch(&resolution(Value::String("x".into()))).unwrap_err();
        assert_eq!(
            err,
            HandlerError::ArgumentType {
                name: "id".into(),
                expected: ScalarType::Int32
            }
        );
        assert_eq!(err.status_code(), 500);
    }

    #[test]
    fn test_unknown_handler() {
        let mut missing = resolution(Value::Int32(1));
        Arc::make_mut(&mut missing.route).handler = "OrdersHandler.Get(int32)".into();
        assert!(matches!(
            registry().dispatch(&missing),
            Err(HandlerError::UnknownHandler(_))
        ));
    }

    #[test]
    fn test_duplicate_registration_keeps_one_descriptor() {
        let registry = registry().handler(
            "CustomersHandler",
            HandlerDescriptor::new("Get").param("id", ScalarType::Int32),
            |_| Ok(json!("replaced")),
        );
        assert_eq!(registry.groups()[0].handlers().len(), 2);
        assert_eq!(registry.dispatch(&resolution(Value::Int32(5))).unwrap(), json!("replaced"));
    }
}
