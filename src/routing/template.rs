//! Synthesized route templates.
//!
//! A `RouteTemplate` pairs a URL template string with the mapping from schema
//! elements (key components or operation parameters) to the handler parameter
//! names that receive their values.

use crate::model::{KeyComponent, Operation, Parameter, ScalarType};

/// Schema identity bound by a template placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaElement {
    KeyComponent(KeyComponent),
    Parameter(Parameter),
}

impl SchemaElement {
    pub fn name(&self) -> &str {
        match self {
            SchemaElement::KeyComponent(k) => k.name(),
            SchemaElement::Parameter(p) => p.name(),
        }
    }

    pub fn ty(&self) -> ScalarType {
        match self {
            SchemaElement::KeyComponent(k) => k.ty(),
            SchemaElement::Parameter(p) => p.ty(),
        }
    }
}

/// One schema element and the handler parameter it feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub element: SchemaElement,
    pub handler_param: String,
}

/// Schema element → handler parameter name, one entry per placeholder.
///
/// Entries keep positional order so key predicates and operation arguments
/// can be rebuilt in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMapping {
    bindings: Vec<Binding>,
}

impl ParameterMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, element: SchemaElement, handler_param: impl Into<String>) {
        self.bindings.push(Binding {
            element,
            handler_param: handler_param.into(),
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Binding for the schema element with this name.
    pub fn find(&self, element_name: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.element.name() == element_name)
    }

    /// Handler parameter name bound to the schema element with this name.
    pub fn handler_param_for(&self, element_name: &str) -> Option<&str> {
        self.find(element_name).map(|b| b.handler_param.as_str())
    }
}

/// What a template addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteTarget {
    /// The whole collection.
    Collection,
    /// A single entity by key.
    Key,
    /// A bound operation overload.
    Operation(Operation),
}

impl RouteTarget {
    /// Stable identity used for de-duplication.
    pub fn signature(&self) -> String {
        match self {
            RouteTarget::Collection => "collection".to_string(),
            RouteTarget::Key => "key".to_string(),
            RouteTarget::Operation(op) => op.signature(),
        }
    }
}

/// A synthesized URL template plus everything needed to resolve it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTemplate {
    /// Owning collection name.
    pub collection: String,
    /// Template string handed to the transport, e.g. `Customers({id})`.
    pub template: String,
    /// Registry key of the handler this template invokes.
    pub handler: String,
    pub target: RouteTarget,
    pub mapping: ParameterMapping,
}

impl RouteTemplate {
    fn same_registration(&self, other: &RouteTemplate) -> bool {
        self.collection == other.collection
            && self.template == other.template
            && self.target.signature() == other.target.signature()
    }
}

/// Every template synthesized (or registered externally) at startup.
#[derive(Debug, Clone, Default)]
pub struct RouteSet {
    routes: Vec<RouteTemplate>,
}

impl RouteSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. Returns `false` and keeps the existing entry if an
    /// identical registration (collection, template string, target) exists.
    pub fn insert(&mut self, route: RouteTemplate) -> bool {
        if self.routes.iter().any(|r| r.same_registration(&route)) {
            return false;
        }
        self.routes.push(route);
        true
    }

    /// True when `handler` already has a template on `collection`.
    pub fn has_route(&self, collection: &str, handler: &str) -> bool {
        self.routes
            .iter()
            .any(|r| r.collection == collection && r.handler == handler)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteTemplate> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn into_vec(self) -> Vec<RouteTemplate> {
        self.routes
    }
}
