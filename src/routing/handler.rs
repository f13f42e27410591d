//! Handler descriptors.
//!
//! Handlers belong to the surrounding application. Routing only reads their
//! shape: a name and an ordered list of declared parameters. Descriptors are
//! grouped by the `<CollectionName>Handler` naming convention.

use crate::model::ScalarType;

/// Declared type of a handler parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingType {
    /// A scalar that can be bound from a route value.
    Scalar(ScalarType),
    /// Anything routing cannot bind (request bodies, services, ...).
    Other(String),
}

impl BindingType {
    pub fn scalar(&self) -> Option<ScalarType> {
        match self {
            BindingType::Scalar(ty) => Some(*ty),
            BindingType::Other(_) => None,
        }
    }

    fn as_str(&self) -> &str {
        match self {
            BindingType::Scalar(ty) => ty.as_str(),
            BindingType::Other(name) => name,
        }
    }
}

impl From<ScalarType> for BindingType {
    fn from(ty: ScalarType) -> Self {
        BindingType::Scalar(ty)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerParameter {
    pub name: String,
    pub ty: BindingType,
}

/// Shape of one callable handler.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HandlerDescriptor {
    name: String,
    parameters: Vec<HandlerParameter>,
}

impl HandlerDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a declared parameter (builder style).
    pub fn param(mut self, name: impl Into<String>, ty: impl Into<BindingType>) -> Self {
        self.parameters.push(HandlerParameter {
            name: name.into(),
            ty: ty.into(),
        });
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[HandlerParameter] {
        &self.parameters
    }

    /// Overload-unique signature, e.g. `BestComplexKeyType(int32,int32)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.parameters.iter().map(|p| p.ty.as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }
}

/// All handlers serving one collection.
#[derive(Debug, Clone, Default)]
pub struct HandlerGroup {
    name: String,
    handlers: Vec<HandlerDescriptor>,
}

impl HandlerGroup {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            handlers: Vec::new(),
        }
    }

    /// Conventional group name for a collection.
    pub fn name_for(collection: &str) -> String {
        format!("{collection}Handler")
    }

    pub fn push(&mut self, handler: HandlerDescriptor) {
        self.handlers.push(handler);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn handlers(&self) -> &[HandlerDescriptor] {
        &self.handlers
    }

    /// True when this group follows the naming convention for `collection`.
    pub fn serves(&self, collection: &str) -> bool {
        self.name.eq_ignore_ascii_case(&Self::name_for(collection))
    }

    /// Globally unique key for one handler of this group.
    pub fn handler_key(&self, handler: &HandlerDescriptor) -> String {
        format!("{}.{}", self.name, handler.signature())
    }
}
