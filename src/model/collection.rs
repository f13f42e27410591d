//! Collections, key components and bound operations.

use crate::model::types::ScalarType;

/// One named, typed scalar forming part of a collection's identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyComponent {
    name: String,
    ty: ScalarType,
}

impl KeyComponent {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ScalarType {
        self.ty
    }
}

/// A named, typed parameter of a bound operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    name: String,
    ty: ScalarType,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ScalarType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> ScalarType {
        self.ty
    }
}

/// A function bound to a collection.
///
/// The bound-collection parameter is implicit and not stored here: `parameters`
/// holds only what appears in a route template and a handler signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Operation {
    name: String,
    parameters: Vec<Parameter>,
}

impl Operation {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
        }
    }

    /// Append a parameter (builder style).
    pub fn parameter(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.parameters.push(Parameter::new(name, ty));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Ordered parameter types; two overloads differ exactly when these differ.
    pub fn type_signature(&self) -> Vec<ScalarType> {
        self.parameters.iter().map(Parameter::ty).collect()
    }

    /// Human-readable signature, e.g. `BestComplexKeyType(int32,int32)`.
    pub fn signature(&self) -> String {
        let types: Vec<&str> = self.parameters.iter().map(|p| p.ty().as_str()).collect();
        format!("{}({})", self.name, types.join(","))
    }
}

/// A named, addressable set of like-structured entities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collection {
    name: String,
    key: Vec<KeyComponent>,
    operations: Vec<Operation>,
}

impl Collection {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: Vec::new(),
            operations: Vec::new(),
        }
    }

    /// Append a key component. Order is significant for composite keys.
    pub fn key(mut self, name: impl Into<String>, ty: ScalarType) -> Self {
        self.key.push(KeyComponent::new(name, ty));
        self
    }

    /// Bind an operation to this collection.
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key_components(&self) -> &[KeyComponent] {
        &self.key
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }
}
