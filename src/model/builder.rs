//! Schema construction and validation.
//!
//! # Responsibilities
//! - Collect collections in declaration order
//! - Reject structurally invalid schemas before routing sees them
//!
//! # Design Decisions
//! - Returns every violation, not just the first
//! - Names collide case-insensitively, matching how request paths are matched
//! - `Schema` has no mutators; a new schema means a new build

use std::collections::HashSet;
use thiserror::Error;

use crate::model::collection::Collection;

/// Construction-time schema violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("collection name must not be empty")]
    EmptyCollectionName,

    #[error("duplicate collection '{0}'")]
    DuplicateCollection(String),

    #[error("collection '{0}' has no key components")]
    EmptyKey(String),

    #[error("collection '{collection}' declares key component '{component}' more than once")]
    DuplicateKeyComponent { collection: String, component: String },

    #[error("collection '{collection}' has an unnamed key component or parameter")]
    EmptyName { collection: String },

    #[error("operation '{operation}' on '{collection}' declares parameter '{parameter}' more than once")]
    DuplicateParameter {
        collection: String,
        operation: String,
        parameter: String,
    },

    #[error("operation '{signature}' is bound to '{collection}' more than once")]
    DuplicateOverload { collection: String, signature: String },
}

/// Immutable description of every exposed collection.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    collections: Vec<Collection>,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Collections in declaration order.
    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    pub fn collection(&self, name: &str) -> Option<&Collection> {
        self.collections.iter().find(|c| c.name() == name)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

/// Accumulates collections and validates them on `build`.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    collections: Vec<Collection>,
}

impl SchemaBuilder {
    pub fn collection(mut self, collection: Collection) -> Self {
        self.collections.push(collection);
        self
    }

    pub fn build(self) -> Result<Schema, Vec<SchemaError>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for collection in &self.collections {
            if collection.name().is_empty() {
                errors.push(SchemaError::EmptyCollectionName);
            } else if !seen.insert(collection.name().to_ascii_lowercase()) {
                errors.push(SchemaError::DuplicateCollection(collection.name().to_string()));
            }
            validate_collection(collection, &mut errors);
        }

        if errors.is_empty() {
            Ok(Schema {
                collections: self.collections,
            })
        } else {
            Err(errors)
        }
    }
}

fn validate_collection(collection: &Collection, errors: &mut Vec<SchemaError>) {
    let name = collection.name().to_string();

    if collection.key_components().is_empty() {
        errors.push(SchemaError::EmptyKey(name.clone()));
    }

    let mut components = HashSet::new();
    for component in collection.key_components() {
        if component.name().is_empty() {
            errors.push(SchemaError::EmptyName {
                collection: name.clone(),
            });
        } else if !components.insert(component.name().to_ascii_lowercase()) {
            errors.push(SchemaError::DuplicateKeyComponent {
                collection: name.clone(),
                component: component.name().to_string(),
            });
        }
    }

    let mut overloads = HashSet::new();
    for operation in collection.operations() {
        if operation.name().is_empty() {
            errors.push(SchemaError::EmptyName {
                collection: name.clone(),
            });
            continue;
        }

        if !overloads.insert((operation.name().to_ascii_lowercase(), operation.type_signature())) {
            errors.push(SchemaError::DuplicateOverload {
                collection: name.clone(),
                signature: operation.signature(),
            });
        }

        let mut parameters = HashSet::new();
        for parameter in operation.parameters() {
            if parameter.name().is_empty() {
                errors.push(SchemaError::EmptyName {
                    collection: name.clone(),
                });
            } else if !parameters.insert(parameter.name().to_ascii_lowercase()) {
                errors.push(SchemaError::DuplicateParameter {
                    collection: name.clone(),
                    operation: operation.name().to_string(),
                    parameter: parameter.name().to_string(),
                });
            }
        }
    }
}
