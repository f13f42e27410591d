//! Routing error types.

use thiserror::Error;

use crate::model::ScalarType;

/// Why a handler received no template during synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// Handler shape matches neither the key arity nor any operation.
    #[error("handler '{handler}' is incompatible with collection '{collection}'")]
    SchemaIncompatible { collection: String, handler: String },

    #[error("handler '{handler}' takes {found} parameters, key of '{collection}' has {expected}")]
    KeyArity {
        collection: String,
        handler: String,
        expected: usize,
        found: usize,
    },

    /// Handler parameter type differs from the key component it would bind.
    #[error("handler '{handler}' binds key component '{component}' of '{collection}' as a non-{expected} parameter")]
    KeyType {
        collection: String,
        handler: String,
        component: String,
        expected: ScalarType,
    },

    #[error("parameter '{parameter}' of handler '{handler}' cannot be bound from a route")]
    UnbindableParameter { handler: String, parameter: String },

    /// Several handlers fit one operation equally well.
    #[error("operation '{operation}' on '{collection}' matches handlers {handlers:?}")]
    AmbiguousHandler {
        collection: String,
        operation: String,
        handlers: Vec<String>,
    },

    #[error("template '{template}' is already registered for '{collection}'")]
    DuplicateTemplate { collection: String, template: String },
}

impl SynthesisError {
    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            SynthesisError::SchemaIncompatible { .. } => "schema_incompatible",
            SynthesisError::KeyArity { .. } => "key_arity",
            SynthesisError::KeyType { .. } => "key_type",
            SynthesisError::UnbindableParameter { .. } => "unbindable_parameter",
            SynthesisError::AmbiguousHandler { .. } => "ambiguous_handler",
            SynthesisError::DuplicateTemplate { .. } => "duplicate_template",
        }
    }
}

/// Why a single candidate was invalidated during resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Arrived already invalidated by the transport.
    #[error("candidate was invalidated before resolution")]
    Invalidated,

    #[error("no value captured for '{element}'")]
    MissingValue { element: String },

    /// A captured name/value pair references an element the template does not bind.
    #[error("captured value references unknown element '{element}'")]
    UnknownElement { element: String },

    #[error("captured value '{raw}' for '{element}' is not a valid {expected}")]
    MalformedCapturedValue {
        element: String,
        raw: String,
        expected: ScalarType,
    },
}

impl Rejection {
    /// Metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            Rejection::Invalidated => "invalidated",
            Rejection::MissingValue { .. } => "missing_value",
            Rejection::UnknownElement { .. } => "unknown_element",
            Rejection::MalformedCapturedValue { .. } => "malformed_value",
        }
    }
}

/// Request-level resolution failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// No candidate survived validation.
    #[error("no matching route for '{path}'")]
    Unroutable { path: String, rejected: usize },

    /// More than one candidate survived and the tie-break could not pick one.
    #[error("route '{path}' is ambiguous between {handlers:?}")]
    AmbiguousRoute { path: String, handlers: Vec<String> },
}

impl ResolveError {
    /// Stable error code for responses and metrics.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::Unroutable { .. } => "Unroutable",
            ResolveError::AmbiguousRoute { .. } => "AmbiguousRoute",
        }
    }
}
