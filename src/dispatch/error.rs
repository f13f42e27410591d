//! Error types for handler dispatch.

use thiserror::Error;

use crate::model::ScalarType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// No closure registered under this handler key.
    #[error("unknown handler: {0}")]
    UnknownHandler(String),

    #[error("missing argument '{0}'")]
    MissingArgument(String),

    #[error("argument '{name}' is not a {expected}")]
    ArgumentType { name: String, expected: ScalarType },

    /// Entity or resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Business logic rejected the request.
    #[error("rejected: {0}")]
    Rejected(String),
}

impl HandlerError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownHandler(_) => 500,
            HandlerError::MissingArgument(_) => 500,
            HandlerError::ArgumentType { .. } => 500,
            HandlerError::NotFound(_) => 404,
            HandlerError::Rejected(_) => 422,
        }
    }

    /// Stable error code for response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            HandlerError::UnknownHandler(_) => "UnknownHandler",
            HandlerError::MissingArgument(_) => "MissingArgument",
            HandlerError::ArgumentType { .. } => "ArgumentType",
            HandlerError::NotFound(_) => "NotFound",
            HandlerError::Rejected(_) => "Rejected",
        }
    }
}
