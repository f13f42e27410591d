//! Scalar types shared by key components, operation parameters and handlers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Primitive type of a key component or operation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarType {
    /// 32-bit signed integer.
    #[serde(alias = "int")]
    Int32,
    /// Unbounded string.
    String,
}

impl ScalarType {
    /// Short lowercase name used in handler signatures and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScalarType::Int32 => "int32",
            ScalarType::String => "string",
        }
    }
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
