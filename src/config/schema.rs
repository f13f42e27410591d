//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::model::{Collection, Operation, ScalarType, Schema, SchemaError};
use crate::routing::TieBreak;

/// Root configuration for the entity router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request resolution policy.
    pub resolver: ResolverConfig,

    /// Entity schema; empty means "use the built-in sample".
    pub model: ModelConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (match, resolve and dispatch) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` overrides it.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ResolverConfig {
    pub tie_break: TieBreak,
}

/// Declarative entity schema.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ModelConfig {
    pub collections: Vec<CollectionConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CollectionConfig {
    pub name: String,

    /// Ordered key components.
    pub key: Vec<PropertyConfig>,

    #[serde(default)]
    pub operations: Vec<OperationConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OperationConfig {
    pub name: String,

    /// Ordered parameters, excluding the implicit collection binding.
    #[serde(default)]
    pub parameters: Vec<PropertyConfig>,
}

/// A named, typed key component or parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PropertyConfig {
    pub name: String,

    #[serde(rename = "type")]
    pub ty: ScalarType,
}

impl ModelConfig {
    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Build the validated schema described by this section.
    pub fn build_schema(&self) -> Result<Schema, Vec<SchemaError>> {
        let mut builder = Schema::builder();
        for collection in &self.collections {
            let mut built = Collection::new(&collection.name);
            for key in &collection.key {
                built = built.key(&key.name, key.ty);
            }
            for operation in &collection.operations {
                let op = operation
                    .parameters
                    .iter()
                    .fold(Operation::new(&operation.name), |op, p| op.parameter(&p.name, p.ty));
                built = built.operation(op);
            }
            builder = builder.collection(built);
        }
        builder.build()
    }
}
