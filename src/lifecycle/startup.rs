//! Startup orchestration.
//!
//! # Responsibilities
//! - Pick the schema (configured model or built-in sample)
//! - Synthesize templates from the schema and the registered handlers
//! - Freeze routes, resolver and handlers into an `Application`
//!
//! # Design Decisions
//! - Fail fast: an invalid schema is fatal
//! - Unroutable handlers are not fatal; they are reported and skipped
//! - Listeners start later, in the binary (traffic only when ready)

use std::sync::Arc;
use thiserror::Error;

use crate::config::ServiceConfig;
use crate::dispatch::HandlerRegistry;
use crate::model::{Schema, SchemaError};
use crate::routing::{Resolver, RouteTable, SynthesisReport, TemplateSynthesizer};
use crate::sample;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid schema: {}", join(.0))]
    Schema(Vec<SchemaError>),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

fn join(errors: &[SchemaError]) -> String {
    errors.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}

/// Everything a request needs, frozen at startup.
pub struct Application {
    pub config: ServiceConfig,
    pub schema: Schema,
    pub routes: Arc<RouteTable>,
    pub resolver: Resolver,
    pub registry: Arc<HandlerRegistry>,
    pub report: SynthesisReport,
}

/// Wire schema, handlers and routing together.
pub fn build_application(config: ServiceConfig, registry: HandlerRegistry) -> Result<Application, StartupError> {
    let schema = if config.model.is_empty() {
        tracing::info!("No model configured; using the sample schema");
        sample::sample_schema()
    } else {
        config.model.build_schema()
    }
    .map_err(StartupError::Schema)?;

    tracing::info!(
        collections = schema.collections().len(),
        handler_groups = registry.groups().len(),
        "Schema loaded"
    );

    let synthesizer = TemplateSynthesizer::new(&schema);
    let mut routes = crate::routing::RouteSet::new();
    let report = synthesizer.synthesize_into(&mut routes, registry.groups());
    let table = RouteTable::new(routes);

    tracing::info!(
        templates = table.len(),
        endpoints = table.routes().count(),
        tie_break = ?config.resolver.tie_break,
        "Routing table ready"
    );

    Ok(Application {
        resolver: Resolver::new(config.resolver.tie_break),
        config,
        schema,
        routes: Arc::new(table),
        registry: Arc::new(registry),
        report,
    })
}
