//! Shared fixtures for integration tests.

use entity_router::config::ServiceConfig;
use entity_router::dispatch::HandlerRegistry;
use entity_router::model::ScalarType;
use entity_router::routing::{HandlerDescriptor, Resolution, ResolveError};
use entity_router::{build_application, sample, Application};
use serde_json::json;

/// The sample schema served by the sample handlers.
pub fn sample_app() -> Application {
    build_application(ServiceConfig::default(), sample::sample_registry()).unwrap()
}

/// Sample app plus a handler for `BestComplexKeyType(something: int32)`.
#[allow(dead_code)]
pub fn overloaded_app(config: ServiceConfig) -> Application {
    let registry = with_int_overload(sample::sample_registry());
    build_application(config, registry).unwrap()
}

#[allow(dead_code)]
pub fn with_int_overload(registry: HandlerRegistry) -> HandlerRegistry {
    registry.handler(
        "ComplexKeyTypesHandler",
        HandlerDescriptor::new("BestComplexKeyType").param("something", ScalarType::Int32),
        |call| {
            let something = call.int32("something")?;
            Ok(json!({ "SectionNumber": something, "SectionSpot": something * 3 }))
        },
    )
}

/// Match and resolve `path` against `app`.
#[allow(dead_code)]
pub fn resolve(app: &Application, path: &str) -> Result<Resolution, ResolveError> {
    let mut candidates = app.routes.match_path(path);
    app.resolver.resolve(&mut candidates)
}
