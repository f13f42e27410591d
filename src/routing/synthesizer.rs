//! Convention-based template synthesis.
//!
//! # Responsibilities
//! - Pair each collection with its `<Name>Handler` group
//! - Map `Get` handlers onto whole-collection and key routes by arity
//! - Map bound operations onto handlers by name and parameter types
//! - Emit one `RouteTemplate` per compatible (collection, handler) pair
//!
//! # Design Decisions
//! - Runs once at startup over immutable inputs; output is deterministic
//! - Best effort: incompatible handlers are logged and skipped, never fatal
//! - Key placeholders bind by position, not by name, and must agree in type
//! - Ambiguous operation handlers fail closed instead of last-match-wins

use std::collections::HashSet;

use crate::model::{Collection, Operation, Schema};
use crate::observability::metrics;
use crate::routing::error::SynthesisError;
use crate::routing::handler::{HandlerDescriptor, HandlerGroup};
use crate::routing::template::{ParameterMapping, RouteSet, RouteTarget, RouteTemplate, SchemaElement};

/// Handler name that serves collection and key routes.
pub const KEY_HANDLER: &str = "Get";

/// Outcome counts of one synthesis pass.
#[derive(Debug, Default)]
pub struct SynthesisReport {
    pub registered: usize,
    pub skipped: Vec<SynthesisError>,
}

impl SynthesisReport {
    fn skip(&mut self, error: SynthesisError) {
        tracing::warn!(reason = error.reason(), error = %error, "Handler skipped");
        metrics::record_synthesis_skipped(error.reason());
        self.skipped.push(error);
    }
}

/// Builds route templates from a schema and the application's handlers.
pub struct TemplateSynthesizer<'a> {
    schema: &'a Schema,
}

impl<'a> TemplateSynthesizer<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Synthesize into a fresh route set.
    pub fn synthesize(&self, groups: &[HandlerGroup]) -> RouteSet {
        let mut routes = RouteSet::new();
        self.synthesize_into(&mut routes, groups);
        routes
    }

    /// Synthesize into `routes`, leaving handlers that already own a template
    /// on a collection untouched.
    pub fn synthesize_into(&self, routes: &mut RouteSet, groups: &[HandlerGroup]) -> SynthesisReport {
        let mut report = SynthesisReport::default();

        for collection in self.schema.collections() {
            let Some(group) = groups.iter().find(|g| g.serves(collection.name())) else {
                tracing::debug!(collection = collection.name(), "No handler group for collection");
                continue;
            };
            self.synthesize_collection(collection, group, routes, &mut report);
        }

        tracing::info!(
            registered = report.registered,
            skipped = report.skipped.len(),
            total = routes.len(),
            "Route synthesis complete"
        );
        report
    }

    fn synthesize_collection(
        &self,
        collection: &Collection,
        group: &HandlerGroup,
        routes: &mut RouteSet,
        report: &mut SynthesisReport,
    ) {
        let mut used = HashSet::new();
        let mut reported = HashSet::new();

        for handler in group.handlers() {
            if !handler.name().eq_ignore_ascii_case(KEY_HANDLER) {
                continue;
            }
            let handler_key = group.handler_key(handler);
            if routes.has_route(collection.name(), &handler_key) {
                used.insert(handler_key);
                continue;
            }
            match key_route(collection, &handler_key, handler) {
                Ok(route) => register(routes, route, report, &mut used),
                Err(e) => {
                    reported.insert(handler_key);
                    report.skip(e);
                }
            }
        }

        for operation in collection.operations() {
            let handler = match select_handler(collection, operation, group) {
                Ok(Some(handler)) => handler,
                Ok(None) => {
                    tracing::debug!(
                        collection = collection.name(),
                        operation = %operation.signature(),
                        "No handler for operation"
                    );
                    continue;
                }
                Err(e) => {
                    if let SynthesisError::AmbiguousHandler { handlers, .. } = &e {
                        reported.extend(handlers.iter().cloned());
                    }
                    report.skip(e);
                    continue;
                }
            };

            let handler_key = group.handler_key(handler);
            if routes.has_route(collection.name(), &handler_key) {
                used.insert(handler_key);
                continue;
            }
            let route = operation_route(collection, operation, &handler_key, handler);
            register(routes, route, report, &mut used);
        }

        for handler in group.handlers() {
            let handler_key = group.handler_key(handler);
            if !used.contains(&handler_key) && !reported.contains(&handler_key) {
                report.skip(SynthesisError::SchemaIncompatible {
                    collection: collection.name().to_string(),
                    handler: handler_key,
                });
            }
        }
    }
}

fn register(
    routes: &mut RouteSet,
    route: RouteTemplate,
    report: &mut SynthesisReport,
    used: &mut HashSet<String>,
) {
    let collection = route.collection.clone();
    let template = route.template.clone();
    let handler = route.handler.clone();

    if routes.insert(route) {
        tracing::debug!(collection = %collection, template = %template, handler = %handler, "Route synthesized");
        metrics::record_route_synthesized();
        report.registered += 1;
        used.insert(handler);
    } else {
        report.skip(SynthesisError::DuplicateTemplate { collection, template });
    }
}

/// Whole-collection (0 parameters) or key (N = key length) route for a `Get` handler.
fn key_route(
    collection: &Collection,
    handler_key: &str,
    handler: &HandlerDescriptor,
) -> Result<RouteTemplate, SynthesisError> {
    let params = handler.parameters();
    if let Some(p) = params.iter().find(|p| p.ty.scalar().is_none()) {
        return Err(SynthesisError::UnbindableParameter {
            handler: handler_key.to_string(),
            parameter: p.name.clone(),
        });
    }

    if params.is_empty() {
        return Ok(RouteTemplate {
            collection: collection.name().to_string(),
            template: collection.name().to_string(),
            handler: handler_key.to_string(),
            target: RouteTarget::Collection,
            mapping: ParameterMapping::new(),
        });
    }

    let key = collection.key_components();
    if params.len() != key.len() {
        return Err(SynthesisError::KeyArity {
            collection: collection.name().to_string(),
            handler: handler_key.to_string(),
            expected: key.len(),
            found: params.len(),
        });
    }

    let mut mapping = ParameterMapping::new();
    for (component, param) in key.iter().zip(params) {
        if param.ty.scalar() != Some(component.ty()) {
            return Err(SynthesisError::KeyType {
                collection: collection.name().to_string(),
                handler: handler_key.to_string(),
                component: component.name().to_string(),
                expected: component.ty(),
            });
        }
        mapping.bind(SchemaElement::KeyComponent(component.clone()), param.name.clone());
    }

    let template = if key.len() == 1 {
        format!("{}({{{}}})", collection.name(), params[0].name)
    } else {
        let parts: Vec<String> = key
            .iter()
            .zip(params)
            .map(|(component, param)| format!("{}={{{}}}", component.name(), param.name))
            .collect();
        format!("{}({})", collection.name(), parts.join(","))
    };

    Ok(RouteTemplate {
        collection: collection.name().to_string(),
        template,
        handler: handler_key.to_string(),
        target: RouteTarget::Key,
        mapping,
    })
}

/// Name matches case-insensitively, counts match, types match position by position.
fn accepts(operation: &Operation, handler: &HandlerDescriptor) -> bool {
    handler.name().eq_ignore_ascii_case(operation.name())
        && handler.parameters().len() == operation.parameters().len()
        && operation
            .parameters()
            .iter()
            .zip(handler.parameters())
            .all(|(p, h)| h.ty.scalar() == Some(p.ty()))
}

fn names_match(operation: &Operation, handler: &HandlerDescriptor) -> bool {
    operation
        .parameters()
        .iter()
        .zip(handler.parameters())
        .all(|(p, h)| p.name().eq_ignore_ascii_case(&h.name))
}

fn select_handler<'g>(
    collection: &Collection,
    operation: &Operation,
    group: &'g HandlerGroup,
) -> Result<Option<&'g HandlerDescriptor>, SynthesisError> {
    let compatible: Vec<&HandlerDescriptor> = group
        .handlers()
        .iter()
        .filter(|h| accepts(operation, h))
        .collect();

    if compatible.len() <= 1 {
        return Ok(compatible.first().copied());
    }

    let named: Vec<&HandlerDescriptor> = compatible
        .iter()
        .copied()
        .filter(|h| names_match(operation, h))
        .collect();

    if named.len() == 1 {
        return Ok(Some(named[0]));
    }

    Err(SynthesisError::AmbiguousHandler {
        collection: collection.name().to_string(),
        operation: operation.signature(),
        handlers: compatible.iter().map(|h| group.handler_key(h)).collect(),
    })
}

fn operation_route(
    collection: &Collection,
    operation: &Operation,
    handler_key: &str,
    handler: &HandlerDescriptor,
) -> RouteTemplate {
    let mut mapping = ParameterMapping::new();
    let mut parts = Vec::with_capacity(operation.parameters().len());

    for (param, handler_param) in operation.parameters().iter().zip(handler.parameters()) {
        mapping.bind(SchemaElement::Parameter(param.clone()), handler_param.name.clone());
        parts.push(format!("{}={{{}}}", param.name(), handler_param.name));
    }

    RouteTemplate {
        collection: collection.name().to_string(),
        template: format!("{}/{}({})", collection.name(), operation.name(), parts.join(",")),
        handler: handler_key.to_string(),
        target: RouteTarget::Operation(operation.clone()),
        mapping,
    }
}
