//! Request-time candidate resolution.
//!
//! # Responsibilities
//! - Validate each candidate's captured values against its mapping
//! - Convert raw literals and prune candidates whose types do not fit
//! - Pick exactly one survivor (overload resolution)
//! - Rewrite captured values into handler parameter names
//! - Build the canonical `ResourcePath` for dispatch
//!
//! # Design Decisions
//! - Pure and synchronous: no I/O, no shared mutable state
//! - Total: every candidate set yields a resolution or a `ResolveError`
//! - Validity is an explicit check per candidate, recorded on the candidate
//! - Default tie-break prefers integer-typed bindings and fails closed on a tie

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::model::ScalarType;
use crate::observability::metrics;
use crate::routing::candidate::{Candidate, CandidateSet, RouteValues};
use crate::routing::error::{Rejection, ResolveError};
use crate::routing::matcher::{NAME_SUFFIX, VALUE_SUFFIX};
use crate::routing::path::{NamedValue, ResourcePath, Value};
use crate::routing::template::{Binding, RouteTarget, RouteTemplate};

/// How to choose among several valid candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Most integer-typed bindings wins; a tie is `AmbiguousRoute`.
    #[default]
    MostSpecific,
    /// First valid candidate in enumeration order wins.
    FirstMatch,
}

/// The single handler invocation chosen for a request.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub route: Arc<RouteTemplate>,
    /// Captured values with schema names rewritten to handler parameter names.
    pub values: RouteValues,
    /// Typed arguments in handler parameter order, named as the handler declares them.
    pub arguments: Vec<NamedValue>,
    pub path: ResourcePath,
}

impl Resolution {
    pub fn argument(&self, name: &str) -> Option<&Value> {
        self.arguments.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// Where a binding's raw value was found.
enum Source {
    HandlerName,
    ElementName,
    Pair,
}

struct Bound {
    route: Arc<RouteTemplate>,
    values: RouteValues,
    elements: Vec<NamedValue>,
    arguments: Vec<NamedValue>,
    specificity: usize,
}

/// Stateless resolver; cheap to copy into request handlers.
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolver {
    tie_break: TieBreak,
}

impl Resolver {
    pub fn new(tie_break: TieBreak) -> Self {
        Self { tie_break }
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    /// Select one candidate, marking every rejected one invalid.
    pub fn resolve(&self, candidates: &mut CandidateSet) -> Result<Resolution, ResolveError> {
        let path = candidates.path().to_string();
        let mut survivors = Vec::new();
        let mut rejected = 0;

        for candidate in candidates.iter_mut() {
            let outcome = if candidate.is_valid() {
                bind(candidate)
            } else {
                Err(Rejection::Invalidated)
            };

            match outcome {
                Ok(bound) => survivors.push(bound),
                Err(rejection) => {
                    tracing::debug!(
                        path = %path,
                        template = %candidate.route.template,
                        reason = %rejection,
                        "Candidate rejected"
                    );
                    metrics::record_candidate_rejected(rejection.reason());
                    candidate.set_valid(false);
                    rejected += 1;
                }
            }
        }

        let winner = match self.pick(&path, survivors) {
            Ok(winner) => winner,
            Err(ResolveError::Unroutable { path, .. }) => {
                metrics::record_resolution("unroutable");
                return Err(ResolveError::Unroutable { path, rejected });
            }
            Err(e) => {
                metrics::record_resolution("ambiguous");
                return Err(e);
            }
        };

        metrics::record_resolution("resolved");
        let resource = resource_path(&winner.route, winner.elements);
        tracing::debug!(
            path = %path,
            template = %winner.route.template,
            handler = %winner.route.handler,
            resource = %resource,
            "Route resolved"
        );

        Ok(Resolution {
            route: winner.route,
            values: winner.values,
            arguments: winner.arguments,
            path: resource,
        })
    }

    fn pick(&self, path: &str, mut survivors: Vec<Bound>) -> Result<Bound, ResolveError> {
        if survivors.len() <= 1 {
            return survivors.pop().ok_or_else(|| ResolveError::Unroutable {
                path: path.to_string(),
                rejected: 0,
            });
        }

        match self.tie_break {
            TieBreak::FirstMatch => {
                tracing::warn!(
                    path = %path,
                    survivors = survivors.len(),
                    "Several candidates remain; first candidate wins"
                );
                Ok(survivors.swap_remove(0))
            }
            TieBreak::MostSpecific => {
                let best = survivors.iter().map(|b| b.specificity).max().unwrap_or(0);
                let mut top: Vec<Bound> = survivors.into_iter().filter(|b| b.specificity == best).collect();
                if top.len() == 1 {
                    return Ok(top.swap_remove(0));
                }
                let handlers: Vec<String> = top.iter().map(|b| b.route.handler.clone()).collect();
                tracing::warn!(path = %path, handlers = ?handlers, "Ambiguous route");
                Err(ResolveError::AmbiguousRoute {
                    path: path.to_string(),
                    handlers,
                })
            }
        }
    }
}

/// Validate one candidate and produce its typed, rewritten bindings.
fn bind(candidate: &Candidate) -> Result<Bound, Rejection> {
    let route = &candidate.route;
    let raw = &candidate.values;

    for (key, element) in raw.iter() {
        let Some(prefix) = key.strip_suffix(NAME_SUFFIX) else {
            continue;
        };
        if find_binding(route, element).is_none() {
            return Err(Rejection::UnknownElement {
                element: element.to_string(),
            });
        }
        if !raw.contains(&format!("{prefix}{VALUE_SUFFIX}")) {
            return Err(Rejection::MissingValue {
                element: element.to_string(),
            });
        }
    }

    let mut renamed = Vec::new();
    let mut elements = Vec::with_capacity(route.mapping.len());
    let mut arguments = Vec::with_capacity(route.mapping.len());
    let mut specificity = 0;

    for binding in route.mapping.iter() {
        let element = binding.element.name();
        let (text, source) = lookup(raw, binding).ok_or_else(|| Rejection::MissingValue {
            element: element.to_string(),
        })?;

        let value = Value::parse_literal(text);
        if value.ty() != binding.element.ty() {
            return Err(Rejection::MalformedCapturedValue {
                element: element.to_string(),
                raw: text.to_string(),
                expected: binding.element.ty(),
            });
        }
        if value.ty() == ScalarType::Int32 {
            specificity += 1;
        }
        if let Source::ElementName = source {
            renamed.push(element);
        }

        elements.push(NamedValue {
            name: element.to_string(),
            value: value.clone(),
        });
        arguments.push(NamedValue {
            name: binding.handler_param.clone(),
            value,
        });
    }

    let mut values = raw.clone();
    for element in renamed {
        values.remove(element);
    }
    for binding in route.mapping.iter() {
        if let Some((text, _)) = lookup(raw, binding) {
            values.insert(binding.handler_param.clone(), text);
        }
    }

    Ok(Bound {
        route: route.clone(),
        values,
        elements,
        arguments,
        specificity,
    })
}

fn find_binding<'r>(route: &'r RouteTemplate, element: &str) -> Option<&'r Binding> {
    route
        .mapping
        .find(element)
        .or_else(|| route.mapping.iter().find(|b| b.element.name().eq_ignore_ascii_case(element)))
}

fn lookup<'v>(raw: &'v RouteValues, binding: &Binding) -> Option<(&'v str, Source)> {
    if let Some(text) = raw.get(&binding.handler_param) {
        return Some((text, Source::HandlerName));
    }
    let element = binding.element.name();
    if let Some(text) = raw.get(element) {
        return Some((text, Source::ElementName));
    }
    raw.iter()
        .filter(|(_, name)| name.eq_ignore_ascii_case(element))
        .find_map(|(key, _)| key.strip_suffix(NAME_SUFFIX))
        .and_then(|prefix| raw.get(&format!("{prefix}{VALUE_SUFFIX}")))
        .map(|text| (text, Source::Pair))
}

fn resource_path(route: &RouteTemplate, elements: Vec<NamedValue>) -> ResourcePath {
    let collection = route.collection.clone();
    match &route.target {
        RouteTarget::Collection => ResourcePath::Collection { collection },
        RouteTarget::Key => ResourcePath::Entity {
            collection,
            key: elements,
        },
        RouteTarget::Operation(operation) => ResourcePath::Operation {
            collection,
            operation: operation.name().to_string(),
            arguments: elements,
        },
    }
}
