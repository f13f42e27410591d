//! Registered template table.
//!
//! # Responsibilities
//! - Register each distinct template string once
//! - Attach every endpoint (handler overload) that shares a template string
//! - Produce the candidate set for a request path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over patterns; schemas are small and fixed at startup
//! - Explicit empty candidate set rather than a silent default route

use std::sync::Arc;

use crate::routing::candidate::{Candidate, CandidateSet};
use crate::routing::matcher::{RequestPath, TemplatePattern};
use crate::routing::template::{RouteSet, RouteTemplate};

#[derive(Debug)]
struct RouteEntry {
    template: String,
    pattern: TemplatePattern,
    endpoints: Vec<Arc<RouteTemplate>>,
}

/// Structural matcher over all registered templates.
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new(routes: RouteSet) -> Self {
        let mut entries: Vec<RouteEntry> = Vec::new();

        for route in routes.into_vec() {
            if let Some(entry) = entries.iter_mut().find(|e| e.template == route.template) {
                tracing::debug!(template = %route.template, handler = %route.handler, "Endpoint shares template");
                entry.endpoints.push(Arc::new(route));
                continue;
            }

            match TemplatePattern::parse(&route.template) {
                Ok(pattern) => entries.push(RouteEntry {
                    template: route.template.clone(),
                    pattern,
                    endpoints: vec![Arc::new(route)],
                }),
                Err(e) => {
                    tracing::warn!(template = %route.template, error = %e, "Template not registered");
                }
            }
        }

        Self { entries }
    }

    /// Every endpoint whose template fits the shape of `path`, in registration order.
    pub fn match_path(&self, path: &str) -> CandidateSet {
        let mut candidates = CandidateSet::new(path, Vec::new());

        let Some(request) = RequestPath::parse(path) else {
            tracing::debug!(path = %path, "Unparseable request path");
            return candidates;
        };

        for entry in &self.entries {
            if let Some(values) = entry.pattern.capture(&request) {
                for endpoint in &entry.endpoints {
                    candidates.push(Candidate::new(endpoint.clone(), values.clone()));
                }
            }
        }
        candidates
    }

    /// Registered endpoints, grouped by template in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &RouteTemplate> {
        self.entries.iter().flat_map(|e| e.endpoints.iter().map(Arc::as_ref))
    }

    /// Distinct registered template strings.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.template.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
