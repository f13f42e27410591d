//! Request-scoped route candidates.
//!
//! A candidate is a registered template that structurally matched the
//! incoming path, together with the raw values the matcher captured for it.
//! Candidate sets are built per request and never shared.

use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::routing::template::RouteTemplate;

/// Raw captured route values, keyed by placeholder or transport-assigned name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RouteValues(BTreeMap<String, String>);

impl RouteValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RouteValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// One structurally matched template for the current request.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub route: Arc<RouteTemplate>,
    pub values: RouteValues,
    valid: bool,
}

impl Candidate {
    pub fn new(route: Arc<RouteTemplate>, values: RouteValues) -> Self {
        Self {
            route,
            values,
            valid: true,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn set_valid(&mut self, valid: bool) {
        self.valid = valid;
    }
}

/// All candidates for one request path, in enumeration order.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    path: String,
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new(path: impl Into<String>, candidates: Vec<Candidate>) -> Self {
        Self {
            path: path.into(),
            candidates,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn push(&mut self, candidate: Candidate) {
        self.candidates.push(candidate);
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Candidate> {
        self.candidates.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Candidate> {
        self.candidates.iter_mut()
    }
}
