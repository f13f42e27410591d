//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Synthesis (at startup):
//!     Schema + HandlerGroup[]
//!     → synthesizer.rs (key, collection and operation templates)
//!     → RouteSet (deduplicated, registration order)
//!     → router.rs (parse templates, freeze as immutable RouteTable)
//!
//! Incoming Request (path):
//!     → router.rs + matcher.rs (structural match, raw captures)
//!     → CandidateSet
//!     → resolver.rs (validate, type, rewrite, tie-break)
//!     → Return: Resolution or ResolveError
//! ```
//!
//! # Design Decisions
//! - Templates built at startup, immutable at runtime
//! - No regex in hot path (hand-written segment splitter)
//! - Deterministic: same schema and handlers yield the same templates in the same order
//! - Overloads sharing a template string are separate candidates; the resolver picks one

pub mod candidate;
pub mod error;
pub mod handler;
pub mod matcher;
pub mod path;
pub mod resolver;
pub mod router;
pub mod synthesizer;
pub mod template;

pub use candidate::{Candidate, CandidateSet, RouteValues};
pub use error::{Rejection, ResolveError, SynthesisError};
pub use handler::{BindingType, HandlerDescriptor, HandlerGroup, HandlerParameter};
pub use path::{NamedValue, ResourcePath, Value};
pub use resolver::{Resolution, Resolver, TieBreak};
pub use router::RouteTable;
pub use synthesizer::{SynthesisReport, TemplateSynthesizer};
pub use template::{ParameterMapping, RouteSet, RouteTarget, RouteTemplate, SchemaElement};
