//! Schema model subsystem.
//!
//! # Data Flow
//! ```text
//! schema authoring (config file, sample code)
//!     → builder.rs (construction-time validation)
//!     → Schema (immutable, shared by reference)
//!     → routing::synthesizer (startup, one pass)
//! ```
//!
//! # Design Decisions
//! - Read-only after construction; no interior mutability
//! - Declaration order is preserved so synthesis is deterministic
//! - Operations never carry the implicit bound-collection parameter

pub mod builder;
pub mod collection;
pub mod types;

pub use builder::{Schema, SchemaBuilder, SchemaError};
pub use collection::{Collection, KeyComponent, Operation, Parameter};
pub use types::ScalarType;
