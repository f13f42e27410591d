//! Handler dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     HandlerRegistry::handler(group, descriptor, closure) ...
//!     → groups() → HandlerGroup[] for the synthesizer
//!
//! Per request:
//!     Resolution (route.handler key, typed arguments)
//!     → registry.rs (lookup by handler key)
//!     → closure(&Invocation) → JSON value or HandlerError
//! ```
//!
//! # Design Decisions
//! - Explicit registration; no runtime discovery of handlers
//! - The registry is the single source of handler shape and behavior,
//!   so synthesized routes cannot name a handler that does not exist
//! - Closures are synchronous and `Send + Sync`; the registry is shared via `Arc`

pub mod error;
pub mod registry;

pub use error::HandlerError;
pub use registry::{HandlerRegistry, Invocation};
