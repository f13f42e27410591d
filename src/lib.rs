//! Convention-based entity routing.
//!
//! Synthesizes route templates from an entity schema and the application's
//! handler groups at startup, then resolves each request path to exactly one
//! handler invocation with typed arguments.

pub mod config;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod observability;
pub mod routing;
pub mod sample;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{build_application, Application, Shutdown};
