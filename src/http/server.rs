//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the route listing and the entity catch-all
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind server to listener with graceful shutdown
//! - Run match → resolve → dispatch for each request

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::Uri,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::dispatch::HandlerRegistry;
use crate::http::request::{propagate_request_id_layer, request_span, set_request_id_layer};
use crate::http::response::ApiError;
use crate::lifecycle::{Application, Shutdown};
use crate::routing::{ResolveError, Resolver, RouteTable};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub resolver: Resolver,
    pub registry: Arc<HandlerRegistry>,
}

impl From<&Application> for AppState {
    fn from(app: &Application) -> Self {
        Self {
            routes: app.routes.clone(),
            resolver: app.resolver,
            registry: app.registry.clone(),
        }
    }
}

/// HTTP server for the entity router.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(app: &Application) -> Self {
        Self {
            router: build_router(&app.config, AppState::from(app)),
        }
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: Arc<Shutdown>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.wait())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the Axum router with all middleware layers.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    Router::new()
        .route("/$routes", get(routes_handler))
        .route("/{*path}", get(entity_handler))
        .fallback(fallback_handler)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(set_request_id_layer())
}

#[derive(Serialize)]
struct RouteInfo<'a> {
    collection: &'a str,
    template: &'a str,
    handler: &'a str,
}

async fn routes_handler(State(state): State<AppState>) -> impl IntoResponse {
    let routes: Vec<RouteInfo<'_>> = state
        .routes
        .routes()
        .map(|r| RouteInfo {
            collection: &r.collection,
            template: &r.template,
            handler: &r.handler,
        })
        .collect();
    Json(serde_json::json!({ "routes": routes }))
}

async fn entity_handler(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(path) = path.map_err(|e| ApiError::InvalidPath(e.body_text()))?;
    let mut candidates = state.routes.match_path(&path);
    tracing::debug!(path = %path, candidates = candidates.len(), "Route candidates");

    let resolution = state.resolver.resolve(&mut candidates)?;
    let body = state.registry.dispatch(&resolution)?;
    Ok(Json(body))
}

async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::Resolve(ResolveError::Unroutable {
        path: uri.path().to_string(),
        rejected: 0,
    })
}
