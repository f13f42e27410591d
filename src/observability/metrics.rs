//! Metrics collection and exposition.
//!
//! # Metrics
//! - `entity_router_routes_synthesized_total` (counter): templates registered at startup
//! - `entity_router_synthesis_skipped_total` (counter): handlers left unrouted, by reason
//! - `entity_router_resolutions_total` (counter): resolution outcomes
//! - `entity_router_candidates_rejected_total` (counter): invalidated candidates, by reason
//! - `entity_router_dispatch_duration_seconds` (histogram): handler latency, by handler
//!
//! # Design Decisions
//! - Recording before `init_metrics` is a no-op, so library users and tests pay nothing
//! - Labels are static strings except the handler key, which is bounded by the schema

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_route_synthesized() {
    metrics::counter!("entity_router_routes_synthesized_total").increment(1);
}

pub fn record_synthesis_skipped(reason: &'static str) {
    metrics::counter!("entity_router_synthesis_skipped_total", "reason" => reason).increment(1);
}

/// `outcome` is one of `resolved`, `unroutable`, `ambiguous`.
pub fn record_resolution(outcome: &'static str) {
    metrics::counter!("entity_router_resolutions_total", "outcome" => outcome).increment(1);
}

pub fn record_candidate_rejected(reason: &'static str) {
    metrics::counter!("entity_router_candidates_rejected_total", "reason" => reason).increment(1);
}

pub fn record_dispatch_duration(handler: &str, start: Instant) {
    metrics::histogram!("entity_router_dispatch_duration_seconds", "handler" => handler.to_string())
        .record(start.elapsed().as_secs_f64());
}
