//! Liveness and readiness probe endpoints.
//!
//! An external prober (Kubernetes or a load balancer) polls these routes.
//! A failed liveness probe restarts the process; a failed readiness probe
//! removes it from rotation without restarting it.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use crate::health::signal::HealthSignal;

/// Build the probe router backed by the given health signal.
pub fn router(health: HealthSignal) -> Router {
    Router::new()
        .route("/health/live", get(live))
        .route("/health/ready", get(ready))
        .with_state(health)
}

async fn live(State(health): State<HealthSignal>) -> impl IntoResponse {
    probe_response(health.is_live())
}

async fn ready(State(health): State<HealthSignal>) -> impl IntoResponse {
    probe_response(health.is_ready())
}

fn probe_response(up: bool) -> (StatusCode, &'static str) {
    if up {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}
