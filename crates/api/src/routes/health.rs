use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Deploy probe payload. Every endpoint of the catalogue needs Postgres,
/// so database reachability alone decides the reported status.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `"ok"` or `"degraded"`.
    pub status: &'static str,
    /// Package name, to tell the listing API apart from its siblings
    /// behind the same load balancer.
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// Whether the database answered the probe query.
    pub db_healthy: bool,
}

/// GET /health -- liveness plus a database reachability check.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = kwabo_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health probe: database unreachable");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
    })
}

/// Probe routes. Mounted at the root, not under `/api`: load balancers
/// hit them unversioned and they carry no catalogue data.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
