//! Service health endpoint.
//!
//! Reports whether the notice board can actually serve requests, which
//! means the database must be reachable. The file store has no cheap
//! liveness probe, so only its configured provider is reported.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::AppState;

/// Readiness report for the notice board.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: `healthy` or `degraded`.
    pub status: &'static str,
    /// Database reachability: `up` or `down`.
    pub database: &'static str,
    /// Configured storage provider name.
    pub storage: &'static str,
    /// Service version.
    pub version: &'static str,
}

fn report(database_up: bool, storage: &'static str) -> (StatusCode, HealthResponse) {
    let (code, status, database) = if database_up {
        (StatusCode::OK, "healthy", "up")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "down")
    };

    (
        code,
        HealthResponse {
            status,
            database,
            storage,
            version: env!("CARGO_PKG_VERSION"),
        },
    )
}

/// Pings the database and reports readiness.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database_up = state.db.ping().await.is_ok();
    let storage = state.store.config().provider.name();
    let (code, body) = report(database_up, storage);
    (code, Json(body))
}

/// Creates the health route.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn healthy_when_database_is_up() {
        let (code, body) = report(true, "local");
        assert_eq!(code, StatusCode::OK);
        assert_eq!(body.status, "healthy");
        assert_eq!(body.database, "up");
        assert_eq!(body.storage, "local");
    }

    #[test]
    fn degraded_when_database_is_down() {
        let (code, body) = report(false, "s3");
        assert_eq!(code, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body.status, "degraded");
        assert_eq!(body.database, "down");
    }

    #[test]
    fn response_serializes_all_fields() {
        let (_, body) = report(true, "local");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["database"], "up");
        assert_eq!(json["storage"], "local");
        assert!(json["version"].as_str().is_some_and(|v| !v.is_empty()));
    }
}
