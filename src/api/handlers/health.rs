//! Health check endpoint.

use crate::api::{AppState, response::ApiResponse};
use axum::{extract::State, http::StatusCode, response::Response};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use tracing::error;

/// Health report
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    /// "healthy" when the database answers
    pub status: &'static str,
    /// Database connectivity
    pub database: &'static str,
    /// Database engine in use
    pub engine: String,
    /// Crate version
    pub version: &'static str,
}

/// Pings the database and reports service details.
pub async fn health_check(State(state): State<AppState>) -> Response {
    let engine = format!("{:?}", state.database.get_database_backend()).to_lowercase();

    match state.database.ping().await {
        Ok(()) => ApiResponse::success(HealthStatus {
            status: "healthy",
            database: "connected",
            engine,
            version: env!("CARGO_PKG_VERSION"),
        })
        .with_status(StatusCode::OK),
        Err(e) => {
            error!("Health check failed: {}", e);
            ApiResponse::<()>::error("Database unavailable").with_status(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{api::handlers::test_support::send, errors::Result, test_utils::setup_test_db};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_reports_sqlite() -> Result<()> {
        let db = setup_test_db().await?;

        let (status, body) = send(&db, "GET", "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["database"], "connected");
        assert_eq!(body["data"]["engine"], "sqlite");
        Ok(())
    }
}
