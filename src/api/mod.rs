//! HTTP layer - JSON endpoints for the public site and the staff dashboard.
//!
//! Handlers are thin: they parse request parameters, call into `crate::core` and
//! wrap the outcome in an [`response::ApiResponse`].

/// Endpoint handlers grouped by area
pub mod handlers;
/// Response envelope and error mapping
pub mod response;

use crate::{config::shop::BusinessConfig, core::dashboard::TrendBucketing, errors::Result};
use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::DatabaseConnection;
use std::{net::SocketAddr, sync::Arc};
use tracing::info;

/// Shared state available to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Business identity used in generated messages
    pub business: Arc<BusinessConfig>,
    /// How dashboard trends are bucketed
    pub trend_bucketing: TrendBucketing,
}

impl AppState {
    /// Creates the shared state from its parts.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        business: BusinessConfig,
        trend_bucketing: TrendBucketing,
    ) -> Self {
        Self {
            database,
            business: Arc::new(business),
            trend_bucketing,
        }
    }
}

/// Builds the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        // Public catalog
        .route("/categories", get(handlers::catalog::list_categories))
        .route("/featured", get(handlers::catalog::featured_products))
        .route("/products", get(handlers::catalog::list_products))
        .route("/products/{slug}", get(handlers::catalog::product_detail))
        // Quote submission
        .route(
            "/quotes/existing/{product_slug}",
            post(handlers::quotes::submit_existing),
        )
        .route("/quotes/custom", post(handlers::quotes::submit_custom))
        // Staff dashboard
        .route("/dashboard", get(handlers::dashboard::summary))
        .route("/dashboard/analytics", get(handlers::dashboard::analytics))
        .route("/dashboard/clients", get(handlers::dashboard::list_clients))
        .route(
            "/dashboard/clients/{id}",
            get(handlers::dashboard::client_detail),
        )
        .route("/dashboard/products", get(handlers::dashboard::list_products))
        .route(
            "/dashboard/products/{id}/featured",
            post(handlers::dashboard::set_featured),
        )
        .route("/dashboard/quotes", get(handlers::dashboard::list_quotes))
        .route(
            "/dashboard/quotes/{id}",
            get(handlers::dashboard::quote_detail).delete(handlers::dashboard::delete_quote),
        )
        .route(
            "/dashboard/quotes/{id}/status",
            post(handlers::dashboard::update_status),
        )
        .with_state(state)
}

/// Binds `addr` and serves the application until the process stops.
pub async fn serve(addr: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}
