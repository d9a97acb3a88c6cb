//! Public catalog endpoints.

use crate::{
    api::{
        AppState,
        handlers::{non_empty, parse_page},
        response::{ApiResponse, path_rejection},
    },
    core::catalog,
};
use axum::{
    extract::{Path, Query, State, rejection::PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::debug;

/// Query parameters of the public product list
#[derive(Debug, Default, Deserialize)]
pub struct CatalogParams {
    /// Category slug
    pub category: Option<String>,
    /// Page number, 1-based
    pub page: Option<String>,
}

/// All categories
pub async fn list_categories(State(state): State<AppState>) -> Response {
    match catalog::list_categories(&state.database).await {
        Ok(categories) => ApiResponse::success(categories).with_status(StatusCode::OK),
        Err(e) => e.into_response(),
    }
}

/// Featured products for the home page
pub async fn featured_products(State(state): State<AppState>) -> Response {
    match catalog::featured_products(&state.database).await {
        Ok(products) => ApiResponse::success(products).with_status(StatusCode::OK),
        Err(e) => e.into_response(),
    }
}

/// Paged product list, optionally for one category
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Response {
    let category = non_empty(params.category.as_deref());
    debug!("Listing catalog products (category: {:?})", category);

    match catalog::catalog_products(&state.database, category, parse_page(params.page.as_deref()))
        .await
    {
        Ok(page) => ApiResponse::success(page).with_status(StatusCode::OK),
        Err(e) => e.into_response(),
    }
}

/// Product page with related products
pub async fn product_detail(
    State(state): State<AppState>,
    slug: Result<Path<String>, PathRejection>,
) -> Response {
    let Path(slug) = match slug {
        Ok(slug) => slug,
        Err(rejection) => return path_rejection(&rejection),
    };

    match catalog::product_detail(&state.database, &slug).await {
        Ok(detail) => ApiResponse::success(detail).with_status(StatusCode::OK),
        Err(e) => e.into_response(),
    }
}
