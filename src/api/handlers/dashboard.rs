//! Staff dashboard endpoints.

use crate::{
    api::{
        AppState,
        handlers::{non_empty, parse_page},
        response::{ApiResponse, json_rejection, path_rejection},
    },
    core::{
        catalog,
        client as clients,
        dashboard,
        listing::{self, ClientQuery, ProductQuery, QuoteQuery},
        message,
        quote::{self, QuoteDetail, QuoteKind},
        status,
    },
    entities::{QuoteStatus, QuoteType, client, measurements, product, quote_request},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Query parameters of the client list
#[derive(Debug, Default, Deserialize)]
pub struct ClientParams {
    /// Search text
    pub search: Option<String>,
    /// Page number
    pub page: Option<String>,
}

/// Query parameters of the product list
#[derive(Debug, Default, Deserialize)]
pub struct ProductParams {
    /// Search text
    pub search: Option<String>,
    /// Category ID
    pub category: Option<String>,
    /// "true"/"false" (or "1"/"0")
    pub featured: Option<String>,
    /// Page number
    pub page: Option<String>,
}

/// Query parameters of the quote list
#[derive(Debug, Default, Deserialize)]
pub struct QuoteParams {
    /// Search text
    pub search: Option<String>,
    /// Status name
    pub status: Option<String>,
    /// "existing" or "custom"
    pub quote_type: Option<String>,
    /// Page number
    pub page: Option<String>,
}

/// Body of a status update
#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    /// New status name
    pub status: String,
}

/// Body of a featured toggle
#[derive(Debug, Deserialize)]
pub struct FeaturedUpdate {
    /// Whether the product should be shown as featured
    pub is_featured: bool,
}

/// The staff quote page
#[derive(Debug, Serialize)]
pub struct QuoteView {
    /// The quote request
    pub quote: quote_request::Model,
    /// Typed view of what is being quoted
    pub kind: Option<QuoteKind>,
    /// Who asked
    pub client: client::Model,
    /// The quoted product, if any
    pub product: Option<product::Model>,
    /// The owned measurements
    pub measurements: measurements::Model,
    /// Text to send to the client
    pub follow_up_message: String,
    /// Statuses that normally come next
    pub next_statuses: &'static [QuoteStatus],
}

impl QuoteView {
    fn new(detail: QuoteDetail, business_name: &str) -> Self {
        let QuoteDetail {
            quote,
            client,
            product,
            measurements,
        } = detail;
        let follow_up_message = message::follow_up_message(
            &client.full_name,
            quote.quote_type,
            product.as_ref().map(|product| product.name.as_str()),
            business_name,
        );

        Self {
            kind: QuoteKind::from_model(&quote),
            next_statuses: status::next_statuses(quote.status),
            quote,
            client,
            product,
            measurements,
            follow_up_message,
        }
    }
}

fn respond<T: Serialize>(result: Result<T>) -> Response {
    match result {
        Ok(data) => ApiResponse::success(data).with_status(StatusCode::OK),
        Err(e) => e.into_response(),
    }
}

fn parse_flag(name: &'static str, value: Option<&str>) -> Result<Option<bool>> {
    match non_empty(value) {
        None => Ok(None),
        Some("true" | "1") => Ok(Some(true)),
        Some("false" | "0") => Ok(Some(false)),
        Some(other) => Err(Error::InvalidFilter {
            name,
            value: other.to_string(),
        }),
    }
}

fn parse_id(name: &'static str, value: Option<&str>) -> Result<Option<i64>> {
    non_empty(value)
        .map(|id| {
            id.parse().map_err(|_| Error::InvalidFilter {
                name,
                value: id.to_string(),
            })
        })
        .transpose()
}

/// Counts, recent activity, status distribution and a 6-bucket trend
pub async fn summary(State(state): State<AppState>) -> Response {
    let today = Utc::now().date_naive();
    respond(dashboard::dashboard_summary(&state.database, today, state.trend_bucketing).await)
}

/// Status distribution and a 12-bucket trend for charts
pub async fn analytics(State(state): State<AppState>) -> Response {
    let today = Utc::now().date_naive();
    respond(dashboard::analytics(&state.database, today, state.trend_bucketing).await)
}

/// Client list
pub async fn list_clients(
    State(state): State<AppState>,
    Query(params): Query<ClientParams>,
) -> Response {
    let query = ClientQuery {
        search: non_empty(params.search.as_deref()).map(str::to_string),
        page: parse_page(params.page.as_deref()),
    };
    respond(listing::list_clients(&state.database, &query).await)
}

/// One client and their quote history
pub async fn client_detail(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejection(&rejection),
    };

    respond(clients::client_detail(&state.database, id).await)
}

/// Product list
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductParams>,
) -> Response {
    let (category_id, featured) = match (
        parse_id("category", params.category.as_deref()),
        parse_flag("featured", params.featured.as_deref()),
    ) {
        (Ok(category_id), Ok(featured)) => (category_id, featured),
        (Err(e), _) | (_, Err(e)) => return e.into_response(),
    };

    let query = ProductQuery {
        search: non_empty(params.search.as_deref()).map(str::to_string),
        category_id,
        featured,
        page: parse_page(params.page.as_deref()),
    };
    respond(listing::list_products(&state.database, &query).await)
}

/// Flags or unflags a product as featured
pub async fn set_featured(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<FeaturedUpdate>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejection(&rejection),
    };
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(&rejection),
    };

    respond(catalog::set_featured(&state.database, id, update.is_featured).await)
}

/// Quote list
pub async fn list_quotes(
    State(state): State<AppState>,
    Query(params): Query<QuoteParams>,
) -> Response {
    let status = match non_empty(params.status.as_deref()).map(str::parse::<QuoteStatus>) {
        Some(Err(e)) => return e.into_response(),
        parsed => parsed.and_then(std::result::Result::ok),
    };
    let quote_type = match non_empty(params.quote_type.as_deref()).map(str::parse::<QuoteType>) {
        Some(Err(e)) => return e.into_response(),
        parsed => parsed.and_then(std::result::Result::ok),
    };

    let query = QuoteQuery {
        search: non_empty(params.search.as_deref()).map(str::to_string),
        status,
        quote_type,
        page: parse_page(params.page.as_deref()),
    };
    respond(listing::list_quotes(&state.database, &query).await)
}

/// Quote detail with follow-up message
pub async fn quote_detail(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejection(&rejection),
    };

    respond(
        quote::get_quote_detail(&state.database, id)
            .await
            .map(|detail| QuoteView::new(detail, &state.business.name)),
    )
}

/// Overwrites a quote's status
pub async fn update_status(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
    body: std::result::Result<Json<StatusUpdate>, JsonRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejection(&rejection),
    };
    let Json(update) = match body {
        Ok(body) => body,
        Err(rejection) => return json_rejection(&rejection),
    };
    info!("Status update for quote {} to '{}'", id, update.status);

    respond(status::set_status(&state.database, id, &update.status).await)
}

/// Deletes a quote and its measurements
pub async fn delete_quote(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Response {
    let Path(id) = match id {
        Ok(id) => id,
        Err(rejection) => return path_rejection(&rejection),
    };

    respond(quote::delete_quote(&state.database, id).await.map(|()| id))
}
