//! Quote submission endpoints.

use crate::{
    api::{
        AppState,
        response::{ApiResponse, json_rejection, path_rejection},
    },
    core::{
        forms::{CustomProjectQuote, ExistingProductQuote},
        quote::{self, SubmittedQuote},
    },
    errors::Result,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::info;

/// What the visitor gets back after submitting
#[derive(Debug, Serialize)]
pub struct SubmissionReceipt {
    /// ID of the new quote request
    pub quote_id: i64,
    /// ID of the client it was filed under
    pub client_id: i64,
    /// Whether this submission created the client
    pub client_created: bool,
    /// Confirmation text to show
    pub message: String,
}

impl From<&SubmittedQuote> for SubmissionReceipt {
    fn from(submitted: &SubmittedQuote) -> Self {
        Self {
            quote_id: submitted.quote.id,
            client_id: submitted.client.client().id,
            client_created: submitted.client.was_created(),
            message: submitted.confirmation_message(),
        }
    }
}

fn receipt(result: Result<SubmittedQuote>) -> Response {
    match result {
        Ok(submitted) => {
            ApiResponse::success(SubmissionReceipt::from(&submitted)).with_status(StatusCode::CREATED)
        }
        Err(e) => e.into_response(),
    }
}

/// Quote request for a catalog product
pub async fn submit_existing(
    State(state): State<AppState>,
    product_slug: std::result::Result<Path<String>, PathRejection>,
    form: std::result::Result<Json<ExistingProductQuote>, JsonRejection>,
) -> Response {
    let Path(product_slug) = match product_slug {
        Ok(slug) => slug,
        Err(rejection) => return path_rejection(&rejection),
    };
    let Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => return json_rejection(&rejection),
    };
    info!("Quote submission for product '{}'", product_slug);

    receipt(quote::submit_existing_product_quote(&state.database, &product_slug, form).await)
}

/// Quote request for a custom project
pub async fn submit_custom(
    State(state): State<AppState>,
    form: std::result::Result<Json<CustomProjectQuote>, JsonRejection>,
) -> Response {
    let Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => return json_rejection(&rejection),
    };
    info!("Custom project quote submission");

    receipt(quote::submit_custom_project_quote(&state.database, form).await)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use crate::{
        api::handlers::test_support::send,
        entities::{Client, QuoteRequest},
        errors::Result,
        test_utils::*,
    };
    use axum::http::StatusCode;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{Value, json};

    fn measurements() -> Value {
        json!({
            "chest": 42.0, "waist": 36.0, "hips": 40.0,
            "shoulder": 18.0, "sleeve_length": 25.0, "full_length": 30.0,
            "additional_notes": "Slim fit"
        })
    }

    #[tokio::test]
    async fn test_submit_existing_product_quote() -> Result<()> {
        let (db, _category, _product) = setup_with_product().await?;
        let body = json!({
            "client": {"full_name": "John Kamau", "phone_number": "0712345678", "email": ""},
            "fabric_preference": "Wool blend",
            "measurements": measurements(),
        });

        let (status, json) =
            send(&db, "POST", "/quotes/existing/executive-business-suit", Some(body)).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["client_created"], true);
        assert_eq!(
            json["data"]["message"],
            "Your quote request for Executive Business Suit has been submitted successfully! \
             We will contact you at 0712345678 soon."
        );
        assert_eq!(QuoteRequest::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_validation_errors_are_422_with_fields() -> Result<()> {
        let db = setup_test_db().await?;
        let mut bad_measurements = measurements();
        bad_measurements["waist"] = json!("36.25");
        let body = json!({
            "client": {"full_name": "", "phone_number": "0723456789"},
            "custom_description": "Wedding dress",
            "fabric_preference": "Silk",
            "measurements": bad_measurements,
        });

        let (status, json) = send(&db, "POST", "/quotes/custom", Some(body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json["success"], false);
        assert!(json["data"]["fields"]["client.full_name"].is_array());
        assert!(json["data"]["fields"]["measurements.waist"].is_array());
        assert_eq!(Client::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_and_non_numeric_fields_are_reported_per_field() -> Result<()> {
        let db = setup_test_db().await?;
        let mut partial = measurements();
        partial.as_object_mut().unwrap().remove("chest");
        partial["hips"] = json!("abc");
        let body = json!({
            "client": {"phone_number": "0723456789"},
            "fabric_preference": "Silk",
            "measurements": partial,
        });

        let (status, json) = send(&db, "POST", "/quotes/custom", Some(body)).await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let fields = &json["data"]["fields"];
        assert_eq!(fields["measurements.chest"], json!(["This field is required."]));
        assert_eq!(fields["measurements.hips"], json!(["Enter a number."]));
        assert!(fields["custom_description"].is_array());
        assert!(fields["client.full_name"].is_array());
        assert!(fields["measurements.waist"].is_null());
        assert_eq!(Client::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_product_is_404_and_bad_json_is_rejected() -> Result<()> {
        let db = setup_test_db().await?;
        let body = json!({
            "client": {"full_name": "John", "phone_number": "0712345678"},
            "fabric_preference": "Wool",
            "measurements": measurements(),
        });

        let (status, _) = send(&db, "POST", "/quotes/existing/ghost-suit", Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, json) =
            send(&db, "POST", "/quotes/custom", Some(json!({"client": "nope"}))).await;
        assert!(status.is_client_error());
        assert_eq!(json["success"], false);

        Ok(())
    }
}
