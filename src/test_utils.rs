//! Shared test utilities for the quote service.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    core::{
        catalog::{self, NewProduct},
        forms::{ClientDetails, MeasurementDetails, MeasurementValues},
    },
    entities::{QuoteStatus, QuoteType, category, client, measurements, product, quote_request},
    errors::Result,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Routes `tracing` output through the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// Creates a test category with an empty description.
pub async fn create_test_category(db: &DatabaseConnection, name: &str) -> Result<category::Model> {
    catalog::create_category(db, name, "").await
}

/// Creates a featured test product completed today.
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
) -> Result<product::Model> {
    create_custom_product(db, name, category_id, true, "A test product").await
}

/// Creates a test product with custom parameters.
/// Use this when a test filters on the featured flag or description.
pub async fn create_custom_product(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
    is_featured: bool,
    description: &str,
) -> Result<product::Model> {
    catalog::create_product(
        db,
        NewProduct {
            name: name.to_string(),
            category_id,
            description: description.to_string(),
            image: None,
            additional_images: Vec::new(),
            date_completed: Utc::now().date_naive(),
            is_featured,
        },
    )
    .await
}

/// Sets up a database with the "Men's Wear" category and the featured
/// "Executive Business Suit" product (slug `executive-business-suit`).
pub async fn setup_with_product() -> Result<(DatabaseConnection, category::Model, product::Model)> {
    let db = setup_test_db().await?;
    let category = create_test_category(&db, "Men's Wear").await?;
    let product = create_test_product(&db, "Executive Business Suit", category.id).await?;
    Ok((db, category, product))
}

/// Client details without an email.
pub fn sample_client_details(full_name: &str, phone_number: &str) -> ClientDetails {
    ClientDetails {
        full_name: full_name.to_string(),
        phone_number: phone_number.to_string(),
        email: None,
    }
}

/// A valid set of measurements.
///
/// # Defaults
/// * chest 42.0, waist 36.0, hips 40.0
/// * shoulder 18.0, sleeve length 25.0, full length 30.0
pub fn sample_measurement_values() -> MeasurementValues {
    MeasurementValues {
        chest: Decimal::new(420, 1),
        waist: Decimal::new(360, 1),
        hips: Decimal::new(400, 1),
        shoulder: Decimal::new(180, 1),
        sleeve_length: Decimal::new(250, 1),
        full_length: Decimal::new(300, 1),
        additional_notes: String::new(),
    }
}

/// The sample measurements as a submitted form section.
pub fn sample_measurements() -> MeasurementDetails {
    sample_measurement_values().into()
}

/// Inserts a client with an explicit creation time.
pub async fn insert_client_at(
    db: &DatabaseConnection,
    full_name: &str,
    phone_number: &str,
    email: Option<&str>,
    created_at: DateTime<Utc>,
) -> Result<client::Model> {
    client::ActiveModel {
        full_name: Set(full_name.to_string()),
        phone_number: Set(phone_number.to_string()),
        email: Set(email.map(str::to_string)),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Inserts a quote request (and its measurements) with an explicit creation time.
///
/// A quote with a product is an `existing` request; without one it is a `custom`
/// request described as "Custom project".
pub async fn insert_quote_at(
    db: &DatabaseConnection,
    client_id: i64,
    product_id: Option<i64>,
    status: QuoteStatus,
    created_at: DateTime<Utc>,
) -> Result<quote_request::Model> {
    let details = sample_measurement_values();
    let measurements = measurements::ActiveModel {
        chest: Set(details.chest),
        waist: Set(details.waist),
        hips: Set(details.hips),
        shoulder: Set(details.shoulder),
        sleeve_length: Set(details.sleeve_length),
        full_length: Set(details.full_length),
        additional_notes: Set(details.additional_notes),
        ..Default::default()
    }
    .insert(db)
    .await?;

    let (quote_type, custom_description) = match product_id {
        Some(_) => (QuoteType::Existing, String::new()),
        None => (QuoteType::Custom, "Custom project".to_string()),
    };

    quote_request::ActiveModel {
        client_id: Set(client_id),
        quote_type: Set(quote_type),
        status: Set(status),
        product_id: Set(product_id),
        custom_description: Set(custom_description),
        reference_image: Set(None),
        fabric_preference: Set("Cotton".to_string()),
        measurements_id: Set(measurements.id),
        additional_notes: Set(String::new()),
        created_at: Set(created_at),
        updated_at: Set(created_at),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}
