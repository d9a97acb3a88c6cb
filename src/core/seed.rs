//! Sample data seeding from `config.toml`.
//!
//! Seeding can run on every start-up: categories and products are matched by name,
//! clients by phone number, and quotes are only created while the quote table is
//! still empty.

use crate::{
    config::shop::{Config, QuoteSeed},
    core::{
        catalog::{
            NewProduct, create_category, create_product, find_category_by_name,
            find_product_by_name,
        },
        client::{find_by_phone, find_or_create_by_phone},
        forms::{ClientDetails, MeasurementDetails, MeasurementValues, field_errors},
        quote::{NewQuote, QuoteKind, persist_quote},
        status::set_status,
    },
    entities::{QuoteRequest, QuoteStatus},
    errors::{Error, Result},
};
use chrono::{Duration, NaiveDate};
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use tracing::{debug, info};

/// What a seeding run created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// New categories
    pub categories: usize,
    /// New products
    pub products: usize,
    /// New clients
    pub clients: usize,
    /// New quote requests
    pub quotes: usize,
}

impl SeedReport {
    /// Whether this run created nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.categories == 0 && self.products == 0 && self.clients == 0 && self.quotes == 0
    }
}

/// Seeds the configured sample catalog, clients and quotes.
///
/// Product completion dates are computed relative to `today`.
///
/// # Errors
/// Returns `Error::Config` when a product names an unknown category or a quote
/// names an unknown client or product.
pub async fn seed_sample_data(
    db: &DatabaseConnection,
    config: &Config,
    today: NaiveDate,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    for seed in &config.categories {
        if find_category_by_name(db, &seed.name).await?.is_none() {
            create_category(db, &seed.name, &seed.description).await?;
            report.categories += 1;
        }
    }

    for seed in &config.products {
        if find_product_by_name(db, &seed.name).await?.is_some() {
            continue;
        }
        let category = find_category_by_name(db, &seed.category)
            .await?
            .ok_or_else(|| Error::Config {
                message: format!(
                    "Product '{}' refers to unknown category '{}'",
                    seed.name, seed.category
                ),
            })?;
        create_product(
            db,
            NewProduct {
                name: seed.name.clone(),
                category_id: category.id,
                description: seed.description.clone(),
                image: seed.image.clone(),
                additional_images: Vec::new(),
                date_completed: today - Duration::days(seed.completed_days_ago),
                is_featured: seed.is_featured,
            },
        )
        .await?;
        report.products += 1;
    }

    for seed in &config.clients {
        let email = seed.email.as_deref().filter(|email| !email.is_empty());
        if find_or_create_by_phone(db, &seed.phone_number, &seed.full_name, email)
            .await?
            .was_created()
        {
            report.clients += 1;
        }
    }

    if QuoteRequest::find().count(db).await? == 0 {
        for seed in &config.quotes {
            seed_quote(db, seed).await?;
            report.quotes += 1;
        }
    } else {
        debug!("Quote requests already present, skipping quote seeding");
    }

    info!(
        "Seeded {} categories, {} products, {} clients, {} quotes",
        report.categories, report.products, report.clients, report.quotes
    );
    Ok(report)
}

async fn seed_quote(db: &DatabaseConnection, seed: &QuoteSeed) -> Result<()> {
    let client = find_by_phone(db, &seed.client_phone)
        .await?
        .ok_or_else(|| Error::Config {
            message: format!("Quote refers to unknown client phone '{}'", seed.client_phone),
        })?;

    let kind = match (&seed.product, &seed.custom_description) {
        (Some(product_name), None) => {
            let product = find_product_by_name(db, product_name)
                .await?
                .ok_or_else(|| Error::Config {
                    message: format!("Quote refers to unknown product '{product_name}'"),
                })?;
            QuoteKind::Existing {
                product_id: product.id,
            }
        }
        (None, Some(description)) if !description.trim().is_empty() => QuoteKind::Custom {
            description: description.trim().to_string(),
            reference_image: None,
        },
        _ => {
            return Err(Error::Config {
                message: format!(
                    "Quote for '{}' needs exactly one of product or custom_description",
                    seed.client_phone
                ),
            });
        }
    };

    let seeded = &seed.measurements;
    let measurements = MeasurementDetails::from(MeasurementValues {
        chest: seeded.chest,
        waist: seeded.waist,
        hips: seeded.hips,
        shoulder: seeded.shoulder,
        sleeve_length: seeded.sleeve_length,
        full_length: seeded.full_length,
        additional_notes: seeded.additional_notes.trim().to_string(),
    })
    .to_values()
    .map_err(|errors| Error::Config {
        message: format!(
            "Quote for '{}' has invalid measurements: {:?}",
            seed.client_phone,
            field_errors(&errors)
        ),
    })?;

    let submitted = persist_quote(
        db,
        NewQuote {
            client: ClientDetails {
                full_name: client.full_name.clone(),
                phone_number: client.phone_number.clone(),
                email: client.email.clone(),
            },
            kind,
            fabric_preference: seed.fabric_preference.clone(),
            additional_notes: seed.additional_notes.clone(),
            measurements,
        },
    )
    .await?;

    if seed.status != QuoteStatus::Pending {
        set_status(db, submitted.quote.id, seed.status.as_str()).await?;
    }
    Ok(())
}
