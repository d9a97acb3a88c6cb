//! Quote submission workflow - Turns a visitor's form into stored records.
//!
//! A submission resolves the client by phone number, creates the measurements row
//! and then the quote request that owns it. All three writes share one database
//! transaction: if any of them fails, the transaction is dropped uncommitted and
//! the caller gets [`Error::SubmissionFailed`] with nothing persisted.

use crate::{
    core::{
        catalog::get_product_by_slug,
        client::{ClientResolution, resolve_client},
        forms::{ClientDetails, CustomProjectQuote, ExistingProductQuote, MeasurementValues},
        message,
    },
    entities::{
        Client, Measurements, Product, QuoteRequest, QuoteStatus, QuoteType, client,
        measurements, product, quote_request,
    },
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, prelude::*};
use serde::Serialize;
use tracing::{error, info, instrument};
use validator::Validate;

/// What a quote request is for.
///
/// Stored rows are flat (`quote_type`, `product_id`, `custom_description`,
/// `reference_image`); this is the only place that maps between the two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum QuoteKind {
    /// A product from the catalog
    Existing {
        /// The quoted product
        product_id: i64,
    },
    /// A project the client described
    Custom {
        /// The project description, never empty
        description: String,
        /// Optional inspiration image
        reference_image: Option<String>,
    },
}

impl QuoteKind {
    /// Stored quote type for this kind.
    #[must_use]
    pub const fn quote_type(&self) -> QuoteType {
        match self {
            Self::Existing { .. } => QuoteType::Existing,
            Self::Custom { .. } => QuoteType::Custom,
        }
    }

    /// Reads the kind back from a stored row.
    ///
    /// Returns `None` for rows whose columns disagree with their `quote_type`.
    #[must_use]
    pub fn from_model(quote: &quote_request::Model) -> Option<Self> {
        match quote.quote_type {
            QuoteType::Existing if quote.custom_description.is_empty() => {
                quote.product_id.map(|product_id| Self::Existing { product_id })
            }
            QuoteType::Custom if quote.product_id.is_none() => {
                if quote.custom_description.is_empty() {
                    return None;
                }
                Some(Self::Custom {
                    description: quote.custom_description.clone(),
                    reference_image: quote.reference_image.clone(),
                })
            }
            _ => None,
        }
    }

    fn apply(self, active: &mut quote_request::ActiveModel) {
        active.quote_type = Set(self.quote_type());
        match self {
            Self::Existing { product_id } => {
                active.product_id = Set(Some(product_id));
                active.custom_description = Set(String::new());
                active.reference_image = Set(None);
            }
            Self::Custom {
                description,
                reference_image,
            } => {
                active.product_id = Set(None);
                active.custom_description = Set(description);
                active.reference_image = Set(reference_image);
            }
        }
    }
}

/// A validated submission ready to be stored.
#[derive(Debug, Clone)]
pub struct NewQuote {
    /// Who is asking
    pub client: ClientDetails,
    /// Product or custom project
    pub kind: QuoteKind,
    /// Preferred fabric
    pub fabric_preference: String,
    /// Client notes
    pub additional_notes: String,
    /// Body measurements
    pub measurements: MeasurementValues,
}

/// The records produced by a successful submission.
#[derive(Debug, Clone)]
pub struct SubmittedQuote {
    /// The new quote request, status `pending`
    pub quote: quote_request::Model,
    /// The client it was filed under, and whether that client is new
    pub client: ClientResolution,
    /// The measurements owned by the quote
    pub measurements: measurements::Model,
    /// The quoted product for existing-product requests
    pub product: Option<product::Model>,
}

impl SubmittedQuote {
    /// Text shown to the visitor after submitting.
    #[must_use]
    pub fn confirmation_message(&self) -> String {
        message::confirmation_message(
            self.product.as_ref().map(|product| product.name.as_str()),
            &self.client.client().phone_number,
        )
    }
}

/// A quote request with its client and product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDetails {
    /// The quote request
    pub quote: quote_request::Model,
    /// Who asked
    pub client: client::Model,
    /// The quoted product, if any
    pub product: Option<product::Model>,
}

/// Everything the staff quote page shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuoteDetail {
    /// The quote request
    pub quote: quote_request::Model,
    /// Who asked
    pub client: client::Model,
    /// The quoted product, if any
    pub product: Option<product::Model>,
    /// The owned measurements
    pub measurements: measurements::Model,
}

/// Submits a quote for a catalog product identified by slug.
///
/// The product is looked up first, so an unknown slug is reported as not found
/// even when the form is also invalid.
#[instrument(skip(db, form))]
pub async fn submit_existing_product_quote(
    db: &DatabaseConnection,
    product_slug: &str,
    mut form: ExistingProductQuote,
) -> Result<SubmittedQuote> {
    let product = get_product_by_slug(db, product_slug).await?;

    form.normalize();
    form.validate()?;
    let measurements = form.measurements.to_values()?;

    let mut submitted = persist_quote(
        db,
        NewQuote {
            client: form.client,
            kind: QuoteKind::Existing {
                product_id: product.id,
            },
            fabric_preference: form.fabric_preference,
            additional_notes: form.additional_notes,
            measurements,
        },
    )
    .await?;

    info!(
        "Quote {} submitted for product '{}'",
        submitted.quote.id, product.slug
    );
    submitted.product = Some(product);
    Ok(submitted)
}

/// Submits a quote for a custom project.
#[instrument(skip_all)]
pub async fn submit_custom_project_quote(
    db: &DatabaseConnection,
    mut form: CustomProjectQuote,
) -> Result<SubmittedQuote> {
    form.normalize();
    form.validate()?;
    let measurements = form.measurements.to_values()?;

    let submitted = persist_quote(
        db,
        NewQuote {
            client: form.client,
            kind: QuoteKind::Custom {
                description: form.custom_description,
                reference_image: form.reference_image,
            },
            fabric_preference: form.fabric_preference,
            additional_notes: form.additional_notes,
            measurements,
        },
    )
    .await?;

    info!("Custom project quote {} submitted", submitted.quote.id);
    Ok(submitted)
}

/// Stores a submission atomically; any database failure becomes `SubmissionFailed`.
pub(crate) async fn persist_quote(db: &DatabaseConnection, new_quote: NewQuote) -> Result<SubmittedQuote> {
    write_quote(db, new_quote).await.map_err(|err| match err {
        Error::Database(source) => {
            error!("Quote submission rolled back: {}", source);
            Error::SubmissionFailed { source }
        }
        other => other,
    })
}

async fn write_quote(db: &DatabaseConnection, new_quote: NewQuote) -> Result<SubmittedQuote> {
    let NewQuote {
        client,
        kind,
        fabric_preference,
        additional_notes,
        measurements: details,
    } = new_quote;

    // Dropping the transaction without commit rolls everything back
    let txn = db.begin().await?;

    let client = resolve_client(
        &txn,
        &client.phone_number,
        &client.full_name,
        client.email.as_deref(),
    )
    .await?;

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
    .insert(&txn)
    .await?;

    let now = Utc::now();
    let mut active = quote_request::ActiveModel {
        client_id: Set(client.client().id),
        status: Set(QuoteStatus::Pending),
        fabric_preference: Set(fabric_preference),
        measurements_id: Set(measurements.id),
        additional_notes: Set(additional_notes),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    kind.apply(&mut active);
    let quote = active.insert(&txn).await?;

    txn.commit().await?;

    Ok(SubmittedQuote {
        quote,
        client,
        measurements,
        product: None,
    })
}

/// Loads a quote request with client, product and measurements.
pub async fn get_quote_detail(db: &DatabaseConnection, quote_id: i64) -> Result<QuoteDetail> {
    let quote = QuoteRequest::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or(Error::QuoteNotFound { id: quote_id })?;

    let client = Client::find_by_id(quote.client_id)
        .one(db)
        .await?
        .ok_or(Error::ClientNotFound {
            id: quote.client_id,
        })?;
    let product = match quote.product_id {
        Some(product_id) => Product::find_by_id(product_id).one(db).await?,
        None => None,
    };
    let measurements = quote
        .find_related(Measurements)
        .one(db)
        .await?
        .ok_or_else(|| {
            DbErr::RecordNotFound(format!(
                "measurements {} of quote {}",
                quote.measurements_id, quote.id
            ))
        })?;

    Ok(QuoteDetail {
        quote,
        client,
        product,
        measurements,
    })
}

/// Deletes a quote request together with the measurements it owns.
pub async fn delete_quote(db: &DatabaseConnection, quote_id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let quote = QuoteRequest::find_by_id(quote_id)
        .one(&txn)
        .await?
        .ok_or(Error::QuoteNotFound { id: quote_id })?;

    QuoteRequest::delete_by_id(quote.id).exec(&txn).await?;
    Measurements::delete_by_id(quote.measurements_id)
        .exec(&txn)
        .await?;

    txn.commit().await?;

    info!(
        "Deleted quote {} and measurements {}",
        quote.id, quote.measurements_id
    );
    Ok(())
}
