//! Quote status lifecycle.
//!
//! The normal flow is `pending → reviewed → quoted → accepted`, with `declined`
//! reachable from every non-terminal status. Staff may still write any known status
//! directly; the graph here only tells callers which steps are the usual next ones.

use crate::{
    entities::{QuoteRequest, QuoteStatus, quote_request},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use tracing::{debug, info};

/// Statuses that normally follow `status`.
#[must_use]
pub const fn next_statuses(status: QuoteStatus) -> &'static [QuoteStatus] {
    match status {
        QuoteStatus::Pending => &[QuoteStatus::Reviewed, QuoteStatus::Declined],
        QuoteStatus::Reviewed => &[QuoteStatus::Quoted, QuoteStatus::Declined],
        QuoteStatus::Quoted => &[QuoteStatus::Accepted, QuoteStatus::Declined],
        QuoteStatus::Accepted | QuoteStatus::Declined => &[],
    }
}

/// Whether `to` is one of the normal next steps from `from`.
#[must_use]
pub fn is_forward_transition(from: QuoteStatus, to: QuoteStatus) -> bool {
    next_statuses(from).contains(&to)
}

/// Whether no further step follows `status` in the normal flow.
#[must_use]
pub const fn is_terminal(status: QuoteStatus) -> bool {
    next_statuses(status).is_empty()
}

/// Overwrites the status of a quote request and refreshes `updated_at`.
///
/// The quote must exist and `new_status` must be a known status name; otherwise
/// the stored status is left untouched.
pub async fn set_status(
    db: &DatabaseConnection,
    quote_id: i64,
    new_status: &str,
) -> Result<quote_request::Model> {
    let quote = QuoteRequest::find_by_id(quote_id)
        .one(db)
        .await?
        .ok_or(Error::QuoteNotFound { id: quote_id })?;

    let status: QuoteStatus = new_status.parse()?;
    if !is_forward_transition(quote.status, status) {
        debug!(
            "Quote {} moved off the normal flow: {} -> {}",
            quote_id, quote.status, status
        );
    }

    let previous = quote.status;
    let mut active: quote_request::ActiveModel = quote.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now());
    let updated = active.update(db).await?;

    info!("Quote {} status {} -> {}", quote_id, previous, status);
    Ok(updated)
}
