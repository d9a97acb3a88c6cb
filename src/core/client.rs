//! Client directory - Resolves visitors to client records by phone number.
//!
//! The phone number is the identity of a client. Submitting a quote with a known
//! number reuses the stored client as-is; the submitted name and email are only
//! used when a new client is created.

use crate::{
    entities::{Client, QuoteRequest, client, quote_request},
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Outcome of resolving a phone number to a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientResolution {
    /// A client with this phone number already existed and was left unchanged
    Existing(client::Model),
    /// No client matched, so a new one was created
    Created(client::Model),
}

impl ClientResolution {
    /// The resolved client record.
    #[must_use]
    pub const fn client(&self) -> &client::Model {
        match self {
            Self::Existing(client) | Self::Created(client) => client,
        }
    }

    /// Consumes the resolution and returns the client record.
    #[must_use]
    pub fn into_client(self) -> client::Model {
        match self {
            Self::Existing(client) | Self::Created(client) => client,
        }
    }

    /// Whether this call created the client.
    #[must_use]
    pub const fn was_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }
}

/// Finds a client by exact phone number.
pub async fn find_by_phone<C>(db: &C, phone_number: &str) -> Result<Option<client::Model>>
where
    C: ConnectionTrait,
{
    Client::find()
        .filter(client::Column::PhoneNumber.eq(phone_number))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a client by ID.
pub async fn get_client_by_id(
    db: &DatabaseConnection,
    client_id: i64,
) -> Result<Option<client::Model>> {
    Client::find_by_id(client_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// A client and their quote requests, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientDetail {
    /// The client record
    pub client: client::Model,
    /// Every quote request filed under the client
    pub quotes: Vec<quote_request::Model>,
}

/// Loads a client with their quote history.
pub async fn client_detail(db: &DatabaseConnection, client_id: i64) -> Result<ClientDetail> {
    let client = get_client_by_id(db, client_id)
        .await?
        .ok_or(Error::ClientNotFound { id: client_id })?;

    let quotes = QuoteRequest::find()
        .filter(quote_request::Column::ClientId.eq(client.id))
        .order_by_desc(quote_request::Column::CreatedAt)
        .order_by_desc(quote_request::Column::Id)
        .all(db)
        .await?;

    Ok(ClientDetail { client, quotes })
}

/// Looks a client up by phone number and creates one if none exists.
///
/// Runs on whatever connection it is given so the submission workflow can call it
/// inside its transaction. The stored name and email of an existing client are never
/// touched.
pub async fn resolve_client<C>(
    db: &C,
    phone_number: &str,
    full_name: &str,
    email: Option<&str>,
) -> Result<ClientResolution>
where
    C: ConnectionTrait,
{
    if let Some(existing) = find_by_phone(db, phone_number).await? {
        debug!(
            "Phone number {} matched existing client_id {}",
            phone_number, existing.id
        );
        return Ok(ClientResolution::Existing(existing));
    }

    let now = Utc::now();
    let created = client::ActiveModel {
        full_name: Set(full_name.to_string()),
        phone_number: Set(phone_number.to_string()),
        email: Set(email.map(str::to_string)),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!(
        "Created client_id {} for phone number {}",
        created.id, phone_number
    );
    Ok(ClientResolution::Created(created))
}

/// Resolves a phone number to a client outside of any submission.
///
/// If a concurrent caller creates the same phone number first, the unique constraint
/// rejects this insert and the winner's record is returned as `Existing`.
pub async fn find_or_create_by_phone(
    db: &DatabaseConnection,
    phone_number: &str,
    full_name: &str,
    email: Option<&str>,
) -> Result<ClientResolution> {
    match resolve_client(db, phone_number, full_name, email).await {
        Err(Error::Database(err))
            if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
        {
            warn!(
                "Lost client creation race for phone number {}, re-reading",
                phone_number
            );
            find_by_phone(db, phone_number)
                .await?
                .map(ClientResolution::Existing)
                .ok_or(Error::Database(err))
        }
        other => other,
    }
}
