//! Quote request entity - A visitor's request for a price estimate.
//!
//! A quote request is either for an existing catalog product (`product_id` set)
//! or for a custom project (`custom_description` non-empty), never both. The row
//! shape is flat; `crate::core::quote::QuoteKind` is the typed view of it.
//! Each request owns exactly one measurements row.

use crate::errors::Error;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Quote request database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quote_requests")]
pub struct Model {
    /// Unique identifier for the quote request
    #[sea_orm(primary_key)]
    pub id: i64,
    /// ID of the client who submitted the request
    pub client_id: i64,
    /// Whether this is for an existing product or a custom project
    pub quote_type: QuoteType,
    /// Where the request is in the review lifecycle
    pub status: QuoteStatus,
    /// Product being quoted, only for `existing` requests
    pub product_id: Option<i64>,
    /// Project description, only non-empty for `custom` requests
    #[sea_orm(column_type = "Text")]
    pub custom_description: String,
    /// Optional reference image in media storage, `custom` requests only
    pub reference_image: Option<String>,
    /// Preferred fabric (e.g., "Wool blend")
    pub fabric_preference: String,
    /// ID of the owned measurements row
    #[sea_orm(unique)]
    pub measurements_id: i64,
    /// Free-text notes from the client
    #[sea_orm(column_type = "Text")]
    pub additional_notes: String,
    /// When the request was submitted
    pub created_at: DateTimeUtc,
    /// When the request was last modified
    pub updated_at: DateTimeUtc,
}

/// The two kinds of quote request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum QuoteType {
    /// Quote for a product already in the catalog
    #[sea_orm(string_value = "existing")]
    Existing,
    /// Quote for a project described by the client
    #[sea_orm(string_value = "custom")]
    Custom,
}

impl QuoteType {
    /// Wire/storage name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for QuoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "existing" => Ok(Self::Existing),
            "custom" => Ok(Self::Custom),
            other => Err(Error::InvalidQuoteType {
                value: other.to_string(),
            }),
        }
    }
}

/// Review status of a quote request.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    /// Newly submitted, not looked at yet
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Staff have reviewed the request
    #[sea_orm(string_value = "reviewed")]
    Reviewed,
    /// A price has been sent to the client
    #[sea_orm(string_value = "quoted")]
    Quoted,
    /// The client accepted the quote
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// The request was declined
    #[sea_orm(string_value = "declined")]
    Declined,
}

impl QuoteStatus {
    /// Every status in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Reviewed,
        Self::Quoted,
        Self::Accepted,
        Self::Declined,
    ];

    /// Wire/storage name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Reviewed => "reviewed",
            Self::Quoted => "quoted",
            Self::Accepted => "accepted",
            Self::Declined => "declined",
        }
    }

    /// Human-readable label ("Pending", "Reviewed", ...).
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Reviewed => "Reviewed",
            Self::Quoted => "Quoted",
            Self::Accepted => "Accepted",
            Self::Declined => "Declined",
        }
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == value)
            .ok_or_else(|| Error::InvalidStatus {
                value: value.to_string(),
            })
    }
}

/// Defines relationships between `QuoteRequest` and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each quote request belongs to one client
    #[sea_orm(
        belongs_to = "super::client::Entity",
        from = "Column::ClientId",
        to = "super::client::Column::Id"
    )]
    Client,
    /// Existing-product requests point at one product
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    /// Each quote request owns one measurements row
    #[sea_orm(
        belongs_to = "super::measurements::Entity",
        from = "Column::MeasurementsId",
        to = "super::measurements::Column::Id",
        on_delete = "Cascade"
    )]
    Measurements,
}

impl Related<super::client::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Client.def()
    }
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::measurements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Measurements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
