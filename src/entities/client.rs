//! Client entity - Represents a customer of the shop.
//!
//! Clients are identified by their phone number: a quote submission reuses the
//! existing client with the same number instead of creating a second row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Full name as first submitted
    pub full_name: String,
    /// Phone number, the natural identity of a client
    #[sea_orm(unique)]
    pub phone_number: String,
    /// Optional contact email
    pub email: Option<String>,
    /// When the client was created
    pub created_at: DateTimeUtc,
    /// When the client was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Client and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One client has many quote requests
    #[sea_orm(has_many = "super::quote_request::Entity")]
    QuoteRequests,
}

impl Related<super::quote_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
