//! Measurements entity - Body measurements attached to a single quote request.
//!
//! All six measurements are in inches with one fractional digit. A measurements
//! row is only ever created together with the quote request that owns it.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Measurements database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "measurements")]
pub struct Model {
    /// Unique identifier for the measurement record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Chest circumference
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub chest: Decimal,
    /// Waist circumference
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub waist: Decimal,
    /// Hip circumference
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub hips: Decimal,
    /// Shoulder width
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub shoulder: Decimal,
    /// Sleeve length
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub sleeve_length: Decimal,
    /// Full garment length
    #[sea_orm(column_type = "Decimal(Some((5, 1)))")]
    pub full_length: Decimal,
    /// Free-text notes about the measurements
    #[sea_orm(column_type = "Text")]
    pub additional_notes: String,
}

/// Defines relationships between Measurements and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each measurement record is owned by one quote request
    #[sea_orm(has_one = "super::quote_request::Entity")]
    QuoteRequest,
}

impl Related<super::quote_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteRequest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
