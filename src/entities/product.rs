//! Product entity - A finished piece shown in the catalog.
//!
//! Products belong to exactly one category and can be flagged as featured for the
//! home page. Visitors can request a quote for a product by its slug.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier for the product
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the product (e.g., "Executive Business Suit")
    pub name: String,
    /// URL-safe identifier derived from the name
    #[sea_orm(unique)]
    pub slug: String,
    /// ID of the category this product belongs to
    pub category_id: i64,
    /// Long description
    #[sea_orm(column_type = "Text")]
    pub description: String,
    /// Reference to the main image in media storage
    pub image: Option<String>,
    /// Extra image references, one per line
    #[sea_orm(column_type = "Text", nullable)]
    pub additional_images: Option<String>,
    /// Date the piece was completed
    pub date_completed: Date,
    /// Whether the product is highlighted on the home page
    pub is_featured: bool,
    /// When the product was created
    pub created_at: DateTimeUtc,
}

impl Model {
    /// Splits `additional_images` into individual references, skipping blank lines.
    #[must_use]
    pub fn additional_image_list(&self) -> Vec<&str> {
        self.additional_images
            .as_deref()
            .map(|images| {
                images
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product belongs to one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id"
    )]
    Category,
    /// One product can be quoted many times
    #[sea_orm(has_many = "super::quote_request::Entity")]
    QuoteRequests,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::quote_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuoteRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
