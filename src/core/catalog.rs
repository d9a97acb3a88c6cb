//! Catalog business logic - Categories, products and the public catalog views.
//!
//! Slugs are derived from names with the `slug` crate and are unique, so a product
//! or category name can only be used once.

use crate::{
    core::listing::{Page, ProductQuery, ProductWithCategory, list_products},
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use chrono::{NaiveDate, Utc};
use sea_orm::{QueryOrder, QuerySelect, Set, prelude::*};
use serde::Serialize;
use slug::slugify;
use tracing::info;

/// How many featured products the home page shows.
pub const FEATURED_LIMIT: u64 = 6;
/// How many related products a product page shows.
pub const RELATED_LIMIT: u64 = 4;

/// Creates a category with a slug derived from its name.
pub async fn create_category<C>(db: &C, name: &str, description: &str) -> Result<category::Model>
where
    C: ConnectionTrait,
{
    let category = category::ActiveModel {
        name: Set(name.to_string()),
        slug: Set(slugify(name)),
        description: Set(description.to_string()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created category '{}' ({})", category.name, category.slug);
    Ok(category)
}

/// Finds a category by its exact name.
pub async fn find_category_by_name<C>(db: &C, name: &str) -> Result<Option<category::Model>>
where
    C: ConnectionTrait,
{
    Category::find()
        .filter(category::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a category by slug.
pub async fn get_category_by_slug(db: &DatabaseConnection, slug: &str) -> Result<category::Model> {
    Category::find()
        .filter(category::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| Error::CategoryNotFound {
            key: slug.to_string(),
        })
}

/// Lists every category alphabetically.
pub async fn list_categories(db: &DatabaseConnection) -> Result<Vec<category::Model>> {
    Category::find()
        .order_by_asc(category::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Everything needed to create a product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product name; the slug is derived from it
    pub name: String,
    /// Owning category
    pub category_id: i64,
    /// Long description
    pub description: String,
    /// Main image reference
    pub image: Option<String>,
    /// Extra image references
    pub additional_images: Vec<String>,
    /// Date the piece was completed
    pub date_completed: NaiveDate,
    /// Whether to feature the product
    pub is_featured: bool,
}

/// Creates a product in an existing category.
pub async fn create_product<C>(db: &C, new_product: NewProduct) -> Result<product::Model>
where
    C: ConnectionTrait,
{
    if Category::find_by_id(new_product.category_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(Error::CategoryNotFound {
            key: new_product.category_id.to_string(),
        });
    }

    let additional_images = if new_product.additional_images.is_empty() {
        None
    } else {
        Some(new_product.additional_images.join("\n"))
    };

    let product = product::ActiveModel {
        slug: Set(slugify(&new_product.name)),
        name: Set(new_product.name),
        category_id: Set(new_product.category_id),
        description: Set(new_product.description),
        image: Set(new_product.image),
        additional_images: Set(additional_images),
        date_completed: Set(new_product.date_completed),
        is_featured: Set(new_product.is_featured),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await?;

    info!("Created product '{}' ({})", product.name, product.slug);
    Ok(product)
}

/// Finds a product by its exact name.
pub async fn find_product_by_name<C>(db: &C, name: &str) -> Result<Option<product::Model>>
where
    C: ConnectionTrait,
{
    Product::find()
        .filter(product::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Retrieves a product by slug.
pub async fn get_product_by_slug(db: &DatabaseConnection, slug: &str) -> Result<product::Model> {
    Product::find()
        .filter(product::Column::Slug.eq(slug))
        .one(db)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            slug: slug.to_string(),
        })
}

/// Retrieves a product by ID.
pub async fn get_product_by_id(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Option<product::Model>> {
    Product::find_by_id(product_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Flags or unflags a product as featured.
pub async fn set_featured(
    db: &DatabaseConnection,
    product_id: i64,
    is_featured: bool,
) -> Result<product::Model> {
    let product = get_product_by_id(db, product_id)
        .await?
        .ok_or_else(|| Error::ProductNotFound {
            slug: product_id.to_string(),
        })?;

    let mut active: product::ActiveModel = product.into();
    active.is_featured = Set(is_featured);
    let updated = active.update(db).await?;

    info!(
        "Product '{}' featured flag set to {}",
        updated.slug, updated.is_featured
    );
    Ok(updated)
}

/// Newest featured products for the home page.
pub async fn featured_products(db: &DatabaseConnection) -> Result<Vec<ProductWithCategory>> {
    let rows = Product::find()
        .filter(product::Column::IsFeatured.eq(true))
        .order_by_desc(product::Column::CreatedAt)
        .limit(FEATURED_LIMIT)
        .find_also_related(Category)
        .all(db)
        .await?;

    Ok(rows.into_iter().map(ProductWithCategory::from).collect())
}

/// Other products from the same category, newest first.
pub async fn related_products(
    db: &DatabaseConnection,
    product: &product::Model,
) -> Result<Vec<product::Model>> {
    Product::find()
        .filter(product::Column::CategoryId.eq(product.category_id))
        .filter(product::Column::Id.ne(product.id))
        .order_by_desc(product::Column::CreatedAt)
        .limit(RELATED_LIMIT)
        .all(db)
        .await
        .map_err(Into::into)
}

/// A product page: the product, its category and a few related products.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    /// The product
    pub product: product::Model,
    /// Its category
    pub category: Option<category::Model>,
    /// Up to four other products from the same category
    pub related: Vec<product::Model>,
}

/// Loads the product page for a slug.
pub async fn product_detail(db: &DatabaseConnection, slug: &str) -> Result<ProductDetail> {
    let product = get_product_by_slug(db, slug).await?;
    let category = product.find_related(Category).one(db).await?;
    let related = related_products(db, &product).await?;

    Ok(ProductDetail {
        product,
        category,
        related,
    })
}

/// Public product list, optionally narrowed to one category by slug.
pub async fn catalog_products(
    db: &DatabaseConnection,
    category_slug: Option<&str>,
    page: Option<u64>,
) -> Result<Page<ProductWithCategory>> {
    let category_id = match category_slug.filter(|slug| !slug.is_empty()) {
        Some(slug) => Some(get_category_by_slug(db, slug).await?.id),
        None => None,
    };

    list_products(
        db,
        &ProductQuery {
            category_id,
            page,
            ..Default::default()
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_create_category_derives_slug() -> Result<()> {
        let db = setup_test_db().await?;

        let category = create_category(&db, "Men's Wear", "Custom suits").await?;

        assert_eq!(category.slug, "men-s-wear");
        let found = get_category_by_slug(&db, "men-s-wear").await?;
        assert_eq!(found.id, category.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_category_slug_is_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = get_category_by_slug(&db, "capes").await;
        assert!(matches!(result, Err(Error::CategoryNotFound { ref key }) if key == "capes"));

        let listing = catalog_products(&db, Some("capes"), None).await;
        assert!(listing.unwrap_err().is_not_found());

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_requires_category() -> Result<()> {
        let db = setup_test_db().await?;

        let result = create_product(
            &db,
            NewProduct {
                name: "Orphan".to_string(),
                category_id: 42,
                description: String::new(),
                image: None,
                additional_images: vec![],
                date_completed: Utc::now().date_naive(),
                is_featured: false,
            },
        )
        .await;

        assert!(matches!(result, Err(Error::CategoryNotFound { .. })));
        Ok(())
    }

    #[tokio::test]
    async fn test_product_slug_and_images() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Wedding Attire").await?;

        let product = create_product(
            &db,
            NewProduct {
                name: "Elegant Bridal Gown".to_string(),
                category_id: category.id,
                description: "Lace gown".to_string(),
                image: Some("products/gown.jpg".to_string()),
                additional_images: vec!["a.jpg".to_string(), "b.jpg".to_string()],
                date_completed: Utc::now().date_naive(),
                is_featured: true,
            },
        )
        .await?;

        assert_eq!(product.slug, "elegant-bridal-gown");
        assert_eq!(product.additional_image_list(), vec!["a.jpg", "b.jpg"]);
        assert_eq!(get_product_by_slug(&db, "elegant-bridal-gown").await?.id, product.id);
        assert!(matches!(
            get_product_by_slug(&db, "missing").await,
            Err(Error::ProductNotFound { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn test_featured_products_are_limited_to_six() -> Result<()> {
        let db = setup_test_db().await?;
        let category = create_test_category(&db, "Men's Wear").await?;
        for i in 0..8 {
            create_custom_product(&db, &format!("Suit {i}"), category.id, i % 4 != 3, "").await?;
        }

        let featured = featured_products(&db).await?;

        assert_eq!(featured.len(), 6);
        assert!(featured.iter().all(|row| row.product.is_featured));
        assert!(featured.iter().all(|row| row.category.is_some()));

        Ok(())
    }

    #[tokio::test]
    async fn test_product_detail_lists_related_from_same_category() -> Result<()> {
        let db = setup_test_db().await?;
        let mens = create_test_category(&db, "Men's Wear").await?;
        let kids = create_test_category(&db, "Children's Wear").await?;
        let main = create_custom_product(&db, "Main Suit", mens.id, false, "").await?;
        for i in 0..5 {
            create_custom_product(&db, &format!("Other Suit {i}"), mens.id, false, "").await?;
        }
        create_custom_product(&db, "School Uniform", kids.id, false, "").await?;

        let detail = product_detail(&db, &main.slug).await?;

        assert_eq!(detail.category.map(|c| c.id), Some(mens.id));
        assert_eq!(detail.related.len(), 4);
        assert!(detail.related.iter().all(|p| p.category_id == mens.id));
        assert!(detail.related.iter().all(|p| p.id != main.id));

        Ok(())
    }

    #[tokio::test]
    async fn test_set_featured_toggles_flag() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;

        let updated = set_featured(&db, product.id, false).await?;
        assert!(!updated.is_featured);

        let result = set_featured(&db, 999, true).await;
        assert!(result.unwrap_err().is_not_found());

        Ok(())
    }

    #[tokio::test]
    async fn test_catalog_products_filters_by_category_slug() -> Result<()> {
        let db = setup_test_db().await?;
        let mens = create_test_category(&db, "Men's Wear").await?;
        let kids = create_test_category(&db, "Children's Wear").await?;
        create_custom_product(&db, "Suit", mens.id, false, "").await?;
        create_custom_product(&db, "Uniform", kids.id, false, "").await?;

        let all = catalog_products(&db, None, None).await?;
        assert_eq!(all.total_items, 2);

        let kids_only = catalog_products(&db, Some(&kids.slug), None).await?;
        assert_eq!(kids_only.total_items, 1);
        assert_eq!(kids_only.items[0].product.name, "Uniform");

        Ok(())
    }
}
