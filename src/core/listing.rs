//! Staff list views - Search, filter and page through clients, products and quotes.
//!
//! Every view takes an explicit query object and returns a [`Page`]. Text search is
//! a case-insensitive substring match; page numbers are 1-based and clamped into
//! range the way the dashboard expects (too small → first page, too large → last).

use crate::{
    core::quote::QuoteDetails,
    entities::{
        Category, Client, Product, QuoteRequest, QuoteStatus, QuoteType, category, client,
        product, quote_request,
    },
    errors::{Error, Result},
};
use sea_orm::{
    ItemsAndPagesNumber, JoinType, PaginatorTrait, QueryOrder, QuerySelect, SelectorTrait,
    prelude::*,
    sea_query::{Condition, Expr, Func, IntoColumnRef, LikeExpr, SimpleExpr},
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Clients shown per page.
pub const CLIENTS_PER_PAGE: u64 = 20;
/// Products shown per page.
pub const PRODUCTS_PER_PAGE: u64 = 12;
/// Quotes shown per page.
pub const QUOTES_PER_PAGE: u64 = 15;

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// Items on this page
    pub items: Vec<T>,
    /// 1-based number of this page
    pub page: u64,
    /// Maximum items per page
    pub page_size: u64,
    /// Items across all pages
    pub total_items: u64,
    /// Number of pages, at least 1
    pub total_pages: u64,
}

impl<T> Page<T> {
    /// Whether a later page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// Whether an earlier page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Converts every item, keeping the paging information.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            page_size: self.page_size,
            total_items: self.total_items,
            total_pages: self.total_pages,
        }
    }
}

/// Clamps a requested page into `1..=total_pages`.
#[must_use]
pub fn clamp_page(requested: Option<u64>, total_pages: u64) -> u64 {
    requested.unwrap_or(1).clamp(1, total_pages.max(1))
}

/// Runs any paginated select and returns the requested (clamped) page.
pub async fn fetch_page<'db, C, S>(
    db: &'db C,
    select: S,
    page_size: u64,
    requested: Option<u64>,
) -> Result<Page<<S::Selector as SelectorTrait>::Item>>
where
    C: ConnectionTrait,
    S: PaginatorTrait<'db, C>,
{
    let paginator = select.paginate(db, page_size);
    let ItemsAndPagesNumber {
        number_of_items,
        number_of_pages,
    } = paginator.num_items_and_pages().await?;
    let page = clamp_page(requested, number_of_pages);
    let items = paginator.fetch_page(page - 1).await?;
    debug!(
        "Fetched page {}/{} ({} items total)",
        page, number_of_pages, number_of_items
    );

    Ok(Page {
        items,
        page,
        page_size,
        total_items: number_of_items,
        total_pages: number_of_pages.max(1),
    })
}

/// Case-insensitive substring match on a column.
///
/// `%`, `_` and `\` in the needle match themselves.
pub(crate) fn icontains<T>(column: T, needle: &str) -> SimpleExpr
where
    T: IntoColumnRef,
{
    let pattern = format!("%{}%", escape_like(&needle.to_lowercase()));
    Expr::expr(Func::lower(Expr::col(column))).like(LikeExpr::new(pattern).escape('\\'))
}

fn escape_like(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len());
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

fn search_term(search: Option<&str>) -> Option<&str> {
    search.map(str::trim).filter(|term| !term.is_empty())
}

/// Parameters of the client list.
#[derive(Debug, Clone, Default)]
pub struct ClientQuery {
    /// Matches name, phone or email
    pub search: Option<String>,
    /// Requested page
    pub page: Option<u64>,
}

/// A client row with its quote counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientSummary {
    /// The client
    pub client: client::Model,
    /// All quote requests from this client
    pub total_quotes: u64,
    /// Quote requests still pending
    pub pending_quotes: u64,
}

/// Lists clients newest first, with per-client quote counts.
pub async fn list_clients(db: &DatabaseConnection, query: &ClientQuery) -> Result<Page<ClientSummary>> {
    let mut select = Client::find();
    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(icontains((client::Entity, client::Column::FullName), term))
                .add(icontains((client::Entity, client::Column::PhoneNumber), term))
                .add(icontains((client::Entity, client::Column::Email), term)),
        );
    }
    let select = select.order_by_desc(client::Column::CreatedAt);

    let page = fetch_page(db, select, CLIENTS_PER_PAGE, query.page).await?;
    let ids: Vec<i64> = page.items.iter().map(|client| client.id).collect();
    let counts = quote_counts_by_client(db, ids).await?;

    Ok(page.map(|client| {
        let (total_quotes, pending_quotes) = counts.get(&client.id).copied().unwrap_or_default();
        ClientSummary {
            client,
            total_quotes,
            pending_quotes,
        }
    }))
}

async fn quote_counts_by_client(
    db: &DatabaseConnection,
    client_ids: Vec<i64>,
) -> Result<HashMap<i64, (u64, u64)>> {
    if client_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows: Vec<(i64, QuoteStatus, i64)> = QuoteRequest::find()
        .select_only()
        .column(quote_request::Column::ClientId)
        .column(quote_request::Column::Status)
        .column_as(quote_request::Column::Id.count(), "count")
        .filter(quote_request::Column::ClientId.is_in(client_ids))
        .group_by(quote_request::Column::ClientId)
        .group_by(quote_request::Column::Status)
        .into_tuple()
        .all(db)
        .await?;

    let mut counts: HashMap<i64, (u64, u64)> = HashMap::new();
    for (client_id, status, count) in rows {
        let count = u64::try_from(count).unwrap_or_default();
        let entry = counts.entry(client_id).or_default();
        entry.0 += count;
        if status == QuoteStatus::Pending {
            entry.1 += count;
        }
    }
    Ok(counts)
}

/// Parameters of the staff product list.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    /// Matches name or description
    pub search: Option<String>,
    /// Only products in this category
    pub category_id: Option<i64>,
    /// Only featured (`Some(true)`) or non-featured (`Some(false)`) products
    pub featured: Option<bool>,
    /// Requested page
    pub page: Option<u64>,
}

/// A product with its category attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWithCategory {
    /// The product
    pub product: product::Model,
    /// Its category
    pub category: Option<category::Model>,
}

impl From<(product::Model, Option<category::Model>)> for ProductWithCategory {
    fn from((product, category): (product::Model, Option<category::Model>)) -> Self {
        Self { product, category }
    }
}

/// Lists products newest first; all filters are combined with AND.
pub async fn list_products(
    db: &DatabaseConnection,
    query: &ProductQuery,
) -> Result<Page<ProductWithCategory>> {
    let mut select = Product::find();
    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(icontains((product::Entity, product::Column::Name), term))
                .add(icontains((product::Entity, product::Column::Description), term)),
        );
    }
    if let Some(category_id) = query.category_id {
        select = select.filter(product::Column::CategoryId.eq(category_id));
    }
    if let Some(featured) = query.featured {
        select = select.filter(product::Column::IsFeatured.eq(featured));
    }
    let select = select
        .order_by_desc(product::Column::CreatedAt)
        .find_also_related(Category);

    let page = fetch_page(db, select, PRODUCTS_PER_PAGE, query.page).await?;
    Ok(page.map(ProductWithCategory::from))
}

/// Parameters of the quote list.
#[derive(Debug, Clone, Default)]
pub struct QuoteQuery {
    /// Matches client name, client phone or product name
    pub search: Option<String>,
    /// Only quotes with this status
    pub status: Option<QuoteStatus>,
    /// Only quotes of this type
    pub quote_type: Option<QuoteType>,
    /// Requested page
    pub page: Option<u64>,
}

/// Lists quote requests newest first with client and product attached.
pub async fn list_quotes(db: &DatabaseConnection, query: &QuoteQuery) -> Result<Page<QuoteDetails>> {
    let mut select = QuoteRequest::find()
        .join(JoinType::InnerJoin, quote_request::Relation::Client.def())
        .join(JoinType::LeftJoin, quote_request::Relation::Product.def());
    if let Some(term) = search_term(query.search.as_deref()) {
        select = select.filter(
            Condition::any()
                .add(icontains((client::Entity, client::Column::FullName), term))
                .add(icontains((client::Entity, client::Column::PhoneNumber), term))
                .add(icontains((product::Entity, product::Column::Name), term)),
        );
    }
    if let Some(status) = query.status {
        select = select.filter(quote_request::Column::Status.eq(status));
    }
    if let Some(quote_type) = query.quote_type {
        select = select.filter(quote_request::Column::QuoteType.eq(quote_type));
    }
    let select = select.order_by_desc(quote_request::Column::CreatedAt);

    let page = fetch_page(db, select, QUOTES_PER_PAGE, query.page).await?;
    let Page {
        items,
        page,
        page_size,
        total_items,
        total_pages,
    } = page;

    Ok(Page {
        items: attach_relations(db, items).await?,
        page,
        page_size,
        total_items,
        total_pages,
    })
}

/// Loads client and product for each quote, keeping the input order.
pub(crate) async fn attach_relations(
    db: &DatabaseConnection,
    quotes: Vec<quote_request::Model>,
) -> Result<Vec<QuoteDetails>> {
    let client_ids: Vec<i64> = quotes.iter().map(|quote| quote.client_id).collect();
    let product_ids: Vec<i64> = quotes.iter().filter_map(|quote| quote.product_id).collect();

    let clients: HashMap<i64, client::Model> = Client::find()
        .filter(client::Column::Id.is_in(client_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|client| (client.id, client))
        .collect();
    let products: HashMap<i64, product::Model> = if product_ids.is_empty() {
        HashMap::new()
    } else {
        Product::find()
            .filter(product::Column::Id.is_in(product_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|product| (product.id, product))
            .collect()
    };

    quotes
        .into_iter()
        .map(|quote| {
            let client = clients
                .get(&quote.client_id)
                .cloned()
                .ok_or(Error::ClientNotFound {
                    id: quote.client_id,
                })?;
            let product = quote
                .product_id
                .and_then(|product_id| products.get(&product_id).cloned());
            Ok(QuoteDetails {
                quote,
                client,
                product,
            })
        })
        .collect()
}
