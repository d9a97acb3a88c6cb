//! Dashboard aggregation - Read-only counts, recent activity and trends.
//!
//! Everything here is recomputed from the database on each call and takes `today`
//! as a parameter, so the same data always produces the same report.

use crate::{
    core::{
        listing::{ProductWithCategory, attach_relations},
        quote::QuoteDetails,
    },
    entities::{Category, Client, Product, QuoteRequest, QuoteStatus, client, product, quote_request},
    errors::Result,
};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveTime, Utc};
use sea_orm::{PaginatorTrait, QueryOrder, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Items shown in each recent activity list.
pub const RECENT_LIMIT: u64 = 5;
/// Trend buckets on the dashboard page.
pub const DASHBOARD_TREND_MONTHS: u32 = 6;
/// Trend buckets in the analytics feed.
pub const ANALYTICS_TREND_MONTHS: u32 = 12;

/// How monthly trend buckets are laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendBucketing {
    /// Real calendar months, the current month last
    #[default]
    CalendarMonth,
    /// 30-day windows stepping back from the first of the current month
    ThirtyDayStride,
}

/// A half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendBucket {
    /// First day in the bucket; also used for its label
    pub start: NaiveDate,
    /// First day after the bucket
    pub end: NaiveDate,
}

/// Builds `count` trend buckets ending with the one containing the current month,
/// oldest first.
#[must_use]
pub fn trend_buckets(today: NaiveDate, count: u32, bucketing: TrendBucketing) -> Vec<TrendBucket> {
    let anchor = today - Duration::days(i64::from(today.day0()));

    (0..count)
        .rev()
        .filter_map(|i| match bucketing {
            TrendBucketing::CalendarMonth => {
                let start = anchor.checked_sub_months(Months::new(i))?;
                let end = start.checked_add_months(Months::new(1))?;
                Some(TrendBucket { start, end })
            }
            TrendBucketing::ThirtyDayStride => {
                let start = anchor - Duration::days(30 * i64::from(i));
                Some(TrendBucket {
                    start,
                    end: start + Duration::days(30),
                })
            }
        })
        .collect()
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

/// Headline numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// All clients
    pub total_clients: u64,
    /// Clients created in the last 7 days
    pub new_clients_this_week: u64,
    /// All products
    pub total_products: u64,
    /// Featured products
    pub featured_products: u64,
    /// All quote requests
    pub total_quotes: u64,
    /// Quote requests still pending
    pub pending_quotes: u64,
    /// Quote requests created in the last 30 days
    pub quotes_this_month: u64,
}

/// Quote count for one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusCount {
    /// The status
    pub status: QuoteStatus,
    /// Display label
    pub label: &'static str,
    /// Quotes currently in this status
    pub count: u64,
}

/// Quotes created in one trend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyQuotes {
    /// Bucket label, e.g. "Mar 2025"
    pub month: String,
    /// Quotes created in the bucket
    pub count: u64,
}

/// Quotes and clients created in one trend bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyActivity {
    /// Bucket label, e.g. "Mar"
    pub month: String,
    /// Quotes created in the bucket
    pub quotes: u64,
    /// Clients created in the bucket
    pub clients: u64,
}

/// Newest records of each kind.
#[derive(Debug, Clone, Serialize)]
pub struct RecentActivity {
    /// Newest quote requests with client and product
    pub quotes: Vec<QuoteDetails>,
    /// Newest clients
    pub clients: Vec<client::Model>,
    /// Newest products with category
    pub products: Vec<ProductWithCategory>,
}

/// The dashboard home page.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    /// Headline numbers
    pub stats: DashboardStats,
    /// Newest records
    pub recent: RecentActivity,
    /// Quotes per status
    pub status_distribution: Vec<StatusCount>,
    /// Quotes per month, oldest first
    pub monthly_quotes: Vec<MonthlyQuotes>,
}

/// The analytics feed used by dashboard charts.
#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    /// Quotes per status
    pub status_distribution: Vec<StatusCount>,
    /// Quotes and clients per month, oldest first
    pub monthly_trends: Vec<MonthlyActivity>,
}

/// Computes the headline numbers relative to `today`.
pub async fn dashboard_stats(db: &DatabaseConnection, today: NaiveDate) -> Result<DashboardStats> {
    let week_ago = start_of_day(today - Duration::days(7));
    let month_ago = start_of_day(today - Duration::days(30));

    Ok(DashboardStats {
        total_clients: Client::find().count(db).await?,
        new_clients_this_week: Client::find()
            .filter(client::Column::CreatedAt.gte(week_ago))
            .count(db)
            .await?,
        total_products: Product::find().count(db).await?,
        featured_products: Product::find()
            .filter(product::Column::IsFeatured.eq(true))
            .count(db)
            .await?,
        total_quotes: QuoteRequest::find().count(db).await?,
        pending_quotes: QuoteRequest::find()
            .filter(quote_request::Column::Status.eq(QuoteStatus::Pending))
            .count(db)
            .await?,
        quotes_this_month: QuoteRequest::find()
            .filter(quote_request::Column::CreatedAt.gte(month_ago))
            .count(db)
            .await?,
    })
}

/// Counts quotes per status, listing every status even when its count is zero.
pub async fn status_distribution(db: &DatabaseConnection) -> Result<Vec<StatusCount>> {
    let rows: Vec<(QuoteStatus, i64)> = QuoteRequest::find()
        .select_only()
        .column(quote_request::Column::Status)
        .column_as(quote_request::Column::Id.count(), "count")
        .group_by(quote_request::Column::Status)
        .into_tuple()
        .all(db)
        .await?;
    let counts: HashMap<QuoteStatus, i64> = rows.into_iter().collect();

    Ok(QuoteStatus::ALL
        .into_iter()
        .map(|status| StatusCount {
            status,
            label: status.label(),
            count: counts
                .get(&status)
                .and_then(|count| u64::try_from(*count).ok())
                .unwrap_or_default(),
        })
        .collect())
}

async fn quotes_in(db: &DatabaseConnection, bucket: TrendBucket) -> Result<u64> {
    QuoteRequest::find()
        .filter(quote_request::Column::CreatedAt.gte(start_of_day(bucket.start)))
        .filter(quote_request::Column::CreatedAt.lt(start_of_day(bucket.end)))
        .count(db)
        .await
        .map_err(Into::into)
}

async fn clients_in(db: &DatabaseConnection, bucket: TrendBucket) -> Result<u64> {
    Client::find()
        .filter(client::Column::CreatedAt.gte(start_of_day(bucket.start)))
        .filter(client::Column::CreatedAt.lt(start_of_day(bucket.end)))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Quotes per trend bucket, labelled like "Mar 2025".
pub async fn monthly_quote_trend(
    db: &DatabaseConnection,
    today: NaiveDate,
    months: u32,
    bucketing: TrendBucketing,
) -> Result<Vec<MonthlyQuotes>> {
    let mut trend = Vec::new();
    for bucket in trend_buckets(today, months, bucketing) {
        trend.push(MonthlyQuotes {
            month: bucket.start.format("%b %Y").to_string(),
            count: quotes_in(db, bucket).await?,
        });
    }
    Ok(trend)
}

/// Quotes and clients per trend bucket, labelled like "Mar".
pub async fn monthly_activity_trend(
    db: &DatabaseConnection,
    today: NaiveDate,
    months: u32,
    bucketing: TrendBucketing,
) -> Result<Vec<MonthlyActivity>> {
    let mut trend = Vec::new();
    for bucket in trend_buckets(today, months, bucketing) {
        trend.push(MonthlyActivity {
            month: bucket.start.format("%b").to_string(),
            quotes: quotes_in(db, bucket).await?,
            clients: clients_in(db, bucket).await?,
        });
    }
    Ok(trend)
}

/// The newest quotes, clients and products.
pub async fn recent_activity(db: &DatabaseConnection) -> Result<RecentActivity> {
    let quotes = QuoteRequest::find()
        .order_by_desc(quote_request::Column::CreatedAt)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?;
    let clients = Client::find()
        .order_by_desc(client::Column::CreatedAt)
        .limit(RECENT_LIMIT)
        .all(db)
        .await?;
    let products = Product::find()
        .order_by_desc(product::Column::CreatedAt)
        .limit(RECENT_LIMIT)
        .find_also_related(Category)
        .all(db)
        .await?;

    Ok(RecentActivity {
        quotes: attach_relations(db, quotes).await?,
        clients,
        products: products.into_iter().map(ProductWithCategory::from).collect(),
    })
}

/// Everything on the dashboard home page.
pub async fn dashboard_summary(
    db: &DatabaseConnection,
    today: NaiveDate,
    bucketing: TrendBucketing,
) -> Result<DashboardSummary> {
    Ok(DashboardSummary {
        stats: dashboard_stats(db, today).await?,
        recent: recent_activity(db).await?,
        status_distribution: status_distribution(db).await?,
        monthly_quotes: monthly_quote_trend(db, today, DASHBOARD_TREND_MONTHS, bucketing).await?,
    })
}

/// Status distribution plus a year of monthly quotes and clients.
pub async fn analytics(
    db: &DatabaseConnection,
    today: NaiveDate,
    bucketing: TrendBucketing,
) -> Result<Analytics> {
    Ok(Analytics {
        status_distribution: status_distribution(db).await?,
        monthly_trends: monthly_activity_trend(db, today, ANALYTICS_TREND_MONTHS, bucketing)
            .await?,
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::*;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_calendar_month_buckets() {
        let buckets = trend_buckets(date(2025, 3, 15), 6, TrendBucketing::CalendarMonth);

        assert_eq!(buckets.len(), 6);
        assert_eq!(buckets[0].start, date(2024, 10, 1));
        assert_eq!(buckets[0].end, date(2024, 11, 1));
        assert_eq!(buckets[4].start, date(2025, 2, 1));
        assert_eq!(buckets[4].end, date(2025, 3, 1));
        assert_eq!(buckets[5].start, date(2025, 3, 1));
        assert_eq!(buckets[5].end, date(2025, 4, 1));
        // Contiguous, no gaps
        assert!(buckets.windows(2).all(|pair| pair[0].end == pair[1].start));
    }

    #[test]
    fn test_thirty_day_stride_buckets() {
        let buckets = trend_buckets(date(2025, 3, 15), 6, TrendBucketing::ThirtyDayStride);

        assert_eq!(buckets[5].start, date(2025, 3, 1));
        assert_eq!(buckets[5].end, date(2025, 3, 31));
        assert_eq!(buckets[4].start, date(2025, 1, 30));
        assert_eq!(buckets[0].start, date(2024, 10, 2));
        assert!(buckets.iter().all(|b| b.end - b.start == Duration::days(30)));
    }

    #[tokio::test]
    async fn test_dashboard_stats_use_day_boundaries() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;
        let today = date(2025, 3, 15);
        let at = |d: NaiveDate, hour: u32| d.and_hms_opt(hour, 0, 0).unwrap().and_utc();

        // Exactly 7 days ago counts; 8 days ago does not
        let fresh = insert_client_at(&db, "Fresh", "0711000001", None, at(date(2025, 3, 8), 0)).await?;
        let old = insert_client_at(&db, "Old", "0711000002", None, at(date(2025, 3, 7), 23)).await?;

        insert_quote_at(&db, fresh.id, Some(product.id), QuoteStatus::Pending, at(date(2025, 2, 13), 9))
            .await?;
        insert_quote_at(&db, old.id, None, QuoteStatus::Reviewed, at(date(2025, 2, 12), 9)).await?;
        insert_quote_at(&db, old.id, None, QuoteStatus::Pending, at(today, 9)).await?;

        let stats = dashboard_stats(&db, today).await?;

        assert_eq!(stats.total_clients, 2);
        assert_eq!(stats.new_clients_this_week, 1);
        assert_eq!(stats.total_products, 1);
        assert_eq!(stats.featured_products, 1);
        assert_eq!(stats.total_quotes, 3);
        assert_eq!(stats.pending_quotes, 2);
        assert_eq!(stats.quotes_this_month, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_status_distribution_covers_every_status_and_sums_to_total() -> Result<()> {
        let db = setup_test_db().await?;
        let now = Utc::now();
        let client = insert_client_at(&db, "John Kamau", "0712345678", None, now).await?;
        for status in [
            QuoteStatus::Pending,
            QuoteStatus::Pending,
            QuoteStatus::Quoted,
            QuoteStatus::Declined,
        ] {
            insert_quote_at(&db, client.id, None, status, now).await?;
        }

        let distribution = status_distribution(&db).await?;

        assert_eq!(distribution.len(), 5);
        let count_of = |status: QuoteStatus| distribution.iter().find(|c| c.status == status).unwrap().count;
        assert_eq!(count_of(QuoteStatus::Pending), 2);
        assert_eq!(count_of(QuoteStatus::Reviewed), 0);
        assert_eq!(
            distribution.iter().map(|c| c.count).sum::<u64>(),
            QuoteRequest::find().count(&db).await?
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_monthly_trends_count_into_buckets() -> Result<()> {
        let db = setup_test_db().await?;
        let today = date(2025, 3, 15);
        let at = |d: NaiveDate| d.and_hms_opt(12, 0, 0).unwrap().and_utc();

        let client = insert_client_at(&db, "John", "0712345678", None, at(date(2025, 2, 20))).await?;
        insert_quote_at(&db, client.id, None, QuoteStatus::Pending, at(date(2025, 2, 20))).await?;
        insert_quote_at(&db, client.id, None, QuoteStatus::Pending, at(date(2025, 3, 1))).await?;
        insert_quote_at(&db, client.id, None, QuoteStatus::Pending, at(date(2025, 3, 10))).await?;
        // Outside every bucket
        insert_quote_at(&db, client.id, None, QuoteStatus::Pending, at(date(2024, 1, 5))).await?;

        let quotes = monthly_quote_trend(&db, today, 6, TrendBucketing::CalendarMonth).await?;
        assert_eq!(quotes.len(), 6);
        assert_eq!(quotes[5], MonthlyQuotes { month: "Mar 2025".to_string(), count: 2 });
        assert_eq!(quotes[4], MonthlyQuotes { month: "Feb 2025".to_string(), count: 1 });
        assert_eq!(quotes[0].month, "Oct 2024");

        let activity = monthly_activity_trend(&db, today, 12, TrendBucketing::CalendarMonth).await?;
        assert_eq!(activity.len(), 12);
        assert_eq!(activity[10].month, "Feb");
        assert_eq!((activity[10].quotes, activity[10].clients), (1, 1));
        assert_eq!(activity.iter().map(|m| m.quotes).sum::<u64>(), 3);

        Ok(())
    }

    #[tokio::test]
    async fn test_dashboard_summary_recent_activity() -> Result<()> {
        let (db, _category, product) = setup_with_product().await?;
        let base = Utc::now() - Duration::days(3);
        for i in 0..7_i64 {
            let client = insert_client_at(
                &db,
                &format!("Client {i}"),
                &format!("07110000{i:02}"),
                None,
                base + Duration::minutes(i),
            )
            .await?;
            insert_quote_at(&db, client.id, Some(product.id), QuoteStatus::Pending, base + Duration::minutes(i))
                .await?;
        }

        let summary = dashboard_summary(&db, Utc::now().date_naive(), TrendBucketing::default()).await?;

        assert_eq!(summary.recent.clients.len(), 5);
        assert_eq!(summary.recent.clients[0].full_name, "Client 6");
        assert_eq!(summary.recent.quotes.len(), 5);
        assert_eq!(summary.recent.quotes[0].client.full_name, "Client 6");
        assert!(summary.recent.quotes.iter().all(|q| q.product.is_some()));
        assert_eq!(summary.recent.products.len(), 1);
        assert_eq!(summary.monthly_quotes.len(), 6);
        assert_eq!(summary.stats.total_quotes, 7);

        let analytics = analytics(&db, Utc::now().date_naive(), TrendBucketing::default()).await?;
        assert_eq!(analytics.monthly_trends.len(), 12);
        assert_eq!(analytics.status_distribution[0].count, 7);

        Ok(())
    }
}
