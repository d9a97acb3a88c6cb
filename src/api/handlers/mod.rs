//! Endpoint handlers grouped by area.

/// Public catalog endpoints
pub mod catalog;
/// Staff dashboard endpoints
pub mod dashboard;
/// Service health
pub mod health;
/// Quote submission endpoints
pub mod quotes;

/// Parses a page number leniently; anything that is not a number means "first page".
pub(crate) fn parse_page(page: Option<&str>) -> Option<u64> {
    page.and_then(|page| page.trim().parse().ok())
}

/// Treats a missing or blank query parameter as absent.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
