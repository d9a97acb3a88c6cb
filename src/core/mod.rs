//! Core business logic - framework-agnostic client, catalog, quote and dashboard operations.

/// Category and product management plus the public catalog views
pub mod catalog;
/// Client directory and phone-number identity resolution
pub mod client;
/// Dashboard counts, recent activity and trends
pub mod dashboard;
/// Submission forms and their validation
pub mod forms;
/// Search, filter and pagination for the staff list views
pub mod listing;
/// Client-facing message text
pub mod message;
/// Quote submission workflow and quote views
pub mod quote;
/// Sample data seeding from configuration
pub mod seed;
/// Quote status lifecycle
pub mod status;
