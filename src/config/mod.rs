/// Database configuration and connection management
pub mod database;

/// Server settings from environment variables
pub mod server;

/// Business, dashboard and seed configuration from config.toml
pub mod shop;
