use chrono::Utc;
use dotenvy::dotenv;
use tailor_quotes::{
    api::{self, AppState},
    config::{database, server, shop},
    core::seed,
    errors::Result,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load shop configuration
    let shop_config = shop::load_default_config()
        .inspect_err(|e| error!("Failed to load shop configuration: {}", e))?;

    // 4. Connect and ensure the schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed sample data from config.toml
    seed::seed_sample_data(&db, &shop_config, Utc::now().date_naive())
        .await
        .inspect_err(|e| error!("Failed to seed sample data: {}", e))?;

    // 6. Serve the API
    let addr = server::get_bind_address();
    let state = AppState::new(
        db,
        shop_config.business,
        shop_config.dashboard.trend_bucketing,
    );
    api::serve(addr, state).await
}
