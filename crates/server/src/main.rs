//! Folio schema migration entry point.
//!
//! Loads configuration, connects to the database and applies any pending
//! migrations for the content and history tables.
//!
//! Usage: `folio-migrate [config.toml]`. Without a path, configuration is read
//! from `config/` and `FOLIO__*` environment variables.

use folio_common::Config;
use folio_common::config::LoggingConfig;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.filter));
    let registry = tracing_subscriber::registry().with(filter);

    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configuration comes first so its log filter applies from the start
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.logging);

    info!("Starting folio migrations...");

    let db = folio_db::init(&config.database).await.inspect_err(|e| e.log("connect"))?;
    info!(
        max_connections = config.database.max_connections,
        "Connected to database"
    );

    folio_db::migrate(&db).await.inspect_err(|e| e.log("migrate"))?;
    info!("Migrations completed");

    db.close().await?;
    Ok(())
}
