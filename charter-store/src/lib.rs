pub mod app_config;
pub mod database;
pub mod memory;
pub mod notifier;
pub mod catalog_repo;
pub mod quote_repo;
pub mod booking_repo;

pub use app_config::{Config, StorageBackend};
pub use database::DbClient;
pub use memory::InMemoryStore;
pub use notifier::{LogNotifier, RecordingNotifier};

use charter_core::Stores;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("database.url is required for the postgres backend")]
    MissingDatabaseUrl,
}

/// Open the configured backend and hand back one repository per concern.
pub async fn connect(config: &Config) -> Result<Stores, StoreError> {
    match config.storage.backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(InMemoryStore::new()).stores())
        }
        StorageBackend::Postgres => {
            let database = config.database.as_ref().ok_or(StoreError::MissingDatabaseUrl)?;
            let db = DbClient::new(&database.url, database.max_connections).await?;
            db.migrate().await?;
            info!("Using postgres storage");
            Ok(db.stores())
        }
    }
}
