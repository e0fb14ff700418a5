use charter_core::Stores;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use crate::booking_repo::PostgresBookingRepository;
use crate::catalog_repo::{
    PostgresAircraftRepository, PostgresPricingRuleRepository, PostgresRouteRepository,
};
use crate::quote_repo::{PostgresInquiryRepository, PostgresQuoteRepository};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations").run(&self.pool).await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    pub fn stores(&self) -> Stores {
        let pool = self.pool.clone();
        Stores {
            aircraft: Arc::new(PostgresAircraftRepository { pool: pool.clone() }),
            rules: Arc::new(PostgresPricingRuleRepository { pool: pool.clone() }),
            routes: Arc::new(PostgresRouteRepository { pool: pool.clone() }),
            inquiries: Arc::new(PostgresInquiryRepository { pool: pool.clone() }),
            quotes: Arc::new(PostgresQuoteRepository { pool: pool.clone() }),
            bookings: Arc::new(PostgresBookingRepository { pool }),
        }
    }
}
