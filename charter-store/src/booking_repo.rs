use async_trait::async_trait;
use charter_booking::Booking;
use charter_core::repository::BookingRepository;
use charter_core::RepoResult;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresBookingRepository {
    pub pool: PgPool,
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO bookings (id, quote_id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (quote_id) DO NOTHING
            "#,
        )
        .bind(booking.id)
        .bind(booking.quote_id)
        .bind(booking.status.to_string())
        .bind(Json(booking))
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }

    async fn save_booking(&self, booking: &Booking) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (id, quote_id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(booking.id)
        .bind(booking.quote_id)
        .bind(booking.status.to_string())
        .bind(Json(booking))
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        let row = sqlx::query_scalar::<_, Json<Booking>>("SELECT document FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(booking)| booking))
    }

    async fn find_by_quote(&self, quote_id: Uuid) -> RepoResult<Option<Booking>> {
        let row = sqlx::query_scalar::<_, Json<Booking>>("SELECT document FROM bookings WHERE quote_id = $1")
            .bind(quote_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(booking)| booking))
    }
}
