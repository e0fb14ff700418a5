use async_trait::async_trait;
use charter_core::repository::{InquiryRepository, QuoteRepository};
use charter_core::RepoResult;
use charter_quote::{Inquiry, Quote};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresInquiryRepository {
    pub pool: PgPool,
}

#[async_trait]
impl InquiryRepository for PostgresInquiryRepository {
    async fn save_inquiry(&self, inquiry: &Inquiry) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inquiries (id, status, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(inquiry.id)
        .bind(inquiry.status.to_string())
        .bind(Json(inquiry))
        .bind(inquiry.created_at)
        .bind(inquiry.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_inquiry(&self, id: Uuid) -> RepoResult<Option<Inquiry>> {
        let row = sqlx::query_scalar::<_, Json<Inquiry>>("SELECT document FROM inquiries WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(inquiry)| inquiry))
    }
}

/// Quotes keep their pricing breakdown verbatim inside the document.
pub struct PostgresQuoteRepository {
    pub pool: PgPool,
}

#[async_trait]
impl QuoteRepository for PostgresQuoteRepository {
    async fn save_quote(&self, quote: &Quote) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO quotes (id, inquiry_id, status, valid_until, document, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(quote.id)
        .bind(quote.inquiry_id)
        .bind(quote.status.to_string())
        .bind(quote.valid_until)
        .bind(Json(quote))
        .bind(quote.created_at)
        .bind(quote.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_quote(&self, id: Uuid) -> RepoResult<Option<Quote>> {
        let row = sqlx::query_scalar::<_, Json<Quote>>("SELECT document FROM quotes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(quote)| quote))
    }

    async fn list_quotes_for_inquiry(&self, inquiry_id: Uuid) -> RepoResult<Vec<Quote>> {
        let rows = sqlx::query_scalar::<_, Json<Quote>>(
            "SELECT document FROM quotes WHERE inquiry_id = $1 ORDER BY created_at",
        )
        .bind(inquiry_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|Json(quote)| quote).collect())
    }
}
