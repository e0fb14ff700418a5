use async_trait::async_trait;
use charter_catalog::{Aircraft, PricingRule, Route};
use charter_core::repository::{AircraftRepository, PricingRuleRepository, RouteRepository};
use charter_core::RepoResult;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PostgresAircraftRepository {
    pub pool: PgPool,
}

#[async_trait]
impl AircraftRepository for PostgresAircraftRepository {
    async fn list_aircraft(&self, active_only: bool) -> RepoResult<Vec<Aircraft>> {
        let rows = sqlx::query_scalar::<_, Json<Aircraft>>(
            r#"
            SELECT document FROM aircraft
            WHERE ($1 = FALSE OR is_active)
            ORDER BY tail_number
            "#,
        )
        .bind(active_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|Json(mut aircraft)| {
                aircraft.sync_legacy_fields();
                aircraft
            })
            .collect())
    }

    async fn get_aircraft(&self, id: Uuid) -> RepoResult<Option<Aircraft>> {
        let row = sqlx::query_scalar::<_, Json<Aircraft>>("SELECT document FROM aircraft WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|Json(mut aircraft)| {
            aircraft.sync_legacy_fields();
            aircraft
        }))
    }

    async fn save_aircraft(&self, aircraft: &Aircraft) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO aircraft (id, tail_number, is_active, document, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET tail_number = EXCLUDED.tail_number,
                is_active = EXCLUDED.is_active,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(aircraft.id)
        .bind(&aircraft.tail_number)
        .bind(aircraft.is_active)
        .bind(Json(aircraft))
        .bind(aircraft.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_aircraft(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM aircraft WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresPricingRuleRepository {
    pub pool: PgPool,
}

#[async_trait]
impl PricingRuleRepository for PostgresPricingRuleRepository {
    async fn list_rules(&self) -> RepoResult<Vec<PricingRule>> {
        let rows = sqlx::query_scalar::<_, Json<PricingRule>>("SELECT document FROM pricing_rules")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(rule)| rule).collect())
    }

    async fn get_rule(&self, id: Uuid) -> RepoResult<Option<PricingRule>> {
        let row = sqlx::query_scalar::<_, Json<PricingRule>>("SELECT document FROM pricing_rules WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|Json(rule)| rule))
    }

    async fn save_rule(&self, rule: &PricingRule) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pricing_rules (id, is_active, document, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE
            SET is_active = EXCLUDED.is_active,
                document = EXCLUDED.document,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(rule.id)
        .bind(rule.is_active)
        .bind(Json(rule))
        .bind(rule.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete_rule(&self, id: Uuid) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM pricing_rules WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

pub struct PostgresRouteRepository {
    pub pool: PgPool,
}

#[async_trait]
impl RouteRepository for PostgresRouteRepository {
    async fn list_routes(&self) -> RepoResult<Vec<Route>> {
        let rows = sqlx::query_scalar::<_, Json<Route>>("SELECT document FROM routes ORDER BY origin, destination")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(|Json(route)| route).collect())
    }

    async fn find_route(&self, origin: &str, destination: &str) -> RepoResult<Option<Route>> {
        let row = sqlx::query_scalar::<_, Json<Route>>(
            "SELECT document FROM routes WHERE origin = $1 AND destination = $2",
        )
        .bind(origin)
        .bind(destination)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|Json(route)| route))
    }

    async fn insert_route(&self, route: &Route) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO routes (id, origin, destination, document)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (origin, destination) DO NOTHING
            "#,
        )
        .bind(route.id)
        .bind(&route.origin)
        .bind(&route.destination)
        .bind(Json(route))
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
