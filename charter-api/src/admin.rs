use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use charter_catalog::{Aircraft, NewAircraft, NewPricingRule, PricingRule, Route};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateRouteRequest {
    pub origin: String,
    pub destination: String,
    pub distance_km: f64,
    pub estimated_time_hours: Option<f64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/aircraft", get(list_aircraft).post(create_aircraft))
        .route(
            "/v1/admin/aircraft/{id}",
            get(get_aircraft).put(update_aircraft).delete(delete_aircraft),
        )
        .route("/v1/admin/pricing-rules", get(list_rules).post(create_rule))
        .route(
            "/v1/admin/pricing-rules/{id}",
            get(get_rule).put(update_rule).delete(delete_rule),
        )
        .route("/v1/admin/routes", get(list_routes).post(create_route))
}

// ============================================================================
// Aircraft
// ============================================================================

async fn list_aircraft(State(state): State<AppState>) -> Result<Json<Vec<Aircraft>>, AppError> {
    Ok(Json(state.admin.list_aircraft().await?))
}

async fn get_aircraft(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Aircraft>, AppError> {
    Ok(Json(state.admin.get_aircraft(id).await?))
}

async fn create_aircraft(
    State(state): State<AppState>,
    Json(req): Json<NewAircraft>,
) -> Result<(StatusCode, Json<Aircraft>), AppError> {
    let aircraft = state.admin.create_aircraft(req).await?;
    Ok((StatusCode::CREATED, Json(aircraft)))
}

async fn update_aircraft(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NewAircraft>,
) -> Result<Json<Aircraft>, AppError> {
    Ok(Json(state.admin.update_aircraft(id, req).await?))
}

async fn delete_aircraft(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.admin.delete_aircraft(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Pricing Rules
// ============================================================================

async fn list_rules(State(state): State<AppState>) -> Result<Json<Vec<PricingRule>>, AppError> {
    Ok(Json(state.admin.list_rules().await?))
}

async fn get_rule(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<PricingRule>, AppError> {
    Ok(Json(state.admin.get_rule(id).await?))
}

async fn create_rule(
    State(state): State<AppState>,
    Json(req): Json<NewPricingRule>,
) -> Result<(StatusCode, Json<PricingRule>), AppError> {
    let rule = state.admin.create_rule(req).await?;
    Ok((StatusCode::CREATED, Json(rule)))
}

async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NewPricingRule>,
) -> Result<Json<PricingRule>, AppError> {
    Ok(Json(state.admin.update_rule(id, req).await?))
}

async fn delete_rule(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, AppError> {
    state.admin.delete_rule(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============================================================================
// Routes
// ============================================================================

async fn list_routes(State(state): State<AppState>) -> Result<Json<Vec<Route>>, AppError> {
    Ok(Json(state.admin.list_routes().await?))
}

async fn create_route(
    State(state): State<AppState>,
    Json(req): Json<CreateRouteRequest>,
) -> Result<(StatusCode, Json<Route>), AppError> {
    let route = state
        .admin
        .create_route(&req.origin, &req.destination, req.distance_km, req.estimated_time_hours)
        .await?;
    Ok((StatusCode::CREATED, Json(route)))
}
