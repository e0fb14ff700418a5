use axum::{extract::State, routing::post, Json, Router};
use charter_core::search::SearchResponse;
use charter_quote::TripRequest;
use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/quotes/search", post(search_quotes))
}

/// Price the requested legs across the fleet. Rules are resolved for
/// today's date.
async fn search_quotes(
    State(state): State<AppState>,
    Json(req): Json<TripRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    info!(legs = req.legs.len(), passengers = req.passenger_count, "Charter quote search");
    let outcome = state.quoting.search(&req, Utc::now().date_naive()).await?;
    Ok(Json(SearchResponse::from(outcome)))
}
