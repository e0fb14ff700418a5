use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use charter_quote::{Inquiry, NewInquiry};
use chrono::Duration;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::quotes::QuoteView;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateQuoteRequest {
    pub aircraft_id: Uuid,
    /// Overrides the configured quote validity
    pub valid_for_hours: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/inquiries", post(create_inquiry))
        .route("/v1/inquiries/{id}", get(get_inquiry))
        .route("/v1/inquiries/{id}/sourcing", post(start_sourcing))
        .route("/v1/inquiries/{id}/cancel", post(cancel_inquiry))
        .route("/v1/inquiries/{id}/quotes", post(create_quote).get(list_quotes))
}

async fn create_inquiry(
    State(state): State<AppState>,
    Json(req): Json<NewInquiry>,
) -> Result<(StatusCode, Json<Inquiry>), AppError> {
    let inquiry = state.quoting.create_inquiry(req).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

async fn get_inquiry(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Inquiry>, AppError> {
    Ok(Json(state.quoting.get_inquiry(id).await?))
}

async fn start_sourcing(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Inquiry>, AppError> {
    Ok(Json(state.quoting.start_sourcing(id).await?))
}

async fn cancel_inquiry(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Inquiry>, AppError> {
    Ok(Json(state.quoting.cancel_inquiry(id).await?))
}

async fn create_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<CreateQuoteRequest>,
) -> Result<(StatusCode, Json<QuoteView>), AppError> {
    let valid_for = match req.valid_for_hours {
        Some(hours) if hours <= 0 => {
            return Err(AppError::ValidationError("validForHours must be positive".to_string()));
        }
        Some(hours) => Some(
            Duration::try_hours(hours)
                .ok_or_else(|| AppError::ValidationError("validForHours is out of range".to_string()))?,
        ),
        None => None,
    };
    let quote = state.quoting.quote_inquiry(id, req.aircraft_id, valid_for).await?;
    Ok((StatusCode::CREATED, Json(quote.into())))
}

async fn list_quotes(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<Vec<QuoteView>>, AppError> {
    let quotes = state.quoting.list_inquiry_quotes(id).await?;
    Ok(Json(quotes.into_iter().map(QuoteView::from).collect()))
}
