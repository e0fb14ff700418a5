use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use charter_quote::{DisplayPricing, Quote};
use serde::Serialize;
use uuid::Uuid;

use crate::bookings::BookingView;
use crate::error::AppError;
use crate::state::AppState;

/// A stored quote as returned to clients. The breakdown is the stored
/// snapshot; `display` only rounds it.
#[derive(Debug, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,
    pub display: DisplayPricing,
}

impl From<Quote> for QuoteView {
    fn from(quote: Quote) -> Self {
        let display = quote.pricing.display();
        Self { quote, display }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/quotes/{id}", get(get_quote))
        .route("/v1/quotes/{id}/send", post(send_quote))
        .route("/v1/quotes/{id}/accept", post(accept_quote))
        .route("/v1/quotes/{id}/decline", post(decline_quote))
        .route("/v1/quotes/{id}/booking", post(book_quote))
}

async fn get_quote(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteView>, AppError> {
    let quote = state.quoting.get_quote(id).await?;
    Ok(Json(quote.into()))
}

async fn send_quote(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteView>, AppError> {
    let quote = state.quoting.send_quote(id).await?;
    Ok(Json(quote.into()))
}

async fn accept_quote(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteView>, AppError> {
    let quote = state.quoting.accept_quote(id).await?;
    Ok(Json(quote.into()))
}

async fn decline_quote(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<QuoteView>, AppError> {
    let quote = state.quoting.decline_quote(id).await?;
    Ok(Json(quote.into()))
}

async fn book_quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<BookingView>), AppError> {
    let booking = state.quoting.book_quote(id).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}
