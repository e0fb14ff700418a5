use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use charter_booking::{Booking, BookingStatus, PaymentStatus, RescheduleRequest};
use charter_quote::DisplayPricing;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    pub booking: Booking,
    pub display: DisplayPricing,
}

impl From<Booking> for BookingView {
    fn from(booking: Booking) -> Self {
        let display = booking.pricing.display();
        Self { booking, display }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePaymentRequest {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleBody {
    pub leg_index: usize,
    pub new_date: NaiveDate,
    pub reason: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/status", post(update_status))
        .route("/v1/bookings/{id}/payment", post(update_payment))
        .route("/v1/bookings/{id}/reschedule", post(request_reschedule))
        .route(
            "/v1/bookings/{id}/reschedule/{request_id}/approve",
            post(approve_reschedule),
        )
        .route(
            "/v1/bookings/{id}/reschedule/{request_id}/reject",
            post(reject_reschedule),
        )
}

async fn get_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Json<BookingView>, AppError> {
    let booking = state.quoting.get_booking(id).await?;
    Ok(Json(booking.into()))
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state.quoting.update_booking_status(id, req.status).await?;
    Ok(Json(booking.into()))
}

async fn update_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdatePaymentRequest>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state.quoting.update_payment(id, req.payment_status).await?;
    Ok(Json(booking.into()))
}

async fn request_reschedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleBody>,
) -> Result<(StatusCode, Json<RescheduleRequest>), AppError> {
    let request = state
        .quoting
        .request_reschedule(id, req.leg_index, req.new_date, req.reason)
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

async fn approve_reschedule(
    State(state): State<AppState>,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state.quoting.approve_reschedule(id, request_id).await?;
    Ok(Json(booking.into()))
}

async fn reject_reschedule(
    State(state): State<AppState>,
    Path((id, request_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<BookingView>, AppError> {
    let booking = state.quoting.reject_reschedule(id, request_id).await?;
    Ok(Json(booking.into()))
}
