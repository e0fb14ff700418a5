use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use charter_booking::BookingError;
use charter_core::CoreError;
use charter_quote::{Exclusion, InquiryError, PricingError, QuoteError};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    /// The quote's validity window has passed
    GoneError(String),
    /// The request is well-formed but cannot be priced
    PricingError {
        code: &'static str,
        message: String,
        excluded: Vec<Exclusion>,
    },
    /// Anything the caller cannot fix, such as a storage failure
    Anyhow(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::GoneError(msg) => (StatusCode::GONE, json!({ "error": msg })),
            AppError::PricingError { code, message, excluded } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "code": code, "excluded": excluded }),
            ),
            AppError::Anyhow(err) => {
                tracing::error!("Internal Server Error: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::NotFound { .. } => AppError::NotFoundError(message),
            CoreError::ValidationError(_) | CoreError::Catalog(_) => AppError::ValidationError(message),
            CoreError::Pricing(e) => pricing_error(e),
            CoreError::NoAircraftMatched { excluded } => AppError::PricingError {
                code: "NO_AIRCRAFT_MATCHED",
                message,
                excluded,
            },
            CoreError::Quote(QuoteError::Expired(_)) => AppError::GoneError(message),
            CoreError::Quote(QuoteError::ValidityOutOfRange(_)) => AppError::ValidationError(message),
            CoreError::Quote(_) => AppError::ConflictError(message),
            CoreError::Inquiry(InquiryError::Validation(_)) => AppError::ValidationError(message),
            CoreError::Inquiry(InquiryError::InvalidTransition { .. }) => AppError::ConflictError(message),
            CoreError::Booking(e) => booking_error(e, message),
            CoreError::Conflict(_) => AppError::ConflictError(message),
            CoreError::Storage(e) => anyhow::Error::from_boxed(e).context("storage failure").into(),
        }
    }
}

fn pricing_error(err: PricingError) -> AppError {
    let message = err.to_string();
    match err {
        PricingError::AircraftNotFound(_) => AppError::NotFoundError(message),
        PricingError::NoLegs | PricingError::InvalidLeg { .. } | PricingError::InvalidRequest(_) => {
            AppError::ValidationError(message)
        }
        other => AppError::PricingError {
            code: other.code(),
            message,
            excluded: Vec::new(),
        },
    }
}

fn booking_error(err: BookingError, message: String) -> AppError {
    match err {
        BookingError::RescheduleNotFound(_) => AppError::NotFoundError(message),
        BookingError::LegOutOfRange { .. } | BookingError::InvalidReschedule(_) => {
            AppError::ValidationError(message)
        }
        _ => AppError::ConflictError(message),
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Anyhow(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn status(err: CoreError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status(CoreError::not_found("Quote", Uuid::nil())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(CoreError::Quote(QuoteError::Expired(Uuid::nil()))),
            StatusCode::GONE
        );
        assert_eq!(
            status(CoreError::Quote(QuoteError::Locked(Uuid::nil()))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status(CoreError::Quote(QuoteError::ValidityOutOfRange(i64::MAX))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status(CoreError::Pricing(PricingError::RouteNotFound {
                origin: "DEL".to_string(),
                destination: "GOI".to_string()
            })),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status(CoreError::Pricing(PricingError::NoLegs)), StatusCode::BAD_REQUEST);
        assert_eq!(
            status(CoreError::Storage("connection reset".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_storage_failure_is_opaque() {
        let response = AppError::from(CoreError::Storage("connection reset".into())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Internal Server Error");
    }
}
