pub mod admin;
pub mod notify;
pub mod quoting;
pub mod repository;
pub mod search;

pub use admin::CatalogAdmin;
pub use notify::Notifier;
pub use quoting::{QuotingService, QuotingSettings};
pub use repository::{RepoError, RepoResult, Stores};

use charter_booking::BookingError;
use charter_catalog::CatalogError;
use charter_quote::{Exclusion, InquiryError, PricingError, QuoteError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("No aircraft matched your criteria")]
    NoAircraftMatched { excluded: Vec<Exclusion> },

    #[error(transparent)]
    Quote(#[from] QuoteError),

    #[error(transparent)]
    Inquiry(#[from] InquiryError),

    #[error(transparent)]
    Booking(#[from] BookingError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(#[from] RepoError),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        CoreError::NotFound { entity, id }
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
