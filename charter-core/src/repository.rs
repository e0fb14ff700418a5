use async_trait::async_trait;
use charter_booking::Booking;
use charter_catalog::{Aircraft, PricingRule, Route};
use charter_quote::{Inquiry, Quote};
use std::sync::Arc;
use uuid::Uuid;

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;
pub type RepoResult<T> = Result<T, RepoError>;

/// Repository trait for aircraft reference data
#[async_trait]
pub trait AircraftRepository: Send + Sync {
    async fn list_aircraft(&self, active_only: bool) -> RepoResult<Vec<Aircraft>>;

    async fn get_aircraft(&self, id: Uuid) -> RepoResult<Option<Aircraft>>;

    /// Insert or replace by id
    async fn save_aircraft(&self, aircraft: &Aircraft) -> RepoResult<()>;

    /// Returns whether a record was removed
    async fn delete_aircraft(&self, id: Uuid) -> RepoResult<bool>;
}

/// Repository trait for pricing rules
#[async_trait]
pub trait PricingRuleRepository: Send + Sync {
    async fn list_rules(&self) -> RepoResult<Vec<PricingRule>>;

    async fn get_rule(&self, id: Uuid) -> RepoResult<Option<PricingRule>>;

    async fn save_rule(&self, rule: &PricingRule) -> RepoResult<()>;

    async fn delete_rule(&self, id: Uuid) -> RepoResult<bool>;
}

/// Repository trait for known route distances
#[async_trait]
pub trait RouteRepository: Send + Sync {
    async fn list_routes(&self) -> RepoResult<Vec<Route>>;

    /// Exact (origin, destination) match, codes already normalized
    async fn find_route(&self, origin: &str, destination: &str) -> RepoResult<Option<Route>>;

    /// Insert unless the ordered (origin, destination) pair already exists.
    /// Returns whether the route was stored.
    async fn insert_route(&self, route: &Route) -> RepoResult<bool>;
}

#[async_trait]
pub trait InquiryRepository: Send + Sync {
    async fn save_inquiry(&self, inquiry: &Inquiry) -> RepoResult<()>;

    async fn get_inquiry(&self, id: Uuid) -> RepoResult<Option<Inquiry>>;
}

#[async_trait]
pub trait QuoteRepository: Send + Sync {
    async fn save_quote(&self, quote: &Quote) -> RepoResult<()>;

    async fn get_quote(&self, id: Uuid) -> RepoResult<Option<Quote>>;

    async fn list_quotes_for_inquiry(&self, inquiry_id: Uuid) -> RepoResult<Vec<Quote>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Store a new booking unless its quote is already booked.
    /// Returns whether the booking was stored.
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<bool>;

    async fn save_booking(&self, booking: &Booking) -> RepoResult<()>;

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<Booking>>;

    async fn find_by_quote(&self, quote_id: Uuid) -> RepoResult<Option<Booking>>;
}

/// One handle per repository, shared across services
#[derive(Clone)]
pub struct Stores {
    pub aircraft: Arc<dyn AircraftRepository>,
    pub rules: Arc<dyn PricingRuleRepository>,
    pub routes: Arc<dyn RouteRepository>,
    pub inquiries: Arc<dyn InquiryRepository>,
    pub quotes: Arc<dyn QuoteRepository>,
    pub bookings: Arc<dyn BookingRepository>,
}
