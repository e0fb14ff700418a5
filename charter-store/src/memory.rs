use async_trait::async_trait;
use charter_booking::Booking;
use charter_catalog::{Aircraft, PricingRule, Route};
use charter_core::repository::{
    AircraftRepository, BookingRepository, InquiryRepository, PricingRuleRepository,
    QuoteRepository, RouteRepository,
};
use charter_core::{RepoResult, Stores};
use charter_quote::{Inquiry, Quote};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store behind every repository trait. Backs the `memory`
/// storage backend and the test suites.
#[derive(Default)]
pub struct InMemoryStore {
    aircraft: RwLock<HashMap<Uuid, Aircraft>>,
    rules: RwLock<HashMap<Uuid, PricingRule>>,
    routes: RwLock<HashMap<(String, String), Route>>,
    inquiries: RwLock<HashMap<Uuid, Inquiry>>,
    quotes: RwLock<HashMap<Uuid, Quote>>,
    bookings: RwLock<HashMap<Uuid, Booking>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stores(self: Arc<Self>) -> Stores {
        Stores {
            aircraft: self.clone(),
            rules: self.clone(),
            routes: self.clone(),
            inquiries: self.clone(),
            quotes: self.clone(),
            bookings: self,
        }
    }
}

#[async_trait]
impl AircraftRepository for InMemoryStore {
    async fn list_aircraft(&self, active_only: bool) -> RepoResult<Vec<Aircraft>> {
        let aircraft = self.aircraft.read().await;
        let mut fleet: Vec<Aircraft> = aircraft
            .values()
            .filter(|a| !active_only || a.is_active)
            .cloned()
            .collect();
        fleet.sort_by(|a, b| a.tail_number.cmp(&b.tail_number));
        Ok(fleet)
    }

    async fn get_aircraft(&self, id: Uuid) -> RepoResult<Option<Aircraft>> {
        Ok(self.aircraft.read().await.get(&id).cloned())
    }

    async fn save_aircraft(&self, aircraft: &Aircraft) -> RepoResult<()> {
        self.aircraft.write().await.insert(aircraft.id, aircraft.clone());
        Ok(())
    }

    async fn delete_aircraft(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.aircraft.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl PricingRuleRepository for InMemoryStore {
    async fn list_rules(&self) -> RepoResult<Vec<PricingRule>> {
        Ok(self.rules.read().await.values().cloned().collect())
    }

    async fn get_rule(&self, id: Uuid) -> RepoResult<Option<PricingRule>> {
        Ok(self.rules.read().await.get(&id).cloned())
    }

    async fn save_rule(&self, rule: &PricingRule) -> RepoResult<()> {
        self.rules.write().await.insert(rule.id, rule.clone());
        Ok(())
    }

    async fn delete_rule(&self, id: Uuid) -> RepoResult<bool> {
        Ok(self.rules.write().await.remove(&id).is_some())
    }
}

#[async_trait]
impl RouteRepository for InMemoryStore {
    async fn list_routes(&self) -> RepoResult<Vec<Route>> {
        Ok(self.routes.read().await.values().cloned().collect())
    }

    async fn find_route(&self, origin: &str, destination: &str) -> RepoResult<Option<Route>> {
        let key = (origin.to_string(), destination.to_string());
        Ok(self.routes.read().await.get(&key).cloned())
    }

    async fn insert_route(&self, route: &Route) -> RepoResult<bool> {
        let mut routes = self.routes.write().await;
        if routes.contains_key(&route.key()) {
            return Ok(false);
        }
        routes.insert(route.key(), route.clone());
        Ok(true)
    }
}

#[async_trait]
impl InquiryRepository for InMemoryStore {
    async fn save_inquiry(&self, inquiry: &Inquiry) -> RepoResult<()> {
        self.inquiries.write().await.insert(inquiry.id, inquiry.clone());
        Ok(())
    }

    async fn get_inquiry(&self, id: Uuid) -> RepoResult<Option<Inquiry>> {
        Ok(self.inquiries.read().await.get(&id).cloned())
    }
}

#[async_trait]
impl QuoteRepository for InMemoryStore {
    async fn save_quote(&self, quote: &Quote) -> RepoResult<()> {
        self.quotes.write().await.insert(quote.id, quote.clone());
        Ok(())
    }

    async fn get_quote(&self, id: Uuid) -> RepoResult<Option<Quote>> {
        Ok(self.quotes.read().await.get(&id).cloned())
    }

    async fn list_quotes_for_inquiry(&self, inquiry_id: Uuid) -> RepoResult<Vec<Quote>> {
        Ok(self
            .quotes
            .read()
            .await
            .values()
            .filter(|q| q.inquiry_id == Some(inquiry_id))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn insert_booking(&self, booking: &Booking) -> RepoResult<bool> {
        let mut bookings = self.bookings.write().await;
        if bookings.values().any(|b| b.quote_id == booking.quote_id) {
            return Ok(false);
        }
        bookings.insert(booking.id, booking.clone());
        Ok(true)
    }

    async fn save_booking(&self, booking: &Booking) -> RepoResult<()> {
        self.bookings.write().await.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> RepoResult<Option<Booking>> {
        Ok(self.bookings.read().await.get(&id).cloned())
    }

    async fn find_by_quote(&self, quote_id: Uuid) -> RepoResult<Option<Booking>> {
        Ok(self
            .bookings
            .read()
            .await
            .values()
            .find(|b| b.quote_id == quote_id)
            .cloned())
    }
}
