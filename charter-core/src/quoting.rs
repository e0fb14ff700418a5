use charter_booking::{Booking, BookingManager, BookingStatus, PaymentStatus, RescheduleRequest};
use charter_catalog::{normalize_code, RouteTable};
use charter_quote::{
    GeneratorConfig, Inquiry, InquiryError, NewInquiry, PricingError, Quote, QuoteError,
    QuoteGenerator, SearchOutcome, TripLeg, TripRequest,
};
use charter_shared::models::events::{
    BookingConfirmedEvent, BookingStatusChangedEvent, InquiryReceivedEvent, QuoteIssuedEvent,
    QuoteStatusChangedEvent, RescheduleDecidedEvent, RescheduleRequestedEvent,
};
use charter_shared::DomainEvent;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::notify::Notifier;
use crate::repository::{
    AircraftRepository, BookingRepository, InquiryRepository, PricingRuleRepository,
    QuoteRepository, RouteRepository, Stores,
};
use crate::{CoreError, CoreResult};

#[derive(Debug, Clone)]
pub struct QuotingSettings {
    pub generator: GeneratorConfig,
    /// How long an issued quote stays open
    pub quote_validity: Duration,
    /// Longest validity a caller may ask for
    pub max_quote_validity: Duration,
}

impl Default for QuotingSettings {
    fn default() -> Self {
        Self {
            generator: GeneratorConfig::default(),
            quote_validity: Duration::hours(72),
            max_quote_validity: Duration::days(30),
        }
    }
}

/// Orchestrates search, inquiry, quote and booking flows over the
/// repositories. All pricing goes through one [`QuoteGenerator`].
pub struct QuotingService {
    aircraft: Arc<dyn AircraftRepository>,
    rules: Arc<dyn PricingRuleRepository>,
    routes: Arc<dyn RouteRepository>,
    inquiries: Arc<dyn InquiryRepository>,
    quotes: Arc<dyn QuoteRepository>,
    bookings: Arc<dyn BookingRepository>,
    notifier: Arc<dyn Notifier>,
    generator: QuoteGenerator,
    quote_validity: Duration,
    max_quote_validity: Duration,
}

impl QuotingService {
    pub fn new(stores: &Stores, notifier: Arc<dyn Notifier>, settings: QuotingSettings) -> Self {
        Self {
            aircraft: stores.aircraft.clone(),
            rules: stores.rules.clone(),
            routes: stores.routes.clone(),
            inquiries: stores.inquiries.clone(),
            quotes: stores.quotes.clone(),
            bookings: stores.bookings.clone(),
            notifier,
            generator: QuoteGenerator::new(settings.generator),
            quote_validity: settings.quote_validity,
            max_quote_validity: settings.max_quote_validity,
        }
    }

    // ------------------------------------------------------------------
    // Search
    // ------------------------------------------------------------------

    /// Price a trip across the active fleet, or for one aircraft when the
    /// request names it.
    ///
    /// A single-aircraft search surfaces that aircraft's pricing error. A
    /// fleet search with no survivors fails with `NoAircraftMatched`.
    pub async fn search(&self, request: &TripRequest, date: NaiveDate) -> CoreResult<SearchOutcome> {
        request.validate()?;

        let fleet = match request.aircraft_id {
            Some(id) => {
                let aircraft = self
                    .aircraft
                    .get_aircraft(id)
                    .await?
                    .ok_or(PricingError::AircraftNotFound(id))?;
                vec![aircraft]
            }
            None => self.aircraft.list_aircraft(true).await?,
        };
        let rules = self.rules.list_rules().await?;
        let routes = self.route_table(&request.legs).await?;

        if let [aircraft] = fleet.as_slice() {
            if request.aircraft_id.is_some() {
                let trip = self
                    .generator
                    .quote_aircraft(aircraft, request, &rules, &routes, date)?;
                return Ok(SearchOutcome {
                    results: vec![trip.into()],
                    excluded: Vec::new(),
                });
            }
        }

        let outcome = self.generator.search(request, &fleet, &rules, &routes, date);
        info!(
            legs = request.legs.len(),
            passengers = request.passenger_count,
            priced = outcome.results.len(),
            excluded = outcome.excluded.len(),
            "Charter search complete"
        );
        if outcome.results.is_empty() {
            return Err(CoreError::NoAircraftMatched {
                excluded: outcome.excluded,
            });
        }
        Ok(outcome)
    }

    /// Prefetch the routes the legs need. Legs with a manual distance skip
    /// the lookup.
    async fn route_table(&self, legs: &[TripLeg]) -> CoreResult<RouteTable> {
        let pairs: BTreeSet<(String, String)> = legs
            .iter()
            .filter(|leg| leg.distance_km.is_none())
            .map(|leg| (normalize_code(&leg.origin), normalize_code(&leg.destination)))
            .collect();

        let mut table = RouteTable::new();
        for (origin, destination) in pairs {
            if let Some(route) = self.routes.find_route(&origin, &destination).await? {
                table.insert(route);
            }
        }
        Ok(table)
    }

    // ------------------------------------------------------------------
    // Inquiries
    // ------------------------------------------------------------------

    pub async fn create_inquiry(&self, input: NewInquiry) -> CoreResult<Inquiry> {
        let inquiry = input.into_inquiry()?;
        self.inquiries.save_inquiry(&inquiry).await?;

        info!(
            inquiry_id = %inquiry.id,
            customer_email = %inquiry.customer_email.hint(),
            trip_type = %inquiry.trip_type,
            "Inquiry received"
        );
        self.emit(DomainEvent::InquiryReceived(InquiryReceivedEvent {
            inquiry_id: inquiry.id,
            trip_type: inquiry.trip_type.to_string(),
            leg_count: inquiry.expanded_legs().len(),
            passenger_count: inquiry.passenger_count,
            timestamp: Utc::now().timestamp(),
        }))
        .await;
        Ok(inquiry)
    }

    pub async fn get_inquiry(&self, id: Uuid) -> CoreResult<Inquiry> {
        self.inquiries
            .get_inquiry(id)
            .await?
            .ok_or(CoreError::not_found("Inquiry", id))
    }

    pub async fn start_sourcing(&self, id: Uuid) -> CoreResult<Inquiry> {
        let mut inquiry = self.get_inquiry(id).await?;
        inquiry.start_sourcing()?;
        self.inquiries.save_inquiry(&inquiry).await?;
        info!(inquiry_id = %id, "Inquiry moved to sourcing");
        Ok(inquiry)
    }

    pub async fn cancel_inquiry(&self, id: Uuid) -> CoreResult<Inquiry> {
        let mut inquiry = self.get_inquiry(id).await?;
        inquiry.cancel()?;
        self.inquiries.save_inquiry(&inquiry).await?;
        info!(inquiry_id = %id, "Inquiry cancelled");
        Ok(inquiry)
    }

    pub async fn list_inquiry_quotes(&self, id: Uuid) -> CoreResult<Vec<Quote>> {
        self.get_inquiry(id).await?;
        let mut quotes = self.quotes.list_quotes_for_inquiry(id).await?;
        quotes.sort_by_key(|q| q.created_at);
        Ok(quotes)
    }

    /// Price the inquiry's trip on one aircraft and issue a quote.
    ///
    /// The pricing is snapshotted onto the quote and copied onto the
    /// inquiry as its latest estimate.
    pub async fn quote_inquiry(
        &self,
        inquiry_id: Uuid,
        aircraft_id: Uuid,
        valid_for: Option<Duration>,
    ) -> CoreResult<Quote> {
        if let Some(requested) = valid_for {
            if requested <= Duration::zero() || requested > self.max_quote_validity {
                return Err(CoreError::ValidationError(format!(
                    "quote validity must be between 1 and {} hours",
                    self.max_quote_validity.num_hours()
                )));
            }
        }
        let mut inquiry = self.get_inquiry(inquiry_id).await?;
        if inquiry.is_terminal() {
            return Err(InquiryError::InvalidTransition {
                from: inquiry.status.to_string(),
                to: "quoted".to_string(),
            }
            .into());
        }

        let aircraft = self
            .aircraft
            .get_aircraft(aircraft_id)
            .await?
            .ok_or(PricingError::AircraftNotFound(aircraft_id))?;
        let request = inquiry.trip_request(Some(aircraft_id));
        let rules = self.rules.list_rules().await?;
        let routes = self.route_table(&request.legs).await?;

        let now = Utc::now();
        let trip = self
            .generator
            .quote_aircraft(&aircraft, &request, &rules, &routes, now.date_naive())?;
        let quote = Quote::new(
            Some(inquiry.id),
            inquiry.passenger_count,
            trip,
            valid_for.unwrap_or(self.quote_validity),
            now,
        )?;

        self.quotes.save_quote(&quote).await?;
        inquiry.mark_quoted(quote.id, &quote.pricing)?;
        self.inquiries.save_inquiry(&inquiry).await?;

        info!(
            quote_id = %quote.id,
            inquiry_id = %inquiry.id,
            aircraft_id = %aircraft.id,
            total_cost = quote.pricing.total_cost,
            used_default_pricing = quote.pricing.used_default_pricing,
            "Quote issued"
        );
        self.emit(DomainEvent::QuoteIssued(QuoteIssuedEvent {
            quote_id: quote.id,
            inquiry_id: quote.inquiry_id,
            aircraft_id: quote.aircraft_id,
            total_cost: quote.pricing.total_cost,
            currency: quote.pricing.currency.clone(),
            used_default_pricing: quote.pricing.used_default_pricing,
            timestamp: now.timestamp(),
        }))
        .await;
        Ok(quote)
    }

    // ------------------------------------------------------------------
    // Quotes
    // ------------------------------------------------------------------

    /// Load a quote, expiring it first if its validity has lapsed.
    pub async fn get_quote(&self, id: Uuid) -> CoreResult<Quote> {
        let mut quote = self
            .quotes
            .get_quote(id)
            .await?
            .ok_or(CoreError::not_found("Quote", id))?;
        if quote.refresh_expiry(Utc::now()) {
            self.quotes.save_quote(&quote).await?;
            self.quote_changed(&quote).await;
        }
        Ok(quote)
    }

    pub async fn send_quote(&self, id: Uuid) -> CoreResult<Quote> {
        self.update_quote(id, Quote::send).await
    }

    pub async fn accept_quote(&self, id: Uuid) -> CoreResult<Quote> {
        self.update_quote(id, Quote::accept).await
    }

    pub async fn decline_quote(&self, id: Uuid) -> CoreResult<Quote> {
        self.update_quote(id, Quote::decline).await
    }

    /// Apply a transition. An attempt that trips the validity window still
    /// persists the expired status before the error is returned.
    async fn update_quote<F>(&self, id: Uuid, transition: F) -> CoreResult<Quote>
    where
        F: FnOnce(&mut Quote, DateTime<Utc>) -> Result<(), QuoteError>,
    {
        let mut quote = self
            .quotes
            .get_quote(id)
            .await?
            .ok_or(CoreError::not_found("Quote", id))?;

        match transition(&mut quote, Utc::now()) {
            Ok(()) => {
                self.quotes.save_quote(&quote).await?;
                info!(quote_id = %id, status = %quote.status, "Quote status changed");
                self.quote_changed(&quote).await;
                Ok(quote)
            }
            Err(err @ QuoteError::Expired(_)) => {
                self.quotes.save_quote(&quote).await?;
                warn!(quote_id = %id, "Quote expired before it could change");
                self.quote_changed(&quote).await;
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn quote_changed(&self, quote: &Quote) {
        self.emit(DomainEvent::QuoteStatusChanged(QuoteStatusChangedEvent {
            quote_id: quote.id,
            status: quote.status.to_string(),
            timestamp: Utc::now().timestamp(),
        }))
        .await;
    }

    // ------------------------------------------------------------------
    // Bookings
    // ------------------------------------------------------------------

    /// Turn an accepted quote into a booking and convert its inquiry.
    pub async fn book_quote(&self, quote_id: Uuid) -> CoreResult<Booking> {
        let quote = self.get_quote(quote_id).await?;
        if let Some(existing) = self.bookings.find_by_quote(quote_id).await? {
            return Err(CoreError::Conflict(format!(
                "quote {} is already booked as {}",
                quote_id, existing.id
            )));
        }
        let booking = Booking::from_quote(&quote)?;

        let inquiry = match quote.inquiry_id {
            Some(inquiry_id) => {
                let mut inquiry = self.get_inquiry(inquiry_id).await?;
                inquiry.mark_converted()?;
                Some(inquiry)
            }
            None => None,
        };

        if !self.bookings.insert_booking(&booking).await? {
            return Err(CoreError::Conflict(format!("quote {} is already booked", quote_id)));
        }
        if let Some(inquiry) = inquiry {
            self.inquiries.save_inquiry(&inquiry).await?;
        }

        info!(booking_id = %booking.id, quote_id = %quote_id, "Booking confirmed");
        self.emit(DomainEvent::BookingConfirmed(BookingConfirmedEvent {
            booking_id: booking.id,
            quote_id,
            inquiry_id: booking.inquiry_id,
            total_cost: booking.pricing.total_cost,
            currency: booking.pricing.currency.clone(),
            timestamp: Utc::now().timestamp(),
        }))
        .await;
        Ok(booking)
    }

    pub async fn get_booking(&self, id: Uuid) -> CoreResult<Booking> {
        self.bookings
            .get_booking(id)
            .await?
            .ok_or(CoreError::not_found("Booking", id))
    }

    pub async fn update_booking_status(&self, id: Uuid, status: BookingStatus) -> CoreResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        BookingManager::apply_status(&mut booking, status)?;
        self.bookings.save_booking(&booking).await?;

        self.emit(DomainEvent::BookingStatusChanged(BookingStatusChangedEvent {
            booking_id: id,
            status: booking.status.to_string(),
            timestamp: Utc::now().timestamp(),
        }))
        .await;
        Ok(booking)
    }

    pub async fn update_payment(&self, id: Uuid, status: PaymentStatus) -> CoreResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        BookingManager::update_payment(&mut booking, status)?;
        self.bookings.save_booking(&booking).await?;
        Ok(booking)
    }

    pub async fn request_reschedule(
        &self,
        id: Uuid,
        leg_index: usize,
        new_date: NaiveDate,
        reason: Option<String>,
    ) -> CoreResult<RescheduleRequest> {
        let mut booking = self.get_booking(id).await?;
        let request = BookingManager::request_reschedule(&mut booking, leg_index, new_date, reason)?;
        self.bookings.save_booking(&booking).await?;

        self.emit(DomainEvent::RescheduleRequested(RescheduleRequestedEvent {
            booking_id: id,
            request_id: request.id,
            leg_index,
            original_date: request.original_date,
            new_date,
            timestamp: Utc::now().timestamp(),
        }))
        .await;
        Ok(request)
    }

    pub async fn approve_reschedule(&self, id: Uuid, request_id: Uuid) -> CoreResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        BookingManager::approve_reschedule(&mut booking, &request_id)?;
        self.bookings.save_booking(&booking).await?;
        self.reschedule_decided(id, request_id, true).await;
        Ok(booking)
    }

    pub async fn reject_reschedule(&self, id: Uuid, request_id: Uuid) -> CoreResult<Booking> {
        let mut booking = self.get_booking(id).await?;
        BookingManager::reject_reschedule(&mut booking, &request_id)?;
        self.bookings.save_booking(&booking).await?;
        self.reschedule_decided(id, request_id, false).await;
        Ok(booking)
    }

    async fn reschedule_decided(&self, booking_id: Uuid, request_id: Uuid, approved: bool) {
        self.emit(DomainEvent::RescheduleDecided(RescheduleDecidedEvent {
            booking_id,
            request_id,
            approved,
            timestamp: Utc::now().timestamp(),
        }))
        .await;
    }

    async fn emit(&self, event: DomainEvent) {
        if let Err(e) = self.notifier.notify(&event).await {
            warn!(event = event.name(), error = %e, "Failed to deliver notification");
        }
    }
}
