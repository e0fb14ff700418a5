use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InquiryReceivedEvent {
    pub inquiry_id: Uuid,
    pub trip_type: String,
    pub leg_count: usize,
    pub passenger_count: u32,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuoteIssuedEvent {
    pub quote_id: Uuid,
    pub inquiry_id: Option<Uuid>,
    pub aircraft_id: Uuid,
    pub total_cost: f64,
    pub currency: String,
    pub used_default_pricing: bool,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuoteStatusChangedEvent {
    pub quote_id: Uuid,
    pub status: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub quote_id: Uuid,
    pub inquiry_id: Option<Uuid>,
    pub total_cost: f64,
    pub currency: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BookingStatusChangedEvent {
    pub booking_id: Uuid,
    pub status: String,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RescheduleRequestedEvent {
    pub booking_id: Uuid,
    pub request_id: Uuid,
    pub leg_index: usize,
    pub original_date: NaiveDate,
    pub new_date: NaiveDate,
    pub timestamp: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RescheduleDecidedEvent {
    pub booking_id: Uuid,
    pub request_id: Uuid,
    pub approved: bool,
    pub timestamp: i64,
}

/// Everything the notification sender can be asked to deliver.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    InquiryReceived(InquiryReceivedEvent),
    QuoteIssued(QuoteIssuedEvent),
    QuoteStatusChanged(QuoteStatusChangedEvent),
    BookingConfirmed(BookingConfirmedEvent),
    BookingStatusChanged(BookingStatusChangedEvent),
    RescheduleRequested(RescheduleRequestedEvent),
    RescheduleDecided(RescheduleDecidedEvent),
}

impl DomainEvent {
    /// Topic-style name used as the log/event key.
    pub fn name(&self) -> &'static str {
        match self {
            DomainEvent::InquiryReceived(_) => "inquiry.received",
            DomainEvent::QuoteIssued(_) => "quote.issued",
            DomainEvent::QuoteStatusChanged(_) => "quote.status_changed",
            DomainEvent::BookingConfirmed(_) => "booking.confirmed",
            DomainEvent::BookingStatusChanged(_) => "booking.status_changed",
            DomainEvent::RescheduleRequested(_) => "booking.reschedule_requested",
            DomainEvent::RescheduleDecided(_) => "booking.reschedule_decided",
        }
    }
}
