use chrono::{DateTime, NaiveDate, Utc};
use charter_quote::{AircraftSummary, LegBreakdown, Pricing, Quote, QuoteStatus};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::manager::BookingError;

/// Booking status in the lifecycle
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    Confirmed,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Scheduled => "scheduled",
            BookingStatus::InProgress => "in-progress",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentStatus {
    Pending,
    PartiallyPaid,
    Paid,
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::PartiallyPaid => "partially-paid",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        })
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RescheduleStatus {
    Pending,
    Approved,
    Rejected,
}

/// A customer's request to move one leg to another date
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RescheduleRequest {
    pub id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub leg_index: usize,
    pub original_date: NaiveDate,
    pub new_date: NaiveDate,
    pub reason: Option<String>,
    pub status: RescheduleStatus,
    pub decided_at: Option<DateTime<Utc>>,
}

/// A confirmed charter, derived from an accepted quote.
///
/// `pricing` is copied from the quote when the booking is made and is never
/// recomputed, including after a reschedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub quote_id: Uuid,
    pub inquiry_id: Option<Uuid>,
    pub aircraft_id: Uuid,
    pub aircraft: AircraftSummary,
    pub legs: Vec<LegBreakdown>,
    pub pricing: Pricing,
    pub passenger_count: u32,
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub reschedule_requests: Vec<RescheduleRequest>,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Create a booking from an accepted quote
    pub fn from_quote(quote: &Quote) -> Result<Self, BookingError> {
        if quote.status != QuoteStatus::Accepted {
            return Err(BookingError::QuoteNotAccepted {
                quote_id: quote.id,
                status: quote.status.to_string(),
            });
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            quote_id: quote.id,
            inquiry_id: quote.inquiry_id,
            aircraft_id: quote.aircraft_id,
            aircraft: quote.aircraft.clone(),
            legs: quote.legs.clone(),
            pricing: quote.pricing.clone(),
            passenger_count: quote.passenger_count,
            payment_status: PaymentStatus::Pending,
            reschedule_requests: Vec::new(),
            status: BookingStatus::Confirmed,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn update_status(&mut self, new_status: BookingStatus) {
        self.status = new_status;
        self.updated_at = Utc::now();
    }

    pub fn pending_reschedule(&self) -> Option<&RescheduleRequest> {
        self.reschedule_requests
            .iter()
            .find(|r| r.status == RescheduleStatus::Pending)
    }

    /// First departure date, if the booking has legs
    pub fn departure_date(&self) -> Option<NaiveDate> {
        self.legs.first().map(|leg| leg.departure_date)
    }
}
