use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::generator::{AircraftSummary, PricedTrip};
use crate::pricing::{LegBreakdown, Pricing};

/// Quote status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Sent,
    Accepted,
    Declined,
    Expired,
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Declined => "declined",
            QuoteStatus::Expired => "expired",
        })
    }
}

/// A priced offer for one aircraft.
///
/// `legs` and `pricing` are snapshots taken when the quote is issued;
/// nothing on the quote is recomputed from reference data afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: Uuid,
    pub inquiry_id: Option<Uuid>,
    pub aircraft_id: Uuid,
    pub aircraft: AircraftSummary,
    pub legs: Vec<LegBreakdown>,
    pub pricing: Pricing,
    pub passenger_count: u32,
    pub status: QuoteStatus,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
}

impl Quote {
    pub fn new(
        inquiry_id: Option<Uuid>,
        passenger_count: u32,
        trip: PricedTrip,
        valid_for: Duration,
        now: DateTime<Utc>,
    ) -> Result<Self, QuoteError> {
        let valid_until = now
            .checked_add_signed(valid_for)
            .ok_or(QuoteError::ValidityOutOfRange(valid_for.num_hours()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            inquiry_id,
            aircraft_id: trip.aircraft.id,
            aircraft: trip.aircraft,
            legs: trip.legs,
            pricing: trip.pricing,
            passenger_count,
            status: QuoteStatus::Pending,
            valid_until,
            created_at: now,
            updated_at: now,
            sent_at: None,
            responded_at: None,
        })
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    /// Still open for the customer to act on
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.status, QuoteStatus::Pending | QuoteStatus::Sent) && !self.is_expired_at(now)
    }

    /// Transition: Pending → Sent
    pub fn send(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        self.ensure_unlocked()?;
        if self.status != QuoteStatus::Pending {
            return Err(self.invalid(QuoteStatus::Sent));
        }
        if self.is_expired_at(now) {
            self.mark_expired(now);
            return Err(QuoteError::Expired(self.id));
        }
        self.status = QuoteStatus::Sent;
        self.sent_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Transition: Sent → Accepted. A quote past `valid_until` expires instead.
    pub fn accept(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        self.ensure_unlocked()?;
        if self.status != QuoteStatus::Sent {
            return Err(self.invalid(QuoteStatus::Accepted));
        }
        if self.is_expired_at(now) {
            self.mark_expired(now);
            return Err(QuoteError::Expired(self.id));
        }
        self.status = QuoteStatus::Accepted;
        self.responded_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Transition: Pending | Sent → Declined
    pub fn decline(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        self.ensure_unlocked()?;
        if !matches!(self.status, QuoteStatus::Pending | QuoteStatus::Sent) {
            return Err(self.invalid(QuoteStatus::Declined));
        }
        self.status = QuoteStatus::Declined;
        self.responded_at = Some(now);
        self.updated_at = now;
        Ok(())
    }

    /// Transition: Pending | Sent → Expired
    pub fn expire(&mut self, now: DateTime<Utc>) -> Result<(), QuoteError> {
        self.ensure_unlocked()?;
        if !matches!(self.status, QuoteStatus::Pending | QuoteStatus::Sent) {
            return Err(self.invalid(QuoteStatus::Expired));
        }
        self.mark_expired(now);
        Ok(())
    }

    /// Expire an open quote whose validity has lapsed. Returns whether the
    /// status changed.
    pub fn refresh_expiry(&mut self, now: DateTime<Utc>) -> bool {
        if matches!(self.status, QuoteStatus::Pending | QuoteStatus::Sent) && self.is_expired_at(now) {
            self.mark_expired(now);
            return true;
        }
        false
    }

    fn mark_expired(&mut self, now: DateTime<Utc>) {
        self.status = QuoteStatus::Expired;
        self.updated_at = now;
    }

    fn ensure_unlocked(&self) -> Result<(), QuoteError> {
        if self.status == QuoteStatus::Accepted {
            return Err(QuoteError::Locked(self.id));
        }
        Ok(())
    }

    fn invalid(&self, to: QuoteStatus) -> QuoteError {
        QuoteError::InvalidTransition {
            from: self.status.to_string(),
            to: to.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum QuoteError {
    #[error("Quote {0} has been accepted and can no longer change")]
    Locked(Uuid),

    #[error("Invalid quote transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Quote {0} has expired")]
    Expired(Uuid),

    #[error("Quote validity of {0} hours is out of range")]
    ValidityOutOfRange(i64),
}

#[cfg(test)]
mod tests {
    use super::*;
    use charter_catalog::AircraftCategory;

    fn trip() -> PricedTrip {
        PricedTrip {
            aircraft: AircraftSummary {
                id: Uuid::new_v4(),
                name: "Citation XLS".to_string(),
                tail_number: "VT-CXL".to_string(),
                category: AircraftCategory::Mid,
                seats: Some(8),
            },
            legs: Vec::new(),
            pricing: Pricing {
                base_flying_cost: 12500.0,
                fuel_surcharge: 16000.0,
                airport_fees: 2000.0,
                crew_expenses: 0.0,
                subtotal: 30500.0,
                discount_percentage: 0.0,
                discount_amount: 0.0,
                discounted_subtotal: 30500.0,
                margin_amount: 3050.0,
                margin_percentage: 10.0,
                tax_amount: 6039.0,
                tax_rate: 18.0,
                tax_label: None,
                total_cost: 39589.0,
                currency: "USD".to_string(),
                used_default_pricing: false,
                pricing_rule_id: None,
            },
        }
    }

    fn quote(now: DateTime<Utc>) -> Quote {
        Quote::new(None, 4, trip(), Duration::hours(72), now).unwrap()
    }

    #[test]
    fn test_send_then_accept() {
        let now = Utc::now();
        let mut q = quote(now);
        assert_eq!(q.status, QuoteStatus::Pending);
        assert_eq!(q.aircraft_id, q.aircraft.id);

        q.send(now).unwrap();
        assert_eq!(q.sent_at, Some(now));

        q.accept(now + Duration::hours(1)).unwrap();
        assert_eq!(q.status, QuoteStatus::Accepted);
        assert_eq!(q.pricing.total_cost, 39589.0);
    }

    #[test]
    fn test_accepted_quote_is_locked() {
        let now = Utc::now();
        let mut q = quote(now);
        q.send(now).unwrap();
        q.accept(now).unwrap();

        assert_eq!(q.decline(now), Err(QuoteError::Locked(q.id)));
        assert_eq!(q.expire(now), Err(QuoteError::Locked(q.id)));
        assert!(!q.refresh_expiry(now + Duration::days(30)));
        assert_eq!(q.status, QuoteStatus::Accepted);
    }

    #[test]
    fn test_accept_after_validity_expires() {
        let now = Utc::now();
        let mut q = quote(now);
        q.send(now).unwrap();

        let err = q.accept(now + Duration::hours(73)).unwrap_err();
        assert_eq!(err, QuoteError::Expired(q.id));
        assert_eq!(q.status, QuoteStatus::Expired);
    }

    #[test]
    fn test_cannot_accept_unsent_quote() {
        let now = Utc::now();
        let mut q = quote(now);
        assert!(matches!(q.accept(now), Err(QuoteError::InvalidTransition { .. })));
    }

    #[test]
    fn test_decline_and_expire() {
        let now = Utc::now();
        let mut q = quote(now);
        q.decline(now).unwrap();
        assert_eq!(q.status, QuoteStatus::Declined);
        assert!(q.send(now).is_err());

        let mut lapsed = quote(now);
        assert!(lapsed.refresh_expiry(now + Duration::hours(100)));
        assert_eq!(lapsed.status, QuoteStatus::Expired);
        assert!(!lapsed.is_open_at(now));
    }

    #[test]
    fn test_validity_past_calendar_end_is_rejected() {
        let now = Utc::now();
        let err = Quote::new(None, 4, trip(), Duration::hours(3_000_000_000), now).unwrap_err();
        assert_eq!(err, QuoteError::ValidityOutOfRange(3_000_000_000));
    }

    #[test]
    fn test_wire_shape() {
        let q = quote(Utc::now());
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["pricing"]["totalCost"], 39589.0);
        assert!(json.get("validUntil").is_some());
    }
}
