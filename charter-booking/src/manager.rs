use chrono::{NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, PaymentStatus, RescheduleRequest, RescheduleStatus};

/// Booking lifecycle and state transitions.
///
/// Operates on a booking loaded by the caller; persistence stays with the
/// repository.
pub struct BookingManager;

impl BookingManager {
    /// Transition: Confirmed → Scheduled
    pub fn schedule(booking: &mut Booking) -> Result<(), BookingError> {
        Self::transition(booking, &[BookingStatus::Confirmed], BookingStatus::Scheduled)
    }

    /// Transition: Scheduled → InProgress (first leg departed)
    pub fn start(booking: &mut Booking) -> Result<(), BookingError> {
        Self::transition(booking, &[BookingStatus::Scheduled], BookingStatus::InProgress)
    }

    /// Transition: InProgress → Completed
    pub fn complete(booking: &mut Booking) -> Result<(), BookingError> {
        Self::transition(booking, &[BookingStatus::InProgress], BookingStatus::Completed)
    }

    /// Cancel a booking (any status except Completed/Cancelled)
    pub fn cancel(booking: &mut Booking) -> Result<(), BookingError> {
        Self::transition(
            booking,
            &[BookingStatus::Confirmed, BookingStatus::Scheduled, BookingStatus::InProgress],
            BookingStatus::Cancelled,
        )?;
        if let Some(request) = booking
            .reschedule_requests
            .iter_mut()
            .find(|r| r.status == RescheduleStatus::Pending)
        {
            request.status = RescheduleStatus::Rejected;
            request.decided_at = Some(Utc::now());
        }
        Ok(())
    }

    /// Apply a status by name, as sent by the back office
    pub fn apply_status(booking: &mut Booking, status: BookingStatus) -> Result<(), BookingError> {
        match status {
            BookingStatus::Scheduled => Self::schedule(booking),
            BookingStatus::InProgress => Self::start(booking),
            BookingStatus::Completed => Self::complete(booking),
            BookingStatus::Cancelled => Self::cancel(booking),
            BookingStatus::Confirmed => Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: status.to_string(),
            }),
        }
    }

    /// Record a payment status change.
    ///
    /// Refunded is final. A cancelled booking only moves to Refunded.
    pub fn update_payment(booking: &mut Booking, status: PaymentStatus) -> Result<(), BookingError> {
        let allowed = match (booking.payment_status, status) {
            (PaymentStatus::Refunded, _) => false,
            (PaymentStatus::Pending, PaymentStatus::Refunded) => false,
            (_, PaymentStatus::Refunded) => true,
            (_, to) => booking.status != BookingStatus::Cancelled && to != booking.payment_status,
        };
        if !allowed {
            return Err(BookingError::InvalidPayment {
                from: booking.payment_status.to_string(),
                to: status.to_string(),
            });
        }

        info!(booking_id = %booking.id, from = %booking.payment_status, to = %status, "Payment status updated");
        booking.payment_status = status;
        booking.updated_at = Utc::now();
        Ok(())
    }

    /// Ask to move one leg to a new date. Only one request may be pending.
    pub fn request_reschedule(
        booking: &mut Booking,
        leg_index: usize,
        new_date: NaiveDate,
        reason: Option<String>,
    ) -> Result<RescheduleRequest, BookingError> {
        Self::ensure_reschedulable(booking)?;
        if let Some(pending) = booking.pending_reschedule() {
            return Err(BookingError::ReschedulePending(pending.id));
        }

        let original_date = booking
            .legs
            .get(leg_index)
            .map(|leg| leg.departure_date)
            .ok_or(BookingError::LegOutOfRange {
                index: leg_index,
                legs: booking.legs.len(),
            })?;
        if new_date == original_date {
            return Err(BookingError::InvalidReschedule(format!(
                "leg {} already departs on {}",
                leg_index, new_date
            )));
        }
        Self::check_leg_order(booking, leg_index, new_date)?;

        let request = RescheduleRequest {
            id: Uuid::new_v4(),
            requested_at: Utc::now(),
            leg_index,
            original_date,
            new_date,
            reason,
            status: RescheduleStatus::Pending,
            decided_at: None,
        };
        booking.reschedule_requests.push(request.clone());
        booking.updated_at = Utc::now();
        info!(booking_id = %booking.id, request_id = %request.id, leg_index, %new_date, "Reschedule requested");
        Ok(request)
    }

    /// Approve a pending request and move the leg to the requested date
    pub fn approve_reschedule(booking: &mut Booking, request_id: &Uuid) -> Result<(), BookingError> {
        Self::ensure_reschedulable(booking)?;
        let (leg_index, new_date) = {
            let request = Self::pending_request(booking, request_id)?;
            (request.leg_index, request.new_date)
        };
        Self::check_leg_order(booking, leg_index, new_date)?;

        let legs = booking.legs.len();
        let leg = booking
            .legs
            .get_mut(leg_index)
            .ok_or(BookingError::LegOutOfRange { index: leg_index, legs })?;
        leg.departure_date = new_date;

        let request = Self::pending_request_mut(booking, request_id)?;
        request.status = RescheduleStatus::Approved;
        request.decided_at = Some(Utc::now());
        booking.updated_at = Utc::now();
        info!(booking_id = %booking.id, request_id = %request_id, "Reschedule approved");
        Ok(())
    }

    /// Reject a pending request; the legs are left untouched
    pub fn reject_reschedule(booking: &mut Booking, request_id: &Uuid) -> Result<(), BookingError> {
        let request = Self::pending_request_mut(booking, request_id)?;
        request.status = RescheduleStatus::Rejected;
        request.decided_at = Some(Utc::now());
        booking.updated_at = Utc::now();
        info!(booking_id = %booking.id, request_id = %request_id, "Reschedule rejected");
        Ok(())
    }

    fn transition(
        booking: &mut Booking,
        from: &[BookingStatus],
        to: BookingStatus,
    ) -> Result<(), BookingError> {
        if !from.contains(&booking.status) {
            return Err(BookingError::InvalidTransition {
                from: booking.status.to_string(),
                to: to.to_string(),
            });
        }
        info!(booking_id = %booking.id, from = %booking.status, to = %to, "Booking status changed");
        booking.update_status(to);
        Ok(())
    }

    fn ensure_reschedulable(booking: &Booking) -> Result<(), BookingError> {
        if matches!(booking.status, BookingStatus::Confirmed | BookingStatus::Scheduled) {
            Ok(())
        } else {
            Err(BookingError::NotModifiable {
                booking_id: booking.id,
                status: booking.status.to_string(),
            })
        }
    }

    /// The new date must keep the legs in departure order
    fn check_leg_order(booking: &Booking, leg_index: usize, new_date: NaiveDate) -> Result<(), BookingError> {
        let previous = leg_index
            .checked_sub(1)
            .and_then(|i| booking.legs.get(i))
            .map(|leg| leg.departure_date);
        let next = booking.legs.get(leg_index + 1).map(|leg| leg.departure_date);

        if previous.is_some_and(|date| new_date < date) || next.is_some_and(|date| new_date > date) {
            return Err(BookingError::InvalidReschedule(format!(
                "{} would put leg {} out of order",
                new_date, leg_index
            )));
        }
        Ok(())
    }

    fn pending_request<'a>(booking: &'a Booking, request_id: &Uuid) -> Result<&'a RescheduleRequest, BookingError> {
        let request = booking
            .reschedule_requests
            .iter()
            .find(|r| r.id == *request_id)
            .ok_or(BookingError::RescheduleNotFound(*request_id))?;
        if request.status != RescheduleStatus::Pending {
            return Err(BookingError::RescheduleDecided(*request_id));
        }
        Ok(request)
    }

    fn pending_request_mut<'a>(
        booking: &'a mut Booking,
        request_id: &Uuid,
    ) -> Result<&'a mut RescheduleRequest, BookingError> {
        let request = booking
            .reschedule_requests
            .iter_mut()
            .find(|r| r.id == *request_id)
            .ok_or(BookingError::RescheduleNotFound(*request_id))?;
        if request.status != RescheduleStatus::Pending {
            return Err(BookingError::RescheduleDecided(*request_id));
        }
        Ok(request)
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum BookingError {
    #[error("Quote {quote_id} is {status}; only accepted quotes can be booked")]
    QuoteNotAccepted { quote_id: Uuid, status: String },

    #[error("Invalid booking transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Booking {booking_id} is {status} and can no longer be changed")]
    NotModifiable { booking_id: Uuid, status: String },

    #[error("Invalid payment status change from {from} to {to}")]
    InvalidPayment { from: String, to: String },

    #[error("Leg {index} does not exist; the booking has {legs} legs")]
    LegOutOfRange { index: usize, legs: usize },

    #[error("Reschedule request {0} is still pending")]
    ReschedulePending(Uuid),

    #[error("Reschedule request not found: {0}")]
    RescheduleNotFound(Uuid),

    #[error("Reschedule request {0} has already been decided")]
    RescheduleDecided(Uuid),

    #[error("Invalid reschedule: {0}")]
    InvalidReschedule(String),
}
