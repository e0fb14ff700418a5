use chrono::{DateTime, NaiveDate, Utc};
use charter_shared::Masked;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::generator::TripRequest;
use crate::legs::TripLeg;
use crate::pricing::Pricing;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum TripType {
    OneWay,
    RoundTrip,
    MultiTrip,
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TripType::OneWay => "one-way",
            TripType::RoundTrip => "round-trip",
            TripType::MultiTrip => "multi-trip",
        })
    }
}

/// Inquiry status as staff work the request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InquiryStatus {
    New,
    Sourcing,
    Quoted,
    Converted,
    Cancelled,
}

impl InquiryStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, InquiryStatus::Converted | InquiryStatus::Cancelled)
    }
}

impl fmt::Display for InquiryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InquiryStatus::New => "new",
            InquiryStatus::Sourcing => "sourcing",
            InquiryStatus::Quoted => "quoted",
            InquiryStatus::Converted => "converted",
            InquiryStatus::Cancelled => "cancelled",
        })
    }
}

/// Customer-submitted trip request form
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInquiry {
    pub customer_name: String,
    pub customer_email: Masked<String>,
    #[serde(default)]
    pub customer_phone: Option<Masked<String>>,
    pub trip_type: TripType,
    pub legs: Vec<TripLeg>,
    pub passenger_count: u32,
    #[serde(default)]
    pub return_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewInquiry {
    pub fn into_inquiry(self) -> Result<Inquiry, InquiryError> {
        let now = Utc::now();
        let inquiry = Inquiry {
            id: Uuid::new_v4(),
            customer_name: self.customer_name.trim().to_string(),
            customer_email: Masked::new(self.customer_email.into_inner().trim().to_ascii_lowercase()),
            customer_phone: self.customer_phone,
            trip_type: self.trip_type,
            legs: self.legs,
            passenger_count: self.passenger_count,
            return_date: self.return_date,
            notes: self.notes,
            estimated_cost_breakdown: None,
            quote_ids: Vec::new(),
            status: InquiryStatus::New,
            created_at: now,
            updated_at: now,
        };
        inquiry.validate()?;
        Ok(inquiry)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inquiry {
    pub id: Uuid,
    pub customer_name: String,
    pub customer_email: Masked<String>,
    pub customer_phone: Option<Masked<String>>,
    pub trip_type: TripType,
    pub legs: Vec<TripLeg>,
    pub passenger_count: u32,
    pub return_date: Option<NaiveDate>,
    pub notes: Option<String>,
    /// Latest priced estimate, mirrors the quote pricing shape
    pub estimated_cost_breakdown: Option<Pricing>,
    #[serde(default)]
    pub quote_ids: Vec<Uuid>,
    pub status: InquiryStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Inquiry {
    pub fn validate(&self) -> Result<(), InquiryError> {
        if self.customer_name.is_empty() {
            return Err(InquiryError::Validation("customer name is required".to_string()));
        }
        if !self.customer_email.expose().contains('@') {
            return Err(InquiryError::Validation("a valid customer e-mail is required".to_string()));
        }
        if self.passenger_count == 0 {
            return Err(InquiryError::Validation("at least one passenger is required".to_string()));
        }
        if self.legs.is_empty() {
            return Err(InquiryError::Validation("at least one leg is required".to_string()));
        }

        for (index, leg) in self.legs.iter().enumerate() {
            if leg.origin.trim().is_empty() || leg.destination.trim().is_empty() {
                return Err(InquiryError::Validation(format!(
                    "leg {} needs an origin and a destination",
                    index
                )));
            }
            if leg.origin.trim().eq_ignore_ascii_case(leg.destination.trim()) {
                return Err(InquiryError::Validation(format!(
                    "leg {} departs and arrives at {}",
                    index, leg.origin
                )));
            }
        }
        for (index, pair) in self.legs.windows(2).enumerate() {
            if pair[1].departure_date < pair[0].departure_date {
                return Err(InquiryError::Validation(format!(
                    "leg {} departs before leg {}",
                    index + 1,
                    index
                )));
            }
        }

        match self.trip_type {
            TripType::OneWay if self.legs.len() != 1 => Err(InquiryError::Validation(
                "a one-way trip has exactly one leg".to_string(),
            )),
            TripType::RoundTrip => self.validate_round_trip(),
            TripType::MultiTrip if self.legs.len() < 2 => Err(InquiryError::Validation(
                "a multi-trip has at least two legs".to_string(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_round_trip(&self) -> Result<(), InquiryError> {
        match self.legs.as_slice() {
            [outbound] => match self.return_date {
                Some(date) if date >= outbound.departure_date => Ok(()),
                Some(_) => Err(InquiryError::Validation(
                    "return date is before the outbound departure".to_string(),
                )),
                None => Err(InquiryError::Validation(
                    "a round trip needs a return date or a return leg".to_string(),
                )),
            },
            [outbound, inbound] => {
                let reverses = outbound.origin.trim().eq_ignore_ascii_case(inbound.destination.trim())
                    && outbound.destination.trim().eq_ignore_ascii_case(inbound.origin.trim());
                if reverses {
                    Ok(())
                } else {
                    Err(InquiryError::Validation(
                        "the return leg must reverse the outbound leg".to_string(),
                    ))
                }
            }
            _ => Err(InquiryError::Validation(
                "a round trip has one outbound and one return leg".to_string(),
            )),
        }
    }

    /// Legs to price. A round trip given as one leg plus a return date
    /// gets its return leg here.
    pub fn expanded_legs(&self) -> Vec<TripLeg> {
        match (self.trip_type, self.legs.as_slice(), self.return_date) {
            (TripType::RoundTrip, [outbound], Some(date)) => {
                vec![outbound.clone(), outbound.reversed(date)]
            }
            _ => self.legs.clone(),
        }
    }

    pub fn trip_request(&self, aircraft_id: Option<Uuid>) -> TripRequest {
        TripRequest {
            legs: self.expanded_legs(),
            passenger_count: self.passenger_count,
            aircraft_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Transition: New → Sourcing
    pub fn start_sourcing(&mut self) -> Result<(), InquiryError> {
        self.transition(&[InquiryStatus::New], InquiryStatus::Sourcing)
    }

    /// Transition: New | Sourcing | Quoted → Quoted, recording the estimate
    pub fn mark_quoted(&mut self, quote_id: Uuid, pricing: &Pricing) -> Result<(), InquiryError> {
        self.transition(
            &[InquiryStatus::New, InquiryStatus::Sourcing, InquiryStatus::Quoted],
            InquiryStatus::Quoted,
        )?;
        self.estimated_cost_breakdown = Some(pricing.clone());
        if !self.quote_ids.contains(&quote_id) {
            self.quote_ids.push(quote_id);
        }
        Ok(())
    }

    /// Transition: Quoted → Converted
    pub fn mark_converted(&mut self) -> Result<(), InquiryError> {
        self.transition(&[InquiryStatus::Quoted], InquiryStatus::Converted)
    }

    /// Cancel from any non-terminal state
    pub fn cancel(&mut self) -> Result<(), InquiryError> {
        self.transition(
            &[InquiryStatus::New, InquiryStatus::Sourcing, InquiryStatus::Quoted],
            InquiryStatus::Cancelled,
        )
    }

    fn transition(&mut self, from: &[InquiryStatus], to: InquiryStatus) -> Result<(), InquiryError> {
        if !from.contains(&self.status) {
            return Err(InquiryError::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.updated_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InquiryError {
    #[error("Invalid inquiry: {0}")]
    Validation(String),

    #[error("Invalid inquiry transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}
