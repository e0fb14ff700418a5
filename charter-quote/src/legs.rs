use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use charter_catalog::{normalize_code, RouteTable};
use serde::{Deserialize, Serialize};

use crate::error::PricingError;

/// One requested origin -> destination segment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripLeg {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default)]
    pub departure_time: Option<NaiveTime>,
    #[serde(default)]
    pub passenger_count: Option<u32>,
    /// Manually entered distance, used when no Route is on file
    #[serde(default, rename = "distance", alias = "distanceKm")]
    pub distance_km: Option<f64>,
}

impl TripLeg {
    pub fn new(origin: &str, destination: &str, departure_date: NaiveDate) -> Self {
        Self {
            origin: normalize_code(origin),
            destination: normalize_code(destination),
            departure_date,
            departure_time: None,
            passenger_count: None,
            distance_km: None,
        }
    }

    pub fn with_distance(mut self, distance_km: f64) -> Self {
        self.distance_km = Some(distance_km);
        self
    }

    pub fn with_departure_time(mut self, time: NaiveTime) -> Self {
        self.departure_time = Some(time);
        self
    }

    pub fn departure(&self) -> Option<NaiveDateTime> {
        self.departure_time.map(|t| self.departure_date.and_time(t))
    }

    /// The same segment flown the other way on `date`.
    pub fn reversed(&self, date: NaiveDate) -> Self {
        Self {
            origin: self.destination.clone(),
            destination: self.origin.clone(),
            departure_date: date,
            departure_time: None,
            passenger_count: self.passenger_count,
            distance_km: self.distance_km,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSource {
    Manual,
    Route,
}

/// A leg with its distance and flight time settled.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLeg {
    pub leg: TripLeg,
    pub distance_km: f64,
    pub flight_hours: f64,
    pub distance_source: DistanceSource,
}

/// Manual distance first, then the ordered route lookup.
pub fn resolve_distance(
    index: usize,
    leg: &TripLeg,
    routes: &RouteTable,
) -> Result<(f64, DistanceSource), PricingError> {
    if let Some(distance) = leg.distance_km {
        if !distance.is_finite() || distance < 0.0 {
            return Err(PricingError::InvalidLeg {
                index,
                reason: format!("distance must be a non-negative number, got {}", distance),
            });
        }
        return Ok((distance, DistanceSource::Manual));
    }

    routes
        .distance_km(&leg.origin, &leg.destination)
        .map(|d| (d, DistanceSource::Route))
        .ok_or_else(|| PricingError::RouteNotFound {
            origin: normalize_code(&leg.origin),
            destination: normalize_code(&leg.destination),
        })
}

/// `distance / cruise speed + buffer`, or `None` for a cruise speed that is
/// not a positive number.
pub fn flight_hours(
    distance_km: f64,
    cruise_speed_kmh: f64,
    buffer_hours: f64,
) -> Option<f64> {
    if !cruise_speed_kmh.is_finite() || cruise_speed_kmh <= 0.0 {
        return None;
    }
    Some(distance_km / cruise_speed_kmh + buffer_hours.max(0.0))
}

pub fn resolve_leg(
    index: usize,
    leg: &TripLeg,
    routes: &RouteTable,
    aircraft_name: &str,
    cruise_speed_kmh: Option<f64>,
    buffer_hours: f64,
) -> Result<ResolvedLeg, PricingError> {
    if normalize_code(&leg.origin).is_empty() || normalize_code(&leg.destination).is_empty() {
        return Err(PricingError::InvalidLeg {
            index,
            reason: "origin and destination are required".to_string(),
        });
    }

    let invalid_speed = || PricingError::InvalidAircraftSpec {
        aircraft: aircraft_name.to_string(),
        reason: "cruise speed must be greater than zero".to_string(),
    };
    let speed = cruise_speed_kmh.ok_or_else(invalid_speed)?;

    let (distance_km, distance_source) = resolve_distance(index, leg, routes)?;
    let flight_hours = flight_hours(distance_km, speed, buffer_hours).ok_or_else(invalid_speed)?;

    Ok(ResolvedLeg {
        leg: leg.clone(),
        distance_km,
        flight_hours,
        distance_source,
    })
}

/// Consecutive legs that both carry a departure time must leave at least
/// `min_layover_hours` between landing and the next take-off.
pub fn check_layovers(legs: &[ResolvedLeg], min_layover_hours: f64) -> Result<(), PricingError> {
    for (index, pair) in legs.windows(2).enumerate() {
        let (prev, next) = (&pair[0], &pair[1]);
        let (Some(departed), Some(next_departure)) = (prev.leg.departure(), next.leg.departure()) else {
            continue;
        };

        // Kept in hours so an absurd block time cannot overflow the calendar
        let between_departures = (next_departure - departed).num_seconds() as f64 / 3600.0;
        let layover_hours = between_departures - prev.flight_hours;

        if layover_hours < min_layover_hours {
            return Err(PricingError::LayoverTooShort {
                index: index + 1,
                actual_hours: layover_hours,
                min_hours: min_layover_hours,
            });
        }
    }
    Ok(())
}
