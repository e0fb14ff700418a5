use chrono::NaiveDate;
use charter_catalog::{
    resolve_active_rule, Aircraft, AircraftCategory, PricingRule, ResolvedRule, RouteTable,
    DEFAULT_FLIGHT_TIME_BUFFER_HOURS,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cost;
use crate::error::PricingError;
use crate::fees::FeeSchedule;
use crate::legs::{check_layovers, resolve_leg, ResolvedLeg, TripLeg};
use crate::margin::{self, Adjustments};
use crate::pricing::{LegBreakdown, Pricing};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Buffer used when the pricing rule does not set one
    pub default_buffer_hours: f64,
    /// Currency used when neither the aircraft nor the rule names one
    pub fallback_currency: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            default_buffer_hours: DEFAULT_FLIGHT_TIME_BUFFER_HOURS,
            fallback_currency: "USD".to_string(),
        }
    }
}

/// What a customer asks to have priced.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TripRequest {
    pub legs: Vec<TripLeg>,
    pub passenger_count: u32,
    /// Price a single aircraft instead of the whole fleet
    #[serde(default)]
    pub aircraft_id: Option<Uuid>,
}

impl TripRequest {
    pub fn validate(&self) -> Result<(), PricingError> {
        if self.legs.is_empty() {
            return Err(PricingError::NoLegs);
        }
        if self.passenger_count == 0 {
            return Err(PricingError::InvalidRequest(
                "at least one passenger is required".to_string(),
            ));
        }
        for (index, leg) in self.legs.iter().enumerate() {
            if leg.origin.trim().eq_ignore_ascii_case(leg.destination.trim()) {
                return Err(PricingError::InvalidLeg {
                    index,
                    reason: "origin and destination must differ".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Seats needed on the busiest leg.
    pub fn required_seats(&self) -> u32 {
        self.legs
            .iter()
            .filter_map(|leg| leg.passenger_count)
            .fold(self.passenger_count, u32::max)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AircraftSummary {
    pub id: Uuid,
    pub name: String,
    pub tail_number: String,
    pub category: AircraftCategory,
    pub seats: Option<u32>,
}

impl From<&Aircraft> for AircraftSummary {
    fn from(aircraft: &Aircraft) -> Self {
        Self {
            id: aircraft.id,
            name: aircraft.name.clone(),
            tail_number: aircraft.tail_number.clone(),
            category: aircraft.category,
            seats: aircraft.seats(),
        }
    }
}

/// One aircraft's fully priced trip.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PricedTrip {
    pub aircraft: AircraftSummary,
    pub legs: Vec<LegBreakdown>,
    pub pricing: Pricing,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub aircraft: AircraftSummary,
    pub pricing: Pricing,
    pub legs: Vec<LegBreakdown>,
    pub used_default_pricing: bool,
}

impl From<PricedTrip> for SearchResult {
    fn from(trip: PricedTrip) -> Self {
        Self {
            used_default_pricing: trip.pricing.used_default_pricing,
            aircraft: trip.aircraft,
            pricing: trip.pricing,
            legs: trip.legs,
        }
    }
}

/// An aircraft left out of search results, and why.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Exclusion {
    pub aircraft_id: Uuid,
    pub aircraft_name: String,
    pub code: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub excluded: Vec<Exclusion>,
}

/// Turns trip requests into priced trips, one aircraft at a time.
pub struct QuoteGenerator {
    config: GeneratorConfig,
}

impl QuoteGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Availability and seating checks made before any pricing.
    pub fn check_eligibility(&self, aircraft: &Aircraft, required_seats: u32) -> Result<(), PricingError> {
        if !aircraft.is_active {
            return Err(PricingError::AircraftInactive(aircraft.name.clone()));
        }
        if let Some(seats) = aircraft.seats() {
            if seats < required_seats {
                return Err(PricingError::InsufficientCapacity {
                    aircraft: aircraft.name.clone(),
                    seats,
                    requested: required_seats,
                });
            }
        }
        Ok(())
    }

    /// Run the full pipeline for one aircraft under an already-resolved rule.
    pub fn price_trip(
        &self,
        aircraft: &Aircraft,
        legs: &[TripLeg],
        resolved: &ResolvedRule<'_>,
        routes: &RouteTable,
    ) -> Result<PricedTrip, PricingError> {
        if legs.is_empty() {
            return Err(PricingError::NoLegs);
        }
        let rule = resolved.rule();

        if let Some(max) = rule.multi_leg.max_legs {
            if legs.len() > max {
                return Err(PricingError::TooManyLegs { legs: legs.len(), max });
            }
        }

        let hourly_rate = aircraft
            .effective_hourly_rate()
            .ok_or_else(|| PricingError::InvalidAircraftSpec {
                aircraft: aircraft.name.clone(),
                reason: "no hourly rate or hourly operating cost".to_string(),
            })?;

        let buffer = rule.buffer_hours_or(self.config.default_buffer_hours);
        let speed = aircraft.cruise_speed_kmh();

        let resolved_legs = legs
            .iter()
            .enumerate()
            .map(|(index, leg)| resolve_leg(index, leg, routes, &aircraft.name, speed, buffer))
            .collect::<Result<Vec<ResolvedLeg>, PricingError>>()?;

        if let Some(range_km) = aircraft.range_km() {
            if let Some((index, leg)) = resolved_legs
                .iter()
                .enumerate()
                .find(|(_, leg)| leg.distance_km > range_km)
            {
                return Err(PricingError::OutOfRange {
                    aircraft: aircraft.name.clone(),
                    index,
                    distance_km: leg.distance_km,
                    range_km,
                });
            }
        }

        if let Some(min_layover) = rule.multi_leg.min_layover_hours {
            check_layovers(&resolved_legs, min_layover)?;
        }

        let base = cost::accumulate(&resolved_legs, hourly_rate);
        let schedule = FeeSchedule::resolve(&rule.fees, aircraft);

        let mut breakdown = Vec::with_capacity(resolved_legs.len());
        let (mut fuel_surcharge, mut airport_fees, mut crew_expenses) = (0.0, 0.0, 0.0);

        for (leg, leg_cost) in resolved_legs.iter().zip(base.per_leg.iter()) {
            let fees = schedule.for_leg(leg);
            fuel_surcharge += fees.fuel_surcharge;
            airport_fees += fees.airport_fees;
            crew_expenses += fees.crew_expenses;

            breakdown.push(LegBreakdown {
                origin: leg.leg.origin.clone(),
                destination: leg.leg.destination.clone(),
                departure_date: leg.leg.departure_date,
                departure_time: leg.leg.departure_time,
                distance_km: leg.distance_km,
                distance_source: leg.distance_source,
                flight_hours: leg.flight_hours,
                leg_cost: *leg_cost,
                fuel_surcharge: fees.fuel_surcharge,
                airport_fees: fees.airport_fees,
                crew_expenses: fees.crew_expenses,
            });
        }

        let subtotal = base.total + fuel_surcharge + airport_fees + crew_expenses;
        let totals = margin::apply(
            subtotal,
            &Adjustments {
                discount_percentage: rule.multi_leg.discount_for(legs.len()),
                margin_percentage: rule.margin_for(aircraft.category),
                tax_rate: rule.tax_rate(),
            },
        );

        let currency = aircraft
            .currency
            .clone()
            .or_else(|| rule.default_currency.clone())
            .unwrap_or_else(|| self.config.fallback_currency.clone());

        Ok(PricedTrip {
            aircraft: AircraftSummary::from(aircraft),
            legs: breakdown,
            pricing: Pricing {
                base_flying_cost: base.total,
                fuel_surcharge,
                airport_fees,
                crew_expenses,
                subtotal: totals.subtotal,
                discount_percentage: totals.discount_percentage,
                discount_amount: totals.discount_amount,
                discounted_subtotal: totals.discounted_subtotal,
                margin_amount: totals.margin_amount,
                margin_percentage: totals.margin_percentage,
                tax_amount: totals.tax_amount,
                tax_rate: totals.tax_rate,
                tax_label: rule.tax_label.clone(),
                total_cost: totals.total_cost,
                currency,
                used_default_pricing: resolved.is_default(),
                pricing_rule_id: resolved.rule_id(),
            },
        })
    }

    /// Resolve the rule for `aircraft` on `date`, check eligibility and price.
    pub fn quote_aircraft(
        &self,
        aircraft: &Aircraft,
        request: &TripRequest,
        rules: &[PricingRule],
        routes: &RouteTable,
        date: NaiveDate,
    ) -> Result<PricedTrip, PricingError> {
        self.check_eligibility(aircraft, request.required_seats())?;

        let resolved = resolve_active_rule(rules, aircraft, date);
        if resolved.is_default() {
            tracing::warn!(
                aircraft_id = %aircraft.id,
                "No pricing rule applies to {} on {}, using default pricing",
                aircraft.name,
                date
            );
        }

        self.price_trip(aircraft, &request.legs, &resolved, routes)
    }

    /// Price every aircraft in `fleet` independently. A failure only
    /// excludes that aircraft. Results come back cheapest first.
    pub fn search(
        &self,
        request: &TripRequest,
        fleet: &[Aircraft],
        rules: &[PricingRule],
        routes: &RouteTable,
        date: NaiveDate,
    ) -> SearchOutcome {
        let mut outcome = SearchOutcome::default();

        for aircraft in fleet {
            if request.aircraft_id.is_some_and(|id| id != aircraft.id) {
                continue;
            }

            match self.quote_aircraft(aircraft, request, rules, routes, date) {
                Ok(trip) => outcome.results.push(SearchResult::from(trip)),
                Err(err) => {
                    tracing::warn!(
                        aircraft_id = %aircraft.id,
                        code = err.code(),
                        "Excluding {} from search: {}",
                        aircraft.name,
                        err
                    );
                    outcome.excluded.push(Exclusion {
                        aircraft_id: aircraft.id,
                        aircraft_name: aircraft.name.clone(),
                        code: err.code().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        outcome
            .results
            .sort_by(|a, b| a.pricing.total_cost.total_cmp(&b.pricing.total_cost));
        outcome
    }
}

impl Default for QuoteGenerator {
    fn default() -> Self {
        Self::new(GeneratorConfig::default())
    }
}
