use charter_catalog::{Aircraft, FeeStructure};

use crate::legs::ResolvedLeg;

/// Fee rates settled for one aircraft under one rule.
///
/// A rule field wins when set. When it is absent the aircraft's own
/// operating cost fills in, and failing that the rate is zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeSchedule {
    pub fuel_surcharge_per_km: f64,
    pub airport_fee_per_leg: f64,
    pub crew_expense_per_hour: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LegFees {
    pub fuel_surcharge: f64,
    pub airport_fees: f64,
    pub crew_expenses: f64,
}

impl LegFees {
    pub fn total(&self) -> f64 {
        self.fuel_surcharge + self.airport_fees + self.crew_expenses
    }
}

fn rate(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

impl FeeSchedule {
    pub fn resolve(fees: &FeeStructure, aircraft: &Aircraft) -> Self {
        let costs = &aircraft.operating_costs;

        let fuel_surcharge_per_km = rate(fees.fuel_surcharge_per_km)
            .or(rate(costs.fuel_cost_per_km))
            .unwrap_or(0.0);
        let crew_expense_per_hour = rate(fees.crew_expense_per_hour)
            .or(rate(costs.crew_expense_per_hour))
            .unwrap_or(0.0);
        let airport_fee_per_leg = rate(fees.airport_fee_per_leg).unwrap_or(0.0)
            + rate(fees.ground_handling_per_leg).unwrap_or(0.0);

        Self {
            fuel_surcharge_per_km,
            airport_fee_per_leg,
            crew_expense_per_hour,
        }
    }

    pub fn for_leg(&self, leg: &ResolvedLeg) -> LegFees {
        LegFees {
            fuel_surcharge: self.fuel_surcharge_per_km * leg.distance_km,
            airport_fees: self.airport_fee_per_leg,
            crew_expenses: self.crew_expense_per_hour * leg.flight_hours,
        }
    }
}
