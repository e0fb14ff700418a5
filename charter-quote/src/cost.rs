use crate::legs::ResolvedLeg;

/// Flying cost of a single leg.
pub fn leg_cost(flight_hours: f64, hourly_rate: f64) -> f64 {
    flight_hours * hourly_rate
}

/// Per-leg base flying cost and the trip total.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseCost {
    pub per_leg: Vec<f64>,
    pub total: f64,
}

pub fn accumulate(legs: &[ResolvedLeg], hourly_rate: f64) -> BaseCost {
    let per_leg: Vec<f64> = legs
        .iter()
        .map(|leg| leg_cost(leg.flight_hours, hourly_rate))
        .collect();
    let total: f64 = per_leg.iter().sum();
    BaseCost { per_leg, total }
}
