pub mod aircraft;
pub mod route;
pub mod rules;

pub use aircraft::{Aircraft, AircraftCategory, AircraftSpecs, NewAircraft, OperatingCosts};
pub use route::{normalize_code, Route, RouteTable};
pub use rules::{
    resolve_active_rule, FeeStructure, MultiLegRules, NewPricingRule, PricingRule, ResolvedRule, RuleScope,
    DEFAULT_FLIGHT_TIME_BUFFER_HOURS,
};

/// Validation errors for administrator-owned reference data.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Invalid aircraft: {0}")]
    InvalidAircraft(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("Invalid pricing rule: {0}")]
    InvalidRule(String),

    #[error("Unknown aircraft category: {0}")]
    UnknownCategory(String),
}
