use uuid::Uuid;

/// Reasons a trip cannot be priced for an aircraft.
///
/// Every variant aborts pricing for that aircraft. A missing pricing rule is
/// not in this list: it resolves to the flagged default rule instead.
#[derive(Debug, Clone, thiserror::Error, PartialEq)]
pub enum PricingError {
    #[error("Aircraft not found: {0}")]
    AircraftNotFound(Uuid),

    #[error("No distance known for {origin} -> {destination}; a manual distance is required")]
    RouteNotFound { origin: String, destination: String },

    #[error("Invalid aircraft spec for {aircraft}: {reason}")]
    InvalidAircraftSpec { aircraft: String, reason: String },

    #[error("Invalid leg {index}: {reason}")]
    InvalidLeg { index: usize, reason: String },

    #[error("Trip has no legs")]
    NoLegs,

    #[error("Invalid trip request: {0}")]
    InvalidRequest(String),

    #[error("Trip has {legs} legs, the maximum is {max}")]
    TooManyLegs { legs: usize, max: usize },

    #[error("Layover before leg {index} is {actual_hours:.2}h, the minimum is {min_hours:.2}h")]
    LayoverTooShort {
        index: usize,
        actual_hours: f64,
        min_hours: f64,
    },

    #[error("Aircraft {aircraft} seats {seats} passengers, {requested} requested")]
    InsufficientCapacity {
        aircraft: String,
        seats: u32,
        requested: u32,
    },

    #[error("Leg {index} is {distance_km} km, beyond the {range_km} km range of {aircraft}")]
    OutOfRange {
        aircraft: String,
        index: usize,
        distance_km: f64,
        range_km: f64,
    },

    #[error("Aircraft {0} is not available for charter")]
    AircraftInactive(String),
}

impl PricingError {
    /// Stable machine-readable code for API clients and logs.
    pub fn code(&self) -> &'static str {
        match self {
            PricingError::AircraftNotFound(_) => "AIRCRAFT_NOT_FOUND",
            PricingError::RouteNotFound { .. } => "ROUTE_NOT_FOUND",
            PricingError::InvalidAircraftSpec { .. } => "INVALID_AIRCRAFT_SPEC",
            PricingError::InvalidLeg { .. } => "INVALID_LEG",
            PricingError::NoLegs => "NO_LEGS",
            PricingError::InvalidRequest(_) => "INVALID_REQUEST",
            PricingError::TooManyLegs { .. } => "TOO_MANY_LEGS",
            PricingError::LayoverTooShort { .. } => "LAYOVER_TOO_SHORT",
            PricingError::InsufficientCapacity { .. } => "INSUFFICIENT_CAPACITY",
            PricingError::OutOfRange { .. } => "OUT_OF_RANGE",
            PricingError::AircraftInactive(_) => "AIRCRAFT_INACTIVE",
        }
    }

    /// Whether the caller can fix the request by supplying a manual distance.
    pub fn needs_manual_distance(&self) -> bool {
        matches!(self, PricingError::RouteNotFound { .. })
    }
}
