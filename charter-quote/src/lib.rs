pub mod error;
pub mod legs;
pub mod cost;
pub mod fees;
pub mod margin;
pub mod pricing;
pub mod generator;
pub mod inquiry;
pub mod models;

pub use error::PricingError;
pub use legs::{DistanceSource, ResolvedLeg, TripLeg};
pub use pricing::{DisplayPricing, LegBreakdown, Pricing};
pub use generator::{
    AircraftSummary, Exclusion, GeneratorConfig, PricedTrip, QuoteGenerator, SearchOutcome,
    SearchResult, TripRequest,
};
pub use inquiry::{Inquiry, InquiryError, InquiryStatus, NewInquiry, TripType};
pub use models::{Quote, QuoteError, QuoteStatus};
