pub mod models;
pub mod manager;

pub use models::{Booking, BookingStatus, PaymentStatus, RescheduleRequest, RescheduleStatus};
pub use manager::{BookingError, BookingManager};
