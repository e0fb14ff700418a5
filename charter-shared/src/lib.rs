pub mod models;
pub mod money;
pub mod pii;

pub use money::{format_amount, minor_units, round_for_display};
pub use models::DomainEvent;
pub use pii::Masked;
