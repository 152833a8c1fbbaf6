pub mod coerce;
pub mod error;
pub mod types;

#[cfg(feature = "commission")]
pub mod commission;

#[cfg(feature = "editor")]
pub mod editor;

#[cfg(feature = "summary")]
pub mod summary;

pub use error::PayoutError;
pub use types::*;

/// Standard result type for all payout operations
pub type PayoutResult<T> = Result<T, PayoutError>;
