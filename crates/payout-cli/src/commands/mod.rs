pub mod payout;
pub mod summary;
