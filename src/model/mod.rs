//! API data transfer objects shared by the HTTP layer.

pub mod api;
pub mod audit;
pub mod outbox;
pub mod payout;
