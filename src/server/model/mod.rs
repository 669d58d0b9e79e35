//! Domain models and operation parameters for the payout service.
//!
//! Domain models sit between the SeaORM entities returned by repositories and the DTOs
//! exposed over HTTP. Conversion happens at the boundaries: `from_entity` at the data
//! layer and `into_dto` at the controller layer.

pub mod audit;
pub mod notification;
pub mod outbox;
pub mod payout_account;
