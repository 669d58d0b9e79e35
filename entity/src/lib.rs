//! SeaORM entity models for the payout service schema.

pub mod prelude;

pub mod audit_trail;
pub mod notification;
pub mod outbox_event;
pub mod payout_account;
pub mod user;
