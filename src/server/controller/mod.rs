//! HTTP request handlers.
//!
//! Controllers authenticate the session user with `AuthGuard`, convert DTOs to validated
//! params, call the service layer and wrap domain models back into DTOs inside the
//! standard `ApiResponse` envelope.

pub mod admin;
pub mod payout_account;
