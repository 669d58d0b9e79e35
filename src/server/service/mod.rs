//! Service layer for business logic and orchestration.
//!
//! This module contains the service layer of the application, which sits between the
//! controller (API) layer and the data (repository) layer. Services are responsible for:
//!
//! - **Business Logic**: Payout account lifecycle rules and validation
//! - **Orchestration**: Coordinating repository calls with the payment provider
//! - **Side Effects**: Audit entries, notifications and background jobs
//! - **Domain Models**: Working with domain models rather than DTOs or entity models

pub mod audit;
pub mod notification;
pub mod outbox;
pub mod payout_account;

#[cfg(test)]
mod test;
