//! Test fixtures providing reusable test data without database insertion.
//!
//! This module contains fixture functions that create in-memory test data structures
//! for use in unit tests and as default values for factories. Unlike factories,
//! fixtures do NOT insert data into the database.
//!
//! # When to Use Fixtures
//!
//! - **Unit testing**: Test conversion logic without database overhead
//! - **Default values**: Provide consistent defaults for factory builders
//! - **Serialization tests**: Test DTO conversion without persistence
//!
//! # Example
//!
//! ```rust,ignore
//! use test_utils::fixture;
//!
//! // Create in-memory entity model (no DB)
//! let account = fixture::payout_account::entity();
//!
//! // Create with custom fields
//! let rejected = fixture::payout_account::entity_builder()
//!     .activation_status("rejected")
//!     .build();
//! ```

pub mod payout_account;

pub use payout_account::{
    entity as payout_account_entity, entity_builder as payout_account_entity_builder,
};
