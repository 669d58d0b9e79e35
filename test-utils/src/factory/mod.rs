//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Factories automatically handle dependencies and foreign
//! key relationships, making tests more concise and maintainable.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let user = factory::user::create_academy_user(&db).await?;
//!
//!     // Create with all dependencies
//!     let (user, account) = factory::helpers::create_payout_account_with_user(&db).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let account = factory::payout_account::PayoutAccountFactory::new(&db, user.id)
//!     .activation_status("needs_clarification")
//!     .product_configuration_id("acc_prd_123")
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create marketplace users (academy, admin, end user)
//! - `payout_account` - Create payout accounts for a user
//! - `helpers` - Convenience methods for creating entities with dependencies

pub mod helpers;
pub mod payout_account;
pub mod user;

// Re-export commonly used factory functions for concise usage
pub use payout_account::create_payout_account;
pub use user::{create_academy_user, create_user};
