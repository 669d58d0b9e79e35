//! Shared helper utilities for factory methods.
//!
//! This module provides common utilities used across all factory modules,
//! including ID generation and convenience methods for creating entities
//! with their dependencies.

use sea_orm::{DatabaseConnection, DbErr};

/// Counter for generating unique IDs in tests.
///
/// This atomic counter ensures each factory-created entity gets a unique
/// identifier to prevent collisions in tests.
static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);

/// Gets the next unique counter value for test data.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Creates an academy user together with an active payout account.
///
/// All entities are created with default values. Use the individual
/// factories if you need to customize specific entities.
///
/// # Arguments
/// - `db` - Database connection
///
/// # Returns
/// - `Ok((user, account))` - Tuple of created entities
/// - `Err(DbErr)` - Database error during creation
pub async fn create_payout_account_with_user(
    db: &DatabaseConnection,
) -> Result<(entity::user::Model, entity::payout_account::Model), DbErr> {
    let user = crate::factory::user::create_academy_user(db).await?;
    let account = crate::factory::payout_account::create_payout_account(db, user.id).await?;

    Ok((user, account))
}
