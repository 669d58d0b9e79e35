//! Payout account lifecycle service.
//!
//! Orchestrates the payout account against the payment provider:
//! - `create` - Linked account creation with stakeholder and product configuration
//! - `bank_details` - Bank details submission
//! - `sync` - Reconciliation of the activation state reported by the provider
//!
//! All writes after creation are read-modify-write cycles guarded by the account version
//! (see [`PayoutAccountService::modify`]).

pub mod bank_details;
pub mod create;
pub mod sync;

use sea_orm::{DatabaseConnection, DbErr, SqlErr};
use serde_json::json;

use crate::server::{
    data::payout_account::PayoutAccountRepository,
    error::AppError,
    model::{
        audit::AuditContext,
        payout_account::{
            ActivationStatus, BankDetailsStatus, BankInformation, PaginatedPayoutAccounts,
            PayoutAccount,
        },
    },
    provider::PaymentProvider,
};

/// Versioned write attempts before a lost race is reported as a conflict.
pub const MAX_WRITE_ATTEMPTS: usize = 3;

/// Service providing payout account operations.
///
/// Holds the database connection and the payment provider. Side effects (audit,
/// notifications, background jobs) are delegated to their own services and never fail
/// the primary operation.
pub struct PayoutAccountService<'a> {
    db: &'a DatabaseConnection,
    provider: &'a dyn PaymentProvider,
}

impl<'a> PayoutAccountService<'a> {
    /// Creates a new PayoutAccountService instance.
    ///
    /// # Arguments
    /// - `db` - Reference to the database connection
    /// - `provider` - Payment provider gateway
    ///
    /// # Returns
    /// - `PayoutAccountService` - New service instance
    pub fn new(db: &'a DatabaseConnection, provider: &'a dyn PaymentProvider) -> Self {
        Self { db, provider }
    }

    /// Gets the user's active payout account.
    ///
    /// With `sync` set the account is reconciled with the provider first. A failed sync is
    /// logged and the stored account returned instead.
    ///
    /// # Arguments
    /// - `user_id` - Owning user
    /// - `sync` - Whether to reconcile with the provider before returning
    ///
    /// # Returns
    /// - `Ok(PayoutAccount)` - The account
    /// - `Err(AppError::NotFound)` - User has no active account
    pub async fn get_for_user(&self, user_id: i32, sync: bool) -> Result<PayoutAccount, AppError> {
        let account = self.require_active_for_user(user_id).await?;

        if !sync {
            return Ok(account);
        }

        match self
            .reconcile(
                &account.id,
                sync::ReconcileTrigger::AutoSync,
                AuditContext {
                    user_id: Some(user_id),
                    ..Default::default()
                },
            )
            .await
        {
            Ok(synced) => Ok(synced),
            Err(e) => {
                tracing::warn!(
                    payout_account_id = %account.id,
                    error = %e,
                    "Auto-sync of payout account failed, returning stored state"
                );
                Ok(account)
            }
        }
    }

    /// Gets a page of payout accounts for administrators.
    ///
    /// # Arguments
    /// - `status` - Optional activation status filter
    /// - `page` - Page number (0-indexed)
    /// - `per_page` - Number of items per page
    ///
    /// # Returns
    /// - `Ok(PaginatedPayoutAccounts)` - The page
    /// - `Err(AppError::BadRequest)` - Unknown status filter
    pub async fn list_paginated(
        &self,
        status: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedPayoutAccounts, AppError> {
        let status = match status.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => {
                let parsed = ActivationStatus::from_provider(value);
                if parsed.as_str() != value {
                    return Err(AppError::BadRequest(format!(
                        "Unknown activation status '{}'",
                        value
                    )));
                }
                Some(parsed)
            }
            None => None,
        };

        let per_page = per_page.clamp(1, 100);
        let (accounts, total) = PayoutAccountRepository::new(self.db)
            .get_paginated(status, page, per_page)
            .await?;

        Ok(PaginatedPayoutAccounts {
            accounts,
            total,
            page,
            per_page,
        })
    }

    /// Stores the stakeholder registered by the background worker.
    pub async fn record_stakeholder(
        &self,
        payout_account_id: &str,
        stakeholder_id: &str,
        auto_created: bool,
    ) -> Result<PayoutAccount, AppError> {
        let (_, account) = self
            .modify(payout_account_id, |account| {
                if account.stakeholder_id.as_deref() == Some(stakeholder_id) {
                    return false;
                }
                account.stakeholder_id = Some(stakeholder_id.to_string());
                account.set_metadata("stakeholder_auto_created", json!(auto_created));
                true
            })
            .await?;

        Ok(account)
    }

    /// Marks bank details as acknowledged by the provider.
    ///
    /// Only applies when the account still holds the submitted details. If they were
    /// replaced in the meantime, the newer submission's own job settles the status.
    pub async fn mark_bank_details_submitted(
        &self,
        payout_account_id: &str,
        submitted: &BankInformation,
    ) -> Result<PayoutAccount, AppError> {
        let (_, account) = self
            .modify(payout_account_id, |account| {
                if account.bank_information.as_ref() != Some(submitted)
                    || account.bank_details_status == Some(BankDetailsStatus::Submitted)
                {
                    return false;
                }
                account.bank_details_status = Some(BankDetailsStatus::Submitted);
                true
            })
            .await?;

        Ok(account)
    }

    async fn require_active_for_user(&self, user_id: i32) -> Result<PayoutAccount, AppError> {
        PayoutAccountRepository::new(self.db)
            .find_active_by_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Payout account not found".to_string()))
    }

    /// Applies `change` to the latest stored account with optimistic locking.
    ///
    /// The account is re-read on every attempt, so `change` always sees the current state;
    /// it returns whether anything needs writing. A lost race is retried up to
    /// [`MAX_WRITE_ATTEMPTS`] times.
    ///
    /// # Returns
    /// - `Ok((before, after))` - State `change` was applied to and the stored result
    ///   (identical when nothing needed writing)
    /// - `Err(AppError::NotFound)` - Account doesn't exist
    /// - `Err(AppError::Conflict)` - Every attempt lost a race
    pub(crate) async fn modify<F>(
        &self,
        payout_account_id: &str,
        mut change: F,
    ) -> Result<(PayoutAccount, PayoutAccount), AppError>
    where
        F: FnMut(&mut PayoutAccount) -> bool,
    {
        let repo = PayoutAccountRepository::new(self.db);

        for attempt in 1..=MAX_WRITE_ATTEMPTS {
            let Some(current) = repo.find_by_id(payout_account_id).await? else {
                return Err(AppError::NotFound("Payout account not found".to_string()));
            };

            let mut updated = current.clone();
            if !change(&mut updated) {
                return Ok((current, updated));
            }

            match repo.update_versioned(&updated).await? {
                Some(stored) => return Ok((current, stored)),
                None => {
                    tracing::debug!(
                        payout_account_id,
                        attempt,
                        "Payout account changed concurrently, retrying write"
                    );
                }
            }
        }

        Err(AppError::Conflict(
            "Payout account was modified concurrently, please retry".to_string(),
        ))
    }
}

/// Whether an insert failed on a unique index, i.e. the user already has an active account.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
