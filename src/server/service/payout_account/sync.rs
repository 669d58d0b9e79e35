//! Reconciliation of the payout account with the provider's authoritative state.
//!
//! [`PayoutAccountService::reconcile`] is the only code path writing the activation
//! fields (status, requirements, rejection reason, product configuration status). Every
//! trigger (manual sync, auto-sync on read, admin sync, bank details changes, the
//! background poller) goes through it, so transition side effects fire exactly once.

use serde_json::json;

use crate::server::{
    data::payout_account::PayoutAccountRepository,
    error::AppError,
    model::{
        audit::{AuditAction, AuditContext, AuditEntry},
        notification::NotificationKind,
        payout_account::{ActivationStatus, PayoutAccount},
    },
    provider::{ProductConfiguration, ProviderAccount},
    service::{audit::AuditService, notification::NotificationService},
    util::requirements::flatten_requirements,
};

use super::PayoutAccountService;

/// What caused a reconciliation, recorded on the transition audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileTrigger {
    /// Academy asked for a sync.
    Manual,
    /// Academy read its account with auto-sync enabled.
    AutoSync,
    /// Administrator asked for a sync.
    Admin,
    /// Academy replaced its bank details.
    BankDetailsUpdate,
    /// Background worker submitted bank details to the provider.
    BankDetailsSubmitted,
    /// Periodic status poller.
    Poll,
}

impl ReconcileTrigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::AutoSync => "auto_sync",
            Self::Admin => "admin",
            Self::BankDetailsUpdate => "bank_details_update",
            Self::BankDetailsSubmitted => "bank_details_submitted",
            Self::Poll => "poll",
        }
    }
}

/// Activation state derived from provider responses.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationSnapshot {
    pub status: ActivationStatus,
    pub requirements: Option<Vec<String>>,
    pub rejection_reason: Option<String>,
    pub product_configuration_status: Option<String>,
}

/// Derives the activation state from the provider's account and product configuration.
///
/// The product configuration is more authoritative for payout readiness, so its status and
/// requirements win when it reports a status. Otherwise the account-level values are used,
/// and `pending` when neither reports anything. The rejection reason is only taken when the
/// account itself is rejected.
///
/// # Arguments
/// - `account` - Account-level details, if fetched
/// - `product` - Product configuration, if the account has one
///
/// # Returns
/// - `ActivationSnapshot` - Status, flattened requirements and rejection reason to store
pub fn resolve_activation(
    account: Option<&ProviderAccount>,
    product: Option<&ProductConfiguration>,
) -> ActivationSnapshot {
    let product_status = product.and_then(|product| non_blank(product.activation_status.as_deref()));
    let account_status = account.and_then(|account| non_blank(account.status.as_deref()));

    let (status, requirements) = match (product_status, product) {
        (Some(status), Some(product)) => (
            ActivationStatus::from_provider(status),
            flatten_requirements(&product.requirements),
        ),
        _ => match (account_status, account) {
            (Some(status), Some(account)) => (
                ActivationStatus::from_provider(status),
                flatten_requirements(&account.requirements),
            ),
            _ => (ActivationStatus::Pending, None),
        },
    };

    let rejection_reason = match (account_status, account) {
        (Some("rejected"), Some(account)) => account
            .rejection_reason
            .as_deref()
            .and_then(|reason| non_blank(Some(reason)))
            .map(str::to_string),
        _ => None,
    };

    ActivationSnapshot {
        status,
        requirements,
        rejection_reason,
        product_configuration_status: product_status.map(str::to_string),
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

/// Counts of one status poller run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusSyncStats {
    pub synced: usize,
    pub failed: usize,
}

impl<'a> PayoutAccountService<'a> {
    /// Reconciles the stored activation state with the provider.
    ///
    /// Fetches the account and, when a product configuration id is stored, the product
    /// configuration, then writes the derived state. Nothing is written when it already
    /// matches. A status transition appends a `payout_status_changed` audit entry and
    /// fires the side effects of the new status:
    /// - `activated` - Activation audit entry and notifications
    /// - `needs_clarification` - "Action required" notifications listing the requirements
    /// - `rejected` - Rejection audit entry and notifications with the reason
    /// - `pending` - Nothing
    ///
    /// # Arguments
    /// - `payout_account_id` - Account to reconcile
    /// - `trigger` - What caused the reconciliation
    /// - `context` - Actor recorded on audit entries
    ///
    /// # Returns
    /// - `Ok(PayoutAccount)` - The reconciled account
    /// - `Err(AppError::NotFound)` - Account doesn't exist
    /// - `Err(AppError::Upstream)` - Provider call failed
    /// - `Err(AppError::Conflict)` - Kept losing concurrent write races
    pub async fn reconcile(
        &self,
        payout_account_id: &str,
        trigger: ReconcileTrigger,
        context: AuditContext,
    ) -> Result<PayoutAccount, AppError> {
        let Some(account) = PayoutAccountRepository::new(self.db)
            .find_by_id(payout_account_id)
            .await?
        else {
            return Err(AppError::NotFound("Payout account not found".to_string()));
        };

        let provider_account = self
            .provider
            .get_account_details(&account.razorpay_account_id)
            .await
            .map_err(|e| {
                AppError::Upstream(format!(
                    "Failed to sync payout account status: {}",
                    e.provider_message()
                ))
            })?;

        let product = match &account.product_configuration_id {
            Some(product_id) => Some(
                self.provider
                    .get_product_configuration_details(&account.razorpay_account_id, product_id)
                    .await
                    .map_err(|e| {
                        AppError::Upstream(format!(
                            "Failed to sync payout account status: {}",
                            e.provider_message()
                        ))
                    })?,
            ),
            None => None,
        };

        let snapshot = resolve_activation(Some(&provider_account), product.as_ref());

        let (previous, updated) = self
            .modify(payout_account_id, |account| {
                let unchanged = account.activation_status == snapshot.status
                    && account.activation_requirements == snapshot.requirements
                    && account.rejection_reason == snapshot.rejection_reason
                    && (snapshot.product_configuration_status.is_none()
                        || account.product_configuration_status
                            == snapshot.product_configuration_status);
                if unchanged {
                    return false;
                }

                account.activation_status = snapshot.status;
                account.activation_requirements = snapshot.requirements.clone();
                account.rejection_reason = snapshot.rejection_reason.clone();
                if snapshot.product_configuration_status.is_some() {
                    account.product_configuration_status =
                        snapshot.product_configuration_status.clone();
                }
                true
            })
            .await?;

        if previous.activation_status != updated.activation_status {
            self.on_status_transition(&previous, &updated, trigger, context)
                .await;
        }

        Ok(updated)
    }

    /// Reconciles the user's active account on their request.
    pub async fn sync_for_user(
        &self,
        user_id: i32,
        context: AuditContext,
    ) -> Result<PayoutAccount, AppError> {
        let account = self.require_active_for_user(user_id).await?;

        self.reconcile(&account.id, ReconcileTrigger::Manual, context)
            .await
    }

    /// Reconciles any account on an administrator's request.
    pub async fn sync_by_id(
        &self,
        payout_account_id: &str,
        context: AuditContext,
    ) -> Result<PayoutAccount, AppError> {
        self.reconcile(payout_account_id, ReconcileTrigger::Admin, context)
            .await
    }

    /// Reconciles every active account still awaiting a provider decision.
    ///
    /// A failure for one account is logged and doesn't stop the run.
    ///
    /// # Returns
    /// - `Ok(StatusSyncStats)` - Accounts synced and failed
    /// - `Err(AppError::DbErr)` - Failed to list the accounts
    pub async fn sync_pending_accounts(&self) -> Result<StatusSyncStats, AppError> {
        let mut stats = StatusSyncStats::default();

        for account in PayoutAccountRepository::new(self.db).get_syncable().await? {
            match self
                .reconcile(&account.id, ReconcileTrigger::Poll, AuditContext::system())
                .await
            {
                Ok(_) => stats.synced += 1,
                Err(e) => {
                    stats.failed += 1;
                    tracing::warn!(
                        payout_account_id = %account.id,
                        error = %e,
                        "Scheduled payout account sync failed"
                    );
                }
            }
        }

        Ok(stats)
    }

    async fn on_status_transition(
        &self,
        previous: &PayoutAccount,
        updated: &PayoutAccount,
        trigger: ReconcileTrigger,
        context: AuditContext,
    ) {
        let from = previous.activation_status;
        let to = updated.activation_status;

        if from.is_terminal() {
            tracing::warn!(
                payout_account_id = %updated.id,
                from = %from,
                to = %to,
                "Provider moved payout account out of a terminal state"
            );
        } else {
            tracing::info!(
                payout_account_id = %updated.id,
                from = %from,
                to = %to,
                trigger = trigger.as_str(),
                "Payout account status changed"
            );
        }

        let audit = AuditService::new(self.db);
        let notifications = NotificationService::new(self.db);

        audit
            .record(AuditEntry::payout_account(
                AuditAction::PayoutStatusChanged,
                &updated.id,
                format!("Payout account status changed from {} to {}", from, to),
                json!({
                    "from": from.as_str(),
                    "to": to.as_str(),
                    "trigger": trigger.as_str(),
                    "requirements": updated.activation_requirements,
                }),
                context.clone(),
            ))
            .await;

        match to {
            ActivationStatus::Activated => {
                audit
                    .record(AuditEntry::payout_account(
                        AuditAction::PayoutAccountActivated,
                        &updated.id,
                        "Payout account activated",
                        json!({ "product_configuration_status": updated.product_configuration_status }),
                        context,
                    ))
                    .await;
                notifications
                    .notify_payout_account(updated, NotificationKind::Activated)
                    .await;
            }
            ActivationStatus::NeedsClarification => {
                notifications
                    .notify_payout_account(
                        updated,
                        NotificationKind::ActionRequired(
                            updated.activation_requirements.clone().unwrap_or_default(),
                        ),
                    )
                    .await;
            }
            ActivationStatus::Rejected => {
                audit
                    .record(AuditEntry::payout_account(
                        AuditAction::PayoutAccountRejected,
                        &updated.id,
                        "Payout account rejected",
                        json!({ "rejection_reason": updated.rejection_reason }),
                        context,
                    ))
                    .await;
                notifications
                    .notify_payout_account(
                        updated,
                        NotificationKind::Rejected(updated.rejection_reason.clone()),
                    )
                    .await;
            }
            ActivationStatus::Pending => {}
        }
    }
}
