use serde_json::json;

use crate::server::{
    data::payout_account::PayoutAccountRepository,
    error::AppError,
    model::{
        audit::{AuditAction, AuditContext, AuditEntry},
        notification::NotificationKind,
        outbox::BankDetailsUpdateJob,
        payout_account::{
            BankDetailsStatus, BankInformation, PayoutAccount, UpdateBankDetailsParams,
        },
    },
    service::{audit::AuditService, notification::NotificationService, outbox::OutboxService},
};

use super::{sync::ReconcileTrigger, PayoutAccountService};

impl<'a> PayoutAccountService<'a> {
    /// Replaces the bank information of the user's active account.
    ///
    /// # Arguments
    /// - `params` - Owning user and validated bank information
    /// - `context` - Actor recorded on audit entries
    ///
    /// # Returns
    /// - `Ok(PayoutAccount)` - Account with the new bank details, submission pending
    /// - `Err(AppError::NotFound)` - User has no active account
    /// - `Err(AppError::Upstream)` - No product configuration could be obtained
    pub async fn update_bank_details(
        &self,
        params: UpdateBankDetailsParams,
        context: AuditContext,
    ) -> Result<PayoutAccount, AppError> {
        let account = self.require_active_for_user(params.user_id).await?;

        self.apply_bank_details(account, params.bank_information, context)
            .await
    }

    /// Stores bank details locally and queues their submission to the provider.
    ///
    /// The details are written with `bank_details_status = pending` before the provider is
    /// contacted; the background job moves it to `submitted`. The account is then
    /// reconciled so requirements the product configuration already reports show up right
    /// away. Reconciliation, queueing, audit and notifications are best effort.
    pub(crate) async fn apply_bank_details(
        &self,
        account: PayoutAccount,
        bank_information: BankInformation,
        context: AuditContext,
    ) -> Result<PayoutAccount, AppError> {
        let product_id = self.resolve_product_configuration(&account).await?;

        let (_, stored) = self
            .modify(&account.id, |account| {
                account.bank_information = Some(bank_information.clone());
                account.bank_details_status = Some(BankDetailsStatus::Pending);
                account.product_configuration_id = Some(product_id.clone());
                true
            })
            .await?;

        tracing::info!(payout_account_id = %stored.id, "Stored new bank details");

        if let Err(e) = self
            .reconcile(&stored.id, ReconcileTrigger::BankDetailsUpdate, context.clone())
            .await
        {
            tracing::warn!(
                payout_account_id = %stored.id,
                error = %e,
                "Status sync after bank details update failed"
            );
        }

        let job = BankDetailsUpdateJob {
            account_id: stored.razorpay_account_id.clone(),
            product_config_id: product_id,
            bank_details: bank_information.clone(),
            payout_account_id: stored.id.clone(),
            settlement_submitted: false,
        };
        if let Err(e) = OutboxService::new(self.db)
            .enqueue_bank_details_update(job)
            .await
        {
            tracing::error!(
                payout_account_id = %stored.id,
                error = %e,
                "Failed to queue bank details submission, status stays pending"
            );
        }

        AuditService::new(self.db)
            .record(AuditEntry::payout_account(
                AuditAction::BankDetailsUpdated,
                &stored.id,
                "Payout bank details updated",
                json!({
                    "account_number": mask_account_number(&bank_information.account_number),
                    "ifsc_code": bank_information.ifsc_code,
                }),
                context,
            ))
            .await;

        let account = PayoutAccountRepository::new(self.db)
            .find_by_id(&stored.id)
            .await?
            .unwrap_or(stored);

        NotificationService::new(self.db)
            .notify_payout_account(&account, NotificationKind::BankDetailsUpdated)
            .await;

        Ok(account)
    }

    /// Product configuration id for bank details: stored, fetched, or freshly requested.
    async fn resolve_product_configuration(
        &self,
        account: &PayoutAccount,
    ) -> Result<String, AppError> {
        if let Some(product_id) = &account.product_configuration_id {
            return Ok(product_id.clone());
        }

        match self
            .provider
            .get_product_configuration(&account.razorpay_account_id)
            .await
        {
            Ok(product) => return Ok(product.id),
            Err(e) => {
                tracing::debug!(
                    payout_account_id = %account.id,
                    error = %e,
                    "No existing product configuration, requesting one"
                );
            }
        }

        match self
            .provider
            .request_product_configuration(&account.razorpay_account_id)
            .await
        {
            Ok(product) => Ok(product.id),
            Err(e) => {
                tracing::error!(
                    payout_account_id = %account.id,
                    error = %e,
                    "Failed to obtain a product configuration"
                );
                Err(AppError::Upstream(
                    "Unable to configure payouts for this account, please retry or contact support"
                        .to_string(),
                ))
            }
        }
    }
}

/// Keeps the last four digits of an account number for audit metadata.
fn mask_account_number(account_number: &str) -> String {
    let hidden = account_number.chars().count().saturating_sub(4);
    account_number
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { 'X' } else { c })
        .collect()
}
