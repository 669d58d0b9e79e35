use serde_json::json;
use uuid::Uuid;

use crate::server::{
    data::{payout_account::PayoutAccountRepository, user::UserRepository},
    error::AppError,
    model::{
        audit::{AuditAction, AuditContext, AuditEntry},
        notification::NotificationKind,
        outbox::StakeholderCreateJob,
        payout_account::{CreatePayoutAccountParams, NewPayoutAccount, PayoutAccount, StakeholderData},
    },
    provider::LinkedAccountRequest,
    service::{audit::AuditService, notification::NotificationService, outbox::OutboxService},
};

use super::{sync::resolve_activation, PayoutAccountService};

/// Longest reference id the provider accepts.
const REFERENCE_ID_LEN: usize = 20;

impl<'a> PayoutAccountService<'a> {
    /// Creates the user's payout account and its linked account at the provider.
    ///
    /// Only the provider account creation is fatal once validation has passed. The
    /// product configuration request is best effort: on failure the account is stored
    /// without one and bank details later retry it. Stakeholder registration is queued
    /// for the worker. Audit, notifications and an initial bank details submission never
    /// fail the request.
    ///
    /// # Arguments
    /// - `params` - Validated KYC details, optional bank information and stakeholder
    /// - `context` - Actor recorded on audit entries
    ///
    /// # Returns
    /// - `Ok(PayoutAccount)` - The created account
    /// - `Err(AppError::NotFound)` - User doesn't exist
    /// - `Err(AppError::Conflict)` - User already has an active account
    /// - `Err(AppError::Upstream)` - Provider refused or failed to create the linked account
    pub async fn create(
        &self,
        params: CreatePayoutAccountParams,
        context: AuditContext,
    ) -> Result<PayoutAccount, AppError> {
        let repo = PayoutAccountRepository::new(self.db);

        if UserRepository::new(self.db)
            .find_by_id(params.user_id)
            .await?
            .is_none()
        {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if repo.find_active_by_user(params.user_id).await?.is_some() {
            return Err(active_account_conflict());
        }

        let id = Uuid::new_v4().to_string();
        let reference_id: String = id
            .chars()
            .filter(|c| *c != '-')
            .take(REFERENCE_ID_LEN)
            .collect();

        let request = LinkedAccountRequest::from_kyc(&reference_id, &params.kyc_details);
        let linked_account = self
            .provider
            .create_linked_account(&request)
            .await
            .map_err(|e| {
                tracing::error!(user_id = params.user_id, error = %e, "Failed to create linked account");
                AppError::Upstream(format!(
                    "Failed to create payout account: {}",
                    e.provider_message()
                ))
            })?;

        let mut metadata = serde_json::Map::new();

        let (stakeholder, auto_created) = match params.stakeholder {
            Some(stakeholder) => (stakeholder, false),
            None => (StakeholderData::from_kyc(&params.kyc_details), true),
        };
        let stakeholder = if stakeholder.pan.is_some() {
            Some(stakeholder)
        } else {
            tracing::warn!(
                razorpay_account_id = %linked_account.id,
                "No PAN available, skipping stakeholder registration"
            );
            metadata.insert("stakeholder_skipped".to_string(), json!(true));
            None
        };

        let product = match self
            .provider
            .request_product_configuration(&linked_account.id)
            .await
        {
            Ok(product) => Some(product),
            Err(e) => {
                tracing::warn!(
                    razorpay_account_id = %linked_account.id,
                    error = %e,
                    "Product configuration request failed, account created without payouts configured"
                );
                metadata.insert(
                    "product_configuration_error".to_string(),
                    json!(e.provider_message()),
                );
                None
            }
        };

        let snapshot = resolve_activation(Some(&linked_account), product.as_ref());

        let account = repo
            .create(NewPayoutAccount {
                id,
                user_id: params.user_id,
                razorpay_account_id: linked_account.id.clone(),
                kyc_details: params.kyc_details,
                activation_status: snapshot.status,
                activation_requirements: snapshot.requirements,
                product_configuration_id: product.as_ref().map(|product| product.id.clone()),
                product_configuration_status: snapshot.product_configuration_status,
                metadata: serde_json::Value::Object(metadata),
            })
            .await
            .map_err(|e| {
                if super::is_unique_violation(&e) {
                    tracing::warn!(
                        user_id = params.user_id,
                        razorpay_account_id = %linked_account.id,
                        "Lost concurrent payout account creation, linked account left orphaned"
                    );
                    active_account_conflict()
                } else {
                    AppError::from(e)
                }
            })?;

        tracing::info!(
            payout_account_id = %account.id,
            user_id = account.user_id,
            activation_status = %account.activation_status,
            "Created payout account"
        );

        if let Some(stakeholder) = stakeholder {
            let job = StakeholderCreateJob {
                account_id: account.razorpay_account_id.clone(),
                stakeholder_data: stakeholder,
                payout_account_id: account.id.clone(),
                auto_created,
                stakeholder_id: None,
            };
            if let Err(e) = OutboxService::new(self.db)
                .enqueue_stakeholder_create(job)
                .await
            {
                tracing::error!(
                    payout_account_id = %account.id,
                    error = %e,
                    "Failed to queue stakeholder registration"
                );
            }
        }

        AuditService::new(self.db)
            .record(AuditEntry::payout_account(
                AuditAction::PayoutAccountCreated,
                &account.id,
                format!(
                    "Payout account created for {}",
                    account.kyc_details.legal_business_name
                ),
                json!({
                    "business_type": account.kyc_details.business_type.as_str(),
                    "activation_status": account.activation_status.as_str(),
                    "product_configured": account.product_configuration_id.is_some(),
                    "stakeholder_auto_created": auto_created,
                }),
                context.clone(),
            ))
            .await;

        NotificationService::new(self.db)
            .notify_payout_account(&account, NotificationKind::AccountCreated)
            .await;

        let Some(bank_information) = params.bank_information else {
            return Ok(account);
        };

        match self
            .apply_bank_details(account.clone(), bank_information, context)
            .await
        {
            Ok(account) => Ok(account),
            Err(e) => {
                tracing::warn!(
                    payout_account_id = %account.id,
                    error = %e,
                    "Initial bank details submission failed"
                );
                let message = e.to_string();
                match self
                    .modify(&account.id, |account| {
                        account.set_metadata("bank_details_error", json!(message));
                        true
                    })
                    .await
                {
                    Ok((_, stored)) => Ok(stored),
                    Err(e) => {
                        tracing::error!(
                            payout_account_id = %account.id,
                            error = %e,
                            "Failed to record bank details error on payout account"
                        );
                        Ok(repo.find_by_id(&account.id).await?.unwrap_or(account))
                    }
                }
            }
        }
    }
}

fn active_account_conflict() -> AppError {
    AppError::Conflict("An active payout account already exists for this user".to_string())
}
