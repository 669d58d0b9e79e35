//! Payout account data repository.
//!
//! Every mutation after creation goes through [`PayoutAccountRepository::update_versioned`],
//! a compare-and-swap on the `version` column, so concurrent writers can't silently
//! overwrite each other. A partial unique index on `user_id WHERE is_active` keeps at most
//! one active account per user; inserts violating it fail with a unique-constraint `DbErr`.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder,
};
use serde_json::json;

use crate::server::model::payout_account::{
    ActivationStatus, NewPayoutAccount, PayoutAccount,
};

pub struct PayoutAccountRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PayoutAccountRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a new active payout account at version 0.
    ///
    /// # Arguments
    /// - `params` - Account to insert
    ///
    /// # Returns
    /// - `Ok(PayoutAccount)` - The created account
    /// - `Err(DbErr)` - Database error, including a unique violation when the user already
    ///   has an active account
    pub async fn create(&self, params: NewPayoutAccount) -> Result<PayoutAccount, DbErr> {
        let now = Utc::now();
        let kyc = params.kyc_details;

        let entity = entity::payout_account::ActiveModel {
            id: ActiveValue::Set(params.id),
            user_id: ActiveValue::Set(params.user_id),
            razorpay_account_id: ActiveValue::Set(params.razorpay_account_id),
            legal_business_name: ActiveValue::Set(kyc.legal_business_name),
            business_type: ActiveValue::Set(kyc.business_type.as_str().to_string()),
            contact_name: ActiveValue::Set(kyc.contact_name),
            email: ActiveValue::Set(kyc.email),
            phone: ActiveValue::Set(kyc.phone),
            pan: ActiveValue::Set(kyc.pan),
            gst: ActiveValue::Set(kyc.gst),
            street1: ActiveValue::Set(kyc.address.street1),
            street2: ActiveValue::Set(kyc.address.street2),
            city: ActiveValue::Set(kyc.address.city),
            state: ActiveValue::Set(kyc.address.state),
            postal_code: ActiveValue::Set(kyc.address.postal_code),
            country: ActiveValue::Set(kyc.address.country),
            account_number: ActiveValue::Set(None),
            ifsc_code: ActiveValue::Set(None),
            account_holder_name: ActiveValue::Set(None),
            bank_name: ActiveValue::Set(None),
            activation_status: ActiveValue::Set(params.activation_status.as_str().to_string()),
            activation_requirements: ActiveValue::Set(
                params.activation_requirements.map(|requirements| json!(requirements)),
            ),
            rejection_reason: ActiveValue::Set(None),
            product_configuration_id: ActiveValue::Set(params.product_configuration_id),
            product_configuration_status: ActiveValue::Set(params.product_configuration_status),
            stakeholder_id: ActiveValue::Set(None),
            bank_details_status: ActiveValue::Set(None),
            metadata: ActiveValue::Set(params.metadata),
            is_active: ActiveValue::Set(true),
            version: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        }
        .insert(self.db)
        .await?;

        Ok(PayoutAccount::from_entity(entity))
    }

    /// Finds a payout account by its ID.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<PayoutAccount>, DbErr> {
        let entity = entity::prelude::PayoutAccount::find_by_id(id.to_string())
            .one(self.db)
            .await?;

        Ok(entity.map(PayoutAccount::from_entity))
    }

    /// Finds the user's active payout account, if any.
    pub async fn find_active_by_user(&self, user_id: i32) -> Result<Option<PayoutAccount>, DbErr> {
        let entity = entity::prelude::PayoutAccount::find()
            .filter(entity::payout_account::Column::UserId.eq(user_id))
            .filter(entity::payout_account::Column::IsActive.eq(true))
            .one(self.db)
            .await?;

        Ok(entity.map(PayoutAccount::from_entity))
    }

    /// Writes the mutable state of `account` if nobody else has written since it was read.
    ///
    /// Bank information, activation state, provider references, metadata and `is_active`
    /// are written; the KYC snapshot, owner and provider account id are immutable. The
    /// write bumps `version` and `updated_at`.
    ///
    /// # Arguments
    /// - `account` - Account as modified by the caller, carrying the version it was read at
    ///
    /// # Returns
    /// - `Ok(Some(PayoutAccount))` - Write applied, returns the stored account
    /// - `Ok(None)` - Version moved (or the account vanished); re-read and retry
    /// - `Err(DbErr)` - Database error
    pub async fn update_versioned(
        &self,
        account: &PayoutAccount,
    ) -> Result<Option<PayoutAccount>, DbErr> {
        use entity::payout_account::Column;

        let bank = account.bank_information.clone();

        let changes = entity::payout_account::ActiveModel {
            account_number: ActiveValue::Set(bank.as_ref().map(|b| b.account_number.clone())),
            ifsc_code: ActiveValue::Set(bank.as_ref().map(|b| b.ifsc_code.clone())),
            account_holder_name: ActiveValue::Set(
                bank.as_ref().map(|b| b.account_holder_name.clone()),
            ),
            bank_name: ActiveValue::Set(bank.and_then(|b| b.bank_name)),
            activation_status: ActiveValue::Set(account.activation_status.as_str().to_string()),
            activation_requirements: ActiveValue::Set(
                account
                    .activation_requirements
                    .as_ref()
                    .map(|requirements| json!(requirements)),
            ),
            rejection_reason: ActiveValue::Set(account.rejection_reason.clone()),
            product_configuration_id: ActiveValue::Set(account.product_configuration_id.clone()),
            product_configuration_status: ActiveValue::Set(
                account.product_configuration_status.clone(),
            ),
            stakeholder_id: ActiveValue::Set(account.stakeholder_id.clone()),
            bank_details_status: ActiveValue::Set(
                account
                    .bank_details_status
                    .map(|status| status.as_str().to_string()),
            ),
            metadata: ActiveValue::Set(account.metadata.clone()),
            is_active: ActiveValue::Set(account.is_active),
            version: ActiveValue::Set(account.version + 1),
            updated_at: ActiveValue::Set(Utc::now()),
            ..Default::default()
        };

        let result = entity::prelude::PayoutAccount::update_many()
            .set(changes)
            .filter(Column::Id.eq(account.id.as_str()))
            .filter(Column::Version.eq(account.version))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Ok(None);
        }

        self.find_by_id(&account.id).await
    }

    /// Gets paginated payout accounts, newest first, optionally filtered by status.
    ///
    /// # Arguments
    /// - `status` - Only return accounts in this activation status
    /// - `page` - Page number (0-indexed)
    /// - `per_page` - Number of items per page
    ///
    /// # Returns
    /// - `Ok((accounts, total))` - Page of accounts and total matching count
    /// - `Err(DbErr)` - Database error
    pub async fn get_paginated(
        &self,
        status: Option<ActivationStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<PayoutAccount>, u64), DbErr> {
        let mut query = entity::prelude::PayoutAccount::find()
            .order_by_desc(entity::payout_account::Column::CreatedAt);

        if let Some(status) = status {
            query = query
                .filter(entity::payout_account::Column::ActivationStatus.eq(status.as_str()));
        }

        let paginator = query.paginate(self.db, per_page);
        let total = paginator.num_items().await?;
        let accounts = paginator
            .fetch_page(page)
            .await?
            .into_iter()
            .map(PayoutAccount::from_entity)
            .collect();

        Ok((accounts, total))
    }

    /// Gets active accounts the provider may still move: `pending` or
    /// `needs_clarification`, least recently updated first.
    pub async fn get_syncable(&self) -> Result<Vec<PayoutAccount>, DbErr> {
        let accounts = entity::prelude::PayoutAccount::find()
            .filter(entity::payout_account::Column::IsActive.eq(true))
            .filter(entity::payout_account::Column::ActivationStatus.is_in([
                ActivationStatus::Pending.as_str(),
                ActivationStatus::NeedsClarification.as_str(),
            ]))
            .order_by_asc(entity::payout_account::Column::UpdatedAt)
            .all(self.db)
            .await?;

        Ok(accounts.into_iter().map(PayoutAccount::from_entity).collect())
    }
}
