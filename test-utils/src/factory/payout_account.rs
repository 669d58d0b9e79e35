//! Payout account factory for creating test payout account entities.
//!
//! Defaults come from `fixture::payout_account`; the factory only adds persistence.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, IntoActiveModel};

use crate::fixture::payout_account::PayoutAccountEntityBuilder;

/// Factory for creating test payout accounts with customizable fields.
///
/// # Example
///
/// ```rust,ignore
/// let account = PayoutAccountFactory::new(&db, user.id)
///     .activation_status("activated")
///     .build()
///     .await?;
/// ```
pub struct PayoutAccountFactory<'a> {
    db: &'a DatabaseConnection,
    builder: PayoutAccountEntityBuilder,
}

impl<'a> PayoutAccountFactory<'a> {
    /// Creates a new factory for an account owned by `user_id`.
    ///
    /// # Arguments
    /// - `db` - Database connection for inserting the entity
    /// - `user_id` - ID of the owning user (must exist)
    pub fn new(db: &'a DatabaseConnection, user_id: i32) -> Self {
        Self {
            db,
            builder: crate::fixture::payout_account::entity_builder().user_id(user_id),
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.builder = self.builder.id(id);
        self
    }

    pub fn razorpay_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.builder = self.builder.razorpay_account_id(account_id);
        self
    }

    pub fn business_type(mut self, business_type: impl Into<String>) -> Self {
        self.builder = self.builder.business_type(business_type);
        self
    }

    pub fn activation_status(mut self, status: impl Into<String>) -> Self {
        self.builder = self.builder.activation_status(status);
        self
    }

    pub fn activation_requirements(mut self, requirements: Vec<&str>) -> Self {
        self.builder = self.builder.activation_requirements(requirements);
        self
    }

    pub fn product_configuration_id(mut self, product_id: impl Into<String>) -> Self {
        self.builder = self.builder.product_configuration_id(product_id);
        self
    }

    pub fn bank_information(
        mut self,
        account_number: impl Into<String>,
        ifsc_code: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        self.builder = self
            .builder
            .bank_information(account_number, ifsc_code, status);
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.builder = self.builder.is_active(is_active);
        self
    }

    /// Builds and inserts the payout account entity into the database.
    ///
    /// # Returns
    /// - `Ok(entity::payout_account::Model)` - Created payout account entity
    /// - `Err(DbErr)` - Database error during insert (including the active-account index)
    pub async fn build(self) -> Result<entity::payout_account::Model, DbErr> {
        self.builder
            .build()
            .into_active_model()
            .reset_all()
            .insert(self.db)
            .await
    }
}

/// Creates a pending payout account for `user_id` with default values.
pub async fn create_payout_account(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<entity::payout_account::Model, DbErr> {
    PayoutAccountFactory::new(db, user_id).build().await
}
