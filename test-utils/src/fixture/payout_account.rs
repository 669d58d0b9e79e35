//! Payout account fixtures for in-memory entity models.

use chrono::Utc;
use serde_json::json;

use crate::factory::helpers::next_id;

/// Creates a payout account entity model with default values.
///
/// The account belongs to user `1`, is active, pending activation and has no bank
/// information, stakeholder or product configuration.
pub fn entity() -> entity::payout_account::Model {
    entity_builder().build()
}

/// Creates a payout account entity builder for customization.
pub fn entity_builder() -> PayoutAccountEntityBuilder {
    PayoutAccountEntityBuilder::new()
}

/// Builder for in-memory payout account entity models.
pub struct PayoutAccountEntityBuilder {
    model: entity::payout_account::Model,
}

impl PayoutAccountEntityBuilder {
    fn new() -> Self {
        let id = next_id();
        let now = Utc::now();
        Self {
            model: entity::payout_account::Model {
                id: format!("pa_{:012}", id),
                user_id: 1,
                razorpay_account_id: format!("acc_{:014}", id),
                legal_business_name: format!("Academy {}", id),
                business_type: "individual".to_string(),
                contact_name: "Asha Rao".to_string(),
                email: format!("academy{}@example.com", id),
                phone: "9876543210".to_string(),
                pan: "ABCPR1234K".to_string(),
                gst: None,
                street1: "12 Stadium Road".to_string(),
                street2: None,
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                postal_code: "560001".to_string(),
                country: "IN".to_string(),
                account_number: None,
                ifsc_code: None,
                account_holder_name: None,
                bank_name: None,
                activation_status: "pending".to_string(),
                activation_requirements: None,
                rejection_reason: None,
                product_configuration_id: None,
                product_configuration_status: None,
                stakeholder_id: None,
                bank_details_status: None,
                metadata: json!({}),
                is_active: true,
                version: 0,
                created_at: now,
                updated_at: now,
            },
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.model.id = id.into();
        self
    }

    pub fn user_id(mut self, user_id: i32) -> Self {
        self.model.user_id = user_id;
        self
    }

    pub fn razorpay_account_id(mut self, account_id: impl Into<String>) -> Self {
        self.model.razorpay_account_id = account_id.into();
        self
    }

    pub fn business_type(mut self, business_type: impl Into<String>) -> Self {
        self.model.business_type = business_type.into();
        self
    }

    pub fn activation_status(mut self, status: impl Into<String>) -> Self {
        self.model.activation_status = status.into();
        self
    }

    pub fn activation_requirements(mut self, requirements: Vec<&str>) -> Self {
        self.model.activation_requirements = Some(json!(requirements));
        self
    }

    pub fn rejection_reason(mut self, reason: impl Into<String>) -> Self {
        self.model.rejection_reason = Some(reason.into());
        self
    }

    pub fn product_configuration_id(mut self, product_id: impl Into<String>) -> Self {
        self.model.product_configuration_id = Some(product_id.into());
        self
    }

    pub fn product_configuration_status(mut self, status: impl Into<String>) -> Self {
        self.model.product_configuration_status = Some(status.into());
        self
    }

    pub fn stakeholder_id(mut self, stakeholder_id: impl Into<String>) -> Self {
        self.model.stakeholder_id = Some(stakeholder_id.into());
        self
    }

    /// Attaches bank information and sets the submission status.
    pub fn bank_information(
        mut self,
        account_number: impl Into<String>,
        ifsc_code: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        self.model.account_number = Some(account_number.into());
        self.model.ifsc_code = Some(ifsc_code.into());
        self.model.account_holder_name = Some(self.model.contact_name.clone());
        self.model.bank_details_status = Some(status.into());
        self
    }

    pub fn is_active(mut self, is_active: bool) -> Self {
        self.model.is_active = is_active;
        self
    }

    pub fn build(self) -> entity::payout_account::Model {
        self.model
    }
}
