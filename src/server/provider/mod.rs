//! Payment provider gateway.
//!
//! The provider owns the linked account, its stakeholders and the product configuration
//! that enables payouts. [`PaymentProvider`] is the narrow call contract the services use;
//! [`razorpay::RazorpayClient`] implements it over HTTP.

pub mod razorpay;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::server::{
    error::provider::ProviderError,
    model::payout_account::{BankInformation, KycDetails, StakeholderData},
    util::requirements::Requirement,
};

/// Linked account product requested for every academy.
pub const ROUTE_PRODUCT: &str = "route";

/// Linked account creation payload.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LinkedAccountRequest {
    pub email: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub account_type: String,
    pub reference_id: String,
    pub legal_business_name: String,
    pub business_type: String,
    pub contact_name: String,
    pub profile: BusinessProfile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legal_info: Option<LegalInfo>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct BusinessProfile {
    pub category: String,
    pub subcategory: String,
    pub addresses: ProfileAddresses,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ProfileAddresses {
    pub registered: RegisteredAddress,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct RegisteredAddress {
    pub street1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LegalInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gst: Option<String>,
}

impl LinkedAccountRequest {
    /// Builds the provider payload from a KYC snapshot.
    ///
    /// For individuals the PAN is registered through the stakeholder instead, so legal
    /// info (PAN and GST) is only attached for other business types.
    ///
    /// # Arguments
    /// - `reference_id` - Our reference for the account, at most 20 characters
    /// - `kyc` - Validated KYC details
    pub fn from_kyc(reference_id: &str, kyc: &KycDetails) -> Self {
        let legal_info = if kyc.business_type.is_individual() {
            None
        } else {
            Some(LegalInfo {
                pan: Some(kyc.pan.clone()),
                gst: kyc.gst.clone(),
            })
        };

        Self {
            email: kyc.email.clone(),
            phone: kyc.phone.clone(),
            account_type: ROUTE_PRODUCT.to_string(),
            reference_id: reference_id.to_string(),
            legal_business_name: kyc.legal_business_name.clone(),
            business_type: kyc.business_type.as_str().to_string(),
            contact_name: kyc.contact_name.clone(),
            profile: BusinessProfile {
                category: "education".to_string(),
                subcategory: "coaching".to_string(),
                addresses: ProfileAddresses {
                    registered: RegisteredAddress {
                        street1: kyc.address.street1.clone(),
                        street2: kyc.address.street2.clone(),
                        city: kyc.address.city.clone(),
                        state: kyc.address.state.clone(),
                        postal_code: kyc.address.postal_code.clone(),
                        country: kyc.address.country.clone(),
                    },
                },
            },
            legal_info,
        }
    }
}

/// Linked account as reported by the provider.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProviderAccount {
    pub id: String,
    #[serde(default, alias = "activation_status")]
    pub status: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
    #[serde(default)]
    pub rejection_reason: Option<String>,
}

/// Product configuration of a linked account.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ProductConfiguration {
    pub id: String,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub activation_status: Option<String>,
    #[serde(default)]
    pub requirements: Vec<Requirement>,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Stakeholder {
    pub id: String,
}

#[async_trait]
pub trait PaymentProvider: Send + Sync {
    async fn create_linked_account(
        &self,
        request: &LinkedAccountRequest,
    ) -> Result<ProviderAccount, ProviderError>;

    /// Requests the route product for an account, creating its product configuration.
    async fn request_product_configuration(
        &self,
        account_id: &str,
    ) -> Result<ProductConfiguration, ProviderError>;

    /// Fetches the account's existing route product configuration.
    async fn get_product_configuration(
        &self,
        account_id: &str,
    ) -> Result<ProductConfiguration, ProviderError>;

    async fn get_product_configuration_details(
        &self,
        account_id: &str,
        product_id: &str,
    ) -> Result<ProductConfiguration, ProviderError>;

    async fn get_account_details(&self, account_id: &str) -> Result<ProviderAccount, ProviderError>;

    async fn create_stakeholder(
        &self,
        account_id: &str,
        stakeholder: &StakeholderData,
    ) -> Result<Stakeholder, ProviderError>;

    /// Submits settlement bank details against a product configuration.
    async fn update_settlement_details(
        &self,
        account_id: &str,
        product_id: &str,
        bank_information: &BankInformation,
    ) -> Result<ProductConfiguration, ProviderError>;
}
