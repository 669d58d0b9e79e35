use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct AddressDto {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    /// ISO country code, defaults to `IN` when omitted.
    #[serde(default = "default_country")]
    pub country: String,
}

fn default_country() -> String {
    "IN".to_string()
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct KycDetailsDto {
    pub legal_business_name: String,
    /// `individual`, `proprietorship`, `partnership`, `private_limited`, `public_limited`,
    /// `llp`, `trust`, `society`, `ngo` or `other`.
    pub business_type: String,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub pan: Option<String>,
    pub gst: Option<String>,
    pub address: AddressDto,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct BankInformationDto {
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub bank_name: Option<String>,
}

/// Explicit stakeholder, overriding the one derived from the KYC contact.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct StakeholderDto {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// `director`, `proprietor`, `partner` or `authorised_signatory`.
    pub relationship: Option<String>,
    pub pan: Option<String>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct CreatePayoutAccountDto {
    pub kyc_details: KycDetailsDto,
    pub bank_information: Option<BankInformationDto>,
    pub stakeholder: Option<StakeholderDto>,
}

/// Caller-facing payout account. Internal references never appear here.
#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct PayoutAccountDto {
    pub id: String,
    pub kyc_details: KycDetailsDto,
    pub bank_information: Option<BankInformationDto>,
    pub activation_status: String,
    pub activation_requirements: Option<Vec<String>>,
    pub rejection_reason: Option<String>,
    pub bank_details_status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ready_for_payout: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, PartialEq, Clone, Debug, ToSchema)]
pub struct PaginatedPayoutAccountsDto {
    pub accounts: Vec<PayoutAccountDto>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}
