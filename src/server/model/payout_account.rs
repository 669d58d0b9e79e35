//! Payout account domain models and parameters.
//!
//! A payout account is an academy's linked account at the payment provider: a KYC snapshot,
//! optional bank information and the activation state reported by the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    model::payout::{
        AddressDto, BankInformationDto, CreatePayoutAccountDto, KycDetailsDto,
        PaginatedPayoutAccountsDto, PayoutAccountDto, StakeholderDto,
    },
    server::{
        error::AppError,
        util::validate::{
            require_non_empty, validate_account_number, validate_email, validate_gst,
            validate_ifsc, validate_pan, validate_phone,
        },
    },
};

/// Activation state of a payout account as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStatus {
    Pending,
    NeedsClarification,
    Activated,
    Rejected,
}

impl ActivationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::NeedsClarification => "needs_clarification",
            Self::Activated => "activated",
            Self::Rejected => "rejected",
        }
    }

    /// Maps a provider or stored status string, treating anything unknown as `Pending`.
    pub fn from_provider(status: &str) -> Self {
        match status {
            "needs_clarification" => Self::NeedsClarification,
            "activated" => Self::Activated,
            "rejected" => Self::Rejected,
            _ => Self::Pending,
        }
    }

    /// Whether the provider normally leaves an account in this state for good.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Activated | Self::Rejected)
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Progress of the asynchronous bank details submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankDetailsStatus {
    Pending,
    Submitted,
}

impl BankDetailsStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Submitted => "submitted",
        }
    }

    pub fn parse(status: &str) -> Option<Self> {
        match status {
            "pending" => Some(Self::Pending),
            "submitted" => Some(Self::Submitted),
            _ => None,
        }
    }
}

/// Legal form of the academy's business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusinessType {
    Individual,
    Proprietorship,
    Partnership,
    PrivateLimited,
    PublicLimited,
    Llp,
    Trust,
    Society,
    Ngo,
    Other,
}

impl BusinessType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Proprietorship => "proprietorship",
            Self::Partnership => "partnership",
            Self::PrivateLimited => "private_limited",
            Self::PublicLimited => "public_limited",
            Self::Llp => "llp",
            Self::Trust => "trust",
            Self::Society => "society",
            Self::Ngo => "ngo",
            Self::Other => "other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "individual" => Some(Self::Individual),
            "proprietorship" => Some(Self::Proprietorship),
            "partnership" => Some(Self::Partnership),
            "private_limited" => Some(Self::PrivateLimited),
            "public_limited" => Some(Self::PublicLimited),
            "llp" => Some(Self::Llp),
            "trust" => Some(Self::Trust),
            "society" => Some(Self::Society),
            "ngo" => Some(Self::Ngo),
            "other" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn is_individual(&self) -> bool {
        matches!(self, Self::Individual)
    }

    /// Stakeholder relationship derived when the caller doesn't supply one.
    pub fn default_relationship(&self) -> &'static str {
        if self.is_individual() {
            "proprietor"
        } else {
            "authorised_signatory"
        }
    }
}

const STAKEHOLDER_RELATIONSHIPS: [&str; 4] =
    ["director", "proprietor", "partner", "authorised_signatory"];

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

impl Address {
    fn from_dto(dto: AddressDto) -> Result<Self, AppError> {
        require_non_empty("address.street1", &dto.street1)?;
        require_non_empty("address.city", &dto.city)?;
        require_non_empty("address.state", &dto.state)?;
        require_non_empty("address.postal_code", &dto.postal_code)?;
        require_non_empty("address.country", &dto.country)?;

        Ok(Self {
            street1: dto.street1.trim().to_string(),
            street2: non_blank(dto.street2),
            city: dto.city.trim().to_string(),
            state: dto.state.trim().to_string(),
            postal_code: dto.postal_code.trim().to_string(),
            country: dto.country.trim().to_ascii_uppercase(),
        })
    }

    fn into_dto(self) -> AddressDto {
        AddressDto {
            street1: self.street1,
            street2: self.street2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
        }
    }
}

/// KYC snapshot captured at creation. Never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct KycDetails {
    pub legal_business_name: String,
    pub business_type: BusinessType,
    pub contact_name: String,
    pub email: String,
    pub phone: String,
    pub pan: String,
    pub gst: Option<String>,
    pub address: Address,
}

impl KycDetails {
    /// Validates and normalises submitted KYC details.
    ///
    /// PAN is mandatory for every business type; PAN and GST are upper-cased before
    /// validation.
    ///
    /// # Returns
    /// - `Ok(KycDetails)` - All fields valid
    /// - `Err(AppError::BadRequest)` - First invalid field
    pub fn from_dto(dto: KycDetailsDto) -> Result<Self, AppError> {
        require_non_empty("kyc_details.legal_business_name", &dto.legal_business_name)?;
        require_non_empty("kyc_details.contact_name", &dto.contact_name)?;
        require_non_empty("kyc_details.email", &dto.email)?;
        require_non_empty("kyc_details.phone", &dto.phone)?;

        let business_type = BusinessType::parse(dto.business_type.trim()).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unsupported business type '{}'",
                dto.business_type
            ))
        })?;

        let email = dto.email.trim().to_string();
        validate_email(&email)?;
        let phone = dto.phone.trim().to_string();
        validate_phone(&phone)?;

        let pan = dto
            .pan
            .map(|pan| pan.trim().to_ascii_uppercase())
            .filter(|pan| !pan.is_empty())
            .ok_or_else(|| AppError::BadRequest("kyc_details.pan is required".to_string()))?;
        validate_pan(&pan)?;

        let gst = non_blank(dto.gst).map(|gst| gst.to_ascii_uppercase());
        if let Some(gst) = &gst {
            validate_gst(gst)?;
        }

        Ok(Self {
            legal_business_name: dto.legal_business_name.trim().to_string(),
            business_type,
            contact_name: dto.contact_name.trim().to_string(),
            email,
            phone,
            pan,
            gst,
            address: Address::from_dto(dto.address)?,
        })
    }

    fn into_dto(self) -> KycDetailsDto {
        KycDetailsDto {
            legal_business_name: self.legal_business_name,
            business_type: self.business_type.as_str().to_string(),
            contact_name: self.contact_name,
            email: self.email,
            phone: self.phone,
            pan: Some(self.pan),
            gst: self.gst,
            address: self.address.into_dto(),
        }
    }
}

/// Settlement bank account. Also travels inside bank details job payloads.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BankInformation {
    pub account_number: String,
    pub ifsc_code: String,
    pub account_holder_name: String,
    pub bank_name: Option<String>,
}

impl BankInformation {
    /// Validates and normalises submitted bank information.
    ///
    /// # Returns
    /// - `Ok(BankInformation)` - Account number, IFSC and holder name are valid
    /// - `Err(AppError::BadRequest)` - First invalid field
    pub fn from_dto(dto: BankInformationDto) -> Result<Self, AppError> {
        let account_number = dto.account_number.trim().to_string();
        validate_account_number(&account_number)?;

        let ifsc_code = dto.ifsc_code.trim().to_ascii_uppercase();
        validate_ifsc(&ifsc_code)?;

        require_non_empty(
            "bank_information.account_holder_name",
            &dto.account_holder_name,
        )?;

        Ok(Self {
            account_number,
            ifsc_code,
            account_holder_name: dto.account_holder_name.trim().to_string(),
            bank_name: non_blank(dto.bank_name),
        })
    }

    pub fn into_dto(self) -> BankInformationDto {
        BankInformationDto {
            account_number: self.account_number,
            ifsc_code: self.ifsc_code,
            account_holder_name: self.account_holder_name,
            bank_name: self.bank_name,
        }
    }
}

/// Natural person registered against the linked account for KYC.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct StakeholderData {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    /// `director`, `proprietor`, `partner` or `authorised_signatory`.
    pub relationship: String,
    pub pan: Option<String>,
}

impl StakeholderData {
    /// Derives the stakeholder from the KYC contact.
    pub fn from_kyc(kyc: &KycDetails) -> Self {
        Self {
            name: kyc.contact_name.clone(),
            email: kyc.email.clone(),
            phone: Some(kyc.phone.clone()),
            relationship: kyc.business_type.default_relationship().to_string(),
            pan: Some(kyc.pan.clone()),
        }
    }

    /// Builds an explicit stakeholder, filling relationship and PAN from the KYC details
    /// when omitted.
    fn from_dto(dto: StakeholderDto, kyc: &KycDetails) -> Result<Self, AppError> {
        require_non_empty("stakeholder.name", &dto.name)?;
        let email = dto.email.trim().to_string();
        validate_email(&email)?;

        let phone = non_blank(dto.phone);
        if let Some(phone) = &phone {
            validate_phone(phone)?;
        }

        let relationship = match non_blank(dto.relationship) {
            Some(relationship) => {
                if !STAKEHOLDER_RELATIONSHIPS.contains(&relationship.as_str()) {
                    return Err(AppError::BadRequest(format!(
                        "Unsupported stakeholder relationship '{}'",
                        relationship
                    )));
                }
                relationship
            }
            None => kyc.business_type.default_relationship().to_string(),
        };

        let pan = match non_blank(dto.pan).map(|pan| pan.to_ascii_uppercase()) {
            Some(pan) => {
                validate_pan(&pan)?;
                pan
            }
            None => kyc.pan.clone(),
        };

        Ok(Self {
            name: dto.name.trim().to_string(),
            email,
            phone,
            relationship,
            pan: Some(pan),
        })
    }
}

/// Payout account domain model.
#[derive(Debug, Clone, PartialEq)]
pub struct PayoutAccount {
    pub id: String,
    pub user_id: i32,
    pub razorpay_account_id: String,
    pub kyc_details: KycDetails,
    pub bank_information: Option<BankInformation>,
    pub activation_status: ActivationStatus,
    pub activation_requirements: Option<Vec<String>>,
    pub rejection_reason: Option<String>,
    pub product_configuration_id: Option<String>,
    pub product_configuration_status: Option<String>,
    pub stakeholder_id: Option<String>,
    pub bank_details_status: Option<BankDetailsStatus>,
    pub metadata: serde_json::Value,
    pub is_active: bool,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PayoutAccount {
    /// Converts an entity model to a domain model at the repository boundary.
    ///
    /// Unknown stored strings degrade gracefully: an unknown activation status reads as
    /// `Pending`, an unknown business type as `Other`, and bank information is only
    /// present when all its required columns are.
    pub fn from_entity(entity: entity::payout_account::Model) -> Self {
        let bank_information = match (
            entity.account_number,
            entity.ifsc_code,
            entity.account_holder_name,
        ) {
            (Some(account_number), Some(ifsc_code), Some(account_holder_name)) => {
                Some(BankInformation {
                    account_number,
                    ifsc_code,
                    account_holder_name,
                    bank_name: entity.bank_name,
                })
            }
            _ => None,
        };

        let activation_requirements = entity
            .activation_requirements
            .and_then(|value| serde_json::from_value::<Vec<String>>(value).ok())
            .filter(|requirements| !requirements.is_empty());

        Self {
            id: entity.id,
            user_id: entity.user_id,
            razorpay_account_id: entity.razorpay_account_id,
            kyc_details: KycDetails {
                legal_business_name: entity.legal_business_name,
                business_type: BusinessType::parse(&entity.business_type)
                    .unwrap_or(BusinessType::Other),
                contact_name: entity.contact_name,
                email: entity.email,
                phone: entity.phone,
                pan: entity.pan,
                gst: entity.gst,
                address: Address {
                    street1: entity.street1,
                    street2: entity.street2,
                    city: entity.city,
                    state: entity.state,
                    postal_code: entity.postal_code,
                    country: entity.country,
                },
            },
            bank_information,
            activation_status: ActivationStatus::from_provider(&entity.activation_status),
            activation_requirements,
            rejection_reason: entity.rejection_reason,
            product_configuration_id: entity.product_configuration_id,
            product_configuration_status: entity.product_configuration_status,
            stakeholder_id: entity.stakeholder_id,
            bank_details_status: entity
                .bank_details_status
                .as_deref()
                .and_then(BankDetailsStatus::parse),
            metadata: entity.metadata,
            is_active: entity.is_active,
            version: entity.version,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }

    /// Converts the domain model into its caller-facing representation.
    ///
    /// Internal references (provider account id, owning user, stakeholder id, product
    /// configuration id, metadata, version) have no counterpart on the DTO and are
    /// dropped here. `product_configuration_status` is exposed as `ready_for_payout`,
    /// with `configured` reported as `ready`.
    pub fn into_dto(self) -> PayoutAccountDto {
        PayoutAccountDto {
            id: self.id,
            kyc_details: self.kyc_details.into_dto(),
            bank_information: self.bank_information.map(BankInformation::into_dto),
            activation_status: self.activation_status.as_str().to_string(),
            activation_requirements: self.activation_requirements,
            rejection_reason: self.rejection_reason,
            bank_details_status: self
                .bank_details_status
                .map(|status| status.as_str().to_string()),
            ready_for_payout: self.product_configuration_status.map(ready_for_payout),
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Sets a key on the free-form metadata object, replacing non-object metadata.
    pub fn set_metadata(&mut self, key: &str, value: serde_json::Value) {
        if !self.metadata.is_object() {
            self.metadata = serde_json::Value::Object(serde_json::Map::new());
        }
        if let Some(map) = self.metadata.as_object_mut() {
            map.insert(key.to_string(), value);
        }
    }
}

fn ready_for_payout(product_configuration_status: String) -> String {
    if product_configuration_status == "configured" {
        "ready".to_string()
    } else {
        product_configuration_status
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Validated input for creating a payout account.
#[derive(Debug, Clone)]
pub struct CreatePayoutAccountParams {
    pub user_id: i32,
    pub kyc_details: KycDetails,
    pub bank_information: Option<BankInformation>,
    /// Explicit stakeholder; `None` means derive it from the KYC contact.
    pub stakeholder: Option<StakeholderData>,
}

impl CreatePayoutAccountParams {
    /// Validates a creation request for `user_id`.
    ///
    /// # Returns
    /// - `Ok(CreatePayoutAccountParams)` - Request is valid
    /// - `Err(AppError::BadRequest)` - A field failed validation
    pub fn from_dto(user_id: i32, dto: CreatePayoutAccountDto) -> Result<Self, AppError> {
        let kyc_details = KycDetails::from_dto(dto.kyc_details)?;
        let bank_information = dto
            .bank_information
            .map(BankInformation::from_dto)
            .transpose()?;
        let stakeholder = dto
            .stakeholder
            .map(|stakeholder| StakeholderData::from_dto(stakeholder, &kyc_details))
            .transpose()?;

        Ok(Self {
            user_id,
            kyc_details,
            bank_information,
            stakeholder,
        })
    }
}

/// Validated input for replacing an account's bank information.
#[derive(Debug, Clone)]
pub struct UpdateBankDetailsParams {
    pub user_id: i32,
    pub bank_information: BankInformation,
}

impl UpdateBankDetailsParams {
    pub fn from_dto(user_id: i32, dto: BankInformationDto) -> Result<Self, AppError> {
        Ok(Self {
            user_id,
            bank_information: BankInformation::from_dto(dto)?,
        })
    }
}

/// Row to insert for a freshly created linked account.
#[derive(Debug, Clone)]
pub struct NewPayoutAccount {
    pub id: String,
    pub user_id: i32,
    pub razorpay_account_id: String,
    pub kyc_details: KycDetails,
    pub activation_status: ActivationStatus,
    pub activation_requirements: Option<Vec<String>>,
    pub product_configuration_id: Option<String>,
    pub product_configuration_status: Option<String>,
    pub metadata: serde_json::Value,
}

/// One page of payout accounts for the admin listing.
#[derive(Debug, Clone)]
pub struct PaginatedPayoutAccounts {
    pub accounts: Vec<PayoutAccount>,
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
}

impl PaginatedPayoutAccounts {
    pub fn into_dto(self) -> PaginatedPayoutAccountsDto {
        let total_pages = if self.per_page == 0 {
            0
        } else {
            self.total.div_ceil(self.per_page)
        };

        PaginatedPayoutAccountsDto {
            accounts: self
                .accounts
                .into_iter()
                .map(PayoutAccount::into_dto)
                .collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            total_pages,
        }
    }
}
