use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::json;
use url::Url;

use crate::server::{
    error::provider::ProviderError,
    model::payout_account::{BankInformation, StakeholderData},
    provider::{
        LinkedAccountRequest, PaymentProvider, ProductConfiguration, ProviderAccount,
        Stakeholder, ROUTE_PRODUCT,
    },
};

/// Razorpay Route API client.
///
/// Authenticates every request with the key id/secret pair over HTTP basic auth. Error
/// responses carry `{"error": {"description": ..}}`, which becomes the message of
/// `ProviderError::Api`.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    base_url: Url,
    key_id: String,
    key_secret: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

#[derive(Deserialize)]
struct ProductConfigurationList {
    #[serde(default)]
    items: Vec<ProductConfiguration>,
}

impl RazorpayClient {
    /// Creates a client.
    ///
    /// # Arguments
    /// - `http` - Shared HTTP client (carries the request timeout)
    /// - `base_url` - API root, normally `https://api.razorpay.com`
    /// - `key_id` - API key id
    /// - `key_secret` - API key secret
    ///
    /// # Returns
    /// - `Ok(RazorpayClient)` - Base URL parsed
    /// - `Err(ProviderError::Url)` - Base URL is malformed
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        key_id: String,
        key_secret: String,
    ) -> Result<Self, ProviderError> {
        Ok(Self {
            http,
            base_url: Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?,
            key_id,
            key_secret,
        })
    }

    fn url(&self, path: &str) -> Result<Url, ProviderError> {
        Ok(self.base_url.join(path)?)
    }

    /// Sends an authenticated request and decodes a JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let response = request
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .ok()
                .and_then(|envelope| envelope.error.description.or(envelope.error.code))
                .unwrap_or(body);

            return Err(ProviderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl PaymentProvider for RazorpayClient {
    async fn create_linked_account(
        &self,
        request: &LinkedAccountRequest,
    ) -> Result<ProviderAccount, ProviderError> {
        let url = self.url("v2/accounts")?;
        self.send(self.http.post(url).json(request)).await
    }

    async fn request_product_configuration(
        &self,
        account_id: &str,
    ) -> Result<ProductConfiguration, ProviderError> {
        let url = self.url(&format!("v2/accounts/{}/products", account_id))?;
        let body = json!({ "product_name": ROUTE_PRODUCT, "tnc_accepted": true });
        self.send(self.http.post(url).json(&body)).await
    }

    async fn get_product_configuration(
        &self,
        account_id: &str,
    ) -> Result<ProductConfiguration, ProviderError> {
        let url = self.url(&format!("v2/accounts/{}/products", account_id))?;
        let list: ProductConfigurationList = self.send(self.http.get(url)).await?;

        list.items
            .into_iter()
            .find(|product| {
                product
                    .product_name
                    .as_deref()
                    .is_none_or(|name| name == ROUTE_PRODUCT)
            })
            .ok_or_else(|| ProviderError::Api {
                status: 404,
                message: format!("No {} product configuration for account", ROUTE_PRODUCT),
            })
    }

    async fn get_product_configuration_details(
        &self,
        account_id: &str,
        product_id: &str,
    ) -> Result<ProductConfiguration, ProviderError> {
        let url = self.url(&format!(
            "v2/accounts/{}/products/{}",
            account_id, product_id
        ))?;
        self.send(self.http.get(url)).await
    }

    async fn get_account_details(&self, account_id: &str) -> Result<ProviderAccount, ProviderError> {
        let url = self.url(&format!("v2/accounts/{}", account_id))?;
        self.send(self.http.get(url)).await
    }

    async fn create_stakeholder(
        &self,
        account_id: &str,
        stakeholder: &StakeholderData,
    ) -> Result<Stakeholder, ProviderError> {
        let url = self.url(&format!("v2/accounts/{}/stakeholders", account_id))?;

        let mut body = json!({
            "name": stakeholder.name,
            "email": stakeholder.email,
            "relationship": {
                "director": stakeholder.relationship == "director",
                "executive": stakeholder.relationship != "director",
            },
            "notes": { "relationship": stakeholder.relationship },
        });
        if let Some(phone) = &stakeholder.phone {
            body["phone"] = json!({ "primary": phone });
        }
        if let Some(pan) = &stakeholder.pan {
            body["kyc"] = json!({ "pan": pan });
        }

        self.send(self.http.post(url).json(&body)).await
    }

    async fn update_settlement_details(
        &self,
        account_id: &str,
        product_id: &str,
        bank_information: &BankInformation,
    ) -> Result<ProductConfiguration, ProviderError> {
        let url = self.url(&format!(
            "v2/accounts/{}/products/{}",
            account_id, product_id
        ))?;
        let body = json!({
            "settlements": {
                "account_number": bank_information.account_number,
                "ifsc_code": bank_information.ifsc_code,
                "beneficiary_name": bank_information.account_holder_name,
            },
            "tnc_accepted": true,
        });

        self.send(self.http.patch(url).json(&body)).await
    }
}
