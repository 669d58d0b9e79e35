use async_trait::async_trait;
use serde::Serialize;
use url::Url;

use crate::server::{
    error::messaging::MessagingError,
    messaging::{EmailMessage, MessageGateway, PushMessage, TextMessage},
};

/// Messaging gateway speaking JSON over HTTP with a bearer API key.
///
/// Each channel maps to `POST {base_url}/v1/{channel}` with the message as the body.
#[derive(Clone)]
pub struct HttpMessageGateway {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl HttpMessageGateway {
    /// Creates a gateway client.
    ///
    /// # Arguments
    /// - `http` - Shared HTTP client (carries the request timeout)
    /// - `base_url` - Gateway root, e.g. `https://messaging.internal`
    /// - `api_key` - Bearer token
    ///
    /// # Returns
    /// - `Ok(HttpMessageGateway)` - Base URL parsed
    /// - `Err(MessagingError::Url)` - Base URL is malformed
    pub fn new(
        http: reqwest::Client,
        base_url: &str,
        api_key: String,
    ) -> Result<Self, MessagingError> {
        Ok(Self {
            http,
            base_url: Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?,
            api_key,
        })
    }

    async fn post<T: Serialize + Sync>(
        &self,
        channel: &'static str,
        body: &T,
    ) -> Result<(), MessagingError> {
        let url = self.base_url.join(&format!("v1/{}", channel))?;

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MessagingError::Api {
                channel,
                status,
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl MessageGateway for HttpMessageGateway {
    async fn send_email(&self, message: &EmailMessage) -> Result<(), MessagingError> {
        self.post("email", message).await
    }

    async fn send_sms(&self, message: &TextMessage) -> Result<(), MessagingError> {
        self.post("sms", message).await
    }

    async fn send_whatsapp(&self, message: &TextMessage) -> Result<(), MessagingError> {
        self.post("whatsapp", message).await
    }

    async fn send_push(&self, message: &PushMessage) -> Result<(), MessagingError> {
        self.post("push", message).await
    }
}
