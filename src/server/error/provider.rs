use thiserror::Error;

/// Failures talking to the payment processor.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Transport-level failure (DNS, TLS, timeout, malformed body).
    #[error("Request to payment provider failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider answered with a non-success status.
    #[error("Payment provider returned {status}: {message}")]
    Api { status: u16, message: String },

    /// Endpoint URL could not be built from the configured base URL.
    #[error("Invalid payment provider URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ProviderError {
    /// Message suitable for surfacing to the caller: the provider's own description when
    /// it sent one, otherwise the transport error.
    pub fn provider_message(&self) -> String {
        match self {
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
