use thiserror::Error;

/// Failures delivering email, SMS, WhatsApp or push messages.
#[derive(Error, Debug)]
pub enum MessagingError {
    #[error("Request to messaging gateway failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Messaging gateway returned {status} for {channel}: {message}")]
    Api {
        channel: &'static str,
        status: u16,
        message: String,
    },

    #[error("Invalid messaging gateway URL: {0}")]
    Url(#[from] url::ParseError),
}
