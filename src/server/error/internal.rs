use thiserror::Error;

/// Internal issues with the codebase indicating unexpected behavior & possible bugs
#[derive(Error, Debug)]
pub enum InternalError {
    /// Failure to encode or decode a background job payload
    ///
    /// Results in a 500 Internal Server Error with a generic message returned
    /// to client.
    #[error("Failed to (de)serialize payload for job '{kind}': {source}")]
    JobPayload {
        /// The outbox job kind being processed
        kind: String,
        /// The underlying serde error
        #[source]
        source: serde_json::Error,
    },

    /// Outbox row carries a kind no dispatcher knows about
    #[error("Unknown outbox job kind '{0}'")]
    UnknownJobKind(String),
}
