use std::str::FromStr;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_RAZORPAY_BASE_URL: &str = "https://api.razorpay.com";
const DEFAULT_OUTBOX_MAX_ATTEMPTS: i32 = 5;
/// Every 10 seconds.
const DEFAULT_OUTBOX_POLL_SCHEDULE: &str = "*/10 * * * * *";
/// Every 15 minutes.
const DEFAULT_STATUS_SYNC_SCHEDULE: &str = "0 */15 * * * *";

pub struct Config {
    pub database_url: String,
    pub bind_addr: String,

    pub razorpay_key_id: String,
    pub razorpay_key_secret: String,
    pub razorpay_base_url: String,

    pub messaging_base_url: String,
    pub messaging_api_key: String,

    pub outbox_max_attempts: i32,
    pub outbox_poll_schedule: String,
    pub status_sync_schedule: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let outbox_max_attempts = parse_or("OUTBOX_MAX_ATTEMPTS", DEFAULT_OUTBOX_MAX_ATTEMPTS)?;
        if outbox_max_attempts < 1 {
            return Err(ConfigError::InvalidEnvVar {
                name: "OUTBOX_MAX_ATTEMPTS".to_string(),
                value: outbox_max_attempts.to_string(),
                reason: "must be at least 1".to_string(),
            }
            .into());
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            bind_addr: optional("BIND_ADDR", DEFAULT_BIND_ADDR),
            razorpay_key_id: required("RAZORPAY_KEY_ID")?,
            razorpay_key_secret: required("RAZORPAY_KEY_SECRET")?,
            razorpay_base_url: optional("RAZORPAY_BASE_URL", DEFAULT_RAZORPAY_BASE_URL),
            messaging_base_url: required("MESSAGING_BASE_URL")?,
            messaging_api_key: required("MESSAGING_API_KEY")?,
            outbox_max_attempts,
            outbox_poll_schedule: optional("OUTBOX_POLL_SCHEDULE", DEFAULT_OUTBOX_POLL_SCHEDULE),
            status_sync_schedule: optional("STATUS_SYNC_SCHEDULE", DEFAULT_STATUS_SYNC_SCHEDULE),
        })
    }
}

fn required(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(value) => value.parse().map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value: value.clone(),
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}
