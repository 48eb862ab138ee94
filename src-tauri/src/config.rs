use crate::error::ConfigError;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:5005/api";
pub const DEFAULT_ASSET_URL: &str = "http://localhost:5005/uploads";
pub const DEFAULT_PAYMENT_DELAY: Duration = Duration::from_millis(2000);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub flow: FlowConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    pub base_url: String,
    pub asset_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlowConfig {
    pub payment_delay: Duration,
    /// Drop the last receipt when the user starts a new booking.
    pub clear_receipt_on_new_booking: bool,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            payment_delay: DEFAULT_PAYMENT_DELAY,
            clear_receipt_on_new_booking: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup("FIELD_BOOKING_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let asset_url =
            lookup("FIELD_BOOKING_ASSET_URL").unwrap_or_else(|| DEFAULT_ASSET_URL.into());

        let timeout =
            millis(&lookup, "FIELD_BOOKING_HTTP_TIMEOUT_MS")?.unwrap_or(DEFAULT_HTTP_TIMEOUT);
        let payment_delay =
            millis(&lookup, "FIELD_BOOKING_PAYMENT_DELAY_MS")?.unwrap_or(DEFAULT_PAYMENT_DELAY);

        let clear_receipt_on_new_booking = match lookup("FIELD_BOOKING_CLEAR_RECEIPT") {
            None => false,
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "FIELD_BOOKING_CLEAR_RECEIPT",
                        value,
                    })
                }
            },
        };

        Ok(Self {
            api: ApiConfig {
                base_url: base_url.trim_end_matches('/').to_string(),
                asset_url: asset_url.trim_end_matches('/').to_string(),
                timeout,
            },
            flow: FlowConfig {
                payment_delay,
                clear_receipt_on_new_booking,
            },
        })
    }
}

fn millis(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<Duration>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<u64>()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::Invalid { key, value })
        })
        .transpose()
}
