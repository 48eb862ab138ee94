use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("failed to encode stored value: {0}")]
    Encode(#[from] serde_json::Error),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("booking API answered {status}: {message}")]
    Status { status: u16, message: String },
}

/// Why a simulated or real settlement did not go through.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("payment declined: {0}")]
    Declined(String),
    #[error("payment network error: {0}")]
    Network(String),
    #[error("payment timed out")]
    Timeout,
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode receipt: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("failed to build QR code: {0}")]
    Code(String),
    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("slot {0} is not available")]
    SlotUnavailable(String),
    #[error("slot {0} does not exist")]
    UnknownSlot(String),
    #[error("no slot has been selected")]
    NoSlotSelected,
    #[error("no field is open")]
    NoFieldOpen,
    #[error("date {0} is outside the booking window")]
    DateOutOfRange(chrono::NaiveDate),
    #[error("there is no reservation awaiting payment")]
    NoDraft,
    #[error("there is no completed reservation")]
    NoReceipt,
    #[error("a payment is already being processed")]
    PaymentInFlight,
    #[error("invalid card details: {0}")]
    InvalidCard(&'static str),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error("the view was left before the operation completed")]
    Superseded,
    #[error("invalid credentials: {0}")]
    InvalidCredentials(&'static str),
    #[error("sign in required")]
    NotSignedIn,
    #[error("administrator access required")]
    Forbidden,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
