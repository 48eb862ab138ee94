//! Client for the remote booking API.
//!
//! The API is loose about types: ids come back as numbers or strings, flags as
//! `0/1` or booleans and prices as numbers or decimal strings. Everything is
//! normalised here so the rest of the crate only sees [`Field`] and [`Slot`].

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::models::{Field, Slot};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn available_fields(&self) -> Result<Vec<Field>, ApiError>;

    /// `Ok(None)` when the API does not know the field.
    async fn field(&self, id: &str) -> Result<Option<Field>, ApiError>;

    /// Slots for `field`, priced at the field's rate.
    async fn schedules(&self, field: &Field) -> Result<Vec<Slot>, ApiError>;

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError>;

    async fn register(&self, name: &str, email: &str, password: &str)
        -> Result<AuthResponse, ApiError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseId {
    Number(i64),
    Text(String),
}

impl LooseId {
    fn into_string(self) -> String {
        match self {
            LooseId::Number(n) => n.to_string(),
            LooseId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseFlag {
    Bool(bool),
    Number(i64),
}

impl LooseFlag {
    fn is_set(&self) -> bool {
        match self {
            LooseFlag::Bool(b) => *b,
            LooseFlag::Number(n) => *n == 1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    fn value(&self) -> f64 {
        match self {
            LooseNumber::Number(n) => *n,
            LooseNumber::Text(s) => s.trim().parse().unwrap_or(0.0),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SportTypeDto {
    name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FieldDto {
    id: LooseId,
    name: String,
    #[serde(default)]
    price: Option<LooseNumber>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "sportType")]
    sport_type: Option<SportTypeDto>,
    #[serde(default)]
    is_active: Option<LooseFlag>,
}

impl FieldDto {
    pub(crate) fn into_field(self, asset_url: &str) -> Field {
        let sport = self
            .sport_type
            .map(|s| s.name)
            .unwrap_or_else(|| "Unknown".to_string());

        Field {
            id: self.id.into_string(),
            image_url: format!("{asset_url}/{}.jpg", sport.to_lowercase()),
            name: self.name,
            sport,
            price: self.price.map(|p| p.value()).unwrap_or(0.0),
            description: self.description.unwrap_or_default(),
            is_available: self.is_active.map(|f| f.is_set()).unwrap_or(false),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleDto {
    id: LooseId,
    field_id: LooseId,
    start_time: String,
    end_time: String,
    is_available: LooseFlag,
}

impl ScheduleDto {
    pub(crate) fn into_slot(self, price: f64) -> Slot {
        Slot {
            id: self.id.into_string(),
            field_id: self.field_id.into_string(),
            start_time: clock(&self.start_time),
            end_time: clock(&self.end_time),
            is_available: self.is_available.is_set(),
            price,
        }
    }
}

/// `HH:MM:SS` -> `HH:MM`.
fn clock(time: &str) -> String {
    time.get(..5).unwrap_or(time).to_string()
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct HttpBookingApi {
    client: Client,
    base_url: String,
    asset_url: String,
}

impl HttpBookingApi {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            asset_url: config.asset_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|b| b.message)
            .unwrap_or_else(|| "unknown error".to_string());

        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.client.get(self.url(path)).send().await?;
        Self::read(response).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiError> {
        let response = self.client.post(self.url(path)).json(body).send().await?;
        Self::read(response).await
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn available_fields(&self) -> Result<Vec<Field>, ApiError> {
        let fields: Vec<FieldDto> = self.get_json("/fields/available").await?;

        Ok(fields
            .into_iter()
            .map(|f| f.into_field(&self.asset_url))
            .collect())
    }

    async fn field(&self, id: &str) -> Result<Option<Field>, ApiError> {
        match self.get_json::<FieldDto>(&format!("/fields/{id}")).await {
            Ok(dto) => Ok(Some(dto.into_field(&self.asset_url))),
            Err(ApiError::Status { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    async fn schedules(&self, field: &Field) -> Result<Vec<Slot>, ApiError> {
        let schedules: Vec<ScheduleDto> = self
            .get_json(&format!("/fields/{}/schedules", field.id))
            .await?;

        Ok(schedules
            .into_iter()
            .map(|s| s.into_slot(field.price))
            .collect())
    }

    async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/login",
            &serde_json::json!({ "email": email, "password": password }),
        )
        .await
    }

    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse, ApiError> {
        self.post_json(
            "/auth/register",
            &serde_json::json!({ "email": email, "password": password, "name": name }),
        )
        .await
    }
}
