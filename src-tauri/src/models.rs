use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: String,
    pub name: String,
    pub sport: String,
    pub price: f64,
    pub description: String,
    pub is_available: bool,
    pub image_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Slot {
    pub id: String,
    pub field_id: String,
    pub start_time: String,
    pub end_time: String,
    pub is_available: bool,
    pub price: f64,
}

/// A confirmed but unpaid slot selection.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub resource_id: String,
    pub resource_name: String,
    pub slot_id: String,
    pub start_time: String,
    pub end_time: String,
    pub total_price: f64,
    pub date: NaiveDate,
}

impl Draft {
    pub fn new(field: &Field, slot: &Slot, date: NaiveDate) -> Self {
        Draft {
            resource_id: field.id.clone(),
            resource_name: field.name.clone(),
            slot_id: slot.id.clone(),
            start_time: slot.start_time.clone(),
            end_time: slot.end_time.clone(),
            total_price: slot.price.max(0.0),
            date,
        }
    }
}

/// Receipt of a completed payment, encoded into the QR code shown at the field.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QrRecord {
    pub resource_id: String,
    pub resource_name: String,
    pub start_time: String,
    pub end_time: String,
    pub total_price: f64,
    pub reservation_id: String,
    pub timestamp: String,
}

impl QrRecord {
    /// Issues a receipt for `draft` with a fresh reservation id.
    pub fn issue(draft: &Draft, settled_at: DateTime<Utc>) -> Self {
        QrRecord {
            resource_id: draft.resource_id.clone(),
            resource_name: draft.resource_name.clone(),
            start_time: draft.start_time.clone(),
            end_time: draft.end_time.clone(),
            total_price: draft.total_price,
            reservation_id: Uuid::new_v4().simple().to_string(),
            timestamp: settled_at.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct CardDetails {
    pub number: String,
    pub holder: String,
    pub expiry: String,
    pub security_code: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionView {
    pub field: Field,
    pub slots: Vec<Slot>,
    pub dates: Vec<NaiveDate>,
    pub date: NaiveDate,
    pub selected_slot_id: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptView {
    pub record: QrRecord,
    pub payload: String,
    pub svg: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldStats {
    pub field_id: String,
    pub field_name: String,
    pub reservation_count: i64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AdminMetrics {
    pub total_reservations: i64,
    pub total_revenue: f64,
    pub field_stats: Vec<FieldStats>,
}
