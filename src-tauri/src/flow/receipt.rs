//! QR issuance: rendering the receipt and exporting it. Nothing here writes
//! to the store.

use crate::error::ExportError;
use crate::models::{QrRecord, ReceiptView};
use async_trait::async_trait;
use image::Luma;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::Serialize;
use std::path::{Path, PathBuf};

pub const SHARE_TITLE: &str = "My SportReserve booking";
const MIN_CODE_SIZE: u32 = 220;

/// The exact text encoded in the code: the receipt as JSON.
pub fn payload(record: &QrRecord) -> Result<String, ExportError> {
    Ok(serde_json::to_string(record)?)
}

pub fn decode_payload(payload: &str) -> Result<QrRecord, ExportError> {
    Ok(serde_json::from_str(payload)?)
}

pub fn encode(payload: &str) -> Result<QrCode, ExportError> {
    QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::H)
        .map_err(|e| ExportError::Code(e.to_string()))
}

pub fn render(record: &QrRecord) -> Result<ReceiptView, ExportError> {
    let payload = payload(record)?;
    let svg = encode(&payload)?
        .render::<svg::Color<'_>>()
        .min_dimensions(MIN_CODE_SIZE, MIN_CODE_SIZE)
        .quiet_zone(true)
        .build();

    Ok(ReceiptView {
        record: record.clone(),
        payload,
        svg,
    })
}

pub fn export_file_name(record: &QrRecord) -> String {
    format!("reservation-{}.png", record.reservation_id)
}

/// Writes the code as a PNG into `dir` and returns the file path.
pub fn download(record: &QrRecord, dir: &Path) -> Result<PathBuf, ExportError> {
    let image = encode(&payload(record)?)?
        .render::<Luma<u8>>()
        .min_dimensions(MIN_CODE_SIZE, MIN_CODE_SIZE)
        .quiet_zone(true)
        .build();

    let path = dir.join(export_file_name(record));
    image.save(&path)?;

    tracing::info!(path = %path.display(), "receipt code exported");
    Ok(path)
}

pub fn share_summary(record: &QrRecord) -> String {
    format!(
        "Booked {} for {} - {}",
        record.resource_name, record.start_time, record.end_time
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    /// No native share target on this platform.
    Unavailable,
    Cancelled,
    Failed(String),
}

#[async_trait]
pub trait ShareSink: Send + Sync {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError>;
}

pub trait ClipboardSink: Send + Sync {
    fn write_text(&self, text: &str) -> Result<(), ExportError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareOutcome {
    Shared,
    Copied,
    Dismissed,
}

/// Shares the summary natively, falling back to the clipboard.
pub async fn share(
    record: &QrRecord,
    target: &dyn ShareSink,
    clipboard: &dyn ClipboardSink,
) -> Result<ShareOutcome, ExportError> {
    let text = share_summary(record);

    match target.share(SHARE_TITLE, &text).await {
        Ok(()) => Ok(ShareOutcome::Shared),
        Err(ShareError::Cancelled) => Ok(ShareOutcome::Dismissed),
        Err(err) => {
            if let ShareError::Failed(reason) = &err {
                tracing::warn!(%reason, "native share failed, copying to clipboard");
            }
            clipboard.write_text(&text)?;
            Ok(ShareOutcome::Copied)
        }
    }
}
