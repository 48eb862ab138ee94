use crate::error::ExportError;
use crate::flow::{ClipboardSink, Route, Screen, ShareError, ShareOutcome, ShareSink};
use crate::models::ReceiptView;
use crate::state::AppStateExt;
use async_trait::async_trait;
use std::path::PathBuf;
use tauri::AppHandle;
use tauri_plugin_clipboard_manager::ClipboardExt;
use tauri_plugin_opener::OpenerExt;

/// Desktop stand-in for a native share sheet: a prefilled `mailto:` link.
struct MailShare<'a> {
    app: &'a AppHandle,
}

#[async_trait]
impl ShareSink for MailShare<'_> {
    async fn share(&self, title: &str, text: &str) -> Result<(), ShareError> {
        let mut url =
            reqwest::Url::parse("mailto:").map_err(|e| ShareError::Failed(e.to_string()))?;
        url.query_pairs_mut()
            .append_pair("subject", title)
            .append_pair("body", text);

        self.app
            .opener()
            .open_url(url.as_str(), None::<&str>)
            .map_err(|e| ShareError::Failed(e.to_string()))
    }
}

struct SystemClipboard<'a> {
    app: &'a AppHandle,
}

impl ClipboardSink for SystemClipboard<'_> {
    fn write_text(&self, text: &str) -> Result<(), ExportError> {
        self.app
            .clipboard()
            .write_text(text.to_string())
            .map_err(|e| ExportError::Clipboard(e.to_string()))
    }
}

#[tauri::command]
pub fn enter_receipt(app: AppHandle) -> Result<Screen<ReceiptView>, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.enter_receipt().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn download_receipt(app: AppHandle, dir: PathBuf) -> Result<PathBuf, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.download_receipt(&dir).map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn share_receipt(app: AppHandle) -> Result<ShareOutcome, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;
    let target = MailShare { app: &app };
    let clipboard = SystemClipboard { app: &app };

    flow.share_receipt(&target, &clipboard)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn start_new_booking(app: AppHandle) -> Result<Route, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.start_new_booking().map_err(|e| e.to_string())
}
