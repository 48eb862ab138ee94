use crate::flow::{Route, Screen};
use crate::models::{Field, SelectionView};
use crate::state::AppStateExt;
use chrono::NaiveDate;
use tauri::AppHandle;

#[tauri::command]
pub async fn list_fields(app: AppHandle) -> Result<Vec<Field>, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.entry().await.map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn open_field(app: AppHandle, field_id: String) -> Result<Screen<SelectionView>, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    let today = chrono::Local::now().date_naive();
    flow.open_field(&field_id, today)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn choose_date(app: AppHandle, date: String) -> Result<SelectionView, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;
    let date = NaiveDate::parse_from_str(&date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid date {}: {}", date, e))?;

    flow.choose_date(date).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn select_slot(app: AppHandle, slot_id: String) -> Result<SelectionView, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.select_slot(&slot_id).map_err(|e| e.to_string())
}

#[tauri::command]
pub fn confirm_selection(app: AppHandle) -> Result<Route, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.confirm_selection().map_err(|e| e.to_string())
}

/// Called by the webview whenever it changes screen on its own.
#[tauri::command]
pub fn leave_view(app: AppHandle, to: Route) -> Result<(), String> {
    app.booking().flow.leave(to);
    Ok(())
}
