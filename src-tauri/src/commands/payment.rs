use crate::db::DatabaseExt;
use crate::flow::payment::{format_card_number, format_expiry, format_security_code};
use crate::flow::Screen;
use crate::models::{CardDetails, Draft, QrRecord};
use crate::state::AppStateExt;
use serde::Deserialize;
use tauri::AppHandle;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CardInput {
    Number,
    Expiry,
    SecurityCode,
}

#[tauri::command]
pub fn enter_payment(app: AppHandle) -> Result<Screen<Draft>, String> {
    let flow = app.booking().signed_in_flow().map_err(|e| e.to_string())?;

    flow.enter_payment().map_err(|e| e.to_string())
}

/// Live formatting for the card form as the user types.
#[tauri::command]
pub fn format_card_input(input: CardInput, value: String) -> String {
    match input {
        CardInput::Number => format_card_number(&value),
        CardInput::Expiry => format_expiry(&value),
        CardInput::SecurityCode => format_security_code(&value),
    }
}

#[tauri::command]
pub async fn submit_payment(app: AppHandle, card: CardDetails) -> Result<QrRecord, String> {
    let state = app.booking();
    let user = state.session.require_user().map_err(|e| e.to_string())?;

    let receipt = state
        .flow
        .submit_payment(&card)
        .await
        .map_err(|e| e.to_string())?;

    // The ledger only feeds admin metrics; the receipt is already stored.
    if let Err(err) = app.db().record_reservation(&receipt, Some(&user.email)) {
        tracing::error!(
            error = %err,
            reservation = %receipt.reservation_id,
            "failed to record reservation"
        );
    }

    Ok(receipt)
}
