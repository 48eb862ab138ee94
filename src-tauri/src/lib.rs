pub mod api;
mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod flow;
pub mod models;
pub mod session;
pub mod state;
pub mod store;


use api::HttpBookingApi;
use commands::{fields, payment, receipt, reports, session as auth};
use config::AppConfig;
use db::Database;
use state::AppState;
use std::sync::Arc;
use tauri::Manager;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_logger() -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if cfg!(debug_assertions) { "debug" } else { "info" };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| log_level.into());

    let subscriber = tracing_subscriber::fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_target(false);

    tracing_subscriber::registry()
        .with(subscriber)
        .with(env_filter)
        .try_init()?;

    Ok(())
}

#[cfg_attr(mobile, tauri::mobile_entry_point)]
pub fn run() {
    if let Err(err) = init_logger() {
        eprintln!("failed to initialise logging: {err}");
    }

    tauri::Builder::default()
        .plugin(tauri_plugin_opener::init())
        .plugin(tauri_plugin_dialog::init())
        .plugin(tauri_plugin_fs::init())
        .plugin(tauri_plugin_clipboard_manager::init())
        .setup(|app| {
            let config = AppConfig::from_env()?;
            tracing::info!(api = %config.api.base_url, "starting field booking");

            // Session database (drafts, receipts, signed-in user, ledger)
            let db = Arc::new(Database::new(app.handle())?);
            db.initialize()?;

            let api = Arc::new(HttpBookingApi::new(&config.api)?);
            app.manage(AppState::new(db, api, config));

            Ok(())
        })
        .invoke_handler(tauri::generate_handler![
            // Session
            auth::login,
            auth::register,
            auth::logout,
            auth::current_user,
            // Slot selection
            fields::list_fields,
            fields::open_field,
            fields::choose_date,
            fields::select_slot,
            fields::confirm_selection,
            fields::leave_view,
            // Payment
            payment::enter_payment,
            payment::format_card_input,
            payment::submit_payment,
            // QR issuance
            receipt::enter_receipt,
            receipt::download_receipt,
            receipt::share_receipt,
            receipt::start_new_booking,
            // Reports
            reports::admin_metrics,
        ])
        .run(tauri::generate_context!())
        .expect("error while running tauri application");
}
