use crate::db::DatabaseExt;
use crate::flow::Route;
use crate::models::AdminMetrics;
use crate::state::AppStateExt;
use tauri::AppHandle;

#[tauri::command]
pub fn admin_metrics(app: AppHandle) -> Result<AdminMetrics, String> {
    let state = app.booking();
    state.session.require_admin().map_err(|e| e.to_string())?;
    state.flow.leave(Route::Admin);

    app.db().admin_metrics().map_err(|e| e.to_string())
}
