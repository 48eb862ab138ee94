use crate::models::User;
use crate::state::AppStateExt;
use tauri::AppHandle;

#[tauri::command]
pub async fn login(app: AppHandle, email: String, password: String) -> Result<User, String> {
    app.booking()
        .session
        .login(&email, &password)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub async fn register(
    app: AppHandle,
    name: String,
    email: String,
    password: String,
) -> Result<User, String> {
    app.booking()
        .session
        .register(&name, &email, &password)
        .await
        .map_err(|e| e.to_string())
}

#[tauri::command]
pub fn logout(app: AppHandle) -> Result<(), String> {
    app.booking().session.logout().map_err(|e| e.to_string())
}

#[tauri::command]
pub fn current_user(app: AppHandle) -> Result<Option<User>, String> {
    app.booking()
        .session
        .current_user()
        .map_err(|e| e.to_string())
}
