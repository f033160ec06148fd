use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// Checks a backoffice login against the configured accounts and returns the username.
pub fn verify_admin(state: &AppState, username: &str, password: &str) -> AppResult<String> {
    let username = username.trim();
    let account = state
        .admins
        .iter()
        .find(|admin| admin.username == username && admin.password == password);

    match account {
        Some(admin) => {
            tracing::info!(username = %admin.username, "admin logged in");
            Ok(admin.username.clone())
        }
        None => {
            tracing::warn!(username, "rejected admin login");
            Err(AppError::Unauthorized)
        }
    }
}
