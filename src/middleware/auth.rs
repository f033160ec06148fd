//! Backoffice session state and the extractor guarding admin pages.

use std::str::FromStr;

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use crate::error::AppResult;

pub const LOGIN_PATH: &str = "/admin/login";

pub mod session_keys {
    pub const USERNAME: &str = "admin_username";
    pub const PROFILE: &str = "admin_profile";
}

/// Workspace chosen after logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    AdminDb,
    Soporte,
}

impl Profile {
    pub fn home_path(self) -> &'static str {
        match self {
            Profile::AdminDb => "/admin/dashboard",
            Profile::Soporte => "/admin/soporte_dashboard",
        }
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin_db" => Ok(Profile::AdminDb),
            "soporte" => Ok(Profile::Soporte),
            other => Err(format!("unknown profile: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminSession {
    pub username: String,
    pub profile: Option<Profile>,
}

/// Extractor for pages that need a logged-in admin; anyone else is sent to the login form.
pub struct RequireAdmin(pub AdminSession);

pub enum AdminRejection {
    RedirectToLogin,
    /// JSON endpoints under `/admin/api/` answer 401 instead of redirecting.
    Unauthorized,
    MissingSessionLayer,
}

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to(LOGIN_PATH).into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::MissingSessionLayer => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or_else(|| {
            tracing::error!("session layer missing from router");
            AdminRejection::MissingSessionLayer
        })?;

        let username: String = session
            .get(session_keys::USERNAME)
            .await
            .ok()
            .flatten()
            .ok_or_else(|| {
                if parts.uri.path().starts_with("/admin/api/") {
                    AdminRejection::Unauthorized
                } else {
                    AdminRejection::RedirectToLogin
                }
            })?;
        let profile: Option<Profile> = session.get(session_keys::PROFILE).await.ok().flatten();

        Ok(Self(AdminSession { username, profile }))
    }
}

/// Starts a fresh session for `username`, dropping any previous profile choice.
pub async fn sign_in(session: &Session, username: &str) -> AppResult<()> {
    session.cycle_id().await?;
    session.remove::<Profile>(session_keys::PROFILE).await?;
    session.insert(session_keys::USERNAME, username).await?;
    Ok(())
}

pub async fn select_profile(session: &Session, profile: Profile) -> AppResult<()> {
    session.insert(session_keys::PROFILE, profile).await?;
    Ok(())
}

pub async fn sign_out(session: &Session) -> AppResult<()> {
    session.flush().await?;
    Ok(())
}
