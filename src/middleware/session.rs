//! Cookie session for the backoffice, kept in process memory.

use tower_sessions::{
    Expiry, MemoryStore, SessionManagerLayer,
    cookie::{SameSite, time::Duration},
};

pub const SESSION_COOKIE_NAME: &str = "autopartes_admin";

/// Sessions expire after eight hours without a request.
const SESSION_EXPIRY_SECONDS: i64 = 8 * 60 * 60;

pub fn create_session_layer(secure: bool) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}
