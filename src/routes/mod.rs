use axum::{Router, http::Uri, routing::get};

use crate::{error::AppError, middleware::session::create_session_layer, state::AppState};

pub mod admin;
pub mod chat;
pub mod doc;
pub mod health;
pub mod orders;
pub mod products;
pub mod support;

/// Every route of the application with its state and the admin session layer.
/// Tracing and request limits are layered on top by `main`.
pub fn create_router(state: AppState, session_secure: bool) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .merge(chat::router())
        .merge(products::router())
        .merge(orders::router())
        .merge(support::router())
        .merge(admin::router())
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .layer(create_session_layer(session_secure))
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route matched");
    AppError::NotFound
}
