use autopartes_chatbot::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    routes::{create_router, health::health_check},
    state::AppState,
};
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
};
use tower::ServiceExt;

#[tokio::test]
async fn health_check_reports_database_up() -> anyhow::Result<()> {
    let config = AppConfig::for_database("sqlite::memory:")?;
    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, &config);
    run_migrations(&state.orm).await?;

    let response = health_check(State(state)).await;
    assert_eq!(response.0.message, "Health check");

    let data = response.0.data.expect("health data");
    assert_eq!(data.status, "ok");
    assert_eq!(data.database, "up");
    Ok(())
}

#[tokio::test]
async fn unknown_paths_get_the_error_envelope() -> anyhow::Result<()> {
    let config = AppConfig::for_database("sqlite::memory:")?;
    let pool = create_pool(&config.database_url).await?;
    let app = create_router(AppState::new(pool, &config), false);

    let response = app
        .oneshot(Request::builder().uri("/no-existe").body(Body::empty())?)
        .await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(json["message"], "Not Found");
    assert_eq!(json["data"]["error"], "Not Found");
    Ok(())
}
