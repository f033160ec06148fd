use autopartes_chatbot::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    routes::create_router,
    seed::seed_catalog_if_empty,
    services::support_service,
    state::AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use tower::ServiceExt;

async fn setup_state() -> anyhow::Result<AppState> {
    let config = AppConfig::for_database("sqlite::memory:")?;
    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, &config);
    run_migrations(&state.orm).await?;
    seed_catalog_if_empty(&state).await?;
    Ok(state)
}

async fn ask(state: &AppState, body: serde_json::Value) -> anyhow::Result<(StatusCode, serde_json::Value)> {
    let app = create_router(state.clone(), false);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/preguntar")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn hola_yields_a_greeting() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (status, json) = ask(&state, serde_json::json!({ "question": "Hola" })).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "¡Hola!");
    assert_eq!(json["data"]["icon"], "👋");
    assert!(json["data"].get("table_html").is_none());
    Ok(())
}

#[tokio::test]
async fn category_question_returns_a_product_table() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (status, json) = ask(&state, serde_json::json!({ "pregunta": "necesito frenos" })).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "Sistema de Frenos");
    assert_eq!(json["data"]["kind"], "catalog_table");
    let table = json["data"]["table_html"].as_str().expect("table html");
    assert!(table.contains("Pastillas de Freno Delanteras Cerámicas"));
    assert!(table.contains("S/ 180.00"));
    assert!(!table.contains("Batería"));
    Ok(())
}

#[tokio::test]
async fn location_reply_asks_for_the_map() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (_, json) = ask(&state, serde_json::json!({ "question": "¿dónde se ubican?" })).await?;

    assert_eq!(json["data"]["title"], "Ubicación y Sucursales");
    assert_eq!(json["data"]["map"], true);
    Ok(())
}

#[tokio::test]
async fn unknown_question_is_queued_for_support() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let (status, json) = ask(&state, serde_json::json!({ "question": "qwerty zzz" })).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["title"], "No entendí tu pregunta");

    let pending = support_service::pending(&state, None).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].question, "qwerty zzz");
    assert_eq!(pending[0].category, "Consulta General");
    Ok(())
}

#[tokio::test]
async fn empty_question_is_an_error_reply() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let (status, json) = ask(&state, serde_json::json!({ "question": "   " })).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["data"]["body"], "No se recibió ningún mensaje");

    let (status, _) = ask(&state, serde_json::json!({})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let pending = support_service::pending(&state, None).await?;
    assert!(pending.is_empty());
    Ok(())
}

#[tokio::test]
async fn missing_or_malformed_body_is_an_error_reply() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let requests = [
        Request::builder()
            .method("POST")
            .uri("/preguntar")
            .body(Body::empty())?,
        Request::builder()
            .method("POST")
            .uri("/preguntar")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))?,
    ];

    for request in requests {
        let response = create_router(state.clone(), false).oneshot(request).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json: serde_json::Value = serde_json::from_slice(&bytes)?;
        assert_eq!(json["data"]["title"], "Error");
        assert_eq!(json["data"]["body"], "No se recibió ningún mensaje");
    }
    Ok(())
}
