use autopartes_chatbot::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::products::{CreateProductRequest, ProductFilter, UpdateProductRequest},
    error::AppError,
    routes::create_router,
    seed::seed_catalog_if_empty,
    services::product_service,
    state::AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode},
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

fn new_product(code: &str, serial: &str) -> CreateProductRequest {
    CreateProductRequest {
        code: code.to_string(),
        name: "Radiador de Aluminio".to_string(),
        brand: "Denso".to_string(),
        compatible_models: Some("Toyota Corolla 2015-2020".to_string()),
        price: 52_000,
        stock: 7,
        description: None,
        warranty: Some("12 meses".to_string()),
        category: "Motor".to_string(),
        serial_number: Some(serial.to_string()),
    }
}

#[tokio::test]
async fn seed_runs_once() -> anyhow::Result<()> {
    let state = setup_state().await?;
    assert_eq!(product_service::count_products(&state).await?, 12);
    assert_eq!(seed_catalog_if_empty(&state).await?, 0);
    assert_eq!(product_service::count_products(&state).await?, 12);
    Ok(())
}

#[tokio::test]
async fn filters_match_substrings_case_insensitively() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let brakes = product_service::list_products(&state, &ProductFilter::category("Frenos")).await?;
    assert_eq!(brakes.len(), 3);
    assert!(brakes.iter().all(|p| p.category == "Frenos"));

    let acdelco = product_service::list_products(&state, &ProductFilter::brand("acdelco")).await?;
    let codes: Vec<_> = acdelco.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["FR-003", "EL-001"]);

    let corolla = product_service::list_products(
        &state,
        &ProductFilter {
            model: Some("Corolla".to_string()),
            ..ProductFilter::default()
        },
    )
    .await?;
    assert_eq!(corolla.len(), 1);
    assert_eq!(corolla[0].code, "FR-001");
    assert_eq!(
        corolla[0].compatible_models,
        ["Toyota Corolla 2015-2020", "Honda Civic 2016-2021"]
    );
    Ok(())
}

#[tokio::test]
async fn duplicate_code_is_rejected_without_changes() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let err = product_service::create_product(&state, "Pedro_48", new_product("FR-001", "NEW-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    let err = product_service::create_product(&state, "Pedro_48", new_product("MO-010", "BOS-0987-FR"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err:?}");

    assert_eq!(product_service::count_products(&state).await?, 12);
    let original = product_service::get_product(&state, "FR-001").await?;
    assert_eq!(original.brand, "Bosch");
    Ok(())
}

#[tokio::test]
async fn create_validates_and_audits() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let mut invalid = new_product("MO-010", "DEN-0001-RD");
    invalid.price = -1;
    let err = product_service::create_product(&state, "Pedro_48", invalid)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let created =
        product_service::create_product(&state, "Pedro_48", new_product("MO-010", "DEN-0001-RD"))
            .await?;
    assert!(created.active);
    assert_eq!(created.price, 52_000);

    let audits: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM audit_logs WHERE action = 'product_create' AND actor = 'Pedro_48'",
    )
    .fetch_one(&state.pool)
    .await?;
    assert_eq!(audits, 1);
    Ok(())
}

#[tokio::test]
async fn soft_deleted_products_leave_the_catalog() -> anyhow::Result<()> {
    let state = setup_state().await?;

    product_service::soft_delete_product(&state, "Abad_48", "FR-001").await?;

    let catalog = product_service::list_products(&state, &ProductFilter::default()).await?;
    assert_eq!(catalog.len(), 11);
    assert!(catalog.iter().all(|p| p.code != "FR-001"));

    let inventory = product_service::list_inventory(&state).await?;
    let hidden = inventory.iter().find(|p| p.code == "FR-001").expect("still stored");
    assert!(!hidden.active);

    product_service::restore_product(&state, "Abad_48", "FR-001").await?;
    let catalog = product_service::list_products(&state, &ProductFilter::default()).await?;
    assert_eq!(catalog.len(), 12);
    Ok(())
}

#[tokio::test]
async fn update_changes_only_given_fields() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let updated = product_service::update_product(
        &state,
        "Sergio_48",
        "SU-001",
        UpdateProductRequest {
            price: Some(39_990),
            stock: Some(2),
            ..UpdateProductRequest::default()
        },
    )
    .await?;
    assert_eq!(updated.price, 39_990);
    assert_eq!(updated.stock, 2);
    assert_eq!(updated.brand, "KYB");

    let err = product_service::update_product(
        &state,
        "Sergio_48",
        "SU-001",
        UpdateProductRequest {
            serial_number: Some("NGK-7890-SP".to_string()),
            ..UpdateProductRequest::default()
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let err = product_service::update_product(&state, "Sergio_48", "XX-999", UpdateProductRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn low_stock_is_sorted_scarcest_first() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let low = product_service::low_stock(&state, 5).await?;
    let codes: Vec<_> = low.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["EL-002"]);

    let low = product_service::low_stock(&state, 8).await?;
    let codes: Vec<_> = low.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, ["EL-002", "MO-002", "FR-002"]);
    Ok(())
}

#[tokio::test]
async fn public_catalog_endpoint_filters_by_category() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let app = create_router(state, false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/productos?categoria=Motor")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let body: serde_json::Value = serde_json::from_slice(&bytes)?;
    let items = body["data"].as_array().expect("product array");
    assert_eq!(items.len(), 3);
    assert_eq!(body["meta"]["total"], 3);
    assert!(items.iter().all(|p| p["category"] == "Motor"));
    Ok(())
}
