use autopartes_chatbot::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        orders::{CartLine, CreateOrderRequest, CustomerInfo, RecordPaymentRequest},
        products::CreateProductRequest,
    },
    error::AppError,
    models::{OrderStatus, PaymentStatus},
    routes::create_router,
    seed::seed_catalog_if_empty,
    services::{order_service, product_service, user_service},
    state::AppState,
};
use axum::{
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use tower::ServiceExt;

async fn setup_state() -> anyhow::Result<AppState> {
    let config = AppConfig::for_database("sqlite::memory:")?;
    let pool = create_pool(&config.database_url).await?;
    let state = AppState::new(pool, &config);
    run_migrations(&state.orm).await?;
    seed_catalog_if_empty(&state).await?;
    Ok(state)
}

fn customer(email: &str) -> CustomerInfo {
    CustomerInfo {
        name: "María Quispe".to_string(),
        email: email.to_string(),
        phone: Some("987654321".to_string()),
        address: Some("Av. Los Próceres 450, SJL".to_string()),
    }
}

fn order_request(email: &str, items: &[(&str, i32)]) -> CreateOrderRequest {
    CreateOrderRequest {
        customer: customer(email),
        items: items
            .iter()
            .map(|(code, quantity)| CartLine {
                code: code.to_string(),
                quantity: *quantity,
            })
            .collect(),
        payment_method: "yape".to_string(),
        delivery_address: Some("Av. Los Próceres 450, SJL".to_string()),
        contact_phone: None,
    }
}

async fn stock_of(state: &AppState, code: &str) -> anyhow::Result<i32> {
    Ok(product_service::get_product(state, code).await?.stock)
}

// Customer checks out, pays, and an admin moves the order along.
#[tokio::test]
async fn checkout_pay_and_status_flow() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let placed = order_service::create_order(
        &state,
        order_request("maria@example.com", &[("FR-001", 2), ("MO-001", 3)]),
    )
    .await?;
    let order = placed.order;

    assert_eq!(order.item_count, 5);
    assert_eq!(order.subtotal, 49_500);
    assert_eq!(order.tax, 8_910);
    assert_eq!(order.total, 58_410);
    assert_eq!(order.status, OrderStatus::Pending);
    let tracking = order.tracking_code.clone().expect("tracking code");
    assert!(tracking.starts_with("AP-"), "{tracking}");
    assert_eq!(tracking.len(), "AP-20260101-ABCDEF12".len());

    assert_eq!(placed.lines.len(), 2);
    assert_eq!(placed.lines[0].unit_price, 18_000);
    assert_eq!(placed.lines[0].subtotal, 36_000);

    assert_eq!(stock_of(&state, "FR-001").await?, 13);
    assert_eq!(stock_of(&state, "MO-001").await?, 22);

    let payment = order_service::record_payment(
        &state,
        RecordPaymentRequest {
            order_id: order.id,
            payment_method: "yape".to_string(),
            amount: None,
            payment_details: Some(serde_json::json!({ "operation_number": "00012345" })),
        },
    )
    .await?;
    assert_eq!(payment.amount, order.total);
    assert_eq!(payment.status, PaymentStatus::Completed);
    assert!(payment.transaction_code.as_deref().is_some_and(|c| c.starts_with("TX-")));

    let detail = order_service::get_order(&state, order.id).await?;
    assert_eq!(detail.order.status, OrderStatus::Processing);
    assert_eq!(detail.payments.len(), 1);
    assert_eq!(
        detail.payments[0].details,
        Some(serde_json::json!({ "operation_number": "00012345" }))
    );

    let completed =
        order_service::update_order_status(&state, "Pedro_48", order.id, "completed").await?;
    assert_eq!(completed.status, OrderStatus::Completed);

    let err = order_service::update_order_status(&state, "Pedro_48", order.id, "shipped")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    Ok(())
}

#[tokio::test]
async fn cancelling_keeps_stock_and_blocks_payment() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let order = order_service::create_order(&state, order_request("ana@example.com", &[("SU-001", 4)]))
        .await?
        .order;
    assert_eq!(stock_of(&state, "SU-001").await?, 6);

    let cancelled =
        order_service::update_order_status(&state, "Abad_48", order.id, "cancelado").await?;
    assert_eq!(cancelled.status, OrderStatus::Cancelled);
    assert_eq!(stock_of(&state, "SU-001").await?, 6);

    let err = order_service::record_payment(
        &state,
        RecordPaymentRequest {
            order_id: order.id,
            payment_method: "plin".to_string(),
            amount: None,
            payment_details: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::record_payment(
        &state,
        RecordPaymentRequest {
            order_id: 9_999,
            payment_method: "plin".to_string(),
            amount: None,
            payment_details: None,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    Ok(())
}

#[tokio::test]
async fn rejected_carts_leave_stock_untouched() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let err = order_service::create_order(&state, order_request("luis@example.com", &[("EL-002", 5)]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::create_order(
        &state,
        order_request("luis@example.com", &[("FR-001", 1), ("NO-EXISTE", 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let err = order_service::create_order(&state, order_request("luis@example.com", &[]))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(stock_of(&state, "EL-002").await?, 4);
    assert_eq!(stock_of(&state, "FR-001").await?, 15);
    assert_eq!(order_service::count_orders(&state).await?, 0);
    assert_eq!(user_service::count_users(&state).await?, 0);
    Ok(())
}

fn bulk_product(code: &str, stock: i32) -> CreateProductRequest {
    CreateProductRequest {
        code: code.to_string(),
        name: format!("Lote {code}"),
        brand: "Genérico".to_string(),
        compatible_models: None,
        price: 1,
        stock,
        description: None,
        warranty: None,
        category: "Motor".to_string(),
        serial_number: None,
    }
}

#[tokio::test]
async fn oversized_carts_are_rejected_instead_of_overflowing() -> anyhow::Result<()> {
    let state = setup_state().await?;
    product_service::create_product(&state, "Pedro_48", bulk_product("LT-001", i32::MAX)).await?;
    product_service::create_product(&state, "Pedro_48", bulk_product("LT-002", 1)).await?;

    let err = order_service::create_order(
        &state,
        order_request("lote@example.com", &[("LT-001", i32::MAX), ("LT-002", 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    assert_eq!(stock_of(&state, "LT-001").await?, i32::MAX);
    assert_eq!(stock_of(&state, "LT-002").await?, 1);
    assert_eq!(order_service::count_orders(&state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn repeat_customers_are_matched_by_email() -> anyhow::Result<()> {
    let state = setup_state().await?;

    let first = order_service::create_order(&state, order_request("rosa@example.com", &[("AC-002", 1)]))
        .await?
        .order;
    let second =
        order_service::create_order(&state, order_request(" ROSA@example.com ", &[("AC-001", 2)]))
            .await?
            .order;

    assert_eq!(first.user_id, second.user_id);
    assert_eq!(user_service::count_users(&state).await?, 1);
    Ok(())
}

#[tokio::test]
async fn sales_reports_cover_the_requested_period() -> anyhow::Result<()> {
    let state = setup_state().await?;

    order_service::create_order(&state, order_request("jose@example.com", &[("MO-003", 1)])).await?;
    order_service::create_order(&state, order_request("eva@example.com", &[("MO-002", 1)])).await?;

    let all = order_service::list_sales(&state).await?;
    assert_eq!(all.len(), 2);
    assert!(all[0].id > all[1].id, "newest first");
    assert_eq!(all[0].customer_name, "María Quispe");

    let now = Utc::now();
    let window =
        order_service::sales_between(&state, now - Duration::hours(1), now + Duration::hours(1))
            .await?;
    assert_eq!(window.len(), 2);

    let future =
        order_service::sales_between(&state, now + Duration::days(1), now + Duration::days(2))
            .await?;
    assert!(future.is_empty());

    let err = order_service::sales_between(&state, now, now - Duration::days(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));

    let since_midnight = order_service::count_orders_since(&state, now - Duration::hours(1)).await?;
    assert_eq!(since_midnight, 2);
    Ok(())
}

#[tokio::test]
async fn checkout_endpoint_returns_created_order() -> anyhow::Result<()> {
    let state = setup_state().await?;
    let app = create_router(state.clone(), false);

    let body = serde_json::json!({
        "customer": { "name": "Carlos Díaz", "email": "carlos@example.com" },
        "items": [ { "code": "AC-001", "quantity": 1 } ],
        "payment_method": "transferencia"
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/crear_compra")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    let json: serde_json::Value = serde_json::from_slice(&bytes)?;
    assert_eq!(json["data"]["order"]["total"], 21_240);
    let order_id = json["data"]["order"]["id"].as_i64().expect("order id");

    let payment = serde_json::json!({
        "order_id": order_id,
        "payment_method": "transferencia",
        "payment_details": { "operation_number": "778899" }
    });
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/registrar_pago")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payment.to_string()))?,
        )
        .await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let detail = order_service::get_order(&state, order_id).await?;
    assert_eq!(detail.order.status, OrderStatus::Processing);
    Ok(())
}
