use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};

use crate::{
    dto::orders::{CreateOrderRequest, OrderWithLines, RecordPaymentRequest},
    error::AppResult,
    models::Payment,
    response::ApiResponse,
    services::order_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/crear_compra", post(create_order))
        .route("/api/registrar_pago", post(record_payment))
}

#[utoipa::path(
    post,
    path = "/api/crear_compra",
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<OrderWithLines>),
        (status = 400, description = "Empty cart, unknown product or insufficient stock"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<OrderWithLines>>)> {
    let data = order_service::create_order(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Order created", data)),
    ))
}

#[utoipa::path(
    post,
    path = "/api/registrar_pago",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = ApiResponse<Payment>),
        (status = 400, description = "Order is cancelled"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    Json(payload): Json<RecordPaymentRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Payment>>)> {
    let payment = order_service::record_payment(&state, payload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("Payment recorded", payment)),
    ))
}
