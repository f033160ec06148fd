use askama::Template;
use axum::{
    Json,
    extract::{Query, State},
    response::Html,
};
use chrono::{Duration, NaiveTime};

use crate::{
    dto::orders::{SaleList, SaleRow, SalesPeriodQuery, UpdateOrderStatusRequest},
    error::{AppError, AppResult},
    middleware::auth::RequireAdmin,
    models::{Order, OrderStatus, format_soles},
    response::{ApiResponse, Meta},
    routes::admin::render,
    services::order_service,
    state::AppState,
};

pub struct StatusOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

/// Order as listed in the sales table.
pub struct SaleView {
    pub id: i64,
    pub customer_name: String,
    pub total: String,
    pub status: &'static str,
    pub status_label: &'static str,
    pub payment_method: String,
    pub created_at: String,
    pub status_options: Vec<StatusOption>,
}

impl From<&SaleRow> for SaleView {
    fn from(sale: &SaleRow) -> Self {
        Self {
            id: sale.id,
            customer_name: sale.customer_name.clone(),
            total: format_soles(sale.total),
            status: sale.status.as_str(),
            status_label: status_label(sale.status),
            payment_method: sale.payment_method.clone(),
            created_at: sale.created_at.format("%Y-%m-%d %H:%M").to_string(),
            status_options: OrderStatus::ALL
                .iter()
                .map(|status| StatusOption {
                    value: status.as_str(),
                    label: status_label(*status),
                    selected: *status == sale.status,
                })
                .collect(),
        }
    }
}

fn status_label(status: OrderStatus) -> &'static str {
    match status {
        OrderStatus::Pending => "Pendiente",
        OrderStatus::Processing => "En proceso",
        OrderStatus::Completed => "Completado",
        OrderStatus::Cancelled => "Cancelado",
    }
}

pub async fn sales_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Html<String>> {
    let sales = order_service::list_sales(&state).await?;
    let revenue: i64 = sales.iter().map(|s| s.total).sum();
    render(&SalesTemplate {
        username: admin.username,
        sales: sales.iter().map(SaleView::from).collect(),
        revenue: format_soles(revenue),
    })
}

#[utoipa::path(
    post,
    path = "/admin/actualizar_estado_venta",
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let order = order_service::update_order_status(
        &state,
        &admin.username,
        payload.order_id,
        &payload.status,
    )
    .await?;
    Ok(Json(ApiResponse::ok("Order updated", order)))
}

#[utoipa::path(
    get,
    path = "/admin/api/ventas",
    params(SalesPeriodQuery),
    responses(
        (status = 200, description = "Orders placed within the period", body = ApiResponse<SaleList>),
        (status = 400, description = "Period start is after its end"),
        (status = 401, description = "No admin session"),
    ),
    tag = "Admin"
)]
pub async fn sales_report(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<SalesPeriodQuery>,
) -> AppResult<Json<ApiResponse<SaleList>>> {
    if query.from > query.to {
        return Err(AppError::BadRequest("period start is after its end".into()));
    }
    let from = query.from.and_time(NaiveTime::MIN).and_utc();
    let to = query.to.and_time(NaiveTime::MIN).and_utc() + Duration::days(1)
        - Duration::nanoseconds(1);

    let items = order_service::sales_between(&state, from, to).await?;
    let revenue = items.iter().map(|s| s.total).sum();
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Sales report",
        SaleList { items, revenue },
        Some(meta),
    )))
}

#[derive(Template)]
#[template(path = "admin/sales.html")]
struct SalesTemplate {
    username: String,
    sales: Vec<SaleView>,
    revenue: String,
}
