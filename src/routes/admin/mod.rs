//! Backoffice: session login, inventory CRUD, sales and support pages.

use askama::Template;
use axum::{
    Router,
    response::Html,
    routing::{get, post},
};

use crate::{error::AppResult, state::AppState};

pub mod account;
pub mod inventory;
pub mod sales;
pub mod support;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin", get(account::index))
        .route("/admin/", get(account::index))
        .route("/admin/login", get(account::login_page).post(account::login))
        .route("/admin/logout", get(account::logout))
        .route(
            "/admin/seleccionar_perfil",
            get(account::profile_page).post(account::select_profile),
        )
        .route("/admin/dashboard", get(account::dashboard))
        .route("/admin/inventario", get(inventory::inventory_page))
        .route("/admin/productos/nuevo", get(inventory::new_product_page))
        .route("/admin/productos", post(inventory::create_product))
        .route("/admin/productos/{code}/editar", get(inventory::edit_product_page))
        .route("/admin/productos/{code}", post(inventory::update_product))
        .route("/admin/productos/{code}/eliminar", post(inventory::delete_product))
        .route("/admin/productos/{code}/restaurar", post(inventory::restore_product))
        .route("/admin/api/inventario_bajo", get(inventory::low_stock_report))
        .route("/admin/ventas", get(sales::sales_page))
        .route("/admin/actualizar_estado_venta", post(sales::update_order_status))
        .route("/admin/api/ventas", get(sales::sales_report))
        .route("/admin/soporte_dashboard", get(support::support_dashboard))
        .route("/admin/soporte_gestion", get(support::support_manage))
        .route("/admin/responder_pregunta", post(support::answer_question))
}

pub(crate) fn render<T: Template>(template: &T) -> AppResult<Html<String>> {
    Ok(Html(template.render()?))
}
