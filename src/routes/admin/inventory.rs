use askama::Template;
use axum::{
    Form, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;

use crate::{
    dto::products::{CreateProductRequest, LowStockQuery, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    middleware::auth::RequireAdmin,
    models::{Product, format_soles, parse_soles},
    response::{ApiResponse, Meta},
    routes::admin::render,
    services::product_service,
    state::AppState,
};

const INVENTORY_PATH: &str = "/admin/inventario";

/// Product as shown in backoffice tables.
pub struct ProductRow {
    pub code: String,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub stock: i32,
    pub stock_class: &'static str,
    pub price: String,
    pub serial_number: String,
    pub active: bool,
}

impl From<&Product> for ProductRow {
    fn from(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            category: product.category.clone(),
            stock: product.stock,
            stock_class: product.stock_level().css_class(),
            price: format_soles(product.price),
            serial_number: product.serial_number.clone().unwrap_or_default(),
            active: product.active,
        }
    }
}

/// Raw form fields; numbers arrive as text and are validated here.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub compatible_models: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub stock: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub warranty: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub serial_number: String,
}

impl ProductForm {
    fn from_product(product: &Product) -> Self {
        Self {
            code: product.code.clone(),
            name: product.name.clone(),
            brand: product.brand.clone(),
            compatible_models: product.compatible_models.join(", "),
            price: format!("{}.{:02}", product.price / 100, product.price % 100),
            stock: product.stock.to_string(),
            description: product.description.clone().unwrap_or_default(),
            warranty: product.warranty.clone().unwrap_or_default(),
            category: product.category.clone(),
            serial_number: product.serial_number.clone().unwrap_or_default(),
        }
    }

    fn amounts(&self) -> AppResult<(i64, i32)> {
        let price = parse_soles(&self.price)
            .ok_or_else(|| AppError::BadRequest("Precio inválido".into()))?;
        let stock = self
            .stock
            .trim()
            .parse::<i32>()
            .map_err(|_| AppError::BadRequest("Stock inválido".into()))?;
        Ok((price, stock))
    }

    fn to_create_request(&self) -> AppResult<CreateProductRequest> {
        let (price, stock) = self.amounts()?;
        Ok(CreateProductRequest {
            code: self.code.clone(),
            name: self.name.clone(),
            brand: self.brand.clone(),
            compatible_models: Some(self.compatible_models.clone()),
            price,
            stock,
            description: Some(self.description.clone()),
            warranty: Some(self.warranty.clone()),
            category: self.category.clone(),
            serial_number: Some(self.serial_number.clone()),
        })
    }

    fn to_update_request(&self) -> AppResult<UpdateProductRequest> {
        let (price, stock) = self.amounts()?;
        Ok(UpdateProductRequest {
            name: Some(self.name.clone()),
            brand: Some(self.brand.clone()),
            compatible_models: Some(self.compatible_models.clone()),
            price: Some(price),
            stock: Some(stock),
            description: Some(self.description.clone()),
            warranty: Some(self.warranty.clone()),
            category: Some(self.category.clone()),
            serial_number: Some(self.serial_number.clone()),
        })
    }
}

pub async fn inventory_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> AppResult<Html<String>> {
    let products = product_service::list_inventory(&state).await?;
    render(&InventoryTemplate {
        username: admin.username,
        products: products.iter().map(ProductRow::from).collect(),
    })
}

pub async fn new_product_page(RequireAdmin(admin): RequireAdmin) -> AppResult<Html<String>> {
    render(&ProductFormTemplate {
        username: admin.username,
        action: "/admin/productos".to_string(),
        editing: false,
        form: ProductForm::default(),
        error: None,
    })
}

pub async fn create_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Form(form): Form<ProductForm>,
) -> AppResult<Response> {
    let result = match form.to_create_request() {
        Ok(payload) => product_service::create_product(&state, &admin.username, payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(product) => {
            tracing::info!(code = %product.code, username = %admin.username, "product created");
            Ok(Redirect::to(INVENTORY_PATH).into_response())
        }
        Err(err) => {
            let (status, message) = form_rejection(err)?;
            let page = render(&ProductFormTemplate {
                username: admin.username,
                action: "/admin/productos".to_string(),
                editing: false,
                form,
                error: Some(message),
            })?;
            Ok((status, page).into_response())
        }
    }
}

pub async fn edit_product_page(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(code): Path<String>,
) -> AppResult<Html<String>> {
    let product = product_service::get_product(&state, &code).await?;
    render(&ProductFormTemplate {
        username: admin.username,
        action: format!("/admin/productos/{}", product.code),
        editing: true,
        form: ProductForm::from_product(&product),
        error: None,
    })
}

pub async fn update_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(code): Path<String>,
    Form(mut form): Form<ProductForm>,
) -> AppResult<Response> {
    let result = match form.to_update_request() {
        Ok(payload) => product_service::update_product(&state, &admin.username, &code, payload).await,
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => Ok(Redirect::to(INVENTORY_PATH).into_response()),
        Err(err) => {
            let (status, message) = form_rejection(err)?;
            form.code = code.clone();
            let page = render(&ProductFormTemplate {
                username: admin.username,
                action: format!("/admin/productos/{code}"),
                editing: true,
                form,
                error: Some(message),
            })?;
            Ok((status, page).into_response())
        }
    }
}

pub async fn delete_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(code): Path<String>,
) -> AppResult<Redirect> {
    product_service::soft_delete_product(&state, &admin.username, &code).await?;
    Ok(Redirect::to(INVENTORY_PATH))
}

pub async fn restore_product(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(code): Path<String>,
) -> AppResult<Redirect> {
    product_service::restore_product(&state, &admin.username, &code).await?;
    Ok(Redirect::to(INVENTORY_PATH))
}

#[utoipa::path(
    get,
    path = "/admin/api/inventario_bajo",
    params(LowStockQuery),
    responses(
        (status = 200, description = "Active products at or below the stock limit", body = ApiResponse<ProductList>),
        (status = 401, description = "No admin session"),
    ),
    tag = "Admin"
)]
pub async fn low_stock_report(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<LowStockQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let limit = query.limit.unwrap_or(state.low_stock_threshold);
    if limit < 0 {
        return Err(AppError::BadRequest("limit must not be negative".into()));
    }
    let items = product_service::low_stock(&state, limit).await?;
    let meta = Meta::count(items.len());
    Ok(Json(ApiResponse::success(
        "Low stock",
        ProductList { items },
        Some(meta),
    )))
}

/// Validation failures re-render the form; anything else propagates.
fn form_rejection(err: AppError) -> AppResult<(StatusCode, String)> {
    match err {
        AppError::BadRequest(message) => Ok((StatusCode::BAD_REQUEST, message)),
        AppError::Conflict(message) => Ok((StatusCode::CONFLICT, message)),
        other => Err(other),
    }
}

#[derive(Template)]
#[template(path = "admin/inventory.html")]
struct InventoryTemplate {
    username: String,
    products: Vec<ProductRow>,
}

#[derive(Template)]
#[template(path = "admin/product_form.html")]
struct ProductFormTemplate {
    username: String,
    action: String,
    editing: bool,
    form: ProductForm,
    error: Option<String>,
}
