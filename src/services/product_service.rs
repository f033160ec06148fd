use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::products::{CreateProductRequest, ProductFilter, UpdateProductRequest},
    entity::products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
    error::{AppError, AppResult},
    models::Product,
    state::AppState,
};

/// Active products matching every non-empty filter as a substring.
pub async fn list_products(state: &AppState, filter: &ProductFilter) -> AppResult<Vec<Product>> {
    let mut condition = Condition::all().add(Column::Active.eq(true));

    if let Some(category) = non_empty(filter.category.as_deref()) {
        condition = condition.add(Column::Category.contains(category));
    }
    if let Some(brand) = non_empty(filter.brand.as_deref()) {
        condition = condition.add(Column::Brand.contains(brand));
    }
    if let Some(model) = non_empty(filter.model.as_deref()) {
        condition = condition.add(Column::CompatibleModels.contains(model));
    }

    let items = Products::find()
        .filter(condition)
        .order_by_asc(Column::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

/// Every product, including deactivated ones, grouped by category.
pub async fn list_inventory(state: &AppState) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .order_by_asc(Column::Category)
        .order_by_asc(Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

pub async fn get_product(state: &AppState, code: &str) -> AppResult<Product> {
    find_by_code(state, code).await.map(product_from_entity)
}

pub async fn create_product(
    state: &AppState,
    actor: &str,
    payload: CreateProductRequest,
) -> AppResult<Product> {
    let payload = validate_new_product(payload)?;

    if Products::find()
        .filter(Column::Code.eq(payload.code.as_str()))
        .one(&state.orm)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(format!(
            "product code {} already exists",
            payload.code
        )));
    }
    if let Some(serial) = payload.serial_number.as_deref() {
        ensure_serial_free(state, serial, None).await?;
    }

    let active = ActiveModel {
        id: NotSet,
        code: Set(payload.code),
        name: Set(payload.name),
        brand: Set(payload.brand),
        compatible_models: Set(payload.compatible_models),
        price: Set(payload.price),
        stock: Set(payload.stock),
        description: Set(payload.description),
        warranty: Set(payload.warranty),
        category: Set(payload.category),
        serial_number: Set(payload.serial_number),
        active: Set(true),
        created_at: Set(Utc::now()),
    };
    let product = active
        .insert(&state.orm)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "product code or serial already exists"))?;

    audit::record(
        &state.pool,
        actor,
        "product_create",
        "products",
        serde_json::json!({ "code": product.code }),
    )
    .await;

    Ok(product_from_entity(product))
}

pub async fn update_product(
    state: &AppState,
    actor: &str,
    code: &str,
    payload: UpdateProductRequest,
) -> AppResult<Product> {
    let existing = find_by_code(state, code).await?;
    let product_id = existing.id;
    let mut active: ActiveModel = existing.into();

    if let Some(name) = required_text(payload.name, "name")? {
        active.name = Set(name);
    }
    if let Some(brand) = required_text(payload.brand, "brand")? {
        active.brand = Set(brand);
    }
    if let Some(category) = required_text(payload.category, "category")? {
        active.category = Set(category);
    }
    if let Some(models) = payload.compatible_models {
        active.compatible_models = Set(optional_text(Some(models)));
    }
    if let Some(price) = payload.price {
        if price < 0 {
            return Err(AppError::BadRequest("price must not be negative".into()));
        }
        active.price = Set(price);
    }
    if let Some(stock) = payload.stock {
        if stock < 0 {
            return Err(AppError::BadRequest("stock must not be negative".into()));
        }
        active.stock = Set(stock);
    }
    if let Some(description) = payload.description {
        active.description = Set(optional_text(Some(description)));
    }
    if let Some(warranty) = payload.warranty {
        active.warranty = Set(optional_text(Some(warranty)));
    }
    if let Some(serial) = payload.serial_number {
        let serial = optional_text(Some(serial));
        if let Some(serial) = serial.as_deref() {
            ensure_serial_free(state, serial, Some(product_id)).await?;
        }
        active.serial_number = Set(serial);
    }

    let product = active
        .update(&state.orm)
        .await
        .map_err(|e| AppError::from_unique_violation(e, "serial number already exists"))?;

    audit::record(
        &state.pool,
        actor,
        "product_update",
        "products",
        serde_json::json!({ "code": product.code }),
    )
    .await;

    Ok(product_from_entity(product))
}

/// Hides a product from the catalog without removing its row.
pub async fn soft_delete_product(state: &AppState, actor: &str, code: &str) -> AppResult<Product> {
    set_active(state, actor, code, false).await
}

pub async fn restore_product(state: &AppState, actor: &str, code: &str) -> AppResult<Product> {
    set_active(state, actor, code, true).await
}

/// Active products at or below `limit` units, scarcest first.
pub async fn low_stock(state: &AppState, limit: i32) -> AppResult<Vec<Product>> {
    let items = Products::find()
        .filter(Column::Active.eq(true))
        .filter(Column::Stock.lte(limit))
        .order_by_asc(Column::Stock)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();
    Ok(items)
}

pub async fn count_products(state: &AppState) -> AppResult<i64> {
    let total = Products::find().count(&state.orm).await?;
    Ok(total as i64)
}

async fn set_active(state: &AppState, actor: &str, code: &str, flag: bool) -> AppResult<Product> {
    let existing = find_by_code(state, code).await?;
    let mut active: ActiveModel = existing.into();
    active.active = Set(flag);
    let product = active.update(&state.orm).await?;

    let action = if flag { "product_restore" } else { "product_delete" };
    audit::record(
        &state.pool,
        actor,
        action,
        "products",
        serde_json::json!({ "code": product.code }),
    )
    .await;

    Ok(product_from_entity(product))
}

async fn find_by_code(state: &AppState, code: &str) -> AppResult<ProductModel> {
    Products::find()
        .filter(Column::Code.eq(code))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}

async fn ensure_serial_free(state: &AppState, serial: &str, except: Option<i64>) -> AppResult<()> {
    let mut finder = Products::find().filter(Column::SerialNumber.eq(serial));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.one(&state.orm).await?.is_some() {
        return Err(AppError::Conflict(format!(
            "serial number {serial} already exists"
        )));
    }
    Ok(())
}

fn validate_new_product(payload: CreateProductRequest) -> AppResult<CreateProductRequest> {
    let code = required_text(Some(payload.code), "code")?.unwrap_or_default();
    let name = required_text(Some(payload.name), "name")?.unwrap_or_default();
    let brand = required_text(Some(payload.brand), "brand")?.unwrap_or_default();
    let category = required_text(Some(payload.category), "category")?.unwrap_or_default();
    if payload.price < 0 {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if payload.stock < 0 {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(CreateProductRequest {
        code,
        name,
        brand,
        category,
        compatible_models: optional_text(payload.compatible_models),
        description: optional_text(payload.description),
        warranty: optional_text(payload.warranty),
        serial_number: optional_text(payload.serial_number),
        price: payload.price,
        stock: payload.stock,
    })
}

/// `Some(trimmed)` for a present value, rejecting blank text.
fn required_text(value: Option<String>, field: &str) -> AppResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => {
            Err(AppError::BadRequest(format!("{field} must not be empty")))
        }
        Some(v) => Ok(Some(v.trim().to_string())),
        None => Ok(None),
    }
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn product_from_entity(model: ProductModel) -> Product {
    let compatible_models = model
        .compatible_models
        .as_deref()
        .map(|models| {
            models
                .split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Product {
        id: model.id,
        code: model.code,
        name: model.name,
        brand: model.brand,
        compatible_models,
        price: model.price,
        stock: model.stock,
        description: model.description,
        warranty: model.warranty,
        category: model.category,
        serial_number: model.serial_number,
        active: model.active,
        created_at: model.created_at,
    }
}
