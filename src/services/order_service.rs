use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CartLine, CreateOrderRequest, OrderDetail, OrderWithLines, RecordPaymentRequest, SaleRow},
    entity::{
        order_lines::{ActiveModel as LineActive, Column as LineCol, Entity as OrderLines, Model as LineModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        payments::{ActiveModel as PaymentActive, Column as PaymentCol, Entity as Payments, Model as PaymentModel},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    models::{Order, OrderLine, OrderStatus, OrderTotals, Payment, PaymentStatus},
    services::user_service,
    state::AppState,
};

/// Places an order for the cart, registering the customer on first purchase.
///
/// Prices are snapshotted from the catalog, not taken from the client. Lines,
/// totals and stock decrements are written in one transaction.
pub async fn create_order(
    state: &AppState,
    payload: CreateOrderRequest,
) -> AppResult<OrderWithLines> {
    let payment_method = payload.payment_method.trim().to_string();
    if payment_method.is_empty() {
        return Err(AppError::BadRequest("payment method is required".into()));
    }
    let cart = merge_cart_lines(&payload.items)?;

    let txn = state.orm.begin().await?;

    let user = user_service::find_or_create_user(&txn, &payload.customer).await?;

    let mut priced: Vec<(ProductModel, i32)> = Vec::with_capacity(cart.len());
    for (code, quantity) in cart {
        let product = Products::find()
            .filter(ProdCol::Code.eq(code.as_str()))
            .filter(ProdCol::Active.eq(true))
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("Unknown product {code}")))?;
        if product.stock < quantity {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {code}"
            )));
        }
        priced.push((product, quantity));
    }

    let totals = OrderTotals::compute(priced.iter().map(|(p, qty)| (*qty, p.price)))
        .ok_or_else(|| AppError::BadRequest("order amount is too large".into()))?;

    let order = OrderActive {
        id: NotSet,
        user_id: Set(user.id),
        item_count: Set(totals.item_count),
        subtotal: Set(totals.subtotal),
        tax: Set(totals.tax),
        total: Set(totals.total),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        payment_method: Set(payment_method),
        tracking_code: Set(Some(build_tracking_code())),
        delivery_address: Set(clean(payload.delivery_address)),
        contact_phone: Set(clean(payload.contact_phone)),
        created_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;

    let mut lines = Vec::with_capacity(priced.len());
    for (product, quantity) in priced {
        let line = LineActive {
            id: NotSet,
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(quantity),
            unit_price: Set(product.price),
            subtotal: Set(i64::from(quantity) * product.price),
        }
        .insert(&txn)
        .await?;
        lines.push(line_from_entity(line));

        // reduce stock; the guard fails if a concurrent checkout got there first
        let result = Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
            .filter(ProdCol::Id.eq(product.id))
            .filter(ProdCol::Stock.gte(quantity))
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for product {}",
                product.code
            )));
        }
    }

    txn.commit().await?;

    tracing::info!(
        order_id = order.id,
        user_id = user.id,
        total = order.total,
        "order created"
    );

    Ok(OrderWithLines {
        order: order_from_entity(order)?,
        lines,
    })
}

/// Stores a manually reported payment and moves a pending order into processing.
pub async fn record_payment(state: &AppState, payload: RecordPaymentRequest) -> AppResult<Payment> {
    let method = payload.payment_method.trim().to_string();
    if method.is_empty() {
        return Err(AppError::BadRequest("payment method is required".into()));
    }

    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(payload.order_id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;
    let status = parse_status(&order.status)?;
    if status == OrderStatus::Cancelled {
        return Err(AppError::BadRequest("Order is cancelled".into()));
    }

    let amount = payload.amount.unwrap_or(order.total);
    if amount <= 0 {
        return Err(AppError::BadRequest("amount must be greater than 0".into()));
    }

    let payment = PaymentActive {
        id: NotSet,
        order_id: Set(order.id),
        method: Set(method),
        amount: Set(amount),
        status: Set(PaymentStatus::Completed.as_str().to_string()),
        transaction_code: Set(Some(build_transaction_code())),
        details: Set(payload.payment_details.map(|d| d.to_string())),
        paid_at: Set(Utc::now()),
    }
    .insert(&txn)
    .await?;

    if status == OrderStatus::Pending {
        let mut active: OrderActive = order.into();
        active.status = Set(OrderStatus::Processing.as_str().to_string());
        active.update(&txn).await?;
    }

    txn.commit().await?;

    tracing::info!(order_id = payment.order_id, amount, "payment recorded");
    payment_from_entity(payment)
}

/// Changes an order's status. Cancelling does not return stock to the shelf.
pub async fn update_order_status(
    state: &AppState,
    actor: &str,
    order_id: i64,
    status: &str,
) -> AppResult<Order> {
    let status: OrderStatus = status.parse().map_err(AppError::BadRequest)?;

    let existing = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        actor,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "status": order.status }),
    )
    .await;

    order_from_entity(order)
}

pub async fn get_order(state: &AppState, order_id: i64) -> AppResult<OrderDetail> {
    let order = Orders::find_by_id(order_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let lines = OrderLines::find()
        .filter(LineCol::OrderId.eq(order.id))
        .order_by_asc(LineCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(line_from_entity)
        .collect();

    let payments = Payments::find()
        .filter(PaymentCol::OrderId.eq(order.id))
        .order_by_asc(PaymentCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(OrderDetail {
        order: order_from_entity(order)?,
        lines,
        payments,
    })
}

#[derive(FromRow)]
struct SaleRecord {
    id: i64,
    customer_name: String,
    total: i64,
    status: String,
    payment_method: String,
    created_at: DateTime<Utc>,
}

/// Every order with its customer's name, newest first.
pub async fn list_sales(state: &AppState) -> AppResult<Vec<SaleRow>> {
    let rows = sqlx::query_as::<_, SaleRecord>(
        r#"
        SELECT o.id, u.name AS customer_name, o.total, o.status, o.payment_method, o.created_at
        FROM orders o
        JOIN users u ON u.id = o.user_id
        ORDER BY o.created_at DESC, o.id DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    rows.into_iter().map(sale_from_record).collect()
}

pub async fn recent_sales(state: &AppState, limit: i64) -> AppResult<Vec<SaleRow>> {
    let rows = sqlx::query_as::<_, SaleRecord>(
        r#"
        SELECT o.id, u.name AS customer_name, o.total, o.status, o.payment_method, o.created_at
        FROM orders o
        JOIN users u ON u.id = o.user_id
        ORDER BY o.created_at DESC, o.id DESC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;

    rows.into_iter().map(sale_from_record).collect()
}

/// Orders placed within `[from, to]`, newest first.
pub async fn sales_between(
    state: &AppState,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> AppResult<Vec<SaleRow>> {
    if from > to {
        return Err(AppError::BadRequest("period start is after its end".into()));
    }
    let rows = sqlx::query_as::<_, SaleRecord>(
        r#"
        SELECT o.id, u.name AS customer_name, o.total, o.status, o.payment_method, o.created_at
        FROM orders o
        JOIN users u ON u.id = o.user_id
        WHERE o.created_at BETWEEN ? AND ?
        ORDER BY o.created_at DESC, o.id DESC
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(&state.pool)
    .await?;

    rows.into_iter().map(sale_from_record).collect()
}

pub async fn count_orders(state: &AppState) -> AppResult<i64> {
    let total = Orders::find().count(&state.orm).await?;
    Ok(total as i64)
}

pub async fn count_orders_since(state: &AppState, since: DateTime<Utc>) -> AppResult<i64> {
    let total = Orders::find()
        .filter(OrderCol::CreatedAt.gte(since))
        .count(&state.orm)
        .await?;
    Ok(total as i64)
}

/// Sums quantities of repeated codes, keeping first-seen order.
fn merge_cart_lines(items: &[CartLine]) -> AppResult<Vec<(String, i32)>> {
    if items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }
    let mut merged: Vec<(String, i32)> = Vec::with_capacity(items.len());
    for item in items {
        let code = item.code.trim();
        if code.is_empty() {
            return Err(AppError::BadRequest("product code is required".into()));
        }
        if item.quantity <= 0 {
            return Err(AppError::BadRequest("Cart has invalid quantity".into()));
        }
        match merged.iter_mut().find(|(c, _)| c == code) {
            Some((_, qty)) => {
                *qty = qty
                    .checked_add(item.quantity)
                    .ok_or_else(|| AppError::BadRequest("Cart has invalid quantity".into()))?;
            }
            None => merged.push((code.to_string(), item.quantity)),
        }
    }
    Ok(merged)
}

fn parse_status(raw: &str) -> AppResult<OrderStatus> {
    raw.parse()
        .map_err(|e: String| AppError::Internal(anyhow::anyhow!(e)))
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn sale_from_record(row: SaleRecord) -> AppResult<SaleRow> {
    Ok(SaleRow {
        id: row.id,
        customer_name: row.customer_name,
        total: row.total,
        status: parse_status(&row.status)?,
        payment_method: row.payment_method,
        created_at: row.created_at,
    })
}

fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        item_count: model.item_count,
        subtotal: model.subtotal,
        tax: model.tax,
        total: model.total,
        status: parse_status(&model.status)?,
        payment_method: model.payment_method,
        tracking_code: model.tracking_code,
        delivery_address: model.delivery_address,
        contact_phone: model.contact_phone,
        created_at: model.created_at,
    })
}

fn line_from_entity(model: LineModel) -> OrderLine {
    OrderLine {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        unit_price: model.unit_price,
        subtotal: model.subtotal,
    }
}

fn payment_from_entity(model: PaymentModel) -> AppResult<Payment> {
    let status = model
        .status
        .parse::<PaymentStatus>()
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    let details = model
        .details
        .as_deref()
        .map(serde_json::from_str)
        .transpose()
        .map_err(|e| AppError::Internal(e.into()))?;
    Ok(Payment {
        id: model.id,
        order_id: model.order_id,
        method: model.method,
        amount: model.amount,
        status,
        transaction_code: model.transaction_code,
        details,
        paid_at: model.paid_at,
    })
}

fn build_tracking_code() -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = Uuid::new_v4().simple().to_string();
    format!("AP-{}-{}", date, suffix[..8].to_uppercase())
}

fn build_transaction_code() -> String {
    format!("TX-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(code: &str, quantity: i32) -> CartLine {
        CartLine {
            code: code.to_string(),
            quantity,
        }
    }

    #[test]
    fn repeated_codes_are_merged_in_order() {
        let merged =
            merge_cart_lines(&[line("FR-001", 1), line("MO-001", 2), line(" FR-001 ", 3)]).unwrap();
        assert_eq!(
            merged,
            vec![("FR-001".to_string(), 4), ("MO-001".to_string(), 2)]
        );
    }

    #[test]
    fn empty_cart_and_bad_quantities_are_rejected() {
        assert!(matches!(merge_cart_lines(&[]), Err(AppError::BadRequest(_))));
        assert!(matches!(
            merge_cart_lines(&[line("FR-001", 0)]),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            merge_cart_lines(&[line("  ", 1)]),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn tracking_codes_carry_the_date() {
        let code = build_tracking_code();
        let today = Utc::now().format("%Y%m%d").to_string();
        assert!(code.starts_with(&format!("AP-{today}-")));
        assert_eq!(code.len(), "AP-YYYYMMDD-".len() + 8);
    }
}
