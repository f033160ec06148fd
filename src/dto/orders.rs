use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::{Order, OrderLine, OrderStatus, Payment};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CartLine {
    pub code: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateOrderRequest {
    pub customer: CustomerInfo,
    pub items: Vec<CartLine>,
    pub payment_method: String,
    pub delivery_address: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RecordPaymentRequest {
    pub order_id: i64,
    pub payment_method: String,
    /// Amount in céntimos; defaults to the order total.
    pub amount: Option<i64>,
    /// Free-form reference data entered by the customer (operation number, payer name...).
    pub payment_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    #[serde(alias = "venta_id")]
    pub order_id: i64,
    #[serde(alias = "nuevo_estado")]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithLines {
    pub order: Order,
    pub lines: Vec<OrderLine>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDetail {
    pub order: Order,
    pub lines: Vec<OrderLine>,
    pub payments: Vec<Payment>,
}

/// An order joined with its customer's name, as listed in the backoffice.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SaleRow {
    pub id: i64,
    pub customer_name: String,
    pub total: i64,
    pub status: OrderStatus,
    pub payment_method: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SaleList {
    pub items: Vec<SaleRow>,
    /// Sum of the listed order totals, in céntimos.
    pub revenue: i64,
}

/// Inclusive range of calendar days (UTC).
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct SalesPeriodQuery {
    #[serde(alias = "desde")]
    pub from: NaiveDate,
    #[serde(alias = "hasta")]
    pub to: NaiveDate,
}
