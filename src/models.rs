use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// IGV rate applied to every order, in percent.
pub const IGV_PERCENT: i64 = 18;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub brand: String,
    pub compatible_models: Vec<String>,
    /// Unit price in céntimos.
    pub price: i64,
    pub stock: i32,
    pub description: Option<String>,
    pub warranty: Option<String>,
    pub category: String,
    pub serial_number: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn stock_level(&self) -> StockLevel {
        StockLevel::for_stock(self.stock)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    Low,
    Medium,
    High,
}

impl StockLevel {
    pub fn for_stock(stock: i32) -> Self {
        if stock <= 5 {
            StockLevel::Low
        } else if stock <= 10 {
            StockLevel::Medium
        } else {
            StockLevel::High
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            StockLevel::Low => "stock-bajo",
            StockLevel::Medium => "stock-medio",
            StockLevel::High => "stock-alto",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "pendiente" => Ok(OrderStatus::Pending),
            "processing" | "proceso" => Ok(OrderStatus::Processing),
            "completed" | "completado" => Ok(OrderStatus::Completed),
            "cancelled" | "cancelado" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Completed => "completed",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(format!("unknown payment status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub item_count: i32,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
    pub status: OrderStatus,
    pub payment_method: String,
    pub tracking_code: Option<String>,
    pub delivery_address: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderLine {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i32,
    pub unit_price: i64,
    pub subtotal: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    pub method: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub transaction_code: Option<String>,
    pub details: Option<serde_json::Value>,
    pub paid_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    Pending,
    Answered,
}

impl QuestionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionStatus::Pending => "pending",
            QuestionStatus::Answered => "answered",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SupportQuestion {
    pub id: i64,
    pub question: String,
    pub category: String,
    pub status: QuestionStatus,
    pub answer: Option<String>,
    pub answered_by: Option<String>,
    pub asked_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

/// Order amounts in céntimos.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderTotals {
    pub item_count: i32,
    pub subtotal: i64,
    pub tax: i64,
    pub total: i64,
}

impl OrderTotals {
    /// Totals for `(quantity, unit price)` pairs; IGV is rounded half-up to the céntimo.
    /// `None` when any amount overflows.
    pub fn compute<I>(lines: I) -> Option<Self>
    where
        I: IntoIterator<Item = (i32, i64)>,
    {
        let (mut item_count, mut subtotal) = (0_i32, 0_i64);
        for (qty, price) in lines {
            item_count = item_count.checked_add(qty)?;
            subtotal = subtotal.checked_add(i64::from(qty).checked_mul(price)?)?;
        }
        let tax = subtotal.checked_mul(IGV_PERCENT)?.checked_add(50)? / 100;
        Some(Self {
            item_count,
            subtotal,
            tax,
            total: subtotal.checked_add(tax)?,
        })
    }
}

/// Formats céntimos as soles, e.g. `S/ 180.00`.
pub fn format_soles(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let cents = cents.abs();
    format!("S/ {sign}{}.{:02}", cents / 100, cents % 100)
}

/// Parses an amount typed in soles (`180`, `45.5`, `S/ 1,250.00`) into céntimos.
pub fn parse_soles(input: &str) -> Option<i64> {
    let cleaned: String = input
        .trim()
        .trim_start_matches("S/")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ',')
        .collect();
    if cleaned.is_empty() || cleaned.starts_with('-') {
        return None;
    }
    let (whole, fraction) = cleaned.split_once('.').unwrap_or((cleaned.as_str(), ""));
    if fraction.len() > 2 || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let fraction: i64 = match fraction.len() {
        0 => 0,
        1 => fraction.parse::<i64>().ok()? * 10,
        _ => fraction.parse().ok()?,
    };
    whole.checked_mul(100)?.checked_add(fraction)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_apply_eighteen_percent_igv() {
        let totals = OrderTotals::compute([(2, 18_000), (1, 32_000)]).unwrap();
        assert_eq!(totals.item_count, 3);
        assert_eq!(totals.subtotal, 68_000);
        assert_eq!(totals.tax, 12_240);
        assert_eq!(totals.total, 80_240);
    }

    #[test]
    fn igv_rounds_half_up_to_the_centimo() {
        // 18% of 0.25 soles is 4.5 céntimos.
        let totals = OrderTotals::compute([(1, 25)]).unwrap();
        assert_eq!(totals.tax, 5);
        assert_eq!(totals.total, 30);
    }

    #[test]
    fn total_is_subtotal_times_one_eighteen() {
        for price in [1_i64, 99, 4_500, 18_000, 85_000, 123_457] {
            for qty in 1..5 {
                let t = OrderTotals::compute([(qty, price)]).unwrap();
                let exact = t.subtotal * 118;
                assert!((t.total * 100 - exact).abs() <= 50, "price={price} qty={qty}");
            }
        }
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let totals = OrderTotals::compute(Vec::<(i32, i64)>::new()).unwrap();
        assert_eq!(totals.total, 0);
        assert_eq!(totals.item_count, 0);
    }

    #[test]
    fn overflowing_totals_are_rejected() {
        assert_eq!(OrderTotals::compute([(i32::MAX, 1), (1, 1)]), None);
        assert_eq!(OrderTotals::compute([(2, i64::MAX)]), None);
        // Subtotal fits, but applying IGV does not.
        assert_eq!(OrderTotals::compute([(1, i64::MAX / 10)]), None);
    }

    #[test]
    fn order_status_accepts_spanish_aliases() {
        assert_eq!("proceso".parse::<OrderStatus>(), Ok(OrderStatus::Processing));
        assert_eq!("Cancelled".parse::<OrderStatus>(), Ok(OrderStatus::Cancelled));
        assert!("shipped".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn stock_levels_follow_thresholds() {
        assert_eq!(StockLevel::for_stock(5), StockLevel::Low);
        assert_eq!(StockLevel::for_stock(6), StockLevel::Medium);
        assert_eq!(StockLevel::for_stock(10), StockLevel::Medium);
        assert_eq!(StockLevel::for_stock(11), StockLevel::High);
    }

    #[test]
    fn soles_are_formatted_with_two_decimals() {
        assert_eq!(format_soles(18_000), "S/ 180.00");
        assert_eq!(format_soles(4_505), "S/ 45.05");
        assert_eq!(format_soles(0), "S/ 0.00");
    }

    #[test]
    fn soles_input_is_parsed_into_centimos() {
        assert_eq!(parse_soles("180"), Some(18_000));
        assert_eq!(parse_soles("45.5"), Some(4_550));
        assert_eq!(parse_soles(" S/ 1,250.00 "), Some(125_000));
        assert_eq!(parse_soles(".99"), Some(99));
        assert_eq!(parse_soles("-3"), None);
        assert_eq!(parse_soles("1.234"), None);
        assert_eq!(parse_soles("abc"), None);
        assert_eq!(parse_soles(""), None);
    }
}
