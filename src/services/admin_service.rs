use chrono::{NaiveTime, Utc};

use crate::{
    dto::{orders::SaleRow, support::SupportCounts},
    error::AppResult,
    models::{Product, SupportQuestion},
    services::{order_service, product_service, support_service, user_service},
    state::AppState,
};

/// Orders shown in the "recent sales" panel.
const RECENT_SALES: i64 = 5;
/// Pending questions shown on the support dashboard.
const RECENT_QUESTIONS: u64 = 5;

#[derive(Debug, Default)]
pub struct DashboardStats {
    pub total_products: i64,
    pub total_orders: i64,
    pub total_users: i64,
    pub orders_today: i64,
    pub low_stock: Vec<Product>,
    pub recent_sales: Vec<SaleRow>,
}

#[derive(Debug, Default)]
pub struct SupportDashboard {
    pub counts: SupportCounts,
    pub recent_pending: Vec<SupportQuestion>,
}

/// Backoffice landing figures. A failing query shows as zero instead of failing the page.
pub async fn dashboard(state: &AppState) -> DashboardStats {
    let start_of_day = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();

    DashboardStats {
        total_products: or_default(product_service::count_products(state).await, "total_products"),
        total_orders: or_default(order_service::count_orders(state).await, "total_orders"),
        total_users: or_default(user_service::count_users(state).await, "total_users"),
        orders_today: or_default(
            order_service::count_orders_since(state, start_of_day).await,
            "orders_today",
        ),
        low_stock: or_default(
            product_service::low_stock(state, state.low_stock_threshold).await,
            "low_stock",
        ),
        recent_sales: or_default(
            order_service::recent_sales(state, RECENT_SALES).await,
            "recent_sales",
        ),
    }
}

pub async fn support_dashboard(state: &AppState) -> SupportDashboard {
    SupportDashboard {
        counts: or_default(support_service::counts(state).await, "support_counts"),
        recent_pending: or_default(
            support_service::pending(state, Some(RECENT_QUESTIONS)).await,
            "recent_pending",
        ),
    }
}

fn or_default<T: Default>(result: AppResult<T>, stat: &'static str) -> T {
    result.unwrap_or_else(|err| {
        tracing::warn!(error = %err, stat, "dashboard statistic unavailable");
        T::default()
    })
}
