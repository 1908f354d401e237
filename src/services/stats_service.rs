use chrono::{Datelike, Utc};

use crate::{
    dto::stats::{MonthlyRevenue, Overview, StatusCount, TopProduct},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderStatus, ROLE_CUSTOMER},
    response::{ApiResponse, Meta},
    services::product_service::LOW_STOCK_THRESHOLD,
    state::AppState,
};

pub const DEFAULT_TOP_PRODUCTS: i64 = 5;
pub const MAX_TOP_PRODUCTS: i64 = 50;

pub async fn overview(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Overview>> {
    ensure_admin(user)?;
    let completed = OrderStatus::Completed.as_str();

    let total_revenue: i64 = sqlx::query_scalar(
        "SELECT COALESCE(SUM(total_amount), 0)::BIGINT FROM orders WHERE status = $1",
    )
    .bind(completed)
    .fetch_one(&state.pool)
    .await?;

    let orders_by_status: Vec<StatusCount> = sqlx::query_as(
        "SELECT status, COUNT(*)::BIGINT AS count FROM orders GROUP BY status ORDER BY status",
    )
    .fetch_all(&state.pool)
    .await?;

    let customer_count: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM users WHERE role = $1")
        .bind(ROLE_CUSTOMER)
        .fetch_one(&state.pool)
        .await?;

    let product_count: i64 = sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM products")
        .fetch_one(&state.pool)
        .await?;

    let low_stock_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*)::BIGINT FROM products WHERE stock <= $1")
            .bind(LOW_STOCK_THRESHOLD)
            .fetch_one(&state.pool)
            .await?;

    Ok(ApiResponse::success(
        "Overview",
        Overview {
            total_revenue,
            orders_by_status,
            customer_count,
            product_count,
            low_stock_count,
        },
        Some(Meta::empty()),
    ))
}

/// Completed-order revenue per month of `year`, all twelve months present.
pub async fn monthly_revenue(
    state: &AppState,
    user: &AuthUser,
    year: Option<i32>,
) -> AppResult<ApiResponse<Vec<MonthlyRevenue>>> {
    ensure_admin(user)?;
    let year = year.unwrap_or_else(|| Utc::now().year());
    if !(2000..=9999).contains(&year) {
        return Err(AppError::BadRequest(format!("invalid year {year}")));
    }

    let rows: Vec<MonthlyRevenue> = sqlx::query_as(
        r#"
        SELECT m.month::INT AS month,
               COALESCE(SUM(o.total_amount), 0)::BIGINT AS revenue,
               COUNT(o.id)::BIGINT AS orders
        FROM generate_series(1, 12) AS m(month)
        LEFT JOIN orders o
               ON EXTRACT(MONTH FROM o.created_at) = m.month
              AND EXTRACT(YEAR FROM o.created_at) = $1
              AND o.status = $2
        GROUP BY m.month
        ORDER BY m.month
        "#,
    )
    .bind(year)
    .bind(OrderStatus::Completed.as_str())
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success("Revenue", rows, Some(Meta::empty())))
}

/// Best sellers by quantity, cancelled orders excluded.
pub async fn top_products(
    state: &AppState,
    user: &AuthUser,
    limit: Option<i64>,
) -> AppResult<ApiResponse<Vec<TopProduct>>> {
    ensure_admin(user)?;
    let limit = clamp_top(limit);

    let rows: Vec<TopProduct> = sqlx::query_as(
        r#"
        SELECT p.id AS product_id,
               p.name,
               SUM(oi.quantity)::BIGINT AS quantity_sold,
               SUM(oi.quantity::BIGINT * oi.price)::BIGINT AS revenue
        FROM order_items oi
        JOIN orders o ON o.id = oi.order_id
        JOIN products p ON p.id = oi.product_id
        WHERE o.status <> $1
        GROUP BY p.id, p.name
        ORDER BY quantity_sold DESC, revenue DESC
        LIMIT $2
        "#,
    )
    .bind(OrderStatus::Cancelled.as_str())
    .bind(limit)
    .fetch_all(&state.pool)
    .await?;

    Ok(ApiResponse::success("Top products", rows, Some(Meta::empty())))
}

fn clamp_top(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_TOP_PRODUCTS).clamp(1, MAX_TOP_PRODUCTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_limit_is_clamped() {
        assert_eq!(clamp_top(None), DEFAULT_TOP_PRODUCTS);
        assert_eq!(clamp_top(Some(0)), 1);
        assert_eq!(clamp_top(Some(1000)), MAX_TOP_PRODUCTS);
    }
}
