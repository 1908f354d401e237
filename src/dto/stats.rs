use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Overview {
    /// Sum of completed orders
    pub total_revenue: i64,
    pub orders_by_status: Vec<StatusCount>,
    pub customer_count: i64,
    pub product_count: i64,
    pub low_stock_count: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct MonthlyRevenue {
    pub month: i32,
    pub revenue: i64,
    pub orders: i64,
}

#[derive(Debug, Serialize, ToSchema, FromRow)]
pub struct TopProduct {
    pub product_id: Uuid,
    pub name: String,
    pub quantity_sold: i64,
    pub revenue: i64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct RevenueQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct TopProductsQuery {
    pub limit: Option<i64>,
}
