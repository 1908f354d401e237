use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::stats::{MonthlyRevenue, Overview, RevenueQuery, TopProduct, TopProductsQuery},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::stats_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/revenue", get(revenue))
        .route("/top-products", get(top_products))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats/overview",
    responses((status = 200, description = "Store totals", body = ApiResponse<Overview>)),
    security(("bearer_auth" = [])),
    tag = "Stats"
)]
pub async fn overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Overview>>> {
    Ok(Json(stats_service::overview(&state, &user).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats/revenue",
    params(("year" = Option<i32>, Query, description = "Calendar year, default current")),
    responses((status = 200, description = "Completed revenue per month", body = ApiResponse<Vec<MonthlyRevenue>>)),
    security(("bearer_auth" = [])),
    tag = "Stats"
)]
pub async fn revenue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<ApiResponse<Vec<MonthlyRevenue>>>> {
    Ok(Json(stats_service::monthly_revenue(&state, &user, query.year).await?))
}

#[utoipa::path(
    get,
    path = "/api/admin/stats/top-products",
    params(("limit" = Option<i64>, Query, description = "How many, default 5, max 50")),
    responses((status = 200, description = "Best sellers", body = ApiResponse<Vec<TopProduct>>)),
    security(("bearer_auth" = [])),
    tag = "Stats"
)]
pub async fn top_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<TopProductsQuery>,
) -> AppResult<Json<ApiResponse<Vec<TopProduct>>>> {
    Ok(Json(stats_service::top_products(&state, &user, query.limit).await?))
}
