use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    catalog::{facets::ProductFilterQuery, projection::ProductCard},
    dto::products::ProductList,
    error::AppResult,
    models::LookupItem,
    response::ApiResponse,
    services::{catalog_service, product_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/{id}", get(get_product))
}

pub fn catalog_router() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories))
        .route("/brands", get(list_brands))
        .route("/leagues", get(list_leagues))
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("limit" = Option<i64>, Query, description = "Items per page, default 16, max 100"),
        ("prices" = Option<String>, Query, description = "Comma separated buckets: duoi500, 500-1000, tren1000"),
        ("categories" = Option<String>, Query, description = "Comma separated category slugs or names"),
        ("brands" = Option<String>, Query, description = "Comma separated brand names"),
        ("leagues" = Option<String>, Query, description = "Comma separated league names"),
        ("sizes" = Option<String>, Query, description = "Comma separated sizes"),
        ("q" = Option<String>, Query, description = "Search in product name"),
        ("sort" = Option<String>, Query, description = "newest, price_asc, price_desc, name_asc"),
    ),
    responses(
        (status = 200, description = "Filtered products", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductFilterQuery>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "Product ID")),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductCard>),
        (status = 404, description = "Not found")
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductCard>>> {
    let resp = product_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/catalog/categories",
    responses((status = 200, description = "All categories", body = ApiResponse<Vec<LookupItem>>)),
    tag = "Catalog"
)]
pub async fn list_categories(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<LookupItem>>>> {
    Ok(Json(catalog_service::list_categories(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/catalog/brands",
    responses((status = 200, description = "All brands", body = ApiResponse<Vec<LookupItem>>)),
    tag = "Catalog"
)]
pub async fn list_brands(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<LookupItem>>>> {
    Ok(Json(catalog_service::list_brands(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/catalog/leagues",
    responses((status = 200, description = "All leagues", body = ApiResponse<Vec<LookupItem>>)),
    tag = "Catalog"
)]
pub async fn list_leagues(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<LookupItem>>>> {
    Ok(Json(catalog_service::list_leagues(&state).await?))
}
