use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::projection::ProductCard;

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct SizeStock {
    pub size: String,
    pub stock: i32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    #[serde(default)]
    pub discount: i32,
    pub stock: i32,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub league_id: Option<Uuid>,
    #[serde(default)]
    pub sizes: Vec<SizeStock>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub discount: Option<i32>,
    pub stock: Option<i32>,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub category_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    pub league_id: Option<Uuid>,
    /// Replaces the whole size list when present
    pub sizes: Option<Vec<SizeStock>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct InventoryAdjustRequest {
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductCard>)]
    pub items: Vec<ProductCard>,
}
