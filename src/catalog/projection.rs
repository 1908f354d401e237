use chrono::{DateTime, Utc};
use sea_orm::{FromQueryResult, prelude::DateTimeWithTimeZone};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::catalog::{pricing::final_price, predicate::ProductFacts};

pub const DEFAULT_UNIT: &str = "cái";

/// One row of `products` left-joined with its category, brand and league.
#[derive(Debug, Clone, FromQueryResult)]
pub struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub stock: i32,
    pub unit: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<String>,
    pub category_name: Option<String>,
    pub brand_name: Option<String>,
    pub league_name: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

/// Storefront view of a product.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProductCard {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub discount: i32,
    pub final_price: i64,
    pub stock: i32,
    pub unit: String,
    pub image_url: Option<String>,
    pub status: String,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub league: Option<String>,
    /// Comma separated size labels, empty when the product has none
    pub sizes: String,
    pub created_at: DateTime<Utc>,
}

pub fn project(row: ProductRow, sizes: Option<&[String]>) -> ProductCard {
    ProductCard {
        final_price: final_price(row.price, row.discount),
        unit: row
            .unit
            .filter(|u| !u.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UNIT.to_string()),
        sizes: sizes.map(|s| s.join(",")).unwrap_or_default(),
        status: row.status.unwrap_or_else(|| "active".to_string()),
        id: row.id,
        name: row.name,
        description: row.description,
        price: row.price,
        discount: row.discount,
        stock: row.stock,
        image_url: row.image_url,
        category: row.category_name,
        brand: row.brand_name,
        league: row.league_name,
        created_at: row.created_at.with_timezone(&Utc),
    }
}

impl ProductCard {
    pub fn facts(&self) -> ProductFacts {
        ProductFacts {
            name: self.name.clone(),
            final_price: self.final_price,
            category: self.category.clone(),
            brand: self.brand.clone(),
            league: self.league.clone(),
            sizes: self
                .sizes
                .split(',')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}
