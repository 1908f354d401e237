use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    catalog::pagination::{PageRequest, Pagination},
    models::OrderStatus,
};

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub status: Option<OrderStatus>,
    pub sort_order: Option<SortOrder>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct LowStockQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub threshold: Option<i32>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CustomerListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    /// Matches email, name or phone
    pub q: Option<String>,
}

macro_rules! page_request {
    ($($query:ty),+) => {
        $(impl $query {
            pub fn page_request(&self) -> PageRequest {
                Pagination {
                    page: self.page,
                    limit: self.limit,
                }
                .normalize()
            }
        })+
    };
}

page_request!(OrderListQuery, LowStockQuery, CustomerListQuery);
