use serde::Serialize;
use utoipa::ToSchema;

use crate::models::User;

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDetail {
    pub customer: User,
    pub order_count: i64,
    pub total_spent: i64,
}
