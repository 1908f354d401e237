use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
};
use sea_orm::sea_query::{Expr, Query, extension::postgres::PgExpr};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, record},
    dto::customers::{CustomerDetail, UserList},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        orders::{self, Column as OrderCol, Entity as Orders},
        users::{self, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{OrderStatus, ROLE_CUSTOMER, User},
    response::{ApiResponse, Meta},
    routes::params::CustomerListQuery,
    state::AppState,
};

pub async fn list_customers(
    state: &AppState,
    user: &AuthUser,
    query: CustomerListQuery,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let page = query.page_request();

    let mut condition = Condition::all().add(UserCol::Role.eq(ROLE_CUSTOMER));
    if let Some(q) = query.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        let pattern = format!("%{q}%");
        condition = condition.add(
            Condition::any()
                .add(Expr::col((users::Entity, UserCol::Email)).ilike(pattern.clone()))
                .add(Expr::col((users::Entity, UserCol::FullName)).ilike(pattern.clone()))
                .add(Expr::col((users::Entity, UserCol::Phone)).ilike(pattern)),
        );
    }

    let finder = Users::find()
        .filter(condition)
        .order_by_desc(UserCol::CreatedAt);
    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(page.limit())
        .offset(page.offset() as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::new(&page, total);
    Ok(ApiResponse::success("Customers", UserList { items }, Some(meta)))
}

pub async fn get_customer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<CustomerDetail>> {
    ensure_admin(user)?;
    let customer = find_customer(state, id).await?;

    let order_count = Orders::find()
        .filter(OrderCol::UserId.eq(id))
        .count(&state.orm)
        .await? as i64;

    let total_spent: Option<i64> = sqlx::query_scalar(
        "SELECT SUM(total_amount)::BIGINT FROM orders WHERE user_id = $1 AND status = $2",
    )
    .bind(id)
    .bind(OrderStatus::Completed.as_str())
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Customer",
        CustomerDetail {
            customer: User::from(customer),
            order_count,
            total_spent: total_spent.unwrap_or(0),
        },
        Some(Meta::empty()),
    ))
}

/// Removes a customer with their order items, orders and cart rows in one
/// transaction.
pub async fn delete_customer(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    find_customer(state, id).await?;

    let txn = state.orm.begin().await?;

    OrderItems::delete_many()
        .filter(
            OrderItemCol::OrderId.in_subquery(
                Query::select()
                    .column(OrderCol::Id)
                    .from(orders::Entity)
                    .and_where(OrderCol::UserId.eq(id))
                    .to_owned(),
            ),
        )
        .exec(&txn)
        .await?;
    let orders_removed = Orders::delete_many()
        .filter(OrderCol::UserId.eq(id))
        .exec(&txn)
        .await?
        .rows_affected;
    CartItems::delete_many()
        .filter(CartCol::UserId.eq(id))
        .exec(&txn)
        .await?;
    Users::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "customer_delete",
            resource: "users",
            metadata: serde_json::json!({ "user_id": id, "orders_removed": orders_removed }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({ "orders_removed": orders_removed }),
        Some(Meta::empty()),
    ))
}

async fn find_customer(state: &AppState, id: Uuid) -> AppResult<users::Model> {
    Users::find_by_id(id)
        .filter(UserCol::Role.eq(ROLE_CUSTOMER))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)
}
