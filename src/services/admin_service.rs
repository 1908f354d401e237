use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QuerySelect, TransactionTrait};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, record},
    dto::orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
    entity::orders::{Column as OrderCol, Entity as Orders},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::order_service::{page_orders, transition, with_items},
    state::AppState,
};

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    page_orders(state, condition, &query, "Orders").await
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

/// Moves an order along `pending -> shipping -> completed`, or cancels it,
/// then pushes the change to the customer's topic.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;

    let txn = state.orm.begin().await?;
    let existing = Orders::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let (order, event) = transition(&txn, existing, payload.status).await?;
    txn.commit().await?;

    let delivered = state.notifier.publish(order.user_id, event);
    tracing::debug!(order_id = %order.id, status = %order.status, delivered, "order status pushed");

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "order_status_update",
            resource: "orders",
            metadata: serde_json::json!({ "order_id": order.id, "status": order.status }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        Order::from(order),
        Some(Meta::empty()),
    ))
}
