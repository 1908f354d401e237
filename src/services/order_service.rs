use std::{collections::HashMap, str::FromStr};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, record},
    catalog::pricing::final_price,
    dto::orders::{CheckoutRequest, OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        product_sizes::{Column as SizeCol, Entity as ProductSizes},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    notify::OrderEvent,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    state::AppState,
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }
    page_orders(state, condition, &query, "Ok").await
}

/// Shared by the customer and back office listings.
pub(crate) async fn page_orders(
    state: &AppState,
    condition: Condition,
    query: &OrderListQuery,
    message: &str,
) -> AppResult<ApiResponse<OrderList>> {
    let page = query.page_request();
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);

    let mut finder = Orders::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(page.limit())
        .offset(page.offset() as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Order::from)
        .collect();

    let meta = Meta::new(&page, total);
    Ok(ApiResponse::success(
        message,
        OrderList { items: orders },
        Some(meta),
    ))
}

/// Turns the caller's cart into an order. Stock checks, stock decrements,
/// order rows and cart cleanup commit together or not at all.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let shipping_name = required(&payload.shipping_name, "shipping_name")?;
    let shipping_phone = required(&payload.shipping_phone, "shipping_phone")?;
    let shipping_address = required(&payload.shipping_address, "shipping_address")?;

    let txn = state.orm.begin().await?;

    let cart = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_asc(CartCol::CreatedAt)
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if cart.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    // one product can sit in the cart under several sizes
    let mut requested: HashMap<Uuid, i32> = HashMap::new();
    for row in &cart {
        let total = requested.entry(row.product_id).or_insert(0);
        *total = total.saturating_add(row.quantity);
    }

    let order_id = Uuid::new_v4();
    let mut lines = Vec::with_capacity(cart.len());
    let mut total_amount: i64 = 0;

    for row in &cart {
        let product = Products::find_by_id(row.product_id)
            .lock(LockType::Update)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::BadRequest(format!("product {} no longer exists", row.product_id)))?;

        if product.status.as_deref().is_some_and(|s| s != "active") {
            return Err(AppError::BadRequest(format!(
                "{} is no longer for sale",
                product.name
            )));
        }
        if product.stock < requested.get(&product.id).copied().unwrap_or(row.quantity) {
            return Err(AppError::BadRequest(format!(
                "Insufficient stock for {}",
                product.name
            )));
        }
        if let Some(size) = &row.size {
            let size_stock = ProductSizes::find()
                .filter(SizeCol::ProductId.eq(product.id))
                .filter(SizeCol::Size.eq(size.as_str()))
                .lock(LockType::Update)
                .one(&txn)
                .await?
                .map(|s| s.stock)
                .unwrap_or(0);
            if size_stock < row.quantity {
                return Err(AppError::BadRequest(format!(
                    "Insufficient stock for {} size {}",
                    product.name, size
                )));
            }
        }

        let unit_price = final_price(product.price, product.discount);
        total_amount += unit_price * i64::from(row.quantity);
        lines.push((row.product_id, row.size.clone(), row.quantity, unit_price));
    }

    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        invoice_number: Set(build_invoice_number(order_id)),
        shipping_name: Set(shipping_name),
        shipping_phone: Set(shipping_phone),
        shipping_address: Set(shipping_address),
        note: Set(payload.note.filter(|n| !n.trim().is_empty())),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for (product_id, size, quantity, unit_price) in lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product_id),
            size: Set(size.clone()),
            quantity: Set(quantity),
            price: Set(unit_price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;
        items.push(OrderItem::from(item));

        shift_stock(&txn, product_id, size.as_deref(), -quantity).await?;
    }

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "checkout",
            resource: "orders",
            metadata: serde_json::json!({ "order_id": order.id, "total": order.total_amount }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let data = with_items(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

/// Customers may cancel their own orders while still pending.
pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let txn = state.orm.begin().await?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    if order.status != OrderStatus::Pending.as_str() {
        return Err(AppError::BadRequest(
            "only pending orders can be cancelled".into(),
        ));
    }

    let (order, event) = transition(&txn, order, OrderStatus::Cancelled).await?;
    txn.commit().await?;

    state.notifier.publish(order.user_id, event);
    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "order_cancel",
            resource: "orders",
            metadata: serde_json::json!({ "order_id": order.id }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Order cancelled",
        Order::from(order),
        Some(Meta::empty()),
    ))
}

/// Validate and apply a status change inside `txn`. Cancelling returns the
/// ordered quantities to stock.
pub(crate) async fn transition(
    txn: &DatabaseTransaction,
    order: OrderModel,
    next: OrderStatus,
) -> AppResult<(OrderModel, OrderEvent)> {
    let current = OrderStatus::from_str(&order.status)
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))?;
    if !current.can_transition_to(next) {
        return Err(AppError::BadRequest(format!(
            "cannot move order from {current} to {next}"
        )));
    }

    if next == OrderStatus::Cancelled {
        let items = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order.id))
            .all(txn)
            .await?;
        for item in items {
            shift_stock(txn, item.product_id, item.size.as_deref(), item.quantity).await?;
        }
    }

    let now = Utc::now();
    let mut active: OrderActive = order.into();
    active.status = Set(next.as_str().to_string());
    active.updated_at = Set(now.into());
    let order = active.update(txn).await?;

    let event = OrderEvent {
        order_id: order.id,
        invoice_number: order.invoice_number.clone(),
        previous_status: current.as_str().to_string(),
        status: order.status.clone(),
        at: now,
    };
    Ok((order, event))
}

pub(crate) async fn with_items<C: ConnectionTrait>(
    db: &C,
    order: OrderModel,
) -> AppResult<OrderWithItems> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .order_by_asc(OrderItemCol::CreatedAt)
        .all(db)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();

    Ok(OrderWithItems {
        order: Order::from(order),
        items,
    })
}

/// Add `delta` to the product stock and, when sized, to the size stock.
async fn shift_stock<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    size: Option<&str>,
    delta: i32,
) -> AppResult<()> {
    Products::update_many()
        .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).add(delta))
        .filter(ProdCol::Id.eq(product_id))
        .exec(db)
        .await?;

    if let Some(size) = size {
        ProductSizes::update_many()
            .col_expr(SizeCol::Stock, Expr::col(SizeCol::Stock).add(delta))
            .filter(SizeCol::ProductId.eq(product_id))
            .filter(SizeCol::Size.eq(size))
            .exec(db)
            .await?;
    }
    Ok(())
}

fn required(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}

pub fn build_invoice_number(order_id: Uuid) -> String {
    let date = Utc::now().format("%Y%m%d");
    let suffix = order_id.simple().to_string();
    format!("INV-{}-{}", date, &suffix[..8].to_uppercase())
}
