use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartItemDto, CartList},
    entity::{
        ProductSizes, Products,
        cart_items::{ActiveModel as CartActive, Column as CartCol, Entity as CartItems},
        product_sizes, products,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    services::product_service::{card_select, fetch_card, fetch_cards, visible},
    state::AppState,
};

pub async fn list_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartList>> {
    let rows = CartItems::find()
        .filter(CartCol::UserId.eq(user.user_id))
        .order_by_desc(CartCol::CreatedAt)
        .all(&state.orm)
        .await?;

    let product_ids: Vec<Uuid> = rows.iter().map(|r| r.product_id).collect();
    let cards = fetch_cards(
        &state.orm,
        card_select().filter(products::Column::Id.is_in(product_ids)),
        None,
    )
    .await?;
    let cards: HashMap<Uuid, _> = cards.into_iter().map(|c| (c.id, c)).collect();

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        // product deleted between the two reads
        let Some(product) = cards.get(&row.product_id).cloned() else {
            continue;
        };
        items.push(CartItemDto {
            id: row.id,
            line_total: product.final_price * i64::from(row.quantity),
            product,
            size: row.size,
            quantity: row.quantity,
        });
    }

    let total_amount = items.iter().map(|i| i.line_total).sum();
    Ok(ApiResponse::success(
        "OK",
        CartList {
            items,
            total_amount,
        },
        Some(Meta::empty()),
    ))
}

/// Sets the quantity for a product (and size) in the caller's cart.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartItemDto>> {
    if payload.quantity <= 0 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let product = Products::find_by_id(payload.product_id)
        .filter(visible())
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("product not found".to_string()))?;

    let size = payload
        .size
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());
    let sizes = ProductSizes::find()
        .filter(product_sizes::Column::ProductId.eq(product.id))
        .all(&state.orm)
        .await?;

    let available = match (&size, sizes.is_empty()) {
        (None, true) => product.stock,
        (None, false) => return Err(AppError::BadRequest("size is required".into())),
        (Some(label), _) => sizes
            .iter()
            .find(|s| &s.size == label)
            .map(|s| s.stock)
            .ok_or_else(|| AppError::BadRequest(format!("size {label} is not available")))?,
    };
    if payload.quantity > available {
        return Err(AppError::BadRequest(format!(
            "only {available} left in stock"
        )));
    }

    let mut existing = Condition::all()
        .add(CartCol::UserId.eq(user.user_id))
        .add(CartCol::ProductId.eq(product.id));
    existing = match &size {
        Some(label) => existing.add(CartCol::Size.eq(label.as_str())),
        None => existing.add(CartCol::Size.is_null()),
    };
    let existing = CartItems::find().filter(existing).one(&state.orm).await?;

    let item = match existing {
        Some(item) => {
            let mut active: CartActive = item.into();
            active.quantity = Set(payload.quantity);
            active.update(&state.orm).await?
        }
        None => {
            CartActive {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.user_id),
                product_id: Set(product.id),
                size: Set(size),
                quantity: Set(payload.quantity),
                created_at: NotSet,
            }
            .insert(&state.orm)
            .await?
        }
    };

    let product = fetch_card(&state.orm, item.product_id).await?;

    Ok(ApiResponse::success(
        "Cart updated",
        CartItemDto {
            id: item.id,
            line_total: product.final_price * i64::from(item.quantity),
            product,
            size: item.size,
            quantity: item.quantity,
        },
        Some(Meta::empty()),
    ))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = CartItems::delete_many()
        .filter(
            Condition::all()
                .add(CartCol::Id.eq(id))
                .add(CartCol::UserId.eq(user.user_id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    Ok(ApiResponse::success(
        "Removed",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
