use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::{LockType, Order};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, record},
    catalog::{
        facets::{FacetSelection, ProductFilterQuery, ProductSort},
        pagination::PageRequest,
        predicate::Predicate,
        pricing::{final_price_expr, validate_discount},
        projection::{ProductCard, ProductRow, project},
    },
    dto::products::{
        CreateProductRequest, InventoryAdjustRequest, ProductList, SizeStock, UpdateProductRequest,
    },
    entity::{
        OrderItems, ProductSizes,
        brands, categories, leagues, order_items,
        product_sizes::{self, ActiveModel as SizeActive},
        products::{self, ActiveModel as ProductActive, Column, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::LowStockQuery,
    state::AppState,
};

const STATUS_ACTIVE: &str = "active";
const STATUS_INACTIVE: &str = "inactive";
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Storefront listing: facets, search, sort and paging over visible products.
pub async fn list_products(
    state: &AppState,
    query: ProductFilterQuery,
) -> AppResult<ApiResponse<ProductList>> {
    search_products(state, &query, true).await
}

/// Back office listing; same facets, inactive products included.
pub async fn list_products_admin(
    state: &AppState,
    user: &AuthUser,
    query: ProductFilterQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    search_products(state, &query, false).await
}

async fn search_products(
    state: &AppState,
    query: &ProductFilterQuery,
    visible_only: bool,
) -> AppResult<ApiResponse<ProductList>> {
    let page = query.page_request();
    let selection = FacetSelection::from_query(query);
    let predicate = Predicate::from_selection(&selection, query.search_term());
    tracing::debug!(?selection, trivial = predicate.is_trivial(), "product search");

    let mut condition = predicate.to_condition();
    if visible_only {
        condition = condition.add(visible());
    }

    let finder = card_select().filter(condition);
    let total = finder.clone().count(&state.orm).await? as i64;

    let finder = apply_sort(finder, query.sort.unwrap_or_default());
    let items = fetch_cards(&state.orm, finder, Some(page)).await?;

    let meta = Meta::new(&page, total);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductCard>> {
    let finder = card_select().filter(Column::Id.eq(id)).filter(visible());
    let product = fetch_cards(&state.orm, finder, None)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn get_product_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ProductCard>> {
    ensure_admin(user)?;
    let product = fetch_card(&state.orm, id).await?;
    Ok(ApiResponse::success("Product", product, Some(Meta::empty())))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<ProductCard>> {
    ensure_admin(user)?;
    let name = payload.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::BadRequest("name is required".into()));
    }
    validate_numbers(Some(payload.price), Some(payload.discount), Some(payload.stock))?;
    validate_status(payload.status.as_deref())?;
    validate_sizes(&payload.sizes)?;

    let exists = Products::find()
        .filter(Column::Name.eq(name.as_str()))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict("product name already exists".into()));
    }

    let txn = state.orm.begin().await?;
    let product = ProductActive {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(payload.description),
        price: Set(payload.price),
        discount: Set(payload.discount),
        stock: Set(payload.stock),
        unit: Set(payload.unit),
        image_url: Set(payload.image_url),
        status: Set(Some(
            payload.status.unwrap_or_else(|| STATUS_ACTIVE.to_string()),
        )),
        category_id: Set(payload.category_id),
        brand_id: Set(payload.brand_id),
        league_id: Set(payload.league_id),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;
    replace_sizes(&txn, product.id, &payload.sizes).await?;
    txn.commit().await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "product_create",
            resource: "products",
            metadata: serde_json::json!({ "product_id": product.id }),
        },
    )
    .await;

    let card = fetch_card(&state.orm, product.id).await?;
    Ok(ApiResponse::success("Product created", card, Some(Meta::empty())))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<ProductCard>> {
    ensure_admin(user)?;
    validate_numbers(payload.price, payload.discount, payload.stock)?;
    validate_status(payload.status.as_deref())?;
    if let Some(sizes) = &payload.sizes {
        validate_sizes(sizes)?;
    }

    let txn = state.orm.begin().await?;
    let existing = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ProductActive = existing.into();
    if let Some(name) = payload.name.map(|n| n.trim().to_string()) {
        if name.is_empty() {
            return Err(AppError::BadRequest("name must not be empty".into()));
        }
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(Some(description));
    }
    if let Some(price) = payload.price {
        active.price = Set(price);
    }
    if let Some(discount) = payload.discount {
        active.discount = Set(discount);
    }
    if let Some(stock) = payload.stock {
        active.stock = Set(stock);
    }
    if let Some(unit) = payload.unit {
        active.unit = Set(Some(unit));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(Some(image_url));
    }
    if let Some(status) = payload.status {
        active.status = Set(Some(status));
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(Some(category_id));
    }
    if let Some(brand_id) = payload.brand_id {
        active.brand_id = Set(Some(brand_id));
    }
    if let Some(league_id) = payload.league_id {
        active.league_id = Set(Some(league_id));
    }
    active.updated_at = Set(Utc::now().into());
    let product = active.update(&txn).await?;

    if let Some(sizes) = &payload.sizes {
        replace_sizes(&txn, product.id, sizes).await?;
    }
    txn.commit().await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "product_update",
            resource: "products",
            metadata: serde_json::json!({ "product_id": product.id }),
        },
    )
    .await;

    let card = fetch_card(&state.orm, product.id).await?;
    Ok(ApiResponse::success("Updated", card, Some(Meta::empty())))
}

/// Products that were ever ordered stay in place; deactivate them instead.
pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let ordered = OrderItems::find()
        .filter(order_items::Column::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if ordered > 0 {
        return Err(AppError::Conflict(
            "product has orders; set its status to inactive instead".into(),
        ));
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "product_delete",
            resource: "products",
            metadata: serde_json::json!({ "product_id": id }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn list_low_stock(
    state: &AppState,
    user: &AuthUser,
    query: LowStockQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let threshold = query.threshold.unwrap_or(LOW_STOCK_THRESHOLD);
    let page = query.page_request();

    let finder = card_select().filter(Column::Stock.lte(threshold));
    let total = finder.clone().count(&state.orm).await? as i64;

    let finder = finder
        .order_by_asc(Column::Stock)
        .order_by_desc(Column::CreatedAt);
    let items = fetch_cards(&state.orm, finder, Some(page)).await?;

    let meta = Meta::new(&page, total);
    Ok(ApiResponse::success("Low stock", ProductList { items }, Some(meta)))
}

pub async fn adjust_inventory(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: InventoryAdjustRequest,
) -> AppResult<ApiResponse<ProductCard>> {
    ensure_admin(user)?;
    if payload.delta == 0 {
        return Err(AppError::BadRequest("delta must not be 0".into()));
    }

    let txn = state.orm.begin().await?;
    let product = Products::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let new_stock = adjusted_stock(product.stock, payload.delta)?;

    let mut active: ProductActive = product.into();
    active.stock = Set(new_stock);
    active.updated_at = Set(Utc::now().into());
    let updated = active.update(&txn).await?;
    txn.commit().await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "inventory_adjust",
            resource: "products",
            metadata: serde_json::json!({ "product_id": updated.id, "delta": payload.delta }),
        },
    )
    .await;

    let card = fetch_card(&state.orm, updated.id).await?;
    Ok(ApiResponse::success("Inventory updated", card, Some(Meta::empty())))
}

/// Stock after applying `delta`; rejects negative or out-of-range results.
fn adjusted_stock(stock: i32, delta: i32) -> AppResult<i32> {
    stock
        .checked_add(delta)
        .filter(|s| *s >= 0)
        .ok_or_else(|| AppError::BadRequest("stock cannot go below 0 or past the maximum".into()))
}

/// `status = 'active' OR status IS NULL`
pub(crate) fn visible() -> Condition {
    Condition::any()
        .add(Column::Status.eq(STATUS_ACTIVE))
        .add(Column::Status.is_null())
}

/// `products` joined with the names the storefront shows.
pub(crate) fn card_select() -> Select<Products> {
    Products::find()
        .select_only()
        .columns([
            Column::Id,
            Column::Name,
            Column::Description,
            Column::Price,
            Column::Discount,
            Column::Stock,
            Column::Unit,
            Column::ImageUrl,
            Column::Status,
            Column::CreatedAt,
        ])
        .column_as(categories::Column::Name, "category_name")
        .column_as(brands::Column::Name, "brand_name")
        .column_as(leagues::Column::Name, "league_name")
        .join(JoinType::LeftJoin, products::Relation::Category.def())
        .join(JoinType::LeftJoin, products::Relation::Brand.def())
        .join(JoinType::LeftJoin, products::Relation::League.def())
}

fn apply_sort(finder: Select<Products>, sort: ProductSort) -> Select<Products> {
    let finder = match sort {
        ProductSort::Newest => finder.order_by_desc(Column::CreatedAt),
        ProductSort::PriceAsc => finder.order_by(final_price_expr(), Order::Asc),
        ProductSort::PriceDesc => finder.order_by(final_price_expr(), Order::Desc),
        ProductSort::NameAsc => finder.order_by_asc(Column::Name),
    };
    // stable pages when the sort key ties
    finder.order_by_asc(Column::Id)
}

/// Run a [`card_select`] query, attach size lists and project the rows.
pub(crate) async fn fetch_cards<C: ConnectionTrait>(
    db: &C,
    finder: Select<Products>,
    page: Option<PageRequest>,
) -> AppResult<Vec<ProductCard>> {
    let finder = match page {
        Some(page) => finder.limit(page.limit()).offset(page.offset() as u64),
        None => finder,
    };
    let rows = finder.into_model::<ProductRow>().all(db).await?;

    let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
    let sizes = sizes_by_product(db, &ids).await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let product_sizes = sizes.get(&row.id).map(Vec::as_slice);
            project(row, product_sizes)
        })
        .collect())
}

pub(crate) async fn fetch_card<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<ProductCard> {
    fetch_cards(db, card_select().filter(Column::Id.eq(id)), None)
        .await?
        .into_iter()
        .next()
        .ok_or(AppError::NotFound)
}

async fn sizes_by_product<C: ConnectionTrait>(
    db: &C,
    ids: &[Uuid],
) -> AppResult<HashMap<Uuid, Vec<String>>> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = ProductSizes::find()
        .filter(product_sizes::Column::ProductId.is_in(ids.to_vec()))
        .order_by_asc(product_sizes::Column::Size)
        .all(db)
        .await?;

    let mut grouped: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in rows {
        grouped.entry(row.product_id).or_default().push(row.size);
    }
    Ok(grouped)
}

async fn replace_sizes<C: ConnectionTrait>(
    db: &C,
    product_id: Uuid,
    sizes: &[SizeStock],
) -> AppResult<()> {
    ProductSizes::delete_many()
        .filter(product_sizes::Column::ProductId.eq(product_id))
        .exec(db)
        .await?;

    for size in sizes {
        SizeActive {
            id: Set(Uuid::new_v4()),
            product_id: Set(product_id),
            size: Set(size.size.trim().to_uppercase()),
            stock: Set(size.stock),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

fn validate_numbers(price: Option<i64>, discount: Option<i32>, stock: Option<i32>) -> AppResult<()> {
    if price.is_some_and(|p| p < 0) {
        return Err(AppError::BadRequest("price must not be negative".into()));
    }
    if discount.is_some_and(|d| !validate_discount(d)) {
        return Err(AppError::BadRequest("discount must be between 0 and 100".into()));
    }
    if stock.is_some_and(|s| s < 0) {
        return Err(AppError::BadRequest("stock must not be negative".into()));
    }
    Ok(())
}

fn validate_status(status: Option<&str>) -> AppResult<()> {
    match status {
        None | Some(STATUS_ACTIVE) | Some(STATUS_INACTIVE) => Ok(()),
        Some(_) => Err(AppError::BadRequest(
            "status must be active or inactive".into(),
        )),
    }
}

fn validate_sizes(sizes: &[SizeStock]) -> AppResult<()> {
    let mut seen = Vec::with_capacity(sizes.len());
    for size in sizes {
        let label = size.size.trim().to_uppercase();
        if label.is_empty() || size.stock < 0 {
            return Err(AppError::BadRequest(
                "sizes need a label and a non-negative stock".into(),
            ));
        }
        if seen.contains(&label) {
            return Err(AppError::BadRequest(format!("duplicate size {label}")));
        }
        seen.push(label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inventory_adjustments_stay_in_range() {
        assert_eq!(adjusted_stock(10, -4).unwrap(), 6);
        assert_eq!(adjusted_stock(10, -10).unwrap(), 0);
        assert!(adjusted_stock(10, -11).is_err());
        assert!(adjusted_stock(1, i32::MAX).is_err());
        assert!(adjusted_stock(0, i32::MIN).is_err());
        assert_eq!(adjusted_stock(0, i32::MAX).unwrap(), i32::MAX);
    }
}
