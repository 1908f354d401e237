use sea_orm::{EntityTrait, QueryOrder};

use crate::{
    entity::{brands, categories, leagues},
    error::AppResult,
    models::LookupItem,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<Vec<LookupItem>>> {
    let items = categories::Entity::find()
        .order_by_asc(categories::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(LookupItem::from)
        .collect();
    Ok(ApiResponse::success("Categories", items, Some(Meta::empty())))
}

pub async fn list_brands(state: &AppState) -> AppResult<ApiResponse<Vec<LookupItem>>> {
    let items = brands::Entity::find()
        .order_by_asc(brands::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(LookupItem::from)
        .collect();
    Ok(ApiResponse::success("Brands", items, Some(Meta::empty())))
}

pub async fn list_leagues(state: &AppState) -> AppResult<ApiResponse<Vec<LookupItem>>> {
    let items = leagues::Entity::find()
        .order_by_asc(leagues::Column::Name)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(LookupItem::from)
        .collect();
    Ok(ApiResponse::success("Leagues", items, Some(Meta::empty())))
}
