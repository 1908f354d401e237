use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use crate::{
    dto::settings::{SettingList, UpdateSettingRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Setting,
    response::ApiResponse,
    services::settings_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_settings))
        .route("/{key}", put(update_setting))
}

#[utoipa::path(
    get,
    path = "/api/admin/settings",
    responses((status = 200, description = "All settings", body = ApiResponse<SettingList>)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_settings(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<SettingList>>> {
    let resp = settings_service::list_settings(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/settings/{key}",
    params(("key" = String, Path, description = "Setting key")),
    request_body = UpdateSettingRequest,
    responses(
        (status = 200, description = "Setting stored", body = ApiResponse<Setting>),
        (status = 400, description = "Invalid key")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_setting(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<String>,
    Json(payload): Json<UpdateSettingRequest>,
) -> AppResult<Json<ApiResponse<Setting>>> {
    let resp = settings_service::upsert_setting(&state, &user, key, payload).await?;
    Ok(Json(resp))
}
