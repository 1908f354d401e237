use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::{admins::CreateAdminRequest, customers::UserList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::User,
    response::ApiResponse,
    services::account_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_admins).post(create_admin))
        .route("/{id}", delete(delete_admin))
}

#[utoipa::path(
    get,
    path = "/api/admin/admins",
    responses(
        (status = 200, description = "Back office accounts", body = ApiResponse<UserList>),
        (status = 403, description = "Superadmin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_admins(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = account_service::list_admins(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/admins",
    request_body = CreateAdminRequest,
    responses(
        (status = 201, description = "Admin created", body = ApiResponse<User>),
        (status = 403, description = "Superadmin only"),
        (status = 409, description = "Email already taken")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn create_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAdminRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let resp = account_service::create_admin(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/admin/admins/{id}",
    params(("id" = Uuid, Path, description = "Admin ID")),
    responses(
        (status = 200, description = "Deleted"),
        (status = 400, description = "Cannot delete yourself"),
        (status = 403, description = "Superadmin only"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn delete_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = account_service::delete_admin(&state, &user, id).await?;
    Ok(Json(resp))
}
