use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, record},
    dto::{admins::CreateAdminRequest, customers::UserList},
    entity::users::{Column as UserCol, Entity as Users},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_superadmin},
    models::{ROLE_ADMIN, ROLE_SUPERADMIN, User},
    response::{ApiResponse, Meta},
    services::auth_service::{create_account, normalize_email},
    state::AppState,
};

pub async fn list_admins(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<UserList>> {
    ensure_superadmin(user)?;
    let items = Users::find()
        .filter(UserCol::Role.is_in([ROLE_ADMIN, ROLE_SUPERADMIN]))
        .order_by_asc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    Ok(ApiResponse::success("Admins", UserList { items }, Some(Meta::empty())))
}

pub async fn create_admin(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAdminRequest,
) -> AppResult<ApiResponse<User>> {
    ensure_superadmin(user)?;
    let email = normalize_email(&payload.email)?;
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("full_name is required".into()));
    }
    let role = if payload.superadmin {
        ROLE_SUPERADMIN
    } else {
        ROLE_ADMIN
    };

    let admin = create_account(state, &email, &payload.password, full_name, role, None, None).await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "admin_create",
            resource: "users",
            metadata: serde_json::json!({ "user_id": admin.id, "role": role }),
        },
    )
    .await;

    Ok(ApiResponse::success("Admin created", User::from(admin), Some(Meta::empty())))
}

pub async fn delete_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_superadmin(user)?;
    if id == user.user_id {
        return Err(AppError::BadRequest("You cannot delete your own account".into()));
    }

    let result = Users::delete_many()
        .filter(UserCol::Id.eq(id))
        .filter(UserCol::Role.is_in([ROLE_ADMIN, ROLE_SUPERADMIN]))
        .exec(&state.orm)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "admin_delete",
            resource: "users",
            metadata: serde_json::json!({ "user_id": id }),
        },
    )
    .await;

    Ok(ApiResponse::success("Deleted", serde_json::json!({}), Some(Meta::empty())))
}
