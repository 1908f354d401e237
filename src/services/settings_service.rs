use chrono::Utc;
use sea_orm::{EntityTrait, QueryOrder, Set, sea_query::OnConflict};

use crate::{
    audit::{AuditEntry, record},
    dto::settings::{SettingList, UpdateSettingRequest},
    entity::settings::{ActiveModel as SettingActive, Column as SettingCol, Entity as Settings},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Setting,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub const MAX_KEY_LEN: usize = 64;

pub async fn list_settings(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<SettingList>> {
    ensure_admin(user)?;
    let items = Settings::find()
        .order_by_asc(SettingCol::Key)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Setting::from)
        .collect();

    Ok(ApiResponse::success("Settings", SettingList { items }, Some(Meta::empty())))
}

/// Insert or overwrite a single key.
pub async fn upsert_setting(
    state: &AppState,
    user: &AuthUser,
    key: String,
    payload: UpdateSettingRequest,
) -> AppResult<ApiResponse<Setting>> {
    ensure_admin(user)?;
    let key = validate_key(&key)?;

    Settings::insert(SettingActive {
        key: Set(key.clone()),
        value: Set(payload.value),
        updated_at: Set(Utc::now().into()),
    })
    .on_conflict(
        OnConflict::column(SettingCol::Key)
            .update_columns([SettingCol::Value, SettingCol::UpdatedAt])
            .to_owned(),
    )
    .exec_without_returning(&state.orm)
    .await?;

    let setting = Settings::find_by_id(key.clone())
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.user_id),
            action: "setting_update",
            resource: "settings",
            metadata: serde_json::json!({ "key": key }),
        },
    )
    .await;

    Ok(ApiResponse::success("Setting saved", Setting::from(setting), Some(Meta::empty())))
}

fn validate_key(key: &str) -> AppResult<String> {
    let key = key.trim();
    let valid = !key.is_empty()
        && key.len() <= MAX_KEY_LEN
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(AppError::BadRequest(format!("invalid setting key `{key}`")));
    }
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::validate_key;

    #[test]
    fn keys_are_restricted() {
        assert_eq!(validate_key(" shop.hotline ").unwrap(), "shop.hotline");
        assert!(validate_key("").is_err());
        assert!(validate_key("has space").is_err());
        assert!(validate_key(&"k".repeat(65)).is_err());
    }
}
