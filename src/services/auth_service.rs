use argon2::{
    Argon2, PasswordHasher,
    password_hash::{PasswordHash, PasswordVerifier, SaltString},
};
use chrono::{Duration, Utc};
use password_hash::rand_core::OsRng;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set, TransactionTrait};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    audit::{AuditEntry, record},
    dto::{
        auth::{Claims, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest},
        otp::OtpPurpose,
    },
    entity::users::{ActiveModel as UserActive, Column as UserCol, Entity as Users, Model as UserModel},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, issue_token},
    models::{ROLE_CUSTOMER, User},
    response::{ApiResponse, Meta},
    services::otp_service,
    state::AppState,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub async fn register_user(
    state: &AppState,
    payload: RegisterRequest,
) -> AppResult<ApiResponse<User>> {
    let email = normalize_email(&payload.email)?;
    let full_name = payload.full_name.trim().to_string();
    if full_name.is_empty() {
        return Err(AppError::BadRequest("full_name is required".into()));
    }

    let user = create_account(
        state,
        &email,
        &payload.password,
        full_name,
        ROLE_CUSTOMER,
        payload.phone,
        payload.address,
    )
    .await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.id),
            action: "user_register",
            resource: "users",
            metadata: serde_json::json!({ "user_id": user.id }),
        },
    )
    .await;

    Ok(ApiResponse::success("User created", User::from(user), None))
}

pub async fn login_user(
    state: &AppState,
    payload: LoginRequest,
) -> AppResult<ApiResponse<LoginResponse>> {
    let email = payload.email.trim().to_lowercase();
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid email or password".into()))?;

    if !verify_password(&payload.password, &user.password_hash)? {
        return Err(AppError::BadRequest("Invalid email or password".into()));
    }

    let expiration = Utc::now()
        .checked_add_signed(Duration::hours(state.config.jwt_ttl_hours))
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("Failed to set expiration")))?;

    let claims = Claims {
        sub: user.id.to_string(),
        role: user.role.clone(),
        exp: expiration.timestamp() as usize,
    };
    let token = issue_token(&state.config.jwt_secret, &claims)?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.id),
            action: "user_login",
            resource: "users",
            metadata: serde_json::json!({ "user_id": user.id }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Logged in",
        LoginResponse {
            token,
            user: User::from(user),
        },
        Some(Meta::empty()),
    ))
}

pub async fn me(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<User>> {
    let account = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(ApiResponse::success("OK", User::from(account), Some(Meta::empty())))
}

/// Sets a new password once the caller proves ownership of the mailbox with a
/// verified reset code. The code is consumed in the same transaction.
pub async fn reset_password(
    state: &AppState,
    payload: ResetPasswordRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let email = normalize_email(&payload.email)?;
    validate_password(&payload.new_password)?;

    let txn = state.orm.begin().await?;
    let user = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invalid or expired code".into()))?;

    otp_service::consume_verified(&txn, &email, OtpPurpose::ResetPassword, &payload.code).await?;

    let mut active: UserActive = user.into();
    active.password_hash = Set(hash_password(&payload.new_password)?);
    let user = active.update(&txn).await?;
    txn.commit().await?;

    record(
        &state.pool,
        AuditEntry {
            actor: Some(user.id),
            action: "password_reset",
            resource: "users",
            metadata: serde_json::json!({ "user_id": user.id }),
        },
    )
    .await;

    Ok(ApiResponse::success(
        "Password updated",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Inserts a user with a fresh argon2 hash. Shared with admin account
/// management.
pub(crate) async fn create_account(
    state: &AppState,
    email: &str,
    password: &str,
    full_name: String,
    role: &str,
    phone: Option<String>,
    address: Option<String>,
) -> AppResult<UserModel> {
    validate_password(password)?;

    let exists = Users::find()
        .filter(UserCol::Email.eq(email))
        .one(&state.orm)
        .await?;
    if exists.is_some() {
        return Err(AppError::Conflict("Email is already taken".to_string()));
    }

    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        password_hash: Set(hash_password(password)?),
        full_name: Set(full_name),
        phone: Set(phone.filter(|p| !p.trim().is_empty())),
        address: Set(address.filter(|a| !a.trim().is_empty())),
        role: Set(role.to_string()),
        email_verified: Set(false),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user)
}

pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e.to_string())))
}

pub(crate) fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal(anyhow::anyhow!("Invalid password hash")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub(crate) fn normalize_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(AppError::BadRequest("Invalid email".into()));
    }
    Ok(email)
}

fn validate_password(password: &str) -> AppResult<()> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emails_are_trimmed_and_lowercased() {
        assert_eq!(
            normalize_email("  Fan@Example.COM ").unwrap(),
            "fan@example.com"
        );
        assert!(normalize_email("no-at-sign").is_err());
        assert!(normalize_email("@example.com").is_err());
    }

    #[test]
    fn password_hash_verifies() {
        let hash = hash_password("secret123").unwrap();
        assert!(verify_password("secret123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn short_passwords_are_rejected() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }
}
