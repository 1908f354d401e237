use chrono::{Duration, Utc};
use password_hash::rand_core::{OsRng, RngCore};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseTransaction, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    dto::otp::{OtpIssued, OtpPurpose, OtpRequest, OtpVerified, OtpVerifyRequest},
    entity::{
        otp_codes::{ActiveModel as OtpActive, Column as OtpCol, Entity as OtpCodes, Model as OtpModel},
        users::{Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    mailer::Email,
    response::{ApiResponse, Meta},
    services::auth_service::{hash_password, normalize_email, verify_password},
    state::AppState,
};

pub const CODE_LEN: usize = 6;

/// Six decimal digits, zero padded.
pub fn generate_code() -> String {
    let n = OsRng.next_u32() % 10u32.pow(CODE_LEN as u32);
    format!("{n:0width$}", width = CODE_LEN)
}

/// Issues a fresh code for `email` and mails it. Earlier unused codes for the
/// same purpose stop working.
pub async fn request_otp(state: &AppState, payload: OtpRequest) -> AppResult<ApiResponse<OtpIssued>> {
    let email = normalize_email(&payload.email)?;
    let expires_at = Utc::now() + Duration::minutes(state.config.otp.ttl_minutes);

    let account = Users::find()
        .filter(UserCol::Email.eq(email.as_str()))
        .one(&state.orm)
        .await?;

    let issued = ApiResponse::success(
        "Code sent",
        OtpIssued {
            email: email.clone(),
            expires_at,
        },
        Some(Meta::empty()),
    );

    let Some(account) = account else {
        // same answer for unknown addresses
        tracing::debug!(%email, purpose = payload.purpose.as_str(), "otp requested for unknown email");
        return Ok(issued);
    };
    if payload.purpose == OtpPurpose::VerifyEmail && account.email_verified {
        return Err(AppError::BadRequest("Email is already verified".into()));
    }

    let code = generate_code();
    let txn = state.orm.begin().await?;
    retire_pending(&txn, &email, payload.purpose).await?;
    OtpActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.clone()),
        purpose: Set(payload.purpose.as_str().to_string()),
        code_hash: Set(hash_password(&code)?),
        attempts: Set(0),
        expires_at: Set(expires_at.into()),
        verified_at: Set(None),
        consumed_at: Set(None),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;
    txn.commit().await?;

    state.mailer.send(Email {
        to: email.clone(),
        subject: subject(payload.purpose).to_string(),
        body: format!(
            "Your code is {code}. It expires in {} minutes.",
            state.config.otp.ttl_minutes
        ),
    })?;

    Ok(issued)
}

/// Checks a code. Wrong guesses count against the code; once the limit is
/// reached the code is dead. A verified email code also flips the account's
/// verified flag and is consumed on the spot; a verified reset code waits for
/// the password reset to consume it.
pub async fn verify_otp(
    state: &AppState,
    payload: OtpVerifyRequest,
) -> AppResult<ApiResponse<OtpVerified>> {
    let email = normalize_email(&payload.email)?;
    let max_attempts = state.config.otp.max_attempts;

    let txn = state.orm.begin().await?;
    let otp = latest_pending(&txn, &email, payload.purpose)
        .await?
        .ok_or_else(invalid_code)?;

    if otp.attempts >= max_attempts {
        return Err(AppError::BadRequest("Too many attempts, request a new code".into()));
    }

    if !verify_password(payload.code.trim(), &otp.code_hash)? {
        OtpCodes::update_many()
            .col_expr(OtpCol::Attempts, Expr::col(OtpCol::Attempts).add(1))
            .filter(OtpCol::Id.eq(otp.id))
            .exec(&txn)
            .await?;
        txn.commit().await?;
        return Err(invalid_code());
    }

    let now = Utc::now();
    let mut active: OtpActive = otp.into();
    active.verified_at = Set(Some(now.into()));
    if payload.purpose == OtpPurpose::VerifyEmail {
        active.consumed_at = Set(Some(now.into()));
        Users::update_many()
            .col_expr(UserCol::EmailVerified, Expr::value(true))
            .filter(UserCol::Email.eq(email.as_str()))
            .exec(&txn)
            .await?;
    }
    active.update(&txn).await?;
    txn.commit().await?;

    Ok(ApiResponse::success(
        "Code verified",
        OtpVerified {
            email,
            purpose: payload.purpose,
        },
        Some(Meta::empty()),
    ))
}

/// Consumes a code that already passed [`verify_otp`]. Runs inside the
/// caller's transaction so the code is only spent if the caller commits.
pub(crate) async fn consume_verified(
    txn: &DatabaseTransaction,
    email: &str,
    purpose: OtpPurpose,
    code: &str,
) -> AppResult<()> {
    let otp = latest_pending(txn, email, purpose)
        .await?
        .filter(|otp| otp.verified_at.is_some())
        .ok_or_else(invalid_code)?;

    if !verify_password(code.trim(), &otp.code_hash)? {
        return Err(invalid_code());
    }

    let mut active: OtpActive = otp.into();
    active.consumed_at = Set(Some(Utc::now().into()));
    active.update(txn).await?;
    Ok(())
}

/// Newest unconsumed, unexpired code for the address and purpose.
async fn latest_pending(
    txn: &DatabaseTransaction,
    email: &str,
    purpose: OtpPurpose,
) -> AppResult<Option<OtpModel>> {
    let now = Utc::now();
    let otp = OtpCodes::find()
        .filter(OtpCol::Email.eq(email))
        .filter(OtpCol::Purpose.eq(purpose.as_str()))
        .filter(OtpCol::ConsumedAt.is_null())
        .filter(OtpCol::ExpiresAt.gt(now))
        .order_by_desc(OtpCol::CreatedAt)
        .lock(LockType::Update)
        .one(txn)
        .await?;
    Ok(otp)
}

async fn retire_pending<C: ConnectionTrait>(db: &C, email: &str, purpose: OtpPurpose) -> AppResult<()> {
    OtpCodes::update_many()
        .col_expr(OtpCol::ConsumedAt, Expr::value(Utc::now()))
        .filter(OtpCol::Email.eq(email))
        .filter(OtpCol::Purpose.eq(purpose.as_str()))
        .filter(OtpCol::ConsumedAt.is_null())
        .exec(db)
        .await?;
    Ok(())
}

fn subject(purpose: OtpPurpose) -> &'static str {
    match purpose {
        OtpPurpose::VerifyEmail => "Verify your email",
        OtpPurpose::ResetPassword => "Reset your password",
    }
}

fn invalid_code() -> AppError {
    AppError::BadRequest("Invalid or expired code".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_six_digits() {
        for _ in 0..50 {
            let code = generate_code();
            assert_eq!(code.len(), CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
