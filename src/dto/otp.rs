use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OtpPurpose {
    VerifyEmail,
    ResetPassword,
}

impl OtpPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            OtpPurpose::VerifyEmail => "verify_email",
            OtpPurpose::ResetPassword => "reset_password",
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OtpRequest {
    pub email: String,
    pub purpose: OtpPurpose,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub purpose: OtpPurpose,
    pub code: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpIssued {
    pub email: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OtpVerified {
    pub email: String,
    pub purpose: OtpPurpose,
}
