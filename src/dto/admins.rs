use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAdminRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    #[serde(default)]
    pub superadmin: bool,
}
