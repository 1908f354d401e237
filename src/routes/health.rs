use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    breaker::BreakerState,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessData {
    pub status: String,
    pub database: bool,
    pub breaker: BreakerState,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}

/// Pings the database unless the breaker is open, and feeds the result back
/// into the breaker.
#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Database reachable", body = ApiResponse<ReadinessData>),
        (status = 503, description = "Database down or breaker open", body = ApiResponse<ReadinessData>),
    ),
    tag = "Health"
)]
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<ApiResponse<ReadinessData>>) {
    let database = match state.breaker.enter() {
        Some(permit) => match sqlx::query("SELECT 1").execute(&state.pool).await {
            Ok(_) => {
                permit.success();
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "readiness ping failed");
                permit.failure();
                false
            }
        },
        None => false,
    };

    let breaker = state.breaker.state();
    let (code, status) = if database {
        (StatusCode::OK, "ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    };

    let mut body = ApiResponse::success(
        "Readiness",
        ReadinessData {
            status: status.to_string(),
            database,
            breaker,
        },
        Some(Meta::empty()),
    );
    body.success = database;
    (code, Json(body))
}
