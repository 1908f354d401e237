use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, RuntimeErr};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

use crate::response::{ApiResponse, Meta};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Service Unavailable")]
    ServiceUnavailable,

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("Database error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

/// Response extension set when a request failed on the database; the
/// breaker middleware reads it.
#[derive(Debug, Clone, Copy)]
pub struct DbFailure;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorData {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Errors that say the database is unreachable, as opposed to a query
    /// the database answered with an error.
    fn is_db_failure(&self) -> bool {
        match self {
            AppError::DbError(err) => connection_lost(err),
            AppError::OrmError(DbErr::ConnectionAcquire(_)) => true,
            AppError::OrmError(
                DbErr::Conn(RuntimeErr::SqlxError(err))
                | DbErr::Exec(RuntimeErr::SqlxError(err))
                | DbErr::Query(RuntimeErr::SqlxError(err)),
            ) => connection_lost(err),
            AppError::OrmError(DbErr::Conn(_)) => true,
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        // The underlying driver message stays in the logs only.
        match &self {
            AppError::DbError(err) => tracing::error!(error = %err, "database error"),
            AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
            AppError::Internal(err) => tracing::error!(error = ?err, "internal error"),
            _ => {}
        }

        let message = self.to_string();
        let body = ApiResponse {
            success: false,
            message: message.clone(),
            data: Some(ErrorData { error: message }),
            meta: Some(Meta::empty()),
        };

        let db_failure = self.is_db_failure();
        let mut response = (status, axum::Json(body)).into_response();
        if db_failure {
            response.extensions_mut().insert(DbFailure);
        }
        response
    }
}

fn connection_lost(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connection_errors_trip_the_breaker() {
        assert!(AppError::DbError(sqlx::Error::PoolTimedOut).is_db_failure());
        assert!(!AppError::DbError(sqlx::Error::RowNotFound).is_db_failure());
        assert!(!AppError::OrmError(DbErr::RecordNotFound("x".into())).is_db_failure());
        assert!(!AppError::NotFound.is_db_failure());
    }

    #[test]
    fn failures_carry_the_marker_extension() {
        let response = AppError::DbError(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.extensions().get::<DbFailure>().is_some());

        let response = AppError::BadRequest("nope".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.extensions().get::<DbFailure>().is_none());
    }
}
