use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, DbFailure},
    state::AppState,
};

/// Short-circuits with 503 while the database breaker is open and feeds the
/// outcome of every admitted request back into it.
pub async fn guard_database(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(permit) = state.breaker.enter() else {
        return AppError::ServiceUnavailable.into_response();
    };

    // dropping the permit mid-request settles an abandoned probe as a failure
    let response = next.run(request).await;
    if response.extensions().get::<DbFailure>().is_some() {
        permit.failure();
    } else {
        permit.success();
    }
    response
}
