use axum::{
    Json, Router,
    http::{StatusCode, Uri},
    middleware::from_fn_with_state,
    routing::get,
};

use crate::{
    error::ErrorData,
    middleware::breaker::guard_database,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub mod admin;
pub mod admins;
pub mod auth;
pub mod cart;
pub mod customers;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod settings;
pub mod stats;
pub mod ws;

// Build the API router without binding state; it will be provided at the top level.
// Every database-backed route sits behind the circuit breaker.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/catalog", products::catalog_router())
        .nest("/auth", auth::router())
        .nest("/otp", auth::otp_router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
        .nest("/ws", ws::router())
        .layer(from_fn_with_state(state, guard_database))
}

/// Full application without the outer tower layers.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness))
        .nest("/api", create_api_router(state.clone()))
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> (StatusCode, Json<ApiResponse<ErrorData>>) {
    let body = ApiResponse {
        success: false,
        message: "Not Found".to_string(),
        data: Some(ErrorData {
            error: format!("no route for {}", uri.path()),
        }),
        meta: Some(Meta::empty()),
    };
    (StatusCode::NOT_FOUND, Json(body))
}
