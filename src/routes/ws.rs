use std::time::Duration;

use axum::{
    Router,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::Response,
    routing::get,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tokio::time::interval;

use crate::{
    error::AppResult,
    middleware::auth::{AuthUser, decode_token},
    notify::OrderEvent,
    state::AppState,
};

const PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
pub struct WsAuth {
    pub token: String,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/orders", get(order_events))
}

/// Browsers cannot set headers on a WebSocket handshake, so the bearer token
/// travels in the query string.
#[utoipa::path(
    get,
    path = "/api/ws/orders",
    params(("token" = String, Query, description = "JWT issued by /api/auth/login")),
    responses(
        (status = 101, description = "Switching to a stream of order status events", body = OrderEvent),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "Orders"
)]
pub async fn order_events(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Query(auth): Query<WsAuth>,
) -> AppResult<Response> {
    let user = decode_token(&state.config.jwt_secret, auth.token.trim())?;
    Ok(ws.on_upgrade(move |socket| stream_events(socket, state, user)))
}

async fn stream_events(socket: WebSocket, state: AppState, user: AuthUser) {
    let (mut sender, mut receiver) = socket.split();
    let mut events = state.notifier.subscribe(user.user_id);
    let mut ping = interval(PING_INTERVAL);
    tracing::info!(user_id = %user.user_id, "order stream opened");

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let Ok(json) = serde_json::to_string(&event) else { continue };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(user_id = %user.user_id, skipped, "order stream lagged");
                }
                Err(RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    tracing::debug!(user_id = %user.user_id, error = %err, "order stream error");
                    break;
                }
            },
            _ = ping.tick() => {
                if sender.send(Message::Ping(Default::default())).await.is_err() {
                    break;
                }
            }
        }
    }

    drop(events);
    state.notifier.release(user.user_id);
    tracing::info!(user_id = %user.user_id, "order stream closed");
}
