//! Notification Routes
//!
//! Publish to the in-process hub and stream it back out over SSE.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    routing::{get, post},
    Json, Router,
};
use std::convert::Infallible;
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use kotoba::{Notification, NotificationHub};

use super::error_response;
use crate::models::{NotifyRequest, NotifyResponse, StreamQuery};
use crate::AppState;

/// Broadcast a notification to every subscriber
#[utoipa::path(
    post,
    path = "/notification",
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Notification published", body = NotifyResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notification"
)]
pub async fn broadcast(
    State(state): State<AppState>,
    Json(payload): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, (StatusCode, String)> {
    publish(&state, Notification::database_change(payload.message, payload.data)).await
}

/// Send a notification to one user's subscribers
#[utoipa::path(
    post,
    path = "/notification/users/{user_id}",
    params(
        ("user_id" = String, Path, description = "Target user ID")
    ),
    request_body = NotifyRequest,
    responses(
        (status = 200, description = "Notification published", body = NotifyResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notification"
)]
pub async fn notify_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(payload): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, (StatusCode, String)> {
    publish(
        &state,
        Notification::for_user(user_id, payload.message, payload.data),
    )
    .await
}

async fn publish(
    state: &AppState,
    notification: Notification,
) -> Result<Json<NotifyResponse>, (StatusCode, String)> {
    let id = notification.id;
    let delivered = state
        .notifications
        .publish(notification)
        .await
        .map_err(error_response)?;

    Ok(Json(NotifyResponse { id, delivered }))
}

/// Server-sent event stream of notifications
#[utoipa::path(
    get,
    path = "/notification/stream",
    params(StreamQuery),
    responses(
        (status = 200, description = "text/event-stream of notifications"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Notification"
)]
pub async fn stream(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let user_id = query.user_id;
    let receiver = state.notifications.subscribe();
    tracing::info!(
        user_id = ?user_id,
        subscribers = state.notifications.subscriber_count(),
        "Notification subscriber connected"
    );

    let events = BroadcastStream::new(receiver).filter_map(move |item| {
        match item {
            Ok(notification) if notification.is_visible_to(user_id.as_deref()) => Event::default()
                .event(notification.event.to_string())
                .id(notification.id.to_string())
                .json_data(&notification)
                .ok()
                .map(Ok),
            Ok(_) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Notification subscriber lagged");
                None
            }
        }
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notification", post(broadcast))
        .route("/notification/users/:user_id", post(notify_user))
        .route("/notification/stream", get(stream))
}
