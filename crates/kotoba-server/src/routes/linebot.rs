//! LINE Bot Routes
//!
//! - POST /linebot (alias /linebot/webhook) - webhook ingress, public
//! - POST /linebot/push - push a text message
//! - POST /linebot/push/weather - push a weather card

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};

use kotoba_integration_line::SIGNATURE_HEADER;

use super::error_response;
use crate::models::{PushResponse, PushTextRequest, PushWeatherRequest, WebhookResponse};
use crate::AppState;

/// Receive a LINE webhook delivery and answer each message event
#[utoipa::path(
    post,
    path = "/linebot",
    request_body(content = Object, description = "LINE webhook body", content_type = "application/json"),
    params(
        ("x-line-signature" = Option<String>, Header, description = "base64 HMAC-SHA256 of the body")
    ),
    responses(
        (status = 200, description = "Replies sent", body = WebhookResponse),
        (status = 400, description = "Malformed delivery"),
        (status = 401, description = "Signature mismatch, or LINE rejected the reply"),
        (status = 502, description = "LINE unreachable")
    ),
    tag = "LineBot"
)]
pub async fn receive_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<WebhookResponse>, (StatusCode, String)> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let replies = state
        .conversation
        .handle_delivery(&body, signature)
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Webhook delivery failed");
            error_response(e)
        })?;

    Ok(Json(WebhookResponse::new(replies)))
}

/// Push a text message to a user
#[utoipa::path(
    post,
    path = "/linebot/push",
    request_body = PushTextRequest,
    responses(
        (status = 200, description = "Message pushed", body = PushResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "LineBot"
)]
pub async fn push_text(
    State(state): State<AppState>,
    Json(payload): Json<PushTextRequest>,
) -> Result<Json<PushResponse>, (StatusCode, String)> {
    let envelope = state
        .conversation
        .push_text(&payload.to, &payload.text)
        .await
        .map_err(error_response)?;

    Ok(Json(PushResponse::from_domain(envelope)))
}

/// Push the weather for a city to a user
#[utoipa::path(
    post,
    path = "/linebot/push/weather",
    request_body = PushWeatherRequest,
    responses(
        (status = 200, description = "Weather pushed", body = PushResponse),
        (status = 400, description = "Invalid request"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "LineBot"
)]
pub async fn push_weather(
    State(state): State<AppState>,
    Json(payload): Json<PushWeatherRequest>,
) -> Result<Json<PushResponse>, (StatusCode, String)> {
    let envelope = state
        .conversation
        .push_weather(&payload.to, &payload.city)
        .await
        .map_err(error_response)?;

    Ok(Json(PushResponse::from_domain(envelope)))
}

/// Webhook ingress (no API key; LINE authenticates with the signature)
pub fn webhook_router() -> Router<AppState> {
    Router::new()
        .route("/linebot", post(receive_webhook))
        .route("/linebot/webhook", post(receive_webhook))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/linebot/push", post(push_text))
        .route("/linebot/push/weather", post(push_weather))
}
