//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    ForecastPeriodResponse, ForecastResponse, NotifyRequest, NotifyResponse, PushResponse,
    PushTextRequest, PushWeatherRequest, WebhookResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // LINE endpoints
        super::linebot::receive_webhook,
        super::linebot::push_text,
        super::linebot::push_weather,
        // Weather endpoints
        super::weather::get_forecast,
        // Notification endpoints
        super::notification::broadcast,
        super::notification::notify_user,
        super::notification::stream,
    ),
    info(
        title = "Kotoba API",
        version = "0.2.0",
        description = "言葉 (Kotoba) - LINE chat-bot backend\n\nClassifies incoming messages, answers weather questions and keyword commands.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "LineBot", description = "LINE webhook ingress and push messages"),
        (name = "Weather", description = "Weather - Forecasts from the CWB open data API"),
        (name = "Notification", description = "Notification - Realtime hub"),
    ),
    components(
        schemas(
            // LINE
            WebhookResponse,
            PushTextRequest,
            PushWeatherRequest,
            PushResponse,
            // Weather
            ForecastResponse,
            ForecastPeriodResponse,
            // Notification
            NotifyRequest,
            NotifyResponse,
        )
    ),
)]
pub struct ApiDoc;
