use axum::{extract::State, middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use kotoba::StrategyRegistry;
use kotoba_integration_line::LineIntegration;

mod adapters;
mod application;
mod auth;
mod config;
mod models;
mod routes;
#[cfg(test)]
mod test_support;

use adapters::{BroadcastNotificationHub, CwbWeatherClient};
use application::ConversationService;
use config::AppConfig;

/// Type alias for the conversation service with concrete adapters
pub type AppConversationService = ConversationService<LineIntegration, CwbWeatherClient>;

/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub conversation: Arc<AppConversationService>,
    pub notifications: Arc<BroadcastNotificationHub>,
    /// Bearer key for the admin routes
    pub api_key: Option<Arc<str>>,
}

impl AppState {
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let line = Arc::new(LineIntegration::new(config.line.clone())?);
        let weather = Arc::new(CwbWeatherClient::new(config.cwb.clone())?);
        if !weather.is_configured() {
            tracing::warn!("⚠️  No CWB_API_KEY set - weather lookups will fall back to text");
        }
        let conversation = Arc::new(ConversationService::new(
            line,
            weather,
            StrategyRegistry::with_defaults(),
        ));

        Ok(Self {
            conversation,
            notifications: Arc::new(BroadcastNotificationHub::new(config.notification_capacity)),
            api_key: config.api_key.as_deref().map(Arc::from),
        })
    }
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
    signature_verification: bool,
    strategies: Vec<String>,
}

async fn health_check(State(state): State<AppState>) -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Kotoba API is running - listening for words".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        signature_verification: state.conversation.platform().verifies_signatures(),
        strategies: state
            .conversation
            .strategies()
            .keys()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

fn build_router(state: AppState) -> Router {
    // Protected routes (require authentication)
    let protected_routes = Router::new()
        .merge(routes::linebot::router())
        .merge(routes::weather::router())
        .merge(routes::notification::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    // OpenAPI documentation
    let openapi = routes::swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(routes::linebot::webhook_router())
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[shuttle_runtime::main]
async fn main(
    #[shuttle_runtime::Secrets] secrets: shuttle_runtime::SecretStore,
) -> shuttle_axum::ShuttleAxum {
    tracing::info!("💬 Kotoba API initializing...");

    let config = AppConfig::from_lookup(|key| secrets.get(key))?;

    if config.api_key.is_some() {
        tracing::info!("🔐 API key authentication enabled");
    } else {
        tracing::warn!("⚠️  No KOTOBA_API_KEY set - authentication disabled");
    }

    if config.line.channel_secret.is_some() {
        tracing::info!("✍️  LINE signature verification enabled");
    } else {
        tracing::warn!("⚠️  No LINE_CHANNEL_SECRET set - webhook signatures not verified");
    }

    let state = AppState::from_config(&config)?;
    tracing::info!(
        strategies = state.conversation.strategies().len(),
        capacity = config.notification_capacity,
        "🔔 Conversation and notification services initialized"
    );

    let router = build_router(state);

    tracing::info!("📚 Swagger UI: /swagger-ui");
    tracing::info!("✅ Kotoba API ready - POST /linebot");

    Ok(router.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use kotoba::FALLBACK_REPLY;
    use kotoba_integration_line::{sign, SIGNATURE_HEADER};
    use mockito::Matcher;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::test_support::{cwb_sample, TestSettings};

    const REPLY_PATH: &str = "/v2/bot/message/reply";
    const PUSH_PATH: &str = "/v2/bot/message/push";
    const CWB_PATH: &str = "/v1/rest/datastore/F-C0032-001";

    fn delivery(text: &str) -> String {
        json!({
            "destination": "Ubot",
            "events": [{
                "type": "message",
                "timestamp": 1462629479859u64,
                "source": {"type": "user", "userId": "U4af4980629"},
                "replyToken": "R1",
                "message": {"id": "1", "type": "text", "text": text}
            }]
        })
        .to_string()
    }

    async fn send(router: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn webhook_request(body: String, signature: Option<String>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/linebot")
            .header("content-type", "application/json");
        if let Some(signature) = signature {
            builder = builder.header(SIGNATURE_HEADER, signature);
        }
        builder.body(Body::from(body)).unwrap()
    }

    #[tokio::test]
    async fn test_weather_message_replies_with_card() {
        let mut server = mockito::Server::new_async().await;
        let lookup = server
            .mock("GET", CWB_PATH)
            .match_query(Matcher::UrlEncoded("locationName".into(), "臺北市".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(cwb_sample("臺北市").to_string())
            .create_async()
            .await;
        let reply = server
            .mock("POST", REPLY_PATH)
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::PartialJson(json!({"replyToken": "R1"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let (status, body) = send(router, webhook_request(delivery("台北天氣"), None)).await;

        assert_eq!(status, StatusCode::OK);
        lookup.assert_async().await;
        reply.assert_async().await;

        let body: Value = serde_json::from_str(&body).unwrap();
        let replies = body["replies"].as_array().unwrap();
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["replyToken"], "R1");
        assert_eq!(replies[0]["messages"].as_array().unwrap().len(), 1);
        assert_flex_card(&replies[0]["messages"][0]);
    }

    fn assert_flex_card(message: &Value) {
        assert_eq!(message["type"], "flex");
        assert_eq!(message["contents"]["type"], "bubble");
        assert_eq!(message["contents"]["header"]["type"], "box");
        assert_eq!(message["contents"]["body"]["type"], "box");

        fn walk(node: &Value) {
            match node["type"].as_str() {
                Some("box") => node["contents"].as_array().unwrap().iter().for_each(walk),
                Some("text") => assert!(!node["text"].as_str().unwrap().trim().is_empty()),
                Some("separator") => {}
                other => panic!("Unexpected flex node type: {:?}", other),
            }
        }
        walk(&message["contents"]["header"]);
        walk(&message["contents"]["body"]);
    }

    #[tokio::test]
    async fn test_minimal_delivery_replies_with_card() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", CWB_PATH)
            .match_query(Matcher::UrlEncoded("locationName".into(), "臺北市".into()))
            .with_status(200)
            .with_body(cwb_sample("臺北市").to_string())
            .create_async()
            .await;
        let reply = server
            .mock("POST", REPLY_PATH)
            .match_body(Matcher::PartialJson(json!({"replyToken": "R1"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let body = r#"{"events":[{"type":"message","replyToken":"R1","message":{"text":"台北天氣"}}]}"#;
        let router = build_router(TestSettings::new(&server.url()).state());
        let (status, response) = send(router, webhook_request(body.to_string(), None)).await;

        assert_eq!(status, StatusCode::OK);
        reply.assert_async().await;

        let response: Value = serde_json::from_str(&response).unwrap();
        assert_flex_card(&response["replies"][0]["messages"][0]);
    }

    #[tokio::test]
    async fn test_strategy_keyword_replies_with_fixed_text() {
        let mut server = mockito::Server::new_async().await;
        let reply = server
            .mock("POST", REPLY_PATH)
            .match_body(Matcher::Json(json!({
                "replyToken": "R1",
                "messages": [{"type": "text", "text": "回應你的內容"}]
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let (status, _) = send(router, webhook_request(delivery("記事本"), None)).await;

        assert_eq!(status, StatusCode::OK);
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn test_unknown_text_replies_with_fallback() {
        let mut server = mockito::Server::new_async().await;
        let reply = server
            .mock("POST", REPLY_PATH)
            .match_body(Matcher::Json(json!({
                "replyToken": "R1",
                "messages": [{"type": "text", "text": FALLBACK_REPLY}]
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let (status, body) = send(router, webhook_request(delivery("hello"), None)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(FALLBACK_REPLY));
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn test_reply_rejection_is_passed_through() {
        let mut server = mockito::Server::new_async().await;
        let _reply = server
            .mock("POST", REPLY_PATH)
            .with_status(401)
            .with_body(r#"{"message":"Authentication failed"}"#)
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let (status, body) = send(router, webhook_request(delivery("hello"), None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_signature_is_checked_when_secret_set() {
        let mut server = mockito::Server::new_async().await;
        let reply = server
            .mock("POST", REPLY_PATH)
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let url = server.url();
        let settings = TestSettings {
            channel_secret: Some("channel-secret"),
            ..TestSettings::new(&url)
        };
        let body = delivery("hello");

        let (status, _) = send(
            build_router(settings.state()),
            webhook_request(body.clone(), Some(sign("other-secret", body.as_bytes()))),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(build_router(settings.state()), webhook_request(body.clone(), None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let signature = sign("channel-secret", body.as_bytes());
        let (status, _) = send(
            build_router(settings.state()),
            webhook_request(body, Some(signature)),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        reply.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_delivery_is_bad_request() {
        let server = mockito::Server::new_async().await;
        let router = build_router(TestSettings::new(&server.url()).state());
        let (status, _) = send(router, webhook_request("not json".to_string(), None)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_verification_ping_has_no_replies() {
        let server = mockito::Server::new_async().await;
        let router = build_router(TestSettings::new(&server.url()).state());
        let request = Request::builder()
            .method("POST")
            .uri("/linebot/webhook")
            .body(Body::from(r#"{"destination":"Ubot","events":[]}"#))
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap(), json!({"replies": []}));
    }

    #[tokio::test]
    async fn test_admin_routes_require_api_key() {
        let mut server = mockito::Server::new_async().await;
        let push = server
            .mock("POST", PUSH_PATH)
            .match_body(Matcher::Json(json!({
                "to": "U1",
                "messages": [{"type": "text", "text": "早安"}]
            })))
            .with_status(200)
            .with_body("{}")
            .expect(1)
            .create_async()
            .await;

        let url = server.url();
        let settings = TestSettings {
            api_key: Some("admin-key"),
            ..TestSettings::new(&url)
        };
        let request = |auth: Option<&str>| {
            let mut builder = Request::builder()
                .method("POST")
                .uri("/linebot/push")
                .header("content-type", "application/json");
            if let Some(auth) = auth {
                builder = builder.header("authorization", auth);
            }
            builder
                .body(Body::from(json!({"to": "U1", "text": "早安"}).to_string()))
                .unwrap()
        };

        let (status, _) = send(build_router(settings.state()), request(None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(build_router(settings.state()), request(Some("Bearer wrong"))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, body) = send(
            build_router(settings.state()),
            request(Some("Bearer admin-key")),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""kinds":["text"]"#));
        push.assert_async().await;
    }

    #[tokio::test]
    async fn test_push_weather_sends_card() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", CWB_PATH)
            .match_query(Matcher::UrlEncoded("locationName".into(), "高雄市".into()))
            .with_status(200)
            .with_body(cwb_sample("高雄市").to_string())
            .create_async()
            .await;
        let push = server
            .mock("POST", PUSH_PATH)
            .match_body(Matcher::PartialJson(json!({"to": "U1"})))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let request = Request::builder()
            .method("POST")
            .uri("/linebot/push/weather")
            .header("content-type", "application/json")
            .body(Body::from(json!({"to": "U1", "city": "kaohsiung"}).to_string()))
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#""kinds":["flex"]"#));
        push.assert_async().await;
    }

    #[tokio::test]
    async fn test_weather_route() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", CWB_PATH)
            .match_query(Matcher::UrlEncoded("locationName".into(), "臺北市".into()))
            .with_status(200)
            .with_body(cwb_sample("臺北市").to_string())
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let request = Request::builder()
            .uri("/weather/taipei")
            .body(Body::empty())
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["city"], "臺北市");
        assert_eq!(body["periods"][0]["temperature"], "26°C ~ 33°C");
        assert_eq!(body["periods"][1]["rain_probability"], 30);
    }

    #[tokio::test]
    async fn test_weather_route_lookup_failure_is_bad_gateway() {
        let mut server = mockito::Server::new_async().await;
        let _lookup = server
            .mock("GET", CWB_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let router = build_router(TestSettings::new(&server.url()).state());
        let request = Request::builder()
            .uri("/weather/taipei")
            .body(Body::empty())
            .unwrap();

        let (status, _) = send(router, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_notification_without_subscribers() {
        let server = mockito::Server::new_async().await;
        let router = build_router(TestSettings::new(&server.url()).state());
        let request = Request::builder()
            .method("POST")
            .uri("/notification/users/U1")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"訂單已出貨"}"#))
            .unwrap();

        let (status, body) = send(router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["delivered"], 0);
    }

    #[tokio::test]
    async fn test_notification_reaches_subscriber() {
        let server = mockito::Server::new_async().await;
        let state = TestSettings::new(&server.url()).state();
        let mut receiver = state.notifications.subscribe();

        let request = Request::builder()
            .method("POST")
            .uri("/notification")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"message":"stores updated","data":{"id":7}}"#))
            .unwrap();

        let (status, body) = send(build_router(state), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["delivered"], 1);

        let received = receiver.recv().await.unwrap();
        assert_eq!(received.message, "stores updated");
        assert_eq!(received.data, json!({"id": 7}));
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = mockito::Server::new_async().await;
        let url = server.url();
        let settings = TestSettings {
            api_key: Some("admin-key"),
            ..TestSettings::new(&url)
        };
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let (status, body) = send(build_router(settings.state()), request).await;
        assert_eq!(status, StatusCode::OK);

        let body: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["signature_verification"], false);
        assert_eq!(body["strategies"], json!(["精打細算", "記事本"]));
    }
}
