//! Kotoba API Client

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use kotoba_integration_line::{sign, SIGNATURE_HEADER};

const TIMEOUT_SECS: u64 = 30;

/// API Client for Kotoba
pub struct KotobaClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request / Response Types
// ============================================

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub signature_verification: bool,
    #[serde(default)]
    pub strategies: Vec<String>,
}

#[derive(Debug, Serialize)]
struct PushTextRequest<'a> {
    to: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct PushWeatherRequest<'a> {
    to: &'a str,
    city: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct PushResponse {
    pub to: String,
    pub kinds: Vec<String>,
}

#[derive(Debug, Serialize)]
struct NotifyRequest<'a> {
    message: &'a str,
    data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct NotifyResponse {
    pub id: Uuid,
    pub delivered: usize,
}

#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub city: String,
    pub periods: Vec<ForecastPeriodResponse>,
}

#[derive(Debug, Deserialize)]
pub struct ForecastPeriodResponse {
    pub start_time: String,
    pub end_time: String,
    pub description: String,
    pub rain_probability: Option<u8>,
    pub comfort: Option<String>,
    pub temperature: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookResponse {
    pub replies: Vec<serde_json::Value>,
}

impl KotobaClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        })
    }

    /// Server health (public endpoint)
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await.context("Failed to connect to Kotoba API")?;
        parse(resp).await
    }

    /// Push a text message
    pub async fn push_text(&self, to: &str, text: &str) -> Result<PushResponse> {
        let url = format!("{}/linebot/push", self.base_url);
        let req = self.client.post(&url).json(&PushTextRequest { to, text });
        parse(self.send(req).await?).await
    }

    /// Push the weather for a city
    pub async fn push_weather(&self, to: &str, city: &str) -> Result<PushResponse> {
        let url = format!("{}/linebot/push/weather", self.base_url);
        let req = self.client.post(&url).json(&PushWeatherRequest { to, city });
        parse(self.send(req).await?).await
    }

    /// Publish a notification, to one user or to everyone
    pub async fn notify(
        &self,
        user_id: Option<&str>,
        message: &str,
        data: serde_json::Value,
    ) -> Result<NotifyResponse> {
        let url = match user_id {
            Some(user) => format!(
                "{}/notification/users/{}",
                self.base_url,
                urlencoding::encode(user)
            ),
            None => format!("{}/notification", self.base_url),
        };
        let req = self.client.post(&url).json(&NotifyRequest { message, data });
        parse(self.send(req).await?).await
    }

    /// Look up a forecast
    pub async fn weather(&self, city: &str) -> Result<ForecastResponse> {
        let url = format!("{}/weather/{}", self.base_url, urlencoding::encode(city));
        parse(self.send(self.client.get(&url)).await?).await
    }

    /// Post a fake LINE delivery with one text message to the webhook
    ///
    /// With a channel secret the body is signed the way LINE signs it.
    pub async fn simulate(
        &self,
        text: &str,
        user_id: &str,
        channel_secret: Option<&str>,
    ) -> Result<WebhookResponse> {
        let body = simulated_delivery(text, user_id).to_string();
        let url = format!("{}/linebot", self.base_url);

        let mut req = self
            .client
            .post(&url)
            .header("content-type", "application/json");
        if let Some(secret) = channel_secret {
            req = req.header(SIGNATURE_HEADER, sign(secret, body.as_bytes()));
        }

        let resp = req
            .body(body)
            .send()
            .await
            .context("Failed to connect to Kotoba API")?;
        parse(resp).await
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response> {
        let req = match &self.api_key {
            Some(key) => req.header("Authorization", format!("Bearer {}", key)),
            None => req,
        };
        req.send().await.context("Failed to connect to Kotoba API")
    }
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("API error ({}): {}", status, body);
    }

    resp.json().await.context("Failed to parse response")
}

fn simulated_delivery(text: &str, user_id: &str) -> serde_json::Value {
    let event_id = Uuid::new_v4().simple().to_string();
    serde_json::json!({
        "destination": "kotoba-cli",
        "events": [{
            "type": "message",
            "mode": "active",
            "timestamp": chrono::Utc::now().timestamp_millis(),
            "source": {"type": "user", "userId": user_id},
            "webhookEventId": event_id,
            "deliveryContext": {"isRedelivery": false},
            "replyToken": format!("sim-{}", event_id),
            "message": {"id": event_id, "type": "text", "text": text}
        }]
    })
}
