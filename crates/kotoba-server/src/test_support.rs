//! Shared fixtures for router and adapter tests

use std::collections::HashMap;

use serde_json::json;

use crate::config::AppConfig;
use crate::AppState;

/// F-C0032-001 answer with two forecast windows for `city`
pub fn cwb_sample(city: &str) -> serde_json::Value {
    let slot = |start: &str, end: &str, name: &str| {
        json!({
            "startTime": start,
            "endTime": end,
            "parameter": {"parameterName": name}
        })
    };
    let element = |name: &str, values: [&str; 2]| {
        json!({
            "elementName": name,
            "time": [
                slot("2024-06-01 06:00:00", "2024-06-01 18:00:00", values[0]),
                slot("2024-06-01 18:00:00", "2024-06-02 06:00:00", values[1]),
            ]
        })
    };

    json!({
        "success": "true",
        "result": {"resource_id": "F-C0032-001"},
        "records": {
            "datasetDescription": "三十六小時天氣預報",
            "location": [{
                "locationName": city,
                "weatherElement": [
                    element("Wx", ["多雲時晴", "晴時多雲"]),
                    element("PoP", ["10", "30"]),
                    element("MinT", ["26", "25"]),
                    element("CI", ["舒適至悶熱", "舒適"]),
                    element("MaxT", ["33", "30"]),
                ]
            }]
        }
    })
}

/// Settings for a test state whose LINE and CWB calls go to `base_url`
pub struct TestSettings<'a> {
    pub base_url: &'a str,
    pub channel_secret: Option<&'a str>,
    pub api_key: Option<&'a str>,
}

impl<'a> TestSettings<'a> {
    pub fn new(base_url: &'a str) -> Self {
        Self {
            base_url,
            channel_secret: None,
            api_key: None,
        }
    }

    pub fn state(&self) -> AppState {
        let mut secrets = HashMap::from([
            ("LINE_CHANNEL_ACCESS_TOKEN", "test-token".to_string()),
            ("LINE_API_BASE_URL", self.base_url.to_string()),
            ("CWB_API_KEY", "cwb-key".to_string()),
            ("CWB_API_BASE_URL", self.base_url.to_string()),
            ("HTTP_TIMEOUT_SECS", "5".to_string()),
        ]);
        if let Some(secret) = self.channel_secret {
            secrets.insert("LINE_CHANNEL_SECRET", secret.to_string());
        }
        if let Some(key) = self.api_key {
            secrets.insert("KOTOBA_API_KEY", key.to_string());
        }

        let config = AppConfig::from_lookup(|key| secrets.get(key).cloned()).unwrap();
        AppState::from_config(&config).unwrap()
    }
}
