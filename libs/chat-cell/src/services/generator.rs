use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use shared_config::AppConfig;

use crate::models::ChatError;

/// Client for the external generative-text collaborator. Its output is
/// narrative only: the deterministic recommendation set is computed
/// independently and never depends on what the generator says.
pub struct GenerativeClient {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GenerativeClient {
    pub fn new(config: &AppConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            http_client,
            base_url: config.generator_url.clone(),
            api_key: config.generator_api_key.clone(),
            model: config.generator_model.clone(),
        }
    }

    pub async fn generate(&self, prompt: &str) -> Result<String, ChatError> {
        debug!("Requesting narrative text from generator");

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );

        let body = json!({
            "contents": [{
                "parts": [{ "text": prompt }]
            }]
        });

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Generator request failed: {}", e);
                ChatError::GeneratorUnavailable(e.to_string())
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            warn!("Generator error ({}): {}", status, error_text);
            return Err(ChatError::GeneratorUnavailable(format!(
                "{}: {}",
                status, error_text
            )));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ChatError::GeneratorUnavailable(e.to_string()))?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(String::from)
            .ok_or_else(|| {
                ChatError::GeneratorUnavailable("Malformed generator response".to_string())
            })
    }
}
