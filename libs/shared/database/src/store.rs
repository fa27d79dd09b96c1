use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Failure classes of the document store, as seen by the cells.
#[derive(Debug)]
pub enum StoreError {
    /// Request never completed (connect failure, timeout) or the store
    /// answered with a 5xx. Retryable later, fatal for this operation.
    Unavailable(String),
    /// The store answered but the requested record does not exist.
    NotFound(String),
    /// The store rejected the request (4xx other than 404).
    Rejected(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Unavailable(msg) => write!(f, "Store unavailable: {}", msg),
            StoreError::NotFound(msg) => write!(f, "Resource not found: {}", msg),
            StoreError::Rejected(msg) => write!(f, "Store rejected request: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

/// Thin REST client for the external document store. Every external call
/// in the system goes through here with a bounded timeout.
pub struct StoreClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl StoreClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn get_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_with_headers(method, path, body, None).await
    }

    pub async fn request_with_headers<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        extra_headers: Option<HeaderMap>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making store request to {}", url);

        let mut headers = self.get_headers();
        if let Some(extra) = extra_headers {
            headers.extend(extra);
        }

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                s if s.is_server_error() => StoreError::Unavailable(error_text),
                _ => StoreError::Rejected(error_text),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Rejected(format!("Malformed store response: {}", e)))
    }

    pub fn get_base_url(&self) -> &str {
        &self.base_url
    }
}
