use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::types::ApiError;
use crate::config;

#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Option<String>,
}

impl ApiClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: None,
        }
    }

    pub fn new_with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: Some(base_url.into()),
        }
    }

    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }

    pub(crate) async fn resolved_base_url(&self) -> String {
        if let Some(base) = &self.base_url {
            base.clone()
        } else {
            config::await_api_base_url().await
        }
    }

    /// Executes a request and normalizes the outcome into a status plus a
    /// JSON body. In host test builds, requests whose URL matches a
    /// registered mock responder never touch the network.
    pub(crate) async fn dispatch(&self, builder: RequestBuilder) -> Result<HttpPayload, ApiError> {
        let request = builder
            .build()
            .map_err(|e| ApiError::request_failed(format!("Request build failed: {}", e)))?;

        #[cfg(all(test, not(target_arch = "wasm32")))]
        if let Some(responder) = test_hooks::lookup(&request) {
            let mock = responder.respond(&request)?;
            return Ok(HttpPayload {
                status: mock.status,
                body: mock.body,
            });
        }

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|e| ApiError::request_failed(format!("Request failed: {}", e)))?;
        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(HttpPayload { status, body })
    }
}

impl Default for ApiClient {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct HttpPayload {
    pub status: u16,
    pub body: Value,
}

/// Decodes a normalized response: success bodies parse into `T`, error
/// bodies parse into [`ApiError`] when the server sent one, and 5xx always
/// maps to a transient error so the retry path engages.
pub(crate) fn decode<T: DeserializeOwned>(payload: HttpPayload) -> Result<T, ApiError> {
    if (200..300).contains(&payload.status) {
        return serde_json::from_value(payload.body)
            .map_err(|e| ApiError::request_failed(format!("Failed to parse response: {}", e)));
    }
    if payload.status >= 500 {
        let message = payload
            .body
            .get("error")
            .and_then(|value| value.as_str())
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| format!("server returned {}", payload.status));
        return Err(ApiError::server(message));
    }
    Err(serde_json::from_value::<ApiError>(payload.body)
        .unwrap_or_else(|_| ApiError::unknown(format!("request failed with {}", payload.status))))
}


#[cfg(all(test, not(target_arch = "wasm32")))]
pub use test_hooks::{register_mock, MockResponse, TestResponder};
