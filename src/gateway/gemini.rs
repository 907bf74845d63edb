use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use reqwest::{Client, StatusCode, header};
use serde_json::{Value, json};

use crate::{
    config::GatewayConfig,
    gateway::{
        CompletionGateway,
        credentials::CredentialProvider,
        error::{
            GatewayError, authentication_error, internal_error, network_error, protocol_error,
            rate_limited,
        },
    },
};

/// Blocking-round-trip client for the Gemini `generateContent` REST
/// endpoint. No retries and no streaming; a slow call is bounded only
/// by the configured request timeout.
pub struct GeminiClient {
    client: Client,
    config: GatewayConfig,
    credentials: Arc<dyn CredentialProvider>,
}

impl GeminiClient {
    pub fn new(
        config: GatewayConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .build()
            .map_err(|err| internal_error(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            config,
            credentials,
        })
    }

    fn request_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            self.config.model
        )
    }
}

#[async_trait]
impl CompletionGateway for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, GatewayError> {
        let key = self.credentials.resolve(&self.config.credential)?;

        let body = json!({
            "contents": [
                {
                    "parts": [
                        { "text": prompt }
                    ]
                }
            ]
        });

        let mut request = self
            .client
            .post(self.request_url())
            .timeout(Duration::from_millis(self.config.request_timeout_ms))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await.map_err(|err| {
            if err.is_timeout() {
                network_error(format!("gemini request timed out: {err}"))
            } else {
                network_error(format!("gemini request failed: {err}"))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            let message = format!("gemini returned {status}: {}", truncate(&detail, 300));
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => authentication_error(message),
                StatusCode::TOO_MANY_REQUESTS => rate_limited(message),
                _ => protocol_error(message),
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|err| protocol_error(format!("gemini response was not json: {err}")))?;
        extract_text(&payload)
            .ok_or_else(|| protocol_error("gemini response carried no candidate text"))
    }
}

fn extract_text(payload: &Value) -> Option<String> {
    let parts = payload
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect::<Vec<_>>()
        .join("");
    if text.is_empty() { None } else { Some(text) }
}

fn truncate(raw: &str, max_chars: usize) -> String {
    if raw.chars().count() <= max_chars {
        return raw.to_string();
    }
    raw.chars().take(max_chars).collect()
}
