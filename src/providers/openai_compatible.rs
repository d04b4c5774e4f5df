use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, error, info};

use crate::providers::ProviderError;
use crate::traits::ChatProvider;

/// Chat-completions client for any OpenAI-compatible endpoint (DeepSeek in
/// the default configuration). One request per `complete` call, no
/// streaming, no tool use.
pub struct OpenAiCompatibleProvider {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiCompatibleProvider {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        temperature: f32,
        max_tokens: u32,
        request_timeout: Duration,
    ) -> anyhow::Result<Self> {
        // The timeout is load-bearing: a hung provider call would otherwise
        // stall the one reply it belongs to indefinitely.
        let client = Client::builder().timeout(request_timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            temperature,
            max_tokens,
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatibleProvider {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> anyhow::Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        });

        let url = format!("{}/chat/completions", self.base_url);
        info!(model = %self.model, url = %url, "Calling chat completion API");

        let resp = match self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                error!("HTTP request failed: {}", e);
                return Err(ProviderError::network(&e).into());
            }
        };

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            error!(status = %status, "Provider API error: {}", text);
            return Err(ProviderError::from_status(status.as_u16(), &text).into());
        }

        debug!(bytes = text.len(), "Provider response received");

        let data: Value = serde_json::from_str(&text)?;
        let content = data["choices"]
            .get(0)
            .and_then(|c| c["message"]["content"].as_str())
            .ok_or_else(|| anyhow::anyhow!("No message content in response"))?;

        Ok(content.to_string())
    }
}
