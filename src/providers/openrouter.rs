use crate::config::ProviderConfig;
use crate::error::{MendError, Result};
use crate::providers::{CompletionRequest, CompletionResponse, Provider, ProviderInfo, Usage};
use async_trait::async_trait;
use reqwest::Client;

pub struct OpenRouterProvider {
    api_key: Option<String>,
    base_url: String,
    client: Client,
    authenticated: bool,
}

impl OpenRouterProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        let api_key = config.api_key.clone();
        let authenticated = api_key.is_some();
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://openrouter.ai/api/v1".to_string());

        Self {
            api_key,
            base_url,
            client: Client::new(),
            authenticated,
        }
    }

    pub fn static_info() -> ProviderInfo {
        ProviderInfo {
            name: "openrouter".to_string(),
            display_name: "OpenRouter".to_string(),
            default_model: "anthropic/claude-3.5-sonnet".to_string(),
            available_models: vec![
                "anthropic/claude-3.5-sonnet".to_string(),
                "openai/gpt-4o".to_string(),
                "openai/gpt-4o-mini".to_string(),
                "google/gemini-flash-1.5".to_string(),
                "deepseek/deepseek-chat".to_string(),
            ],
        }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    fn info(&self) -> ProviderInfo {
        Self::static_info()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            MendError::Authentication("OpenRouter API key not configured".to_string())
        })?;

        let body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "temperature": request.temperature.unwrap_or(0.2),
            "max_tokens": request.max_tokens,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MendError::ApiRequest(format!(
                "OpenRouter API error: {}",
                error_text
            )));
        }

        let data: serde_json::Value = response.json().await?;

        let content = data["choices"][0]["message"]["content"]
            .as_str()
            .unwrap_or("")
            .to_string();

        let finish_reason = data["choices"][0]["finish_reason"]
            .as_str()
            .map(|s| s.to_string());

        let usage = data.get("usage").map(|usage| Usage {
            prompt_tokens: usage["prompt_tokens"].as_u64().unwrap_or(0) as u32,
            completion_tokens: usage["completion_tokens"].as_u64().unwrap_or(0) as u32,
            total_tokens: usage["total_tokens"].as_u64().unwrap_or(0) as u32,
        });

        Ok(CompletionResponse {
            id: data["id"].as_str().unwrap_or("unknown").to_string(),
            model: request.model,
            content,
            finish_reason,
            usage,
        })
    }

    fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
