use crate::config::ProviderConfig;
use crate::error::{MendError, Result};
use crate::providers::{
    CompletionRequest, CompletionResponse, Message, Provider, ProviderInfo, Role, Usage,
};
use async_trait::async_trait;
use reqwest::Client;

pub struct AnthropicProvider {
    api_key: Option<String>,
    base_url: String,
    version: String,
    client: Client,
}

impl AnthropicProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            api_key: config.api_key.clone(),
            base_url: config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.anthropic.com".to_string()),
            version: "2023-06-01".to_string(),
            client: Client::new(),
        }
    }

    pub fn static_info() -> ProviderInfo {
        ProviderInfo {
            name: "anthropic".to_string(),
            display_name: "Anthropic".to_string(),
            default_model: "claude-3-5-sonnet-20241022".to_string(),
            available_models: vec![
                "claude-3-5-sonnet-20241022".to_string(),
                "claude-3-5-haiku-20241022".to_string(),
                "claude-3-opus-20240229".to_string(),
            ],
        }
    }

    fn convert_messages(&self, messages: &[Message]) -> Vec<serde_json::Value> {
        messages
            .iter()
            .filter(|m| m.role != Role::System)
            .map(|msg| {
                serde_json::json!({
                    "role": match msg.role {
                        Role::Assistant => "assistant",
                        _ => "user",
                    },
                    "content": msg.content
                })
            })
            .collect()
    }

    fn extract_system_message(&self, messages: &[Message]) -> Option<String> {
        messages
            .iter()
            .find(|m| m.role == Role::System)
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl Provider for AnthropicProvider {
    fn info(&self) -> ProviderInfo {
        Self::static_info()
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let api_key = self.api_key.as_ref().ok_or_else(|| {
            MendError::Authentication("Anthropic API key not configured".to_string())
        })?;

        let system_message = self.extract_system_message(&request.messages);
        let messages = self.convert_messages(&request.messages);

        let mut body = serde_json::json!({
            "model": request.model,
            "messages": messages,
            "max_tokens": request.max_tokens.unwrap_or(4096),
            "temperature": request.temperature.unwrap_or(0.2),
        });

        if let Some(system) = system_message {
            body["system"] = serde_json::json!(system);
        }

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("Content-Type", "application/json")
            .header("x-api-key", api_key)
            .header("anthropic-version", &self.version)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(MendError::ApiRequest(format!(
                "Anthropic API error: {}",
                error_text
            )));
        }

        let data: serde_json::Value = response.json().await?;

        let content = data["content"][0]["text"].as_str().unwrap_or("").to_string();

        let finish_reason = data["stop_reason"].as_str().map(|s| s.to_string());

        let usage = data.get("usage").map(|usage| {
            let prompt = usage["input_tokens"].as_u64().unwrap_or(0) as u32;
            let completion = usage["output_tokens"].as_u64().unwrap_or(0) as u32;
            Usage {
                prompt_tokens: prompt,
                completion_tokens: completion,
                total_tokens: prompt + completion,
            }
        });

        Ok(CompletionResponse {
            id: data["id"].as_str().unwrap_or("unknown").to_string(),
            model: data["model"].as_str().unwrap_or(&request.model).to_string(),
            content,
            finish_reason,
            usage,
        })
    }

    fn is_authenticated(&self) -> bool {
        self.api_key.is_some()
    }
}
