use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub mod anthropic;
pub mod openrouter;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub model: String,
    pub content: String,
    pub finish_reason: Option<String>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Clone)]
pub struct ProviderInfo {
    pub name: String,
    pub display_name: String,
    pub default_model: String,
    pub available_models: Vec<String>,
}

#[async_trait]
pub trait Provider: Send + Sync {
    fn info(&self) -> ProviderInfo;

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse>;

    fn is_authenticated(&self) -> bool;
}

pub fn create_provider(
    provider_type: &crate::config::ProviderType,
    config: &crate::config::ProviderConfig,
) -> Result<std::sync::Arc<dyn Provider + Send + Sync>> {
    use crate::config::ProviderType;

    match provider_type {
        ProviderType::Openrouter => {
            Ok(std::sync::Arc::new(openrouter::OpenRouterProvider::new(config)))
        }
        ProviderType::Anthropic => {
            Ok(std::sync::Arc::new(anthropic::AnthropicProvider::new(config)))
        }
    }
}

pub fn list_available_providers() -> Vec<ProviderInfo> {
    vec![
        openrouter::OpenRouterProvider::static_info(),
        anthropic::AnthropicProvider::static_info(),
    ]
}
