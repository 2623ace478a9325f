use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use tracing::warn;

use super::{error::UpstreamError, gemini::GeminiClient, openai::OpenAiCompatibleClient};
use crate::config::{LlmConfig, LlmProvider};

/// A chat-style text generation backend.
#[async_trait]
pub trait GenerativeTextClient: Send + Sync {
    /// Send one system instruction and one user prompt, returning the reply text.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, UpstreamError>;
}

/// Stand-in used when no API key is configured. Every call fails.
pub struct DisabledTextClient;

#[async_trait]
impl GenerativeTextClient for DisabledTextClient {
    async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, UpstreamError> {
        Err(UpstreamError::NotConfigured)
    }
}

pub fn build_text_client(http: Client, cfg: &LlmConfig) -> Arc<dyn GenerativeTextClient> {
    let Some(api_key) = cfg.api_key.clone() else {
        warn!("LLM_API_KEY not set; AI enrichment disabled");
        return Arc::new(DisabledTextClient);
    };
    match cfg.provider {
        LlmProvider::OpenAi => Arc::new(OpenAiCompatibleClient::new(http, api_key, cfg)),
        LlmProvider::Gemini => Arc::new(GeminiClient::new(http, api_key, cfg)),
    }
}
