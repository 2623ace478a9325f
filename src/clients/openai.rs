//! OpenAI-compatible chat completions (OpenRouter, OpenAI, DeepSeek, ...).

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{error::UpstreamError, llm::GenerativeTextClient};
use crate::config::LlmConfig;

const SERVICE: &str = "OpenRouter";
const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_MODEL: &str = "deepseek/deepseek-chat";

// *************** Request/Response Types ***************

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

// *************** Client ***************

pub struct OpenAiCompatibleClient {
    http: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
    referer: Option<String>,
    title: Option<String>,
}

impl OpenAiCompatibleClient {
    pub fn new(http: Client, api_key: String, cfg: &LlmConfig) -> Self {
        Self {
            http,
            api_key,
            base_url: cfg
                .base_url
                .as_deref()
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: cfg.model.clone().unwrap_or_else(|| DEFAULT_MODEL.into()),
            temperature: cfg.temperature,
            referer: cfg.app_referer.clone(),
            title: cfg.app_title.clone(),
        }
    }
}

#[async_trait]
impl GenerativeTextClient for OpenAiCompatibleClient {
    #[instrument(skip_all, fields(model = %self.model))]
    async fn complete(&self, system: &str, prompt: &str) -> Result<String, UpstreamError> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        let mut req = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request);
        if let Some(referer) = &self.referer {
            req = req.header("HTTP-Referer", referer);
        }
        if let Some(title) = &self.title {
            req = req.header("X-Title", title);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::from_response(SERVICE, response).await);
        }

        let body: ChatResponse = response.json().await.map_err(|e| UpstreamError::Decode {
            service: SERVICE,
            reason: e.to_string(),
        })?;

        let text = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|t| !t.trim().is_empty())
            .ok_or(UpstreamError::EmptyReply(SERVICE))?;
        debug!(chars = text.len(), "chat completion received");
        Ok(text)
    }
}
