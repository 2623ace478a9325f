use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Which generative text API the enrichment pipeline talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// Any OpenAI-compatible chat completions endpoint (OpenRouter by default).
    OpenAi,
    Gemini,
}

impl std::str::FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "openrouter" => Ok(Self::OpenAi),
            "gemini" | "google" => Ok(Self::Gemini),
            other => anyhow::bail!("unknown LLM_PROVIDER: {other}"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub provider: LlmProvider,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub app_referer: Option<String>,
    pub app_title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub llm: LlmConfig,
    pub github: GithubConfig,
    pub github_insights: bool,
    pub http_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = optional("DATABASE_URL");
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "devfolio".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "devfolio-users".into()),
            ttl_minutes: parsed("JWT_TTL_MINUTES").unwrap_or(60 * 24),
        };
        let llm = LlmConfig {
            provider: match optional("LLM_PROVIDER") {
                Some(p) => p.parse()?,
                None => LlmProvider::OpenAi,
            },
            api_key: optional("LLM_API_KEY"),
            base_url: optional("LLM_BASE_URL"),
            model: optional("LLM_MODEL"),
            temperature: parsed("LLM_TEMPERATURE"),
            app_referer: optional("LLM_APP_REFERER"),
            app_title: optional("LLM_APP_TITLE"),
        };
        let github = GithubConfig {
            api_url: std::env::var("GITHUB_API_URL")
                .unwrap_or_else(|_| "https://api.github.com".into()),
            token: optional("GITHUB_TOKEN"),
        };
        Ok(Self {
            database_url,
            jwt,
            llm,
            github,
            github_insights: parsed("ENRICH_GITHUB_INSIGHTS").unwrap_or(true),
            http_timeout_secs: parsed("HTTP_TIMEOUT_SECS").unwrap_or(30),
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// Unset and blank variables are both treated as absent.
fn optional(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    optional(key).and_then(|v| v.parse::<T>().ok())
}
