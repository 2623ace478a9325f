pub mod error;
pub mod gemini;
pub mod github;
pub mod llm;
pub mod openai;

pub use error::UpstreamError;
pub use github::{GithubApi, GithubClient, GithubUser};
pub use llm::{build_text_client, GenerativeTextClient};

/// Shared reqwest client for every outbound call.
pub fn http_client(timeout: std::time::Duration) -> anyhow::Result<reqwest::Client> {
    let client = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(client)
}
