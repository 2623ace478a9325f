use async_trait::async_trait;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::UpstreamError;
use crate::config::GithubConfig;

const SERVICE: &str = "GitHub";
const USER_AGENT: &str = concat!("devfolio/", env!("CARGO_PKG_VERSION"));

/// Subset of `GET /users/{username}` the portfolio uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubUser {
    pub login: String,
    pub name: Option<String>,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub company: Option<String>,
    #[serde(default)]
    pub public_repos: u64,
    #[serde(default)]
    pub followers: u64,
    pub created_at: Option<String>,
    pub avatar_url: Option<String>,
}

/// GitHub username from a profile URL: the last non-empty path segment.
pub fn github_username(profile_url: &str) -> &str {
    let path = profile_url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').rsplit('/').next().unwrap_or_default()
}

#[async_trait]
pub trait GithubClient: Send + Sync {
    async fn fetch_user(&self, username: &str) -> Result<GithubUser, UpstreamError>;
}

#[derive(Clone)]
pub struct GithubApi {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl GithubApi {
    pub fn new(http: Client, cfg: &GithubConfig) -> Self {
        Self {
            http,
            base_url: cfg.api_url.trim_end_matches('/').to_string(),
            token: cfg.token.clone(),
        }
    }
}

#[async_trait]
impl GithubClient for GithubApi {
    #[instrument(skip(self))]
    async fn fetch_user(&self, username: &str) -> Result<GithubUser, UpstreamError> {
        if username.is_empty() {
            return Err(UpstreamError::InvalidInput(
                "no GitHub username in profile URL".into(),
            ));
        }

        let mut req = self
            .http
            .get(format!("{}/users/{}", self.base_url, username))
            .header(header::ACCEPT, "application/vnd.github.v3+json")
            .header(header::USER_AGENT, USER_AGENT);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::from_response(SERVICE, response).await);
        }

        let user: GithubUser = response.json().await.map_err(|e| UpstreamError::Decode {
            service: SERVICE,
            reason: e.to_string(),
        })?;
        debug!(login = %user.login, "github user fetched");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[test]
    fn username_is_last_path_segment() {
        assert_eq!(github_username("https://github.com/octocat"), "octocat");
        assert_eq!(github_username("https://github.com/octocat/"), "octocat");
        assert_eq!(github_username("github.com/octocat?tab=repositories"), "octocat");
        assert_eq!(github_username("octocat"), "octocat");
        assert_eq!(github_username("https://github.com/orgs/rust-lang/"), "rust-lang");
    }

    fn api(server: &MockServer, token: Option<&str>) -> GithubApi {
        GithubApi::new(
            Client::new(),
            &GithubConfig {
                api_url: server.uri(),
                token: token.map(str::to_string),
            },
        )
    }

    #[tokio::test]
    async fn fetches_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("accept", "application/vnd.github.v3+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat",
                "name": "The Octocat",
                "bio": null,
                "location": "San Francisco",
                "company": "@github",
                "public_repos": 8,
                "followers": 9000,
                "created_at": "2011-01-25T18:44:36Z",
                "avatar_url": "https://avatars.githubusercontent.com/u/583231"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = api(&server, None).fetch_user("octocat").await.unwrap();
        assert_eq!(user.login, "octocat");
        assert_eq!(user.public_repos, 8);
        assert_eq!(user.followers, 9000);
        assert!(user.bio.is_none());
    }

    #[tokio::test]
    async fn sends_token_when_configured() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/octocat"))
            .and(header("authorization", "Bearer ghp_test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "login": "octocat"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let user = api(&server, Some("ghp_test")).fetch_user("octocat").await.unwrap();
        assert_eq!(user.login, "octocat");
    }

    #[tokio::test]
    async fn not_found_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users/ghost-user"))
            .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
            .mount(&server)
            .await;

        let err = api(&server, None).fetch_user("ghost-user").await.unwrap_err();
        match err {
            UpstreamError::Status { status, .. } => assert_eq!(status.as_u16(), 404),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn empty_username_makes_no_call() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = api(&server, None).fetch_user("").await.unwrap_err();
        assert!(matches!(err, UpstreamError::InvalidInput(_)));
    }
}
