use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{info, instrument, warn};

use crate::{
    auth::repo_types::User,
    clients::{github::github_username, GenerativeTextClient, GithubClient},
    profile::{
        dto::EnrichedProfile,
        prompts,
        strategy::{ask_json, run_chain, EnrichError, ProfileStrategy},
    },
};

/// Direct GitHub API lookup, optionally annotated with model insights.
struct GithubApiStrategy {
    github: Arc<dyn GithubClient>,
    llm: Arc<dyn GenerativeTextClient>,
    insights: bool,
}

#[async_trait]
impl ProfileStrategy for GithubApiStrategy {
    fn name(&self) -> &'static str {
        "github_api"
    }

    async fn attempt(&self, profile_url: &str) -> Result<Value, EnrichError> {
        let gh = self.github.fetch_user(github_username(profile_url)).await?;

        let mut profile = json!({
            "username": gh.login,
            "fullName": gh.name,
            "bio": gh.bio,
            "location": gh.location,
            "company": gh.company,
            "repositories": gh.public_repos,
            "followers": gh.followers,
            "joinDate": gh.created_at,
            "avatarUrl": gh.avatar_url,
        });

        if self.insights {
            let prompt = prompts::github_insights(&gh, profile_url);
            match ask_json(self.llm.as_ref(), prompts::GITHUB_INSIGHTS_SYSTEM, &prompt).await {
                Ok(insights) => profile["aiInsights"] = insights,
                Err(e) => {
                    warn!(error = %e, "github insights unavailable");
                    profile["aiError"] = json!(e.to_string());
                }
            }
        }
        Ok(profile)
    }
}

/// Let the model approximate a GitHub profile from the URL alone.
struct GithubAiFallback {
    llm: Arc<dyn GenerativeTextClient>,
}

#[async_trait]
impl ProfileStrategy for GithubAiFallback {
    fn name(&self) -> &'static str {
        "github_ai_fallback"
    }

    async fn attempt(&self, profile_url: &str) -> Result<Value, EnrichError> {
        let prompt = prompts::github_fallback(profile_url);
        let mut profile =
            ask_json(self.llm.as_ref(), prompts::GITHUB_FALLBACK_SYSTEM, &prompt).await?;
        if let Value::Object(map) = &mut profile {
            map.insert("source".into(), json!("ai_fallback"));
        }
        Ok(profile)
    }
}

/// LinkedIn has no usable public API; the model is the only source.
struct LinkedInAi {
    llm: Arc<dyn GenerativeTextClient>,
}

#[async_trait]
impl ProfileStrategy for LinkedInAi {
    fn name(&self) -> &'static str {
        "linkedin_ai"
    }

    async fn attempt(&self, profile_url: &str) -> Result<Value, EnrichError> {
        let prompt = prompts::linkedin(profile_url);
        ask_json(self.llm.as_ref(), prompts::LINKEDIN_SYSTEM, &prompt).await
    }
}

/// Builds the best-effort `{email, github, linkedin}` description of a user.
pub struct ProfileEnricher {
    github_chain: Vec<Box<dyn ProfileStrategy>>,
    linkedin_chain: Vec<Box<dyn ProfileStrategy>>,
}

impl ProfileEnricher {
    pub fn new(
        github: Arc<dyn GithubClient>,
        llm: Arc<dyn GenerativeTextClient>,
        insights: bool,
    ) -> Self {
        Self {
            github_chain: vec![
                Box::new(GithubApiStrategy {
                    github,
                    llm: llm.clone(),
                    insights,
                }),
                Box::new(GithubAiFallback { llm: llm.clone() }),
            ],
            linkedin_chain: vec![Box::new(LinkedInAi { llm })],
        }
    }

    /// Never fails: each branch degrades to an inline error marker.
    #[instrument(skip_all, fields(user_id = %user.id))]
    pub async fn enrich(&self, user: &User) -> EnrichedProfile {
        let github = async {
            match &user.github_profile_url {
                Some(url) => Some(run_chain(&self.github_chain, url).await),
                None => None,
            }
        };
        let linkedin = async {
            match &user.linkedin_profile_url {
                Some(url) => Some(run_chain(&self.linkedin_chain, url).await),
                None => None,
            }
        };
        let (github, linkedin) = tokio::join!(github, linkedin);

        info!(
            github = github.is_some(),
            linkedin = linkedin.is_some(),
            "profile enriched"
        );
        EnrichedProfile {
            email: user.email.clone(),
            github,
            linkedin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::fakes::{FakeGithub, ScriptedLlm};
    use time::OffsetDateTime;
    use uuid::Uuid;

    const INSIGHTS: &str = "Analyze this GitHub profile data";
    const FALLBACK: &str = "from this GitHub profile";
    const LINKEDIN: &str = "from this LinkedIn profile";

    fn user(github: Option<&str>, linkedin: Option<&str>) -> User {
        User {
            id: Uuid::new_v4(),
            email: "dev@example.com".into(),
            password_hash: "x".into(),
            github_profile_url: github.map(str::to_string),
            linkedin_profile_url: linkedin.map(str::to_string),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn no_urls_means_no_calls() {
        let github = Arc::new(FakeGithub::returning("octocat"));
        let llm = Arc::new(ScriptedLlm::new());
        let enricher = ProfileEnricher::new(github.clone(), llm.clone(), true);

        let profile = enricher.enrich(&user(None, None)).await;

        assert!(profile.github.is_none());
        assert!(profile.linkedin.is_none());
        assert_eq!(github.calls(), 0);
        assert_eq!(llm.calls(), 0);
        let body = serde_json::to_value(&profile).unwrap();
        assert_eq!(body["github"], Value::Null);
        assert_eq!(body["linkedin"], Value::Null);
    }

    #[tokio::test]
    async fn github_api_with_insights() {
        let github = Arc::new(FakeGithub::returning("octocat"));
        let llm = Arc::new(
            ScriptedLlm::new().on(INSIGHTS, Ok("```json\n{\"experienceLevel\": \"senior\"}\n```")),
        );
        let enricher = ProfileEnricher::new(github.clone(), llm, true);

        let profile = enricher
            .enrich(&user(Some("https://github.com/octocat"), None))
            .await;
        let gh = profile.github.unwrap();

        assert_eq!(gh["username"], "octocat");
        assert_eq!(gh["repositories"], 12);
        assert_eq!(gh["followers"], 34);
        assert_eq!(gh["aiInsights"]["experienceLevel"], "senior");
        assert!(gh.get("aiError").is_none());
        assert_eq!(github.calls(), 1);
    }

    #[tokio::test]
    async fn unparsable_insights_become_error_marker() {
        let github = Arc::new(FakeGithub::returning("octocat"));
        let llm = Arc::new(ScriptedLlm::new().on(INSIGHTS, Ok("I cannot browse the web.")));
        let enricher = ProfileEnricher::new(github, llm, true);

        let profile = enricher
            .enrich(&user(Some("https://github.com/octocat"), None))
            .await;
        let gh = profile.github.unwrap();

        assert_eq!(gh["username"], "octocat");
        assert!(gh["aiError"].is_string());
        assert!(gh.get("aiInsights").is_none());
    }

    #[tokio::test]
    async fn insights_can_be_disabled() {
        let github = Arc::new(FakeGithub::returning("octocat"));
        let llm = Arc::new(ScriptedLlm::new());
        let enricher = ProfileEnricher::new(github, llm.clone(), false);

        let profile = enricher
            .enrich(&user(Some("https://github.com/octocat"), None))
            .await;

        assert_eq!(profile.github.unwrap()["username"], "octocat");
        assert_eq!(llm.calls(), 0);
    }

    #[tokio::test]
    async fn github_failure_uses_ai_fallback() {
        let github = Arc::new(FakeGithub::failing());
        let llm = Arc::new(
            ScriptedLlm::new().on(FALLBACK, Ok("{\"username\": \"ghost\", \"repositories\": 3}")),
        );
        let enricher = ProfileEnricher::new(github, llm, true);

        let profile = enricher
            .enrich(&user(Some("https://github.com/ghost"), None))
            .await;
        let gh = profile.github.unwrap();

        assert_eq!(gh["username"], "ghost");
        assert_eq!(gh["source"], "ai_fallback");
    }

    #[tokio::test]
    async fn github_failure_keeps_key_and_linkedin_unaffected() {
        let github = Arc::new(FakeGithub::failing());
        let llm = Arc::new(
            ScriptedLlm::new()
                .on(FALLBACK, Err("OpenRouter API error: 502"))
                .on(LINKEDIN, Ok("```json\n{\"headline\": \"Engineer\"}\n```")),
        );
        let enricher = ProfileEnricher::new(github, llm, true);

        let profile = enricher
            .enrich(&user(
                Some("https://github.com/ghost"),
                Some("https://www.linkedin.com/in/ghost"),
            ))
            .await;

        let gh = profile.github.expect("github key present");
        assert!(gh["error"].as_str().unwrap().contains("404"));
        assert_eq!(gh["fallbackError"], "OpenRouter API error: 502");
        assert_eq!(profile.linkedin.unwrap(), json!({"headline": "Engineer"}));
    }

    #[tokio::test]
    async fn linkedin_prose_reply_keeps_raw_text() {
        let github = Arc::new(FakeGithub::failing());
        let llm = Arc::new(ScriptedLlm::new().on(LINKEDIN, Ok("No public data found.")));
        let enricher = ProfileEnricher::new(github.clone(), llm, true);

        let profile = enricher
            .enrich(&user(None, Some("https://www.linkedin.com/in/someone")))
            .await;
        let li = profile.linkedin.unwrap();

        assert_eq!(li["rawResponse"], "No public data found.");
        assert!(li["error"].is_string());
        assert!(profile.github.is_none());
        assert_eq!(github.calls(), 0);
    }

    #[tokio::test]
    async fn linkedin_call_failure_is_error_marker() {
        let github = Arc::new(FakeGithub::failing());
        let llm = Arc::new(ScriptedLlm::new());
        let enricher = ProfileEnricher::new(github, llm, true);

        let profile = enricher
            .enrich(&user(None, Some("https://www.linkedin.com/in/someone")))
            .await;

        assert_eq!(
            profile.linkedin.unwrap(),
            json!({"error": "generative text provider not configured"})
        );
    }
}
