use std::sync::Arc;

use anyhow::Context;
use axum::extract::FromRef;
use sqlx::postgres::PgPoolOptions;
use tracing::warn;

use crate::{
    auth::{
        jwt::JwtKeys,
        memory::InMemoryUserStore,
        repo::{PgUserStore, UserStore},
        service::AuthService,
    },
    clients::{self, build_text_client, GenerativeTextClient, GithubApi, GithubClient},
    config::AppConfig,
    profile::ProfileEnricher,
};

#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub enricher: Arc<ProfileEnricher>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let users: Arc<dyn UserStore> = match &config.database_url {
            Some(url) => {
                let db = PgPoolOptions::new()
                    .max_connections(10)
                    .connect(url)
                    .await
                    .context("connect to database")?;

                // Run migrations if present
                if let Err(e) = sqlx::migrate!("./migrations").run(&db).await {
                    warn!(error = %e, "migration failed; continuing");
                }
                Arc::new(PgUserStore::new(db))
            }
            None => {
                warn!("DATABASE_URL not set; users are kept in memory");
                Arc::new(InMemoryUserStore::new())
            }
        };

        let http = clients::http_client(config.http_timeout())?;
        let github = Arc::new(GithubApi::new(http.clone(), &config.github)) as Arc<dyn GithubClient>;
        let llm = build_text_client(http, &config.llm);

        Ok(Self::from_parts(&config, users, github, llm))
    }

    pub fn from_parts(
        config: &AppConfig,
        users: Arc<dyn UserStore>,
        github: Arc<dyn GithubClient>,
        llm: Arc<dyn GenerativeTextClient>,
    ) -> Self {
        let keys = JwtKeys::from(&config.jwt);
        let auth = AuthService::new(users, keys, github.clone());
        let enricher = Arc::new(ProfileEnricher::new(github, llm, config.github_insights));
        Self { auth, enricher }
    }

    #[cfg(test)]
    pub fn fake(
        users: Arc<dyn UserStore>,
        github: Arc<dyn GithubClient>,
        llm: Arc<dyn GenerativeTextClient>,
    ) -> Self {
        use crate::config::{GithubConfig, JwtConfig, LlmConfig, LlmProvider};

        let config = AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test".into(),
                audience: "test".into(),
                ttl_minutes: 60 * 24,
            },
            llm: LlmConfig {
                provider: LlmProvider::OpenAi,
                api_key: None,
                base_url: None,
                model: None,
                temperature: None,
                app_referer: None,
                app_title: None,
            },
            github: GithubConfig {
                api_url: "http://github.invalid".into(),
                token: None,
            },
            github_insights: true,
            http_timeout_secs: 5,
        };
        Self::from_parts(&config, users, github, llm)
    }
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
