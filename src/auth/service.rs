use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::{
    auth::{
        dto::RegisterRequest,
        jwt::JwtKeys,
        password::{hash_password, verify_password, verify_unknown},
        repo::UserStore,
        repo_types::{NewUser, User},
        validate::{check_signup, normalize_email, normalize_url},
    },
    clients::{github::github_username, GithubClient},
    error::AppError,
};

/// A freshly issued token together with the user it was issued for.
#[derive(Debug)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

/// Registration, signin and bearer-token checks.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
    github: Arc<dyn GithubClient>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys, github: Arc<dyn GithubClient>) -> Self {
        Self {
            users,
            keys,
            github,
        }
    }

    #[instrument(skip_all)]
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(&request.email);
        let github_profile_url = normalize_url(request.github_profile);
        let linkedin_profile_url = normalize_url(request.linkedin_profile);

        let errors = check_signup(
            &email,
            &request.password,
            github_profile_url.as_deref(),
            linkedin_profile_url.as_deref(),
        );
        if !errors.is_empty() {
            warn!(email = %email, fields = ?errors.iter().map(|e| e.field).collect::<Vec<_>>(), "signup validation failed");
            return Err(AppError::Validation(errors));
        }

        if self.users.find_by_email(&email).await?.is_some() {
            warn!(email = %email, "email already registered");
            return Err(AppError::Conflict);
        }

        let password_hash = hash_password(&request.password).map_err(AppError::server)?;

        // The store rejects a concurrent duplicate as StoreError::Duplicate -> Conflict.
        let user = self
            .users
            .create(NewUser {
                email,
                password_hash,
                github_profile_url,
                linkedin_profile_url,
            })
            .await?;

        if let Some(url) = &user.github_profile_url {
            self.probe_github(url);
        }

        let token = self.keys.sign(user.id).map_err(AppError::server)?;
        info!(user_id = %user.id, email = %user.email, "user registered");
        Ok(AuthOutcome { token, user })
    }

    #[instrument(skip_all)]
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<AuthOutcome, AppError> {
        let email = normalize_email(email);

        let Some(user) = self.users.find_by_email(&email).await? else {
            verify_unknown(password);
            warn!(email = %email, "signin unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password(password, &user.password_hash).map_err(AppError::server)? {
            warn!(email = %email, user_id = %user.id, "signin invalid password");
            return Err(AppError::InvalidCredentials);
        }

        let token = self.keys.sign(user.id).map_err(AppError::server)?;
        info!(user_id = %user.id, email = %user.email, "user signed in");
        Ok(AuthOutcome { token, user })
    }

    /// Resolve a bearer token to its user.
    #[instrument(skip_all)]
    pub async fn authorize(&self, token: &str) -> Result<User, AppError> {
        let claims = self.keys.verify(token).map_err(|e| {
            warn!(error = %e, "invalid or expired token");
            AppError::Authentication("Authentication failed")
        })?;

        match self.users.find_by_id(claims.sub).await? {
            Some(user) => Ok(user),
            None => {
                warn!(user_id = %claims.sub, "token for unknown user");
                Err(AppError::Authentication("User not found"))
            }
        }
    }

    // Reachability only gets logged; it never blocks signup.
    fn probe_github(&self, url: &str) {
        let github = self.github.clone();
        let username = github_username(url).to_string();
        tokio::spawn(async move {
            match github.fetch_user(&username).await {
                Ok(_) => debug!(%username, "github profile reachable"),
                Err(e) => warn!(%username, error = %e, "github profile not reachable"),
            }
        });
    }
}
