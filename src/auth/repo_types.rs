use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// User record in the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,                             // unique user ID
    pub email: String,                        // normalized email
    #[serde(skip_serializing)]
    pub password_hash: String,                // Argon2 hash, not exposed in JSON
    pub github_profile_url: Option<String>,   // input to the enrichment pipeline
    pub linkedin_profile_url: Option<String>, // input to the enrichment pipeline
    pub created_at: OffsetDateTime,           // creation timestamp
}

/// Fields required to insert a user; id and timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub github_profile_url: Option<String>,
    pub linkedin_profile_url: Option<String>,
}

impl NewUser {
    pub fn into_user(self) -> User {
        User {
            id: Uuid::new_v4(),
            email: self.email,
            password_hash: self.password_hash,
            github_profile_url: self.github_profile_url,
            linkedin_profile_url: self.linkedin_profile_url,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}
