use serde::Serialize;
use serde_json::Value;

/// Transient profile description; `null` branches had no URL configured.
#[derive(Debug, Serialize)]
pub struct EnrichedProfile {
    pub email: String,
    pub github: Option<Value>,
    pub linkedin: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: EnrichedProfile,
}

/// Body of a `/profile` failure outside the enrichment branches.
#[derive(Debug, Serialize)]
pub struct ProfileFailure {
    pub success: bool,
    pub message: &'static str,
    pub error: String,
}
