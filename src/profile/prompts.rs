use crate::clients::GithubUser;

pub const LINKEDIN_SYSTEM: &str = "You are a helpful assistant that extracts structured information \
from LinkedIn profiles and returns valid JSON.";

pub const GITHUB_INSIGHTS_SYSTEM: &str = "You are a helpful assistant that analyzes GitHub profiles \
and provides professional insights. Return valid JSON.";

pub const GITHUB_FALLBACK_SYSTEM: &str = "You are a helpful assistant that extracts structured \
information from GitHub profiles and returns valid JSON.";

pub fn linkedin(profile_url: &str) -> String {
    format!(
        r#"Extract professional information from this LinkedIn profile: {profile_url}
Return the data in JSON format with these fields:
- username
- fullName
- headline (professional title/headline)
- currentPosition (current job title and company)
- location
- industry
- education (list of schools and degrees)
- experience (list of past positions, companies, and durations)
- skills (list of highlighted skills)
- certifications (if available)
- languages (spoken languages if available)
- contactInfo (any public contact information)
- profileImageUrl (if available)"#
    )
}

pub fn github_insights(user: &GithubUser, profile_url: &str) -> String {
    let data = serde_json::to_string(user).unwrap_or_default();
    format!(
        r#"Analyze this GitHub profile data and provide additional insights:
{data}

Also, check the profile at {profile_url}

Return a comprehensive JSON with:
- Inferred programming expertise based on repositories
- Estimated experience level
- Activity patterns (if discernible)
- Notable achievements (if any)
- Any other professional insights"#
    )
}

pub fn github_fallback(profile_url: &str) -> String {
    format!(
        r#"Extract professional information from this GitHub profile: {profile_url}
Return the data in JSON format with these fields:
- username
- fullName (if available)
- bio (if available)
- location (if available)
- company (if available)
- repositories (approximate number)
- languages (commonly used programming languages)
- expertiseAreas
- activityLevel"#
    )
}
