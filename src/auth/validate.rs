use lazy_static::lazy_static;
use regex::Regex;

use crate::{auth::password::MIN_PASSWORD_LEN, error::FieldError};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn is_github_url(url: &str) -> bool {
    url.contains("github.com")
}

pub(crate) fn is_linkedin_url(url: &str) -> bool {
    url.contains("linkedin.com/in/")
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Blank optional URLs count as absent.
pub(crate) fn normalize_url(url: Option<String>) -> Option<String> {
    url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty())
}

/// Checks every signup field and reports all failures together.
pub(crate) fn check_signup(
    email: &str,
    password: &str,
    github: Option<&str>,
    linkedin: Option<&str>,
) -> Vec<FieldError> {
    let mut errors = Vec::new();
    if !is_valid_email(email) {
        errors.push(FieldError {
            field: "email",
            message: "Please provide a valid email",
        });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError {
            field: "password",
            message: "Password must be at least 8 characters long",
        });
    }
    if github.is_some_and(|u| !is_github_url(u)) {
        errors.push(FieldError {
            field: "githubProfile",
            message: "Invalid GitHub profile URL",
        });
    }
    if linkedin.is_some_and(|u| !is_linkedin_url(u)) {
        errors.push(FieldError {
            field: "linkedinProfile",
            message: "Invalid LinkedIn profile URL",
        });
    }
    errors
}
