//! Client-side checks run before any network call

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ArcaloadError, Result};

pub const MIN_TITLE_CHARS: usize = 2;

pub const TITLE_REQUIRED_MESSAGE: &str = "Please enter a game title";
pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address";

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("regex should compile")
});

/// Standard `local@domain.tld` shape
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// Trim and check a requested game title
pub fn validate_request_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.chars().count() < MIN_TITLE_CHARS {
        return Err(ArcaloadError::Validation(TITLE_REQUIRED_MESSAGE.to_string()));
    }
    Ok(title.to_string())
}

/// Trim an optional email. Blank means "not provided".
pub fn validate_optional_email(email: &str) -> Result<Option<String>> {
    let email = email.trim();
    if email.is_empty() {
        return Ok(None);
    }
    if !is_valid_email(email) {
        return Err(ArcaloadError::Validation(INVALID_EMAIL_MESSAGE.to_string()));
    }
    Ok(Some(email.to_string()))
}
