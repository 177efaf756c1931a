//! Submission validation.
//!
//! Checks run in order with first-failure short-circuit: non-empty,
//! well-formed absolute http/https URL, not already subscribed.  Expected
//! failures are returned as typed [`ValidationError`]s, never panics.

use url::Url;

use crate::error::ValidationError;

/// Normalized spelling used for duplicate comparison.  `Url` lowercases the
/// scheme and host and restores the root slash, so `https://EXAMPLE.com` and
/// `https://example.com/` compare equal.
fn normalize(raw: &str) -> Option<String> {
    let parsed = Url::parse(raw.trim()).ok()?;
    match parsed.scheme() {
        "http" | "https" => Some(parsed.to_string()),
        _ => None,
    }
}

/// Validate a candidate subscription URL against the already-subscribed set.
pub fn validate(candidate: &str, existing: &[String]) -> Result<(), ValidationError> {
    let trimmed = candidate.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Empty);
    }

    let normalized = normalize(trimmed).ok_or(ValidationError::NotAUrl)?;

    let duplicate = existing
        .iter()
        .any(|url| normalize(url).as_deref() == Some(normalized.as_str()));
    if duplicate {
        return Err(ValidationError::AlreadyAdded);
    }

    Ok(())
}
