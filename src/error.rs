//! Error types for feedloop.
//!
//! User-relevant errors carry their localization key as the `Display` output;
//! the view resolves the key to text through [`crate::i18n`].  Detail strings
//! attached to variants are for the log, never for the screen.

use thiserror::Error;

/// A rejected submission.  Recovered inside the form; never reaches the
/// loading flow or the collections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The input was empty (after trimming).
    #[error("feedback.errors.required_field")]
    Empty,

    /// The input is not an absolute http/https URL.
    #[error("feedback.errors.invalid_url")]
    NotAUrl,

    /// The URL is already subscribed.
    #[error("feedback.errors.existing_rss")]
    AlreadyAdded,
}

/// Common error type for feedloop.
#[derive(Error, Debug)]
pub enum Error {
    /// Form validation failure.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connectivity failure, including HTTP error statuses from the proxy
    /// and a malformed proxy envelope.
    #[error("feedback.errors.network_error")]
    Network(String),

    /// The fetch deadline elapsed.
    #[error("feedback.errors.request_timed_out")]
    Timeout,

    /// The fetched document is not a well-formed `<rss>` feed.
    #[error("feedback.errors.invalid_rss")]
    InvalidFormat(String),

    /// A programming-invariant violation (e.g. a modal selection or read
    /// mark referencing an unknown post).  Allowed to abort the program.
    #[error("internal consistency violation: {0}")]
    Internal(String),
}

impl Error {
    /// Localization key for the inline feedback text.
    ///
    /// `Internal` has no key; it is never rendered as form feedback.
    pub fn message_key(&self) -> String {
        self.to_string()
    }
}

/// Result type alias for feedloop operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_display_their_keys() {
        assert_eq!(
            ValidationError::Empty.to_string(),
            "feedback.errors.required_field"
        );
        assert_eq!(
            ValidationError::NotAUrl.to_string(),
            "feedback.errors.invalid_url"
        );
        assert_eq!(
            ValidationError::AlreadyAdded.to_string(),
            "feedback.errors.existing_rss"
        );
    }

    #[test]
    fn fetch_errors_display_their_keys() {
        assert_eq!(
            Error::Network("connection refused".into()).to_string(),
            "feedback.errors.network_error"
        );
        assert_eq!(Error::Timeout.to_string(), "feedback.errors.request_timed_out");
        assert_eq!(
            Error::InvalidFormat("unexpected root".into()).to_string(),
            "feedback.errors.invalid_rss"
        );
    }

    #[test]
    fn validation_error_converts_transparently() {
        let err: Error = ValidationError::AlreadyAdded.into();
        assert_eq!(err.message_key(), "feedback.errors.existing_rss");
    }

    #[test]
    fn internal_error_carries_detail() {
        let err = Error::Internal("modal id x not found".into());
        assert!(err.to_string().contains("modal id x not found"));
    }
}
