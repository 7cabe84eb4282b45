//! Error types for MFA session operations.

use thiserror::Error;

/// Result type alias using [`MfaSessionError`].
pub type Result<T> = std::result::Result<T, MfaSessionError>;

/// Errors that can occur while building or using MFA-backed sessions.
///
/// Failures from the AWS SDK (invalid or expired MFA code, unreachable
/// STS endpoint) are propagated with their original message text and are
/// never retried or reinterpreted here.
#[derive(Debug, Error)]
pub enum MfaSessionError {
    /// An ARN string did not parse.
    #[error("invalid ARN: {0}")]
    InvalidArn(String),

    /// An STS response was missing its credentials block.
    #[error("STS response contained no credentials")]
    MissingCredentials,

    /// Reading the MFA code from the terminal failed.
    #[error("failed to read MFA code: {0}")]
    MfaPrompt(String),

    /// No home directory could be resolved for the default cache location.
    #[error("could not determine home directory for credential cache")]
    NoHomeDir,

    /// I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error (catch-all, including AWS SDK call failures).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = MfaSessionError::InvalidArn("not-an-arn".to_string());
        assert_eq!(err.to_string(), "invalid ARN: not-an-arn");
    }

    #[test]
    fn test_sdk_error_text_is_preserved() {
        let err = MfaSessionError::Other(anyhow::anyhow!(
            "get-session-token failed: MultiFactorAuthentication failed"
        ));
        assert!(err.to_string().contains("MultiFactorAuthentication failed"));
    }
}
