//! Configuration for building a session provider.

use crate::{MfaSessionError, Result};
use std::path::PathBuf;
use std::time::Duration;

/// GetSessionToken credentials last 12 hours, matching a working day.
pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(12 * 60 * 60);

/// AssumeRole credentials last 1 hour.
pub const DEFAULT_ASSUME_ROLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Configuration for an [`MfaSessionProvider`](crate::MfaSessionProvider).
///
/// Use the builder pattern for anything beyond the defaults:
///
/// ```
/// use mfa_session::Config;
/// use std::time::Duration;
///
/// let config = Config::new("dev")
///     .with_mfa_serial("arn:aws:iam::123456789012:mfa/fred")
///     .with_session_ttl(Duration::from_secs(4 * 3600));
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Profile name used to build the base session.
    pub profile: String,

    /// Cache directory (default: `~/.aws/mfa-session/cache`).
    pub cache_dir: Option<PathBuf>,

    /// MFA device serial. When unset, it is derived from the caller identity
    /// as `arn:aws:iam::{account}:mfa/{user}`.
    pub mfa_serial: Option<String>,

    /// Lifetime requested for the MFA session token.
    pub session_ttl: Duration,

    /// Lifetime requested for assumed-role credentials.
    pub assume_role_ttl: Duration,
}

impl Config {
    /// Creates a configuration for the given profile with default durations
    /// and cache location.
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
            cache_dir: None,
            mfa_serial: None,
            session_ttl: DEFAULT_SESSION_TTL,
            assume_role_ttl: DEFAULT_ASSUME_ROLE_TTL,
        }
    }

    /// Sets the cache directory.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Sets the MFA device serial, skipping the GetCallerIdentity lookup.
    pub fn with_mfa_serial(mut self, serial: impl Into<String>) -> Self {
        self.mfa_serial = Some(serial.into());
        self
    }

    /// Sets the lifetime requested for the MFA session token.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Sets the lifetime requested for assumed-role credentials.
    pub fn with_assume_role_ttl(mut self, ttl: Duration) -> Self {
        self.assume_role_ttl = ttl;
        self
    }

    /// Resolves the cache directory, falling back to the default under the
    /// user's home directory.
    ///
    /// # Errors
    ///
    /// Returns [`MfaSessionError::NoHomeDir`] if no directory was configured
    /// and the home directory cannot be determined.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.cache_dir {
            return Ok(dir.clone());
        }

        dirs::home_dir()
            .map(|home| home.join(".aws").join("mfa-session").join("cache"))
            .ok_or(MfaSessionError::NoHomeDir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = Config::new("dev")
            .with_mfa_serial("arn:aws:iam::123456789012:mfa/fred")
            .with_cache_dir("/tmp/cache")
            .with_session_ttl(Duration::from_secs(3600));

        assert_eq!(config.profile, "dev");
        assert_eq!(
            config.mfa_serial.as_deref(),
            Some("arn:aws:iam::123456789012:mfa/fred")
        );
        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/cache"));
        assert_eq!(config.session_ttl, Duration::from_secs(3600));
    }

    #[test]
    fn test_default_durations() {
        let config = Config::new("dev");
        assert_eq!(config.session_ttl, Duration::from_secs(43200));
        assert_eq!(config.assume_role_ttl, Duration::from_secs(3600));
    }
}
