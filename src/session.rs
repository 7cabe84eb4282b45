//! The assumed-role session handed back to callers.

use crate::TemporaryCredentials;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;

/// An ephemeral session scoped to an assumed role.
///
/// Wraps an [`SdkConfig`] carrying the role credentials and the requested
/// region; pass [`Session::sdk_config`] to any AWS service client
/// constructor. Sessions are never persisted - credential refresh within a
/// call's lifetime is left to the SDK.
///
/// # Example
///
/// ```no_run
/// # async fn demo(session: mfa_session::Session) {
/// let sts = aws_sdk_sts::Client::new(session.sdk_config());
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Session {
    sdk_config: SdkConfig,
    credentials: TemporaryCredentials,
    region: String,
}

impl Session {
    /// Builds a session from role credentials and a region.
    pub fn new(credentials: TemporaryCredentials, region_name: impl Into<String>) -> Self {
        let region = region_name.into();

        let sdk_config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(SharedCredentialsProvider::new(
                credentials.to_sdk_credentials("AssumedRoleSession"),
            ))
            .region(Region::new(region.clone()))
            .build();

        Self {
            sdk_config,
            credentials,
            region,
        }
    }

    /// The SDK configuration for building service clients.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.sdk_config
    }

    /// The role credentials backing this session.
    pub fn credentials(&self) -> &TemporaryCredentials {
        &self.credentials
    }

    /// The region this session is scoped to.
    pub fn region(&self) -> &str {
        &self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn test_session_carries_region_and_credentials() {
        let credentials = TemporaryCredentials {
            access_key_id: "ASIAROLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration: Utc::now() + Duration::hours(1),
        };

        let session = Session::new(credentials.clone(), "eu-west-1");

        assert_eq!(session.region(), "eu-west-1");
        assert_eq!(session.credentials(), &credentials);
        assert_eq!(
            session.sdk_config().region().map(|r| r.as_ref()),
            Some("eu-west-1")
        );
    }
}
