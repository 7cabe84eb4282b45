//! STS operations behind a trait so providers can be tested without AWS.

use crate::{MfaSessionError, Result, TemporaryCredentials};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::SharedCredentialsProvider;
use aws_sdk_sts::Client;
use std::time::Duration;

/// Identity of the caller as reported by STS GetCallerIdentity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    /// Account id.
    pub account: String,
    /// Full caller ARN.
    pub arn: String,
    /// Unique caller id.
    pub user_id: String,
}

impl CallerIdentity {
    /// The user name, taken from the last path segment of the caller ARN.
    pub fn user_name(&self) -> &str {
        self.arn.rsplit('/').next().unwrap_or(&self.arn)
    }
}

/// The STS calls this crate depends on.
///
/// [`StsTokenService`] is the real implementation; the `mock` feature ships
/// an in-memory double for tests.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// GetCallerIdentity using the base (profile) credentials.
    async fn caller_identity(&self) -> Result<CallerIdentity>;

    /// GetCallerIdentity using the given temporary credentials.
    async fn caller_identity_with(
        &self,
        credentials: &TemporaryCredentials,
        region_name: &str,
    ) -> Result<CallerIdentity>;

    /// GetSessionToken with an MFA serial and code.
    async fn session_token(
        &self,
        serial: &str,
        code: &str,
        duration: Duration,
    ) -> Result<TemporaryCredentials>;

    /// AssumeRole using the given temporary credentials.
    async fn assume_role(
        &self,
        credentials: &TemporaryCredentials,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
        duration: Duration,
    ) -> Result<TemporaryCredentials>;
}

/// [`TokenService`] backed by the AWS SDK STS client.
///
/// Holds the base `SdkConfig` loaded from a named profile. Calls that act on
/// temporary credentials build a scoped client with those credentials and the
/// requested region instead of the profile's.
pub struct StsTokenService {
    base: SdkConfig,
}

impl StsTokenService {
    /// Loads the base configuration for `profile` and wraps it.
    pub async fn from_profile(profile: &str) -> Self {
        let base = aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .load()
            .await;

        Self { base }
    }

    /// Wraps an already-loaded configuration.
    pub fn new(base: SdkConfig) -> Self {
        Self { base }
    }

    fn scoped_client(&self, credentials: &TemporaryCredentials, region_name: &str) -> Client {
        let config = SdkConfig::builder()
            .behavior_version(BehaviorVersion::latest())
            .credentials_provider(SharedCredentialsProvider::new(
                credentials.to_sdk_credentials("MfaSessionProvider"),
            ))
            .region(Region::new(region_name.to_string()))
            .build();

        Client::new(&config)
    }

    async fn identity(client: &Client) -> Result<CallerIdentity> {
        let output = client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("get-caller-identity failed: {e}"))?;

        Ok(CallerIdentity {
            account: output.account().unwrap_or_default().to_string(),
            arn: output.arn().unwrap_or_default().to_string(),
            user_id: output.user_id().unwrap_or_default().to_string(),
        })
    }
}

#[async_trait]
impl TokenService for StsTokenService {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        Self::identity(&Client::new(&self.base)).await
    }

    async fn caller_identity_with(
        &self,
        credentials: &TemporaryCredentials,
        region_name: &str,
    ) -> Result<CallerIdentity> {
        Self::identity(&self.scoped_client(credentials, region_name)).await
    }

    async fn session_token(
        &self,
        serial: &str,
        code: &str,
        duration: Duration,
    ) -> Result<TemporaryCredentials> {
        let client = Client::new(&self.base);

        let output = client
            .get_session_token()
            .duration_seconds(duration.as_secs() as i32)
            .serial_number(serial)
            .token_code(code)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("get-session-token failed: {e}"))?;

        let credentials = output
            .credentials()
            .ok_or(MfaSessionError::MissingCredentials)?;

        TemporaryCredentials::from_sts(credentials)
    }

    async fn assume_role(
        &self,
        credentials: &TemporaryCredentials,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
        duration: Duration,
    ) -> Result<TemporaryCredentials> {
        let client = self.scoped_client(credentials, region_name);

        let output = client
            .assume_role()
            .role_arn(role_arn)
            .role_session_name(session_name)
            .duration_seconds(duration.as_secs() as i32)
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("assume-role failed: {e}"))?;

        let credentials = output
            .credentials()
            .ok_or(MfaSessionError::MissingCredentials)?;

        TemporaryCredentials::from_sts(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_name_from_user_arn() {
        let identity = CallerIdentity {
            account: "123456789012".to_string(),
            arn: "arn:aws:iam::123456789012:user/fred".to_string(),
            user_id: "AIDAEXAMPLE".to_string(),
        };

        assert_eq!(identity.user_name(), "fred");
    }

    #[test]
    fn test_user_name_from_assumed_role_arn() {
        let identity = CallerIdentity {
            account: "496141846484".to_string(),
            arn: "arn:aws:sts::496141846484:assumed-role/admin/fred".to_string(),
            user_id: "AROAEXAMPLE:fred".to_string(),
        };

        assert_eq!(identity.user_name(), "fred");
    }
}
