//! Session providers: hold MFA-backed temporary credentials and assume roles
//! with them.

use crate::cache::CredentialCache;
use crate::mfa::{CachedMfaSessionFactory, MfaTokenSource, StdinMfaPrompt};
use crate::sts::{StsTokenService, TokenService};
use crate::{Arn, Config, Result, Session, TemporaryCredentials};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Region used for identity lookups that need one but have no caller
/// preference.
const IDENTITY_REGION: &str = "eu-west-1";

/// Interface for anything that can hand out role-scoped sessions from a set
/// of temporary credentials.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// The temporary credentials in use by the base session.
    fn temporary_credentials(&self) -> &TemporaryCredentials;

    /// Assumes `role_arn` and returns the resulting credentials.
    async fn assume_role_credentials(
        &self,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
    ) -> Result<TemporaryCredentials>;

    /// Assumes `role_arn` and returns a session scoped to it in
    /// `region_name`.
    async fn assume_role_session(
        &self,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
    ) -> Result<Session>;

    /// The user name of the user who owns the base session.
    async fn user_name(&self) -> Result<String>;
}

/// [`SessionProvider`] backed by MFA-authenticated, disk-cached temporary
/// credentials.
///
/// Creating a provider performs the session token exchange once: the cache
/// is consulted, and only on a miss (or expired entry) is the user prompted
/// for an MFA code. Every role assumption afterwards reuses the temporary
/// credentials without further prompts.
pub struct MfaSessionProvider {
    sts: Arc<dyn TokenService>,
    credentials: TemporaryCredentials,
    assume_role_ttl: Duration,
}

impl std::fmt::Debug for MfaSessionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MfaSessionProvider").finish_non_exhaustive()
    }
}

impl MfaSessionProvider {
    /// Creates a provider for the given profile with default settings,
    /// prompting on the terminal when an MFA exchange is needed.
    ///
    /// # Errors
    ///
    /// Surfaces STS failures (invalid MFA code, unreachable endpoint) and
    /// cache I/O errors unmodified.
    pub async fn create(profile_name: &str) -> Result<Self> {
        Self::create_with(Config::new(profile_name)).await
    }

    /// Creates a provider from an explicit [`Config`].
    pub async fn create_with(config: Config) -> Result<Self> {
        let sts = Arc::new(StsTokenService::from_profile(&config.profile).await);
        Self::with_token_service(config, sts, Arc::new(StdinMfaPrompt)).await
    }

    /// Creates a provider with injected STS and MFA code sources.
    ///
    /// This is the seam tests use; [`create`](Self::create) wires in the real
    /// SDK client and the stdin prompt.
    pub async fn with_token_service(
        config: Config,
        sts: Arc<dyn TokenService>,
        token_source: Arc<dyn MfaTokenSource>,
    ) -> Result<Self> {
        if let Some(serial) = &config.mfa_serial {
            serial.parse::<Arn>()?;
        }

        let cache = CredentialCache::new(config.cache_dir()?).await?;
        let factory = CachedMfaSessionFactory::new(
            sts.clone(),
            cache,
            token_source,
            &config.profile,
            config.mfa_serial.clone(),
            config.session_ttl,
        );

        let credentials = factory.session_token().await?;

        Ok(Self {
            sts,
            credentials,
            assume_role_ttl: config.assume_role_ttl,
        })
    }
}

#[async_trait]
impl SessionProvider for MfaSessionProvider {
    fn temporary_credentials(&self) -> &TemporaryCredentials {
        &self.credentials
    }

    async fn assume_role_credentials(
        &self,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
    ) -> Result<TemporaryCredentials> {
        let arn: Arn = role_arn.parse()?;
        tracing::debug!(role = %arn.resource, region = region_name, "assuming role");

        self.sts
            .assume_role(
                &self.credentials,
                role_arn,
                region_name,
                session_name,
                self.assume_role_ttl,
            )
            .await
    }

    async fn assume_role_session(
        &self,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
    ) -> Result<Session> {
        let credentials = self
            .assume_role_credentials(role_arn, region_name, session_name)
            .await?;

        Ok(Session::new(credentials, region_name))
    }

    async fn user_name(&self) -> Result<String> {
        let identity = self
            .sts
            .caller_identity_with(&self.credentials, IDENTITY_REGION)
            .await?;

        Ok(identity.user_name().to_string())
    }
}
