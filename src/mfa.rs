//! MFA prompting and the cached session token exchange.

use crate::cache::CredentialCache;
use crate::sts::TokenService;
use crate::{MfaSessionError, Result, TemporaryCredentials};
use async_trait::async_trait;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

/// Source of MFA one-time codes.
///
/// The default implementation prompts on the terminal; tests inject a
/// scripted source instead.
#[async_trait]
pub trait MfaTokenSource: Send + Sync {
    /// Produces a code for the given MFA device serial.
    async fn mfa_code(&self, serial: &str) -> Result<String>;
}

/// Prompts for the MFA code on stderr and reads it from stdin.
pub struct StdinMfaPrompt;

#[async_trait]
impl MfaTokenSource for StdinMfaPrompt {
    async fn mfa_code(&self, serial: &str) -> Result<String> {
        let serial = serial.to_string();

        let code = tokio::task::spawn_blocking(move || -> Result<String> {
            let mut stderr = std::io::stderr();
            write!(stderr, "MFA code for {serial}: ")?;
            stderr.flush()?;

            let mut line = String::new();
            std::io::stdin().read_line(&mut line)?;
            Ok(line.trim().to_string())
        })
        .await
        .map_err(|e| MfaSessionError::MfaPrompt(e.to_string()))??;

        if code.is_empty() {
            return Err(MfaSessionError::MfaPrompt("empty MFA code".to_string()));
        }

        Ok(code)
    }
}

/// Exchanges an MFA code for session token credentials, consulting the
/// on-disk cache first.
///
/// The MFA serial is either configured up front or derived from the caller
/// identity as `arn:aws:iam::{account}:mfa/{user}`. The serial lookup and
/// the prompt only happen on a cache miss.
pub struct CachedMfaSessionFactory {
    sts: Arc<dyn TokenService>,
    cache: CredentialCache,
    token_source: Arc<dyn MfaTokenSource>,
    profile: String,
    mfa_serial: Option<String>,
    session_ttl: Duration,
}

impl CachedMfaSessionFactory {
    pub fn new(
        sts: Arc<dyn TokenService>,
        cache: CredentialCache,
        token_source: Arc<dyn MfaTokenSource>,
        profile: impl Into<String>,
        mfa_serial: Option<String>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sts,
            cache,
            token_source,
            profile: profile.into(),
            mfa_serial,
            session_ttl,
        }
    }

    /// Returns session token credentials, from the cache when a valid entry
    /// exists, otherwise via an MFA prompt and GetSessionToken.
    pub async fn session_token(&self) -> Result<TemporaryCredentials> {
        let key = CredentialCache::cache_key(&self.profile, self.mfa_serial.as_deref());

        if let Some(credentials) = self.cache.load(&key).await? {
            return Ok(credentials);
        }

        tracing::info!(profile = %self.profile, "no cached session, MFA exchange required");

        let serial = self.resolve_serial().await?;
        let code = self.token_source.mfa_code(&serial).await?;
        let credentials = self
            .sts
            .session_token(&serial, &code, self.session_ttl)
            .await?;

        self.cache.save(&key, &credentials).await?;

        Ok(credentials)
    }

    async fn resolve_serial(&self) -> Result<String> {
        if let Some(serial) = &self.mfa_serial {
            return Ok(serial.clone());
        }

        let identity = self.sts.caller_identity().await?;
        let serial = format!(
            "arn:aws:iam::{}:mfa/{}",
            identity.account,
            identity.user_name()
        );

        tracing::debug!(serial = %serial, "derived MFA serial from caller identity");
        Ok(serial)
    }
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use crate::testing::{MockMfaPrompt, MockTokenService};
    use chrono::Utc;
    use tempfile::tempdir;

    async fn factory(
        dir: &std::path::Path,
        sts: Arc<MockTokenService>,
        prompt: Arc<MockMfaPrompt>,
        serial: Option<String>,
    ) -> CachedMfaSessionFactory {
        let cache = CredentialCache::new(dir).await.unwrap();
        CachedMfaSessionFactory::new(
            sts,
            cache,
            prompt,
            "dev",
            serial,
            Duration::from_secs(43200),
        )
    }

    #[tokio::test]
    async fn test_cache_miss_prompts_and_caches() {
        let dir = tempdir().unwrap();
        let sts = Arc::new(MockTokenService::new());
        let prompt = Arc::new(MockMfaPrompt::new("123456"));

        let factory = factory(dir.path(), sts.clone(), prompt.clone(), None).await;

        let creds = factory.session_token().await.unwrap();
        assert_eq!(creds, sts.session_credentials());
        assert_eq!(prompt.prompt_count(), 1);
        assert_eq!(sts.session_token_calls(), 1);

        // second call hits the cache
        factory.session_token().await.unwrap();
        assert_eq!(prompt.prompt_count(), 1);
        assert_eq!(sts.session_token_calls(), 1);
    }

    #[tokio::test]
    async fn test_configured_serial_skips_identity_lookup() {
        let dir = tempdir().unwrap();
        let sts = Arc::new(MockTokenService::new());
        let prompt = Arc::new(MockMfaPrompt::new("123456"));

        let factory = factory(
            dir.path(),
            sts.clone(),
            prompt,
            Some("arn:aws:iam::123456789012:mfa/fred".to_string()),
        )
        .await;

        factory.session_token().await.unwrap();

        assert_eq!(sts.caller_identity_calls(), 0);
        assert_eq!(
            sts.last_serial().as_deref(),
            Some("arn:aws:iam::123456789012:mfa/fred")
        );
    }

    #[tokio::test]
    async fn test_derived_serial_uses_caller_identity() {
        let dir = tempdir().unwrap();
        let sts = Arc::new(MockTokenService::new());
        let prompt = Arc::new(MockMfaPrompt::new("123456"));

        let factory = factory(dir.path(), sts.clone(), prompt, None).await;
        factory.session_token().await.unwrap();

        assert_eq!(sts.caller_identity_calls(), 1);
        assert_eq!(
            sts.last_serial().as_deref(),
            Some("arn:aws:iam::123456789012:mfa/fred")
        );
    }

    #[tokio::test]
    async fn test_expired_cache_entry_forces_fresh_exchange() {
        let dir = tempdir().unwrap();
        let sts = Arc::new(MockTokenService::new());
        let prompt = Arc::new(MockMfaPrompt::new("123456"));

        let cache = CredentialCache::new(dir.path()).await.unwrap();
        let expired = TemporaryCredentials {
            access_key_id: "ASIAOLD".to_string(),
            secret_access_key: "old".to_string(),
            session_token: "old".to_string(),
            expiration: Utc::now() - chrono::Duration::minutes(5),
        };
        cache
            .save(&CredentialCache::cache_key("dev", None), &expired)
            .await
            .unwrap();

        let factory = factory(dir.path(), sts.clone(), prompt.clone(), None).await;
        let creds = factory.session_token().await.unwrap();

        assert_ne!(creds.access_key_id, "ASIAOLD");
        assert_eq!(prompt.prompt_count(), 1);
    }
}
