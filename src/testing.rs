//! In-memory doubles for testing code built on this crate.
//!
//! [`MockTokenService`] answers the STS calls from canned data and records
//! what it was asked, with error injection for failure paths.
//! [`MockMfaPrompt`] returns a scripted code and counts how often it was
//! consulted.

use crate::mfa::MfaTokenSource;
use crate::sts::{CallerIdentity, TokenService};
use crate::{MfaSessionError, Result, TemporaryCredentials};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration as StdDuration;

/// Arguments of a recorded AssumeRole call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssumeRoleCall {
    pub role_arn: String,
    pub region_name: String,
    pub session_name: String,
    pub duration: StdDuration,
}

/// In-memory [`TokenService`].
///
/// Returns a fixed caller identity, fixed session token credentials
/// (`ASIASESSION...`), and fixed role credentials (`ASIAROLE...`), and
/// records the calls it receives.
///
/// # Example
///
/// ```
/// use mfa_session::testing::MockTokenService;
/// use mfa_session::MfaSessionError;
///
/// let sts = MockTokenService::new();
/// sts.inject_session_token_error(MfaSessionError::MfaPrompt("bad code".into()));
/// ```
pub struct MockTokenService {
    identity: CallerIdentity,
    session_credentials: TemporaryCredentials,
    role_credentials: TemporaryCredentials,

    session_token_error: Mutex<Option<MfaSessionError>>,
    assume_role_error: Mutex<Option<MfaSessionError>>,

    caller_identity_calls: AtomicUsize,
    session_token_calls: AtomicUsize,
    last_serial: Mutex<Option<String>>,
    assume_role_calls: Mutex<Vec<AssumeRoleCall>>,
}

impl MockTokenService {
    pub fn new() -> Self {
        Self::with_identity(CallerIdentity {
            account: "123456789012".to_string(),
            arn: "arn:aws:iam::123456789012:user/fred".to_string(),
            user_id: "AIDAEXAMPLE".to_string(),
        })
    }

    pub fn with_identity(identity: CallerIdentity) -> Self {
        let expiration = Utc::now() + Duration::hours(1);

        Self {
            identity,
            session_credentials: TemporaryCredentials {
                access_key_id: "ASIASESSION".to_string(),
                secret_access_key: "session-secret".to_string(),
                session_token: "session-token".to_string(),
                expiration,
            },
            role_credentials: TemporaryCredentials {
                access_key_id: "ASIAROLE".to_string(),
                secret_access_key: "role-secret".to_string(),
                session_token: "role-token".to_string(),
                expiration,
            },
            session_token_error: Mutex::new(None),
            assume_role_error: Mutex::new(None),
            caller_identity_calls: AtomicUsize::new(0),
            session_token_calls: AtomicUsize::new(0),
            last_serial: Mutex::new(None),
            assume_role_calls: Mutex::new(Vec::new()),
        }
    }

    /// The credentials returned by `session_token`.
    pub fn session_credentials(&self) -> TemporaryCredentials {
        self.session_credentials.clone()
    }

    /// The credentials returned by `assume_role`.
    pub fn role_credentials(&self) -> TemporaryCredentials {
        self.role_credentials.clone()
    }

    /// Makes the next `session_token` call fail with `error`.
    pub fn inject_session_token_error(&self, error: MfaSessionError) {
        *self.session_token_error.lock().unwrap() = Some(error);
    }

    /// Makes the next `assume_role` call fail with `error`.
    pub fn inject_assume_role_error(&self, error: MfaSessionError) {
        *self.assume_role_error.lock().unwrap() = Some(error);
    }

    pub fn caller_identity_calls(&self) -> usize {
        self.caller_identity_calls.load(Ordering::SeqCst)
    }

    pub fn session_token_calls(&self) -> usize {
        self.session_token_calls.load(Ordering::SeqCst)
    }

    /// The serial passed to the most recent `session_token` call.
    pub fn last_serial(&self) -> Option<String> {
        self.last_serial.lock().unwrap().clone()
    }

    /// All recorded `assume_role` calls, oldest first.
    pub fn assume_role_calls(&self) -> Vec<AssumeRoleCall> {
        self.assume_role_calls.lock().unwrap().clone()
    }
}

impl Default for MockTokenService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenService for MockTokenService {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        self.caller_identity_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.identity.clone())
    }

    async fn caller_identity_with(
        &self,
        _credentials: &TemporaryCredentials,
        _region_name: &str,
    ) -> Result<CallerIdentity> {
        Ok(self.identity.clone())
    }

    async fn session_token(
        &self,
        serial: &str,
        _code: &str,
        _duration: StdDuration,
    ) -> Result<TemporaryCredentials> {
        if let Some(error) = self.session_token_error.lock().unwrap().take() {
            return Err(error);
        }

        self.session_token_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_serial.lock().unwrap() = Some(serial.to_string());

        Ok(self.session_credentials.clone())
    }

    async fn assume_role(
        &self,
        _credentials: &TemporaryCredentials,
        role_arn: &str,
        region_name: &str,
        session_name: &str,
        duration: StdDuration,
    ) -> Result<TemporaryCredentials> {
        if let Some(error) = self.assume_role_error.lock().unwrap().take() {
            return Err(error);
        }

        self.assume_role_calls.lock().unwrap().push(AssumeRoleCall {
            role_arn: role_arn.to_string(),
            region_name: region_name.to_string(),
            session_name: session_name.to_string(),
            duration,
        });

        Ok(self.role_credentials.clone())
    }
}

/// [`MfaTokenSource`] returning a scripted code.
pub struct MockMfaPrompt {
    code: String,
    prompts: AtomicUsize,
}

impl MockMfaPrompt {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            prompts: AtomicUsize::new(0),
        }
    }

    /// How many times a code was requested.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MfaTokenSource for MockMfaPrompt {
    async fn mfa_code(&self, _serial: &str) -> Result<String> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.code.clone())
    }
}
