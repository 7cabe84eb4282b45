//! mfa-session - disk-cached MFA sessions for AWS role assumption.
//!
//! A thin layer over the AWS SDK that caches MFA-authenticated temporary
//! credentials on local disk, so interactive CLI tools prompt for an MFA
//! code once per session lifetime instead of on every invocation.
//!
//! The flow:
//!
//! 1. Build a base session from a named profile.
//! 2. Exchange it plus an MFA code for temporary credentials via STS
//!    `GetSessionToken`, caching the result keyed by profile and MFA serial.
//! 3. Assume further roles with the cached credentials via STS `AssumeRole`,
//!    handing back a [`Session`] usable with any AWS service client.
//!
//! On repeated runs within the credential lifetime the cache is reused and
//! no prompt appears. Expired or malformed cache entries are discarded and
//! a fresh MFA exchange is performed.
//!
//! # Quick Start
//!
//! ```no_run
//! use mfa_session::{MfaSessionProvider, SessionProvider};
//!
//! #[tokio::main]
//! async fn main() -> mfa_session::Result<()> {
//!     // Prompts for an MFA code only if no valid cached session exists
//!     let provider = MfaSessionProvider::create("dev").await?;
//!
//!     let session = provider
//!         .assume_role_session(
//!             "arn:aws:iam::123456789012:role/demo",
//!             "eu-west-1",
//!             "my-tool",
//!         )
//!         .await?;
//!
//!     let sts = aws_sdk_sts::Client::new(session.sdk_config());
//!     println!("{:?}", sts.get_caller_identity().send().await);
//!
//!     Ok(())
//! }
//! ```
//!
//! # What this crate does not do
//!
//! All network behavior is the SDK's: no extra retries, no timeouts of its
//! own, and STS errors (bad MFA code, unreachable endpoint) surface
//! unmodified. The cache is plain JSON on disk - not encrypted, and
//! concurrent writers race with last-writer-wins.

pub mod arn;
pub mod cache;
pub mod config;
pub mod credentials;
pub mod error;
pub mod mfa;
pub mod provider;
pub mod session;
pub mod sts;

#[cfg(feature = "mock")]
pub mod testing;

pub use arn::Arn;
pub use cache::CredentialCache;
pub use config::Config;
pub use credentials::TemporaryCredentials;
pub use error::{MfaSessionError, Result};
pub use mfa::{MfaTokenSource, StdinMfaPrompt};
pub use provider::{MfaSessionProvider, SessionProvider};
pub use session::Session;
pub use sts::{CallerIdentity, StsTokenService, TokenService};
