//! Disk-backed cache for MFA-authenticated temporary credentials.
//!
//! One JSON file per cache key, so repeated CLI invocations within the
//! credential lifetime reuse the cached entry instead of prompting for a
//! fresh MFA code.

use crate::{Result, TemporaryCredentials};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// On-disk entry envelope.
///
/// Mirrors the `{"Credentials": {...}}` shape of the AWS SDK JSON credential
/// caches; that format is an external contract and is not redesigned here.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    #[serde(rename = "Credentials")]
    credentials: TemporaryCredentials,
}

/// Credential cache backed by a directory of JSON files.
///
/// # Security
///
/// - The cache directory is created with mode 0700 on Unix
/// - Entry files are created with mode 0600
/// - Malformed or expired entries are deleted on load
///
/// # Concurrency
///
/// Two processes writing the same key race with last-writer-wins semantics;
/// no coordination is attempted.
///
/// # Example
///
/// ```no_run
/// use mfa_session::cache::CredentialCache;
///
/// #[tokio::main]
/// async fn main() -> mfa_session::Result<()> {
///     let cache = CredentialCache::new("/tmp/.mfa-session-cache").await?;
///     let key = CredentialCache::cache_key("dev", Some("arn:aws:iam::123456789012:mfa/fred"));
///
///     if let Some(creds) = cache.load(&key).await? {
///         println!("cached credentials valid until {}", creds.expiration);
///     }
///
///     Ok(())
/// }
/// ```
pub struct CredentialCache {
    dir: PathBuf,
}

impl CredentialCache {
    /// Creates a cache rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation fails.
    pub async fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();

        fs::create_dir_all(&dir).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&dir).await?.permissions();
            perms.set_mode(0o700);
            fs::set_permissions(&dir, perms).await?;
        }

        Ok(Self { dir })
    }

    /// Derives a cache key from a profile name and, when known up front,
    /// the MFA device serial.
    ///
    /// The key doubles as a file name, so anything outside `[A-Za-z0-9._-]`
    /// is replaced with `_`.
    pub fn cache_key(profile: &str, mfa_serial: Option<&str>) -> String {
        let raw = match mfa_serial {
            Some(serial) => format!("{profile}-{serial}"),
            None => profile.to_string(),
        };

        raw.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    fn entry_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }

    /// Loads cached credentials for `key`.
    ///
    /// Returns `Ok(None)` if:
    /// - No entry exists
    /// - The entry has expired
    /// - The file contains invalid JSON
    ///
    /// Invalid or expired entries are deleted so the next save starts clean.
    ///
    /// # Errors
    ///
    /// Returns an error only for unexpected I/O failures (not missing files).
    pub async fn load(&self, key: &str) -> Result<Option<TemporaryCredentials>> {
        let path = self.entry_path(key);

        let data = match fs::read(&path).await {
            Ok(d) => d,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(key, "no session found in cache");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let entry: CacheEntry = match serde_json::from_slice(&data) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding malformed cache entry");
                let _ = fs::remove_file(&path).await;
                return Ok(None);
            }
        };

        if entry.credentials.is_expired() {
            tracing::info!(
                key,
                expired_at = %entry.credentials.expiration,
                "cached session has expired"
            );
            let _ = fs::remove_file(&path).await;
            return Ok(None);
        }

        tracing::info!(key, "found unexpired session data in cache");
        Ok(Some(entry.credentials))
    }

    /// Saves credentials under `key`, replacing any previous entry.
    ///
    /// The file is created with mode 0600 on Unix.
    pub async fn save(&self, key: &str, credentials: &TemporaryCredentials) -> Result<()> {
        let path = self.entry_path(key);

        let entry = CacheEntry {
            credentials: credentials.clone(),
        };
        let json = serde_json::to_vec_pretty(&entry)?;

        let mut file = fs::File::create(&path).await?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = file.metadata().await?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&path, perms).await?;
        }

        file.write_all(&json).await?;
        file.flush().await?;

        Ok(())
    }

    /// Removes the entry for `key`.
    ///
    /// Idempotent - clearing a missing entry is not an error.
    pub async fn clear(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.entry_path(key)).await {
            Ok(_) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
