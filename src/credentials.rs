//! Temporary credential data as returned by STS and stored in the cache.

use crate::{MfaSessionError, Result};
use aws_credential_types::Credentials as SdkCredentials;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A set of STS-issued temporary credentials.
///
/// Serialized with the field names the AWS SDKs use in their JSON credential
/// caches (`AccessKeyId`, `SecretAccessKey`, `SessionToken`, `Expiration`),
/// so cache files stay readable by tooling that understands that format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TemporaryCredentials {
    /// Access key id of the temporary credentials.
    pub access_key_id: String,
    /// Secret access key of the temporary credentials.
    pub secret_access_key: String,
    /// Session token that must accompany the key pair.
    pub session_token: String,
    /// When the credentials stop working.
    pub expiration: DateTime<Utc>,
}

impl TemporaryCredentials {
    /// Returns true if the credentials have expired.
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expiration
    }

    /// Converts to the AWS SDK credential type for use in an `SdkConfig`.
    ///
    /// `provider_name` identifies the credential source in SDK diagnostics.
    pub fn to_sdk_credentials(&self, provider_name: &'static str) -> SdkCredentials {
        SdkCredentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.clone(),
            Some(self.session_token.clone()),
            Some(std::time::SystemTime::from(self.expiration)),
            provider_name,
        )
    }

    /// Builds from the STS wire type.
    ///
    /// # Errors
    ///
    /// Returns [`MfaSessionError::MissingCredentials`] if the expiration
    /// timestamp is out of range.
    pub fn from_sts(creds: &aws_sdk_sts::types::Credentials) -> Result<Self> {
        let expiration = creds.expiration();
        let expiration =
            DateTime::from_timestamp(expiration.secs(), expiration.subsec_nanos())
                .ok_or(MfaSessionError::MissingCredentials)?;

        Ok(Self {
            access_key_id: creds.access_key_id().to_string(),
            secret_access_key: creds.secret_access_key().to_string(),
            session_token: creds.session_token().to_string(),
            expiration,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(expiration: DateTime<Utc>) -> TemporaryCredentials {
        TemporaryCredentials {
            access_key_id: "ASIAEXAMPLE".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: "token".to_string(),
            expiration,
        }
    }

    #[test]
    fn test_expiry_check() {
        assert!(!sample(Utc::now() + Duration::hours(1)).is_expired());
        assert!(sample(Utc::now() - Duration::hours(1)).is_expired());
    }

    #[test]
    fn test_serde_uses_sdk_field_names() {
        let creds = sample(Utc::now() + Duration::hours(1));
        let json = serde_json::to_string(&creds).unwrap();

        assert!(json.contains("\"AccessKeyId\""));
        assert!(json.contains("\"SecretAccessKey\""));
        assert!(json.contains("\"SessionToken\""));
        assert!(json.contains("\"Expiration\""));
    }

    #[test]
    fn test_roundtrip_through_sdk_type() {
        let creds = sample(Utc::now() + Duration::hours(1));
        let sdk = creds.to_sdk_credentials("test");

        assert_eq!(sdk.access_key_id(), "ASIAEXAMPLE");
        assert_eq!(sdk.session_token(), Some("token"));
        assert!(sdk.expiry().is_some());
    }
}
