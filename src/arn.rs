//! AWS ARN parsing.

use crate::MfaSessionError;
use std::str::FromStr;

/// A parsed AWS ARN.
///
/// Handles the three shapes ARNs come in:
///
/// - `arn:aws:iam::123456789012:role/administrator` (resource type and
///   resource separated by a slash)
/// - `arn:aws:iam::123456789012:role:common-roles/developer` (separated by
///   a colon)
/// - `arn:aws:s3:::my-bucket` (bare resource, no type)
///
/// Nested resource paths are kept intact: the resource of
/// `role/common-roles/developer` is `common-roles/developer`.
///
/// # Example
///
/// ```
/// use mfa_session::Arn;
///
/// let arn: Arn = "arn:aws:iam::123456789012:role/demo".parse().unwrap();
/// assert_eq!(arn.account, "123456789012");
/// assert_eq!(arn.resource_type.as_deref(), Some("role"));
/// assert_eq!(arn.resource, "demo");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arn {
    /// The original ARN string.
    pub full_arn: String,
    /// Partition (e.g., "aws", "aws-cn").
    pub partition: String,
    /// Service namespace (e.g., "iam", "sts").
    pub service: String,
    /// Region (empty for global services like IAM).
    pub region: String,
    /// Account id (may be empty).
    pub account: String,
    /// Resource type (e.g., "role"), if the ARN carries one.
    pub resource_type: Option<String>,
    /// Resource name or path.
    pub resource: String,
}

impl FromStr for Arn {
    type Err = MfaSessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let elements: Vec<&str> = s.splitn(7, ':').collect();

        if elements.len() < 6 || elements[0] != "arn" {
            return Err(MfaSessionError::InvalidArn(s.to_string()));
        }

        let (resource_type, resource) = match elements.len() {
            7 => (Some(elements[5].to_string()), elements[6].to_string()),
            _ => match elements[5].split_once('/') {
                Some((ty, rest)) => (Some(ty.to_string()), rest.to_string()),
                None => (None, elements[5].to_string()),
            },
        };

        if resource.is_empty() {
            return Err(MfaSessionError::InvalidArn(s.to_string()));
        }

        Ok(Self {
            full_arn: s.to_string(),
            partition: elements[1].to_string(),
            service: elements[2].to_string(),
            region: elements[3].to_string(),
            account: elements[4].to_string(),
            resource_type,
            resource,
        })
    }
}

impl std::fmt::Display for Arn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.full_arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_role_arn() {
        let arn: Arn = "arn:aws:iam::123456789012:role/administrator"
            .parse()
            .unwrap();

        assert_eq!(arn.account, "123456789012");
        assert_eq!(arn.resource_type.as_deref(), Some("role"));
        assert_eq!(arn.resource, "administrator");
    }

    #[test]
    fn test_role_arn_with_slash() {
        let arn: Arn = "arn:aws:iam::123456789012:role/common-roles/developer"
            .parse()
            .unwrap();

        assert_eq!(arn.account, "123456789012");
        assert_eq!(arn.resource_type.as_deref(), Some("role"));
        assert_eq!(arn.resource, "common-roles/developer");
    }

    #[test]
    fn test_role_arn_with_colon() {
        let arn: Arn = "arn:aws:iam::123456789012:role:common-roles/developer"
            .parse()
            .unwrap();

        assert_eq!(arn.account, "123456789012");
        assert_eq!(arn.resource_type.as_deref(), Some("role"));
        assert_eq!(arn.resource, "common-roles/developer");
    }

    #[test]
    fn test_bare_resource() {
        let arn: Arn = "arn:aws:s3:::my-bucket".parse().unwrap();

        assert_eq!(arn.service, "s3");
        assert_eq!(arn.resource_type, None);
        assert_eq!(arn.resource, "my-bucket");
    }

    #[test]
    fn test_invalid_arn() {
        assert!("not-an-arn".parse::<Arn>().is_err());
        assert!("arn:aws:iam".parse::<Arn>().is_err());
        assert!("foo:aws:iam::123456789012:role/demo".parse::<Arn>().is_err());
    }
}
