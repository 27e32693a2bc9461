//! Run configuration.
//!
//! This module holds the immutable [`ScanConfig`], the repository
//! inclusion/exclusion lists and the optional TOML configuration file.
//! Everything here is validated before any repository is touched.

mod error;
mod file;
mod repo_list;
mod scan_config;

pub use error::ConfigError;
pub use file::AuditFile;
pub use repo_list::{RepoNameList, RepoSelection};
pub use scan_config::{ScanConfig, ScanConfigBuilder};

/// Longest organization login GitHub accepts.
const MAX_ORGANIZATION_LEN: usize = 39;

/// Checks that an organization name is a plausible GitHub login.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidOrganization`] describing the problem.
pub fn validate_organization(organization: &str) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::InvalidOrganization {
        organization: organization.to_string(),
        message: message.to_string(),
    };

    if organization.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if organization.len() > MAX_ORGANIZATION_LEN {
        return Err(invalid("must be at most 39 characters"));
    }
    if !organization
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return Err(invalid("may only contain alphanumeric characters or hyphens"));
    }
    if organization.starts_with('-') || organization.ends_with('-') {
        return Err(invalid("must not begin or end with a hyphen"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_organizations() {
        assert!(validate_organization("acme").is_ok());
        assert!(validate_organization("acme-corp-42").is_ok());
    }

    #[test]
    fn rejects_invalid_organizations() {
        let too_long = "a".repeat(40);
        for org in ["", "-acme", "acme-", "acme corp", "acme/infra", too_long.as_str()] {
            assert!(
                matches!(
                    validate_organization(org),
                    Err(ConfigError::InvalidOrganization { .. })
                ),
                "{org:?} should be rejected"
            );
        }
    }
}
