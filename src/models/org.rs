//! Organization model

use serde::{Deserialize, Serialize};

use super::ids::{OrgId, UserId};
use super::meta::Metadata;
use super::status::{Role, Status};
use super::user::NewUser;

/// An organization. Each one has exactly one owning user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Org {
    /// Unique identifier
    pub id: OrgId,

    /// Organization name, unique across the store
    pub name: String,

    /// Owning user; always a member of this org
    pub owner: UserId,

    pub(crate) meta: Metadata,
}

impl Org {
    pub fn meta(&self) -> &Metadata {
        &self.meta
    }

    /// Validate the organization
    pub fn validate(&self) -> Result<(), OrgValidationError> {
        validate_name(&self.name)
    }
}

impl std::fmt::Display for Org {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.meta.status)
    }
}

/// Input for creating an organization together with its owner
#[derive(Debug, Clone)]
pub struct NewOrg {
    pub name: String,
    pub role: Role,
    /// Initial status of the org; the owner always ends up Active
    pub status: Status,
    pub owner: NewUser,
}

impl NewOrg {
    pub fn new(name: impl Into<String>, owner: NewUser) -> Self {
        Self {
            name: name.into(),
            role: Role::Normal,
            status: Status::Unconfirmed,
            owner,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }
}

pub(crate) fn validate_name(name: &str) -> Result<(), OrgValidationError> {
    if name.trim().is_empty() {
        return Err(OrgValidationError::EmptyName);
    }
    if name.len() > 100 {
        return Err(OrgValidationError::NameTooLong(name.len()));
    }
    Ok(())
}

/// Validation errors for organizations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrgValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl std::fmt::Display for OrgValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Organization name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Organization name too long ({} chars, max 100)", len)
            }
        }
    }
}

impl std::error::Error for OrgValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_validation() {
        assert!(validate_name("acme").is_ok());
        assert_eq!(validate_name("  "), Err(OrgValidationError::EmptyName));
        assert!(matches!(
            validate_name(&"x".repeat(101)),
            Err(OrgValidationError::NameTooLong(101))
        ));
    }
}
