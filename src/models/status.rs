//! Status and role enums
//!
//! Both map to fixed integer codes in the database and in audit details.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::VaultError;

/// Lifecycle status of an organization or user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i64", try_from = "i64")]
pub enum Status {
    /// Created but not yet confirmed
    Unconfirmed,
    /// In good standing
    Active,
    /// Disabled
    Inactive,
}

impl Status {
    /// Database code
    pub fn code(self) -> i64 {
        match self {
            Self::Unconfirmed => 1,
            Self::Active => 2,
            Self::Inactive => 3,
        }
    }

    /// Parse status from a name or numeric code
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "unconfirmed" | "1" => Some(Self::Unconfirmed),
            "active" | "2" => Some(Self::Active),
            "inactive" | "3" => Some(Self::Inactive),
            _ => None,
        }
    }
}

impl TryFrom<i64> for Status {
    type Error = VaultError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Unconfirmed),
            2 => Ok(Self::Active),
            3 => Ok(Self::Inactive),
            other => Err(VaultError::Validation(format!("Unknown status code: {}", other))),
        }
    }
}

impl From<Status> for i64 {
    fn from(status: Status) -> Self {
        status.code()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconfirmed => write!(f, "Unconfirmed"),
            Self::Active => write!(f, "Active"),
            Self::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Role of an organization or user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(into = "i64", try_from = "i64")]
pub enum Role {
    #[default]
    Normal,
    Admin,
    /// Records created by test automation
    Test,
}

impl Role {
    /// Database code
    pub fn code(self) -> i64 {
        match self {
            Self::Normal => 1,
            Self::Admin => 2,
            Self::Test => 3,
        }
    }

    /// Parse role from a name or numeric code
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" | "1" => Some(Self::Normal),
            "admin" | "2" => Some(Self::Admin),
            "test" | "3" => Some(Self::Test),
            _ => None,
        }
    }
}

impl TryFrom<i64> for Role {
    type Error = VaultError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Normal),
            2 => Ok(Self::Admin),
            3 => Ok(Self::Test),
            other => Err(VaultError::Validation(format!("Unknown role code: {}", other))),
        }
    }
}

impl From<Role> for i64 {
    fn from(role: Role) -> Self {
        role.code()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal => write!(f, "Normal"),
            Self::Admin => write!(f, "Admin"),
            Self::Test => write!(f, "Test"),
        }
    }
}

macro_rules! integer_column {
    ($name:ident) => {
        impl ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
                Ok(ToSqlOutput::from(self.code()))
            }
        }

        impl FromSql for $name {
            fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
                let code = value.as_i64()?;
                $name::try_from(code).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
        }
    };
}

integer_column!(Status);
integer_column!(Role);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Status::Unconfirmed.code(), 1);
        assert_eq!(Status::Active.code(), 2);
        assert_eq!(Status::Inactive.code(), 3);
    }

    #[test]
    fn test_unknown_status_rejected() {
        assert!(Status::try_from(99).is_err());
        assert!(Status::parse("deleted").is_none());
    }

    #[test]
    fn test_parse_by_name_or_code() {
        assert_eq!(Status::parse("Active"), Some(Status::Active));
        assert_eq!(Status::parse("3"), Some(Status::Inactive));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
    }

    #[test]
    fn test_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Status::Active).unwrap(), "2");
        let role: Role = serde_json::from_str("3").unwrap();
        assert_eq!(role, Role::Test);
        assert!(serde_json::from_str::<Role>("7").is_err());
    }
}
