use std::fmt;

use crate::names::{validate_user_name, NameError};

/// Owner tag written into store manifests for system-wide installs.
pub const SYSTEM_WIDE_OWNER: &str = "system-wide";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    SystemWide,
    User(String),
}

impl Scope {
    pub fn user(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        validate_user_name(&name)?;
        Ok(Self::User(name))
    }

    pub fn owner_tag(&self) -> &str {
        match self {
            Self::SystemWide => SYSTEM_WIDE_OWNER,
            Self::User(name) => name,
        }
    }

    pub fn from_owner_tag(tag: &str) -> Self {
        if tag == SYSTEM_WIDE_OWNER {
            Self::SystemWide
        } else {
            Self::User(tag.to_string())
        }
    }

    /// User-scoped scripts never run with the invoking identity.
    pub fn requires_deescalation(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SystemWide => f.write_str(SYSTEM_WIDE_OWNER),
            Self::User(name) => write!(f, "user:{name}"),
        }
    }
}
