//! User roles as reported by the profile endpoint.

use serde::{Deserialize, Serialize};

/// Role attached to a user profile.
///
/// The remote API serializes roles in SCREAMING_SNAKE_CASE (`"ADMIN"`,
/// `"CUSTOMER"`). The role is only trustworthy after a successful profile
/// fetch; privilege checks fail closed to [`Role::Customer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Full access to the admin console.
    Admin,
    /// Regular storefront customer.
    Customer,
}

impl Role {
    /// Whether this role grants admin privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Admin => write!(f, "ADMIN"),
            Self::Customer => write!(f, "CUSTOMER"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "CUSTOMER" => Ok(Self::Customer),
            _ => Err(format!("invalid role: {s}")),
        }
    }
}
