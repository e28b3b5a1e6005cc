//! User profile as returned by the profile endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Role, UserId};

/// The authenticated user's profile.
///
/// Fetched from `GET /profile/me/` after login. The `role` field is the
/// source of truth for privilege checks; it is only meaningful on a profile
/// that was actually fetched, never on a locally constructed default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// User ID on the remote API.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Contact email.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Shipping address, if the user has provided one.
    #[serde(default)]
    pub address: Option<String>,
    /// Contact phone number, if provided.
    #[serde(default)]
    pub phone_number: Option<String>,
    /// Whether the account is active.
    pub is_active: bool,
    /// Role granted by the server.
    pub role: Role,
    /// Account creation timestamp.
    pub date_joined: DateTime<Utc>,
}

impl Profile {
    /// Full display name, falling back to the username when empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let trimmed = full.trim();
        if trimmed.is_empty() {
            self.username.clone()
        } else {
            trimmed.to_owned()
        }
    }
}
