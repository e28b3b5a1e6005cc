//! Session state - who is logged in and with what privileges.

use electrostore_core::{Profile, Role};

/// The authenticated identity and token material for this client.
///
/// Invariant: `is_authenticated` is true iff an access token is present and
/// the last login or refresh succeeded. `role` is only trustworthy after a
/// successful profile fetch.
///
/// `Debug` is implemented manually to redact token material.
#[derive(Clone, Default, PartialEq)]
pub struct Session {
    user: Option<Profile>,
    is_authenticated: bool,
    access_token: Option<String>,
    refresh_token: Option<String>,
    role: Option<Role>,
}

impl Session {
    /// Rebuild a session from persisted fields.
    ///
    /// The authentication flag is re-derived: a persisted record claiming
    /// authentication without an access token is downgraded to logged-out.
    pub(crate) fn from_persisted(
        user: Option<Profile>,
        is_authenticated: bool,
        access_token: Option<String>,
        refresh_token: Option<String>,
        role: Option<Role>,
    ) -> Self {
        Self {
            user,
            is_authenticated: is_authenticated && access_token.is_some(),
            access_token,
            refresh_token,
            role,
        }
    }

    /// Commit a successful login: tokens, profile, and role in one step.
    pub(crate) fn authenticate(&mut self, access: String, refresh: String, profile: Profile) {
        self.role = Some(profile.role);
        self.user = Some(profile);
        self.access_token = Some(access);
        self.refresh_token = Some(refresh);
        self.is_authenticated = true;
    }

    /// Commit a successful token refresh. Only the access token changes.
    pub(crate) fn apply_refreshed_access(&mut self, access: String) {
        self.access_token = Some(access);
        self.is_authenticated = true;
    }

    /// Overwrite the role (admin status check).
    pub(crate) fn set_role(&mut self, role: Option<Role>) {
        self.role = role;
    }

    /// Reset to the logged-out state.
    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }

    /// The logged-in user's profile, if any.
    #[must_use]
    pub fn user(&self) -> Option<&Profile> {
        self.user.as_ref()
    }

    /// Whether a login or refresh has succeeded and a token is held.
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    /// Current access token.
    #[must_use]
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    /// Current refresh token.
    #[must_use]
    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Role reported by the last successful profile fetch.
    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    /// Whether the session holds admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_some_and(Role::is_admin)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user.as_ref().map(|u| &u.username))
            .field("is_authenticated", &self.is_authenticated)
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("role", &self.role)
            .finish()
    }
}
