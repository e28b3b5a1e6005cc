//! Request and response payloads for the identity endpoints.

use serde::{Deserialize, Serialize};

/// Credentials submitted to `POST /auth/login/`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account details submitted to `POST /auth/register/`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
}

/// Token pair returned by a successful login.
///
/// The endpoint also embeds a partial user object; the store ignores it and
/// fetches the full profile from `GET /profile/me/` instead.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
}

/// New access token returned by `POST /auth/token/refresh/`.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Body sent to the refresh endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct RefreshRequest<'a> {
    pub refresh: &'a str,
}

/// Error body convention of the remote API (`{"detail": "..."}`).
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: Option<String>,
}
