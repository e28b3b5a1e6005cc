//! Auth gateway - HTTP client for the identity endpoints.
//!
//! The gateway is the only component that speaks to the remote API for
//! identity operations. It holds no session state beyond configuration and
//! a shared access-token cell: the store writes the cell on login, refresh,
//! and logout, and the gateway reads it to attach the bearer header on every
//! authenticated request (the interceptor in the browser rendition of this
//! client).
//!
//! # Endpoints
//!
//! - `POST /auth/login/` - exchange credentials for an access/refresh pair
//! - `POST /auth/register/` - create an account
//! - `POST /auth/token/refresh/` - exchange the refresh token for a new
//!   access token
//! - `GET /profile/me/` - fetch the authenticated user's profile
//!
//! # Example
//!
//! ```rust,ignore
//! use electrostore_client::{AuthGateway, ClientConfig};
//! use electrostore_client::gateway::LoginRequest;
//!
//! let gateway = AuthGateway::new(&config)?;
//! let tokens = gateway
//!     .login(&LoginRequest {
//!         username: "minh".into(),
//!         password: "s3cret".into(),
//!     })
//!     .await?;
//! gateway.set_access_token(Some(tokens.access.clone()));
//! let profile = gateway.get_profile().await?;
//! ```

mod types;

pub use types::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest};

use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use url::Url;

use electrostore_core::Profile;

use crate::config::ClientConfig;
use types::{ErrorBody, RefreshRequest};

/// Errors that can occur when talking to the remote API.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport-level failure (connection refused, timeout, bad TLS, or an
    /// unreadable response body).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server rejected the request (4xx), with its `detail` message
    /// when one was provided.
    #[error("request rejected ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// The server failed to process the request (5xx).
    #[error("server error ({status})")]
    Server { status: u16 },

    /// An authenticated endpoint was called without an access token.
    #[error("no access token available")]
    MissingAccessToken,
}

impl GatewayError {
    /// Whether this error is a client-side rejection (invalid credentials,
    /// validation failure) as opposed to a server or transport problem.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// Client for the ElectroStore identity endpoints.
///
/// Cheaply cloneable; all clones share one HTTP connection pool and one
/// access-token cell.
#[derive(Clone)]
pub struct AuthGateway {
    inner: Arc<GatewayInner>,
}

struct GatewayInner {
    client: reqwest::Client,
    base_url: Url,
    access_token: RwLock<Option<String>>,
}

impl AuthGateway {
    /// Create a new gateway from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(GatewayInner {
                client,
                base_url: config.api_base_url.clone(),
                access_token: RwLock::new(None),
            }),
        })
    }

    /// Get the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Replace the access token attached to authenticated requests.
    ///
    /// Called by the store on login, refresh, rehydration, and logout.
    pub fn set_access_token(&self, token: Option<String>) {
        let mut cell = self
            .inner
            .access_token
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *cell = token;
    }

    /// Current access token, if any.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.inner
            .access_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}{path}",
            self.inner.base_url.as_str().trim_end_matches('/')
        )
    }

    // =========================================================================
    // Identity Operations
    // =========================================================================

    /// Exchange credentials for an access/refresh token pair.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` when the server refuses the
    /// credentials, carrying the server's detail message.
    pub async fn login(&self, credentials: &LoginRequest) -> Result<LoginResponse, GatewayError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/login/"))
            .json(credentials)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        Ok(response.json().await?)
    }

    /// Create a new account.
    ///
    /// Registration does not authenticate: the caller logs in separately.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` for validation failures (taken
    /// username, malformed email), with the server's detail message.
    pub async fn register(&self, details: &RegisterRequest) -> Result<(), GatewayError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/register/"))
            .json(details)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        Ok(())
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Rejected` when the refresh token is expired
    /// or invalid.
    pub async fn refresh(&self, refresh_token: &str) -> Result<RefreshResponse, GatewayError> {
        let response = self
            .inner
            .client
            .post(self.endpoint("/auth/token/refresh/"))
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::MissingAccessToken` if no token has been set,
    /// or the classified HTTP failure otherwise.
    pub async fn get_profile(&self) -> Result<Profile, GatewayError> {
        let token = self.access_token().ok_or(GatewayError::MissingAccessToken)?;

        let response = self
            .inner
            .client
            .get(self.endpoint("/profile/me/"))
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(classify_failure(response).await);
        }

        Ok(response.json().await?)
    }

    /// Fetch the profile and reduce it to an admin flag.
    ///
    /// Fails closed: any error (missing token, network, rejection) reports
    /// `false` rather than granting privilege on uncertainty.
    pub async fn check_is_admin(&self) -> bool {
        match self.get_profile().await {
            Ok(profile) => profile.role.is_admin(),
            Err(err) => {
                tracing::debug!(error = %err, "admin check failed, treating as non-admin");
                false
            }
        }
    }
}

/// Classify a non-success response into a typed gateway error.
///
/// 4xx responses carry the server's `detail` field when the body follows the
/// API's error convention, the raw body otherwise.
async fn classify_failure(response: reqwest::Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if status.is_client_error() {
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.detail)
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_owned()
                } else {
                    body.trim().to_owned()
                }
            });
        return GatewayError::Rejected {
            status: status.as_u16(),
            detail,
        };
    }

    GatewayError::Server {
        status: status.as_u16(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gateway(base: &str) -> AuthGateway {
        let config = ClientConfig::for_api(base.parse().unwrap());
        AuthGateway::new(&config).unwrap()
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let gw = gateway("http://localhost:8000/api/");
        assert_eq!(
            gw.endpoint("/auth/login/"),
            "http://localhost:8000/api/auth/login/"
        );

        let gw = gateway("http://localhost:8000/api");
        assert_eq!(
            gw.endpoint("/auth/login/"),
            "http://localhost:8000/api/auth/login/"
        );
    }

    #[test]
    fn test_token_cell_shared_across_clones() {
        let gw = gateway("http://localhost:8000/api");
        let clone = gw.clone();

        gw.set_access_token(Some("abc".to_owned()));
        assert_eq!(clone.access_token().as_deref(), Some("abc"));

        clone.set_access_token(None);
        assert_eq!(gw.access_token(), None);
    }

    #[test]
    fn test_rejected_display_carries_detail() {
        let err = GatewayError::Rejected {
            status: 401,
            detail: "No active account found with the given credentials".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "request rejected (401): No active account found with the given credentials"
        );
        assert!(err.is_rejection());
    }
}
