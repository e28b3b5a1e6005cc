//! Integration test support for the ElectroStore client.
//!
//! Provides [`MockApi`], an in-process axum mock of the remote REST API's
//! identity endpoints, bound to an ephemeral port. Tests point a real
//! [`electrostore_client::Store`] at it and drive the full login, refresh,
//! and profile flows over actual HTTP.
//!
//! # Endpoints
//!
//! - `POST /api/auth/login/` - accepts the fixture credentials, returns an
//!   access/refresh pair
//! - `POST /api/auth/register/` - rejects the taken fixture username,
//!   accepts anything else
//! - `POST /api/auth/token/refresh/` - accepts [`REFRESH_TOKEN`], mints a
//!   fresh access token
//! - `GET /api/profile/me/` - requires a bearer token minted by this mock
//!
//! Error bodies follow the API's `{"detail": "..."}` convention.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use electrostore_client::{AuthGateway, ClientConfig, StatePersister, Store};

/// Username of the fixture account.
pub const VALID_USERNAME: &str = "minh";
/// Password of the fixture account.
pub const VALID_PASSWORD: &str = "s3cret!";
/// The only refresh token the mock accepts.
pub const REFRESH_TOKEN: &str = "refresh-token-1";

/// In-process mock of the ElectroStore identity API.
pub struct MockApi {
    /// Base URL to point a `ClientConfig` at (includes the `/api` prefix).
    pub base_url: String,
    state: Arc<ApiState>,
}

struct ApiState {
    admin: bool,
    token_seq: AtomicU64,
    valid_access: Mutex<HashSet<String>>,
}

impl ApiState {
    fn issue_access(&self) -> String {
        let n = self.token_seq.fetch_add(1, Ordering::Relaxed) + 1;
        let token = format!("access-{n}");
        self.valid_access
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(token.clone());
        token
    }

    fn is_valid_access(&self, token: &str) -> bool {
        self.valid_access
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(token)
    }
}

impl MockApi {
    /// Spawn a mock whose fixture account is a regular customer.
    pub async fn spawn() -> Self {
        Self::spawn_with_role(false).await
    }

    /// Spawn a mock whose fixture account is an admin.
    pub async fn spawn_admin() -> Self {
        Self::spawn_with_role(true).await
    }

    async fn spawn_with_role(admin: bool) -> Self {
        let state = Arc::new(ApiState {
            admin,
            token_seq: AtomicU64::new(0),
            valid_access: Mutex::new(HashSet::new()),
        });

        let app = Router::new()
            .route("/api/auth/login/", post(login))
            .route("/api/auth/register/", post(register))
            .route("/api/auth/token/refresh/", post(refresh))
            .route("/api/profile/me/", get(profile))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock API listener");
        let addr = listener.local_addr().expect("mock API local addr");

        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{addr}/api"),
            state,
        }
    }

    /// How many access tokens the mock has minted so far.
    #[must_use]
    pub fn tokens_issued(&self) -> u64 {
        self.state.token_seq.load(Ordering::Relaxed)
    }
}

// =============================================================================
// Test Helpers
// =============================================================================

/// In-memory store pointed at the mock.
#[must_use]
pub fn store_for(api: &MockApi) -> Store {
    Store::new(gateway_for(api))
}

/// Persistent store pointed at the mock, rooted at `state_dir`.
///
/// # Panics
///
/// Panics if the durable record exists but cannot be read.
#[must_use]
pub fn persistent_store_for(api: &MockApi, state_dir: &Path) -> Store {
    Store::with_persister(gateway_for(api), StatePersister::new(state_dir))
        .expect("construct persistent store")
}

/// Gateway pointed at the mock.
#[must_use]
pub fn gateway_for(api: &MockApi) -> AuthGateway {
    let config = ClientConfig::for_api(api.base_url.parse().expect("mock base URL"));
    AuthGateway::new(&config).expect("construct gateway")
}

/// Fresh state directory under the system temp dir, unique per call.
#[must_use]
pub fn temp_state_dir() -> PathBuf {
    static DIR_SEQ: AtomicU64 = AtomicU64::new(0);
    std::env::temp_dir().join(format!(
        "electrostore-it-{}-{}",
        std::process::id(),
        DIR_SEQ.fetch_add(1, Ordering::Relaxed)
    ))
}

// =============================================================================
// Handlers
// =============================================================================

#[derive(Deserialize)]
struct LoginBody {
    username: String,
    password: String,
}

async fn login(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<LoginBody>,
) -> (StatusCode, Json<Value>) {
    if body.username == VALID_USERNAME && body.password == VALID_PASSWORD {
        let access = state.issue_access();
        (
            StatusCode::OK,
            Json(json!({
                "access": access,
                "refresh": REFRESH_TOKEN,
                "user": { "id": 1, "username": VALID_USERNAME },
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "No active account found with the given credentials" })),
        )
    }
}

#[derive(Deserialize)]
struct RegisterBody {
    username: String,
    email: String,
}

async fn register(Json(body): Json<RegisterBody>) -> (StatusCode, Json<Value>) {
    if body.username == VALID_USERNAME {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "A user with that username already exists." })),
        )
    } else {
        (
            StatusCode::CREATED,
            Json(json!({ "id": 2, "username": body.username, "email": body.email })),
        )
    }
}

#[derive(Deserialize)]
struct RefreshBody {
    refresh: String,
}

async fn refresh(
    State(state): State<Arc<ApiState>>,
    Json(body): Json<RefreshBody>,
) -> (StatusCode, Json<Value>) {
    if body.refresh == REFRESH_TOKEN {
        (
            StatusCode::OK,
            Json(json!({ "access": state.issue_access() })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Token is invalid or expired" })),
        )
    }
}

async fn profile(
    State(state): State<Arc<ApiState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    let Some(token) = bearer else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Authentication credentials were not provided." })),
        );
    };

    if !state.is_valid_access(token) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "detail": "Given token not valid for any token type" })),
        );
    }

    let role = if state.admin { "ADMIN" } else { "CUSTOMER" };
    (
        StatusCode::OK,
        Json(json!({
            "id": 1,
            "username": VALID_USERNAME,
            "email": "minh@example.com",
            "first_name": "Minh",
            "last_name": "Tran",
            "address": "12 Ly Thuong Kiet",
            "phone_number": "0901234567",
            "is_active": true,
            "role": role,
            "date_joined": "2024-03-01T09:30:00Z",
        })),
    )
}
