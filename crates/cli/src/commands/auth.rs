//! Session commands: login, register, logout, whoami, refresh.

use electrostore_client::Store;
use electrostore_client::gateway::{LoginRequest, RegisterRequest};

use super::CliError;

/// Registration details collected from the command line.
pub struct RegisterDetails {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub phone_number: String,
}

/// Log in and report the resulting session.
pub async fn login(store: &Store, username: String, password: String) -> Result<(), CliError> {
    store.login(LoginRequest { username, password }).await?;

    let session = store.session();
    if let Some(user) = session.user() {
        tracing::info!(
            "Logged in as {} ({})",
            user.display_name(),
            session
                .role()
                .map_or_else(|| "unknown role".to_owned(), |r| r.to_string())
        );
    }
    Ok(())
}

/// Create an account. The session is untouched; log in separately.
pub async fn register(store: &Store, details: RegisterDetails) -> Result<(), CliError> {
    store
        .register(RegisterRequest {
            username: details.username.clone(),
            email: details.email,
            password: details.password,
            first_name: details.first_name,
            last_name: details.last_name,
            address: details.address,
            phone_number: details.phone_number,
        })
        .await?;

    tracing::info!(
        "Account '{}' created. Log in with: electrostore login -u {} -p <password>",
        details.username,
        details.username
    );
    Ok(())
}

/// Log out, discarding session, cart, and the durable record.
pub fn logout(store: &Store) -> Result<(), CliError> {
    store.logout()?;
    tracing::info!("Logged out");
    Ok(())
}

/// Print the current session, refreshing the admin flag from the server.
pub async fn whoami(store: &Store) -> Result<(), CliError> {
    if !store.is_authenticated() {
        tracing::info!("Not logged in");
        return Ok(());
    }

    store.check_admin_status().await?;

    let session = store.session();
    if let Some(user) = session.user() {
        tracing::info!("User: {} <{}>", user.display_name(), user.email);
        tracing::info!("Username: {}", user.username);
        if let Some(address) = &user.address {
            tracing::info!("Address: {address}");
        }
        if let Some(phone) = &user.phone_number {
            tracing::info!("Phone: {phone}");
        }
    }
    tracing::info!("Admin: {}", session.is_admin());
    Ok(())
}

/// Exchange the refresh token for a new access token.
pub async fn refresh(store: &Store) -> Result<(), CliError> {
    store.refresh_access_token().await?;

    if store.is_authenticated() {
        tracing::info!("Access token refreshed");
    } else {
        tracing::info!("Refresh token expired; logged out");
    }
    Ok(())
}
