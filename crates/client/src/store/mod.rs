//! The store - single source of truth for client state.
//!
//! One [`Store`] instance is constructed at application boot and passed to
//! every consumer; there is no hidden global. The store owns the session,
//! cart, locally recorded orders and reviews, and the theme preference, and
//! mirrors the durable subset to its persister after every mutation.
//!
//! # Concurrency
//!
//! The store is cheaply cloneable and shares its state behind an `RwLock`.
//! Mutations take the lock briefly and never across an `.await`; network
//! flight happens outside the lock, so state transitions within one
//! operation are atomic from the caller's perspective. A generation counter
//! guards multi-step async operations: logout bumps the generation, and an
//! operation only commits if the generation it started under is still
//! current. A superseded login reports [`StoreError::Superseded`] instead of
//! committing stale results.
//!
//! # Failure semantics
//!
//! - `login`/`register` propagate typed gateway failures; on failure the
//!   state is untouched
//! - `refresh_access_token` never surfaces the gateway failure; an invalid
//!   refresh token cascades into a full logout
//! - cart mutations fail synchronously with an authentication error when no
//!   session is active, and never otherwise (aside from persistence I/O)

mod cart;
mod session;

pub use cart::Cart;
pub use session::Session;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rust_decimal::Decimal;

use electrostore_core::{
    CartLine, Order, OrderId, OrderStatus, ProductId, ProductRef, Profile, Review, Role, Theme,
    UserId,
};

use crate::error::StoreError;
use crate::gateway::{AuthGateway, LoginRequest, RegisterRequest};
use crate::persist::{PersistError, PersistedState, StatePersister};

/// Client-side store: session, cart, orders, reviews, and theme.
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    gateway: AuthGateway,
    persister: Option<StatePersister>,
    state: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    session: Session,
    cart: Cart,
    orders: Vec<Order>,
    reviews: Vec<Review>,
    theme: Theme,
    /// Count of in-flight network operations, for pending indicators.
    loading: u32,
    /// Generation counter; bumped whenever the session is torn down.
    generation: u64,
}

impl Store {
    /// Create an in-memory store with no persistence.
    #[must_use]
    pub fn new(gateway: AuthGateway) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                gateway,
                persister: None,
                state: RwLock::new(StoreState::default()),
            }),
        }
    }

    /// Create a store that rehydrates from and writes through to `persister`.
    ///
    /// The durable record is read exactly once, here, before the store is
    /// handed to any consumer.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable record exists but cannot be read.
    pub fn with_persister(
        gateway: AuthGateway,
        persister: StatePersister,
    ) -> Result<Self, PersistError> {
        let state = persister.load()?.map_or_else(StoreState::default, |p| {
            let session = Session::from_persisted(
                p.user,
                p.is_authenticated,
                p.access_token,
                p.refresh_token,
                p.role,
            );
            StoreState {
                session,
                cart: Cart::from_lines(p.cart),
                orders: p.orders,
                reviews: p.reviews,
                theme: p.theme,
                loading: 0,
                generation: 0,
            }
        });

        gateway.set_access_token(state.session.access_token().map(ToOwned::to_owned));

        Ok(Self {
            inner: Arc::new(StoreInner {
                gateway,
                persister: Some(persister),
                state: RwLock::new(state),
            }),
        })
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    /// Snapshot of the current session.
    #[must_use]
    pub fn session(&self) -> Session {
        self.state().session.clone()
    }

    /// The logged-in user's profile, if any.
    #[must_use]
    pub fn user(&self) -> Option<Profile> {
        self.state().session.user().cloned()
    }

    /// Whether a session is active.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state().session.is_authenticated()
    }

    /// Whether the session holds admin privileges.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.state().session.is_admin()
    }

    /// Snapshot of the cart lines in insertion order.
    #[must_use]
    pub fn cart_lines(&self) -> Vec<CartLine> {
        self.state().cart.lines().to_vec()
    }

    /// Cart total, computed fresh from the lines on every call.
    #[must_use]
    pub fn cart_total(&self) -> Decimal {
        self.state().cart.total()
    }

    /// Sum of cart quantities, for badge display.
    #[must_use]
    pub fn cart_items_count(&self) -> u64 {
        self.state().cart.items_count()
    }

    /// Snapshot of the locally recorded orders.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.state().orders.clone()
    }

    /// Snapshot of the locally recorded reviews.
    #[must_use]
    pub fn reviews(&self) -> Vec<Review> {
        self.state().reviews.clone()
    }

    /// Current theme preference.
    #[must_use]
    pub fn theme(&self) -> Theme {
        self.state().theme
    }

    /// Whether any network operation is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state().loading > 0
    }

    // =========================================================================
    // Session Actions
    // =========================================================================

    /// Log in: exchange credentials for tokens, fetch the profile, and
    /// commit the authenticated session atomically.
    ///
    /// # Errors
    ///
    /// On any failure the session is left untouched and the typed gateway
    /// failure propagates. Returns `StoreError::Superseded` if the session
    /// was torn down while the request was in flight.
    pub async fn login(&self, credentials: LoginRequest) -> Result<(), StoreError> {
        let generation = self.state().generation;
        let _guard = self.begin_loading();

        let tokens = self.inner.gateway.login(&credentials).await?;

        // The profile fetch needs the fresh access token attached; if the
        // fetch fails, the cell is resynced to the committed session below.
        self.inner
            .gateway
            .set_access_token(Some(tokens.access.clone()));

        let profile = match self.inner.gateway.get_profile().await {
            Ok(profile) => profile,
            Err(err) => {
                self.resync_gateway_token();
                return Err(err.into());
            }
        };

        let mut state = self.state_mut();
        if state.generation != generation {
            drop(state);
            self.resync_gateway_token();
            return Err(StoreError::Superseded);
        }

        tracing::debug!(username = %profile.username, "login committed");
        state.session.authenticate(tokens.access, tokens.refresh, profile);
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Register a new account.
    ///
    /// Registration deliberately does not authenticate: session state is
    /// never mutated, success is simply reported to the caller.
    ///
    /// # Errors
    ///
    /// Propagates the typed gateway failure (validation or transport).
    pub async fn register(&self, details: RegisterRequest) -> Result<(), StoreError> {
        let _guard = self.begin_loading();
        self.inner.gateway.register(&details).await?;
        Ok(())
    }

    /// Log out: reset every in-memory field to its default and delete the
    /// durable record, so no stale tokens or derived state linger.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable record cannot be deleted.
    pub fn logout(&self) -> Result<(), StoreError> {
        {
            let mut state = self.state_mut();
            let generation = state.generation.wrapping_add(1);
            *state = StoreState {
                generation,
                ..StoreState::default()
            };
        }

        self.inner.gateway.set_access_token(None);

        if let Some(persister) = &self.inner.persister {
            persister.clear()?;
        }

        tracing::debug!("session reset");
        Ok(())
    }

    /// Exchange the refresh token for a new access token.
    ///
    /// No-op without a refresh token. On success only the access token
    /// changes. A failed exchange is presumed to mean the refresh token has
    /// expired: it is not surfaced to the caller, the session is torn down
    /// instead.
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures or when superseded.
    pub async fn refresh_access_token(&self) -> Result<(), StoreError> {
        let (refresh_token, generation) = {
            let state = self.state();
            (
                state.session.refresh_token().map(ToOwned::to_owned),
                state.generation,
            )
        };
        let Some(refresh_token) = refresh_token else {
            return Ok(());
        };

        let _guard = self.begin_loading();

        match self.inner.gateway.refresh(&refresh_token).await {
            Ok(refreshed) => {
                {
                    let mut state = self.state_mut();
                    if state.generation != generation {
                        return Err(StoreError::Superseded);
                    }
                    state.session.apply_refreshed_access(refreshed.access.clone());
                    self.persist_locked(&state)?;
                }
                self.inner.gateway.set_access_token(Some(refreshed.access));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, logging out");
                self.logout()
            }
        }
    }

    /// Ask the server whether the current user is an admin and store the
    /// answer. Fails closed: any error records [`Role::Customer`].
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures or when superseded.
    pub async fn check_admin_status(&self) -> Result<(), StoreError> {
        let generation = self.state().generation;
        let _guard = self.begin_loading();

        let is_admin = self.inner.gateway.check_is_admin().await;

        let mut state = self.state_mut();
        if state.generation != generation {
            return Err(StoreError::Superseded);
        }
        state.session.set_role(Some(if is_admin {
            Role::Admin
        } else {
            Role::Customer
        }));
        self.persist_locked(&state)?;
        Ok(())
    }

    // =========================================================================
    // Cart Actions
    // =========================================================================

    /// Add `quantity` units of a product to the cart.
    ///
    /// Repeated adds for the same product accumulate into a single line.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` when no session is active; the
    /// cart is left unchanged.
    pub fn add_to_cart(&self, product: ProductRef, quantity: u32) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        if !state.session.is_authenticated() {
            return Err(StoreError::Unauthenticated("adding items to the cart"));
        }
        state.cart.add(product, quantity);
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Remove the line for a product. No-op (not an error) if absent.
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures.
    pub fn remove_from_cart(&self, product_id: ProductId) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        state.cart.remove(product_id);
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Set a line's quantity exactly; zero or negative removes the line.
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures.
    pub fn update_cart_quantity(&self, product_id: ProductId, quantity: i64) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        state.cart.set_quantity(product_id, quantity);
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Empty the cart unconditionally (e.g., after successful checkout).
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures.
    pub fn clear_cart(&self) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        state.cart.clear();
        self.persist_locked(&state)?;
        Ok(())
    }

    // =========================================================================
    // Orders & Reviews
    // =========================================================================

    /// Record a placed order.
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures.
    pub fn add_order(&self, order: Order) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        state.orders.push(order);
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Update the status of a recorded order. No-op if the ID is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures.
    pub fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        for order in &mut state.orders {
            if order.id == order_id {
                order.status = status;
            }
        }
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Orders recorded for a given user.
    #[must_use]
    pub fn user_orders(&self, user_id: UserId) -> Vec<Order> {
        self.state()
            .orders
            .iter()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Record a product review.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unauthenticated` when no session is active.
    pub fn add_review(&self, review: Review) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        if !state.session.is_authenticated() {
            return Err(StoreError::Unauthenticated("posting a review"));
        }
        state.reviews.push(review);
        self.persist_locked(&state)?;
        Ok(())
    }

    /// Reviews recorded for a given product.
    #[must_use]
    pub fn product_reviews(&self, product_id: ProductId) -> Vec<Review> {
        self.state()
            .reviews
            .iter()
            .filter(|r| r.product_id == product_id)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Theme
    // =========================================================================

    /// Flip the theme preference between light and dark.
    ///
    /// # Errors
    ///
    /// Returns an error only for persistence failures.
    pub fn toggle_theme(&self) -> Result<(), StoreError> {
        let mut state = self.state_mut();
        state.theme = state.theme.toggled();
        self.persist_locked(&state)?;
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn state(&self) -> RwLockReadGuard<'_, StoreState> {
        self.inner
            .state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn state_mut(&self) -> RwLockWriteGuard<'_, StoreState> {
        self.inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Point the gateway's token cell back at the committed session state.
    fn resync_gateway_token(&self) {
        let token = self.state().session.access_token().map(ToOwned::to_owned);
        self.inner.gateway.set_access_token(token);
    }

    fn begin_loading(&self) -> LoadingGuard {
        self.state_mut().loading += 1;
        LoadingGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Mirror the durable subset of `state` to the persister, if any.
    fn persist_locked(&self, state: &StoreState) -> Result<(), PersistError> {
        let Some(persister) = &self.inner.persister else {
            return Ok(());
        };

        persister.save(&PersistedState {
            user: state.session.user().cloned(),
            is_authenticated: state.session.is_authenticated(),
            access_token: state.session.access_token().map(ToOwned::to_owned),
            refresh_token: state.session.refresh_token().map(ToOwned::to_owned),
            role: state.session.role(),
            cart: state.cart.lines().to_vec(),
            orders: state.orders.clone(),
            reviews: state.reviews.clone(),
            theme: state.theme,
        })
    }
}

/// Decrements the in-flight counter when an async operation ends.
struct LoadingGuard {
    inner: Arc<StoreInner>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self
            .inner
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        state.loading = state.loading.saturating_sub(1);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::config::ClientConfig;
    use crate::persist::PersistedState;

    static DIR_SEQ: AtomicU32 = AtomicU32::new(0);

    fn temp_state_dir() -> PathBuf {
        std::env::temp_dir().join(format!(
            "electrostore-store-test-{}-{}",
            std::process::id(),
            DIR_SEQ.fetch_add(1, Ordering::Relaxed)
        ))
    }

    /// Gateway pointed at a port nothing listens on; fine for offline tests.
    fn offline_gateway() -> AuthGateway {
        let config = ClientConfig::for_api("http://127.0.0.1:9/api".parse().unwrap());
        AuthGateway::new(&config).unwrap()
    }

    fn profile(id: i64, role: Role) -> Profile {
        Profile {
            id: UserId::new(id),
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            first_name: String::new(),
            last_name: String::new(),
            address: None,
            phone_number: None,
            is_active: true,
            role,
            date_joined: "2024-01-01T00:00:00Z".parse().unwrap(),
        }
    }

    fn product(id: i64, price: &str) -> ProductRef {
        ProductRef::new(
            ProductId::new(id),
            format!("Product {id}"),
            price.parse().unwrap(),
            String::new(),
        )
    }

    /// Build an authenticated store by rehydrating a persisted record, the
    /// same path a real reload takes.
    fn authenticated_store(dir: &PathBuf, role: Role) -> Store {
        let persister = StatePersister::new(dir);
        persister
            .save(&PersistedState {
                user: Some(profile(1, role)),
                is_authenticated: true,
                access_token: Some("access-1".to_owned()),
                refresh_token: Some("refresh-1".to_owned()),
                role: Some(role),
                ..PersistedState::default()
            })
            .unwrap();
        Store::with_persister(offline_gateway(), persister).unwrap()
    }

    #[test]
    fn test_unauthenticated_add_to_cart_fails() {
        let store = Store::new(offline_gateway());

        let err = store.add_to_cart(product(1, "10.00"), 1).unwrap_err();
        assert!(matches!(err, StoreError::Unauthenticated(_)));
        assert!(store.cart_lines().is_empty());
    }

    #[test]
    fn test_unauthenticated_add_review_fails() {
        let store = Store::new(offline_gateway());

        let review = Review {
            id: electrostore_core::ReviewId::new(1),
            product_id: ProductId::new(1),
            user_id: UserId::new(1),
            user_name: "anon".to_owned(),
            rating: 5,
            comment: "great".to_owned(),
            created_at: "2024-01-01T00:00:00Z".parse().unwrap(),
            helpful: 0,
        };
        assert!(matches!(
            store.add_review(review),
            Err(StoreError::Unauthenticated(_))
        ));
        assert!(store.reviews().is_empty());
    }

    #[test]
    fn test_rehydration_restores_session_and_gateway_token() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Customer);

        assert!(store.is_authenticated());
        assert!(!store.is_admin());
        assert_eq!(store.session().access_token(), Some("access-1"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_rehydrated_admin_role_grants_is_admin() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Admin);
        assert!(store.is_admin());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_cart_mutations_write_through() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Customer);

        store.add_to_cart(product(1, "19.99"), 2).unwrap();
        store.add_to_cart(product(1, "19.99"), 3).unwrap();
        store.add_to_cart(product(2, "5.00"), 1).unwrap();

        assert_eq!(store.cart_items_count(), 6);
        assert_eq!(store.cart_total(), "104.95".parse::<Decimal>().unwrap());

        // A second store over the same directory sees the same cart
        let reloaded =
            Store::with_persister(offline_gateway(), StatePersister::new(&dir)).unwrap();
        assert_eq!(reloaded.cart_items_count(), 6);
        assert_eq!(reloaded.cart_lines().len(), 2);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_update_cart_quantity_zero_removes() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Customer);

        store.add_to_cart(product(1, "10.00"), 4).unwrap();
        store.update_cart_quantity(ProductId::new(1), 0).unwrap();
        assert!(store.cart_lines().is_empty());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_logout_resets_state_and_deletes_record() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Admin);
        store.add_to_cart(product(1, "10.00"), 1).unwrap();
        store.toggle_theme().unwrap();

        store.logout().unwrap();

        assert!(!store.is_authenticated());
        assert!(store.session().access_token().is_none());
        assert!(store.session().refresh_token().is_none());
        assert!(store.session().role().is_none());
        assert!(store.user().is_none());
        assert!(store.cart_lines().is_empty());
        assert_eq!(store.theme(), Theme::Light);
        assert!(!StatePersister::new(&dir).path().exists());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_orders_recorded_and_filtered_by_user() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Customer);

        let order = |id: i64, user: i64| Order {
            id: OrderId::new(id),
            user_id: UserId::new(user),
            items: vec![CartLine::new(product(1, "10.00"), 1)],
            total: "10.00".parse().unwrap(),
            status: OrderStatus::Pending,
            created_at: "2024-05-01T00:00:00Z".parse().unwrap(),
            shipping_address: "1 Main St".to_owned(),
            payment_method: electrostore_core::PaymentMethod::Cod,
            customer_info: electrostore_core::CustomerInfo {
                full_name: "A B".to_owned(),
                email: "a@example.com".to_owned(),
                phone: "555".to_owned(),
            },
        };
        store.add_order(order(1, 1)).unwrap();
        store.add_order(order(2, 2)).unwrap();

        assert_eq!(store.user_orders(UserId::new(1)).len(), 1);

        store
            .update_order_status(OrderId::new(1), OrderStatus::Shipped)
            .unwrap();
        let orders = store.user_orders(UserId::new(1));
        assert_eq!(orders[0].status, OrderStatus::Shipped);
        // Other orders untouched
        assert_eq!(store.user_orders(UserId::new(2))[0].status, OrderStatus::Pending);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_toggle_theme_persists() {
        let dir = temp_state_dir();
        let store = authenticated_store(&dir, Role::Customer);

        store.toggle_theme().unwrap();
        assert_eq!(store.theme(), Theme::Dark);

        let reloaded =
            Store::with_persister(offline_gateway(), StatePersister::new(&dir)).unwrap();
        assert_eq!(reloaded.theme(), Theme::Dark);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
