//! ElectroStore client library.
//!
//! The state-binding layer over the ElectroStore REST API: a persisted
//! session/cart store with authentication-gated mutations and an HTTP
//! gateway for identity operations. All business logic (inventory, pricing,
//! order lifecycle, authentication) lives behind the remote API; this crate
//! only binds its responses to local state.
//!
//! # Architecture
//!
//! - [`store::Store`] - single source of truth for session, cart, orders,
//!   reviews, and theme; cheaply cloneable, mutated only through its actions
//! - [`gateway::AuthGateway`] - the only component that talks to the remote
//!   API for identity operations (login, register, refresh, profile)
//! - [`persist::StatePersister`] - mirrors the durable subset of store state
//!   to a namespaced JSON record; read once at startup, write-through on
//!   every mutation
//!
//! # Example
//!
//! ```rust,ignore
//! use electrostore_client::{AuthGateway, ClientConfig, StatePersister, Store};
//! use electrostore_client::gateway::LoginRequest;
//!
//! let config = ClientConfig::from_env()?;
//! let gateway = AuthGateway::new(&config)?;
//! let persister = StatePersister::new(&config.state_dir);
//! let store = Store::with_persister(gateway, persister)?;
//!
//! store
//!     .login(LoginRequest {
//!         username: "minh".into(),
//!         password: "s3cret".into(),
//!     })
//!     .await?;
//! assert!(store.is_authenticated());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod gateway;
pub mod persist;
pub mod store;

pub use config::{ClientConfig, ConfigError};
pub use error::StoreError;
pub use gateway::{AuthGateway, GatewayError};
pub use persist::{PersistError, StatePersister};
pub use store::Store;
