//! Persistence adapter - mirrors store state to a durable JSON record.
//!
//! The durable subset of the store (session tokens, profile, role, cart,
//! orders, reviews, theme - never transient flags) is serialized into a
//! single record named by the fixed [`STORE_NAMESPACE`], read once at store
//! construction and overwritten on every mutation. There is exactly one
//! writer, so no conflict resolution exists; writes go through a temp file
//! and rename so a crash mid-write cannot leave a torn record.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use electrostore_core::{CartLine, Order, Profile, Review, Role, Theme};

/// Fixed namespace for the durable store record.
pub const STORE_NAMESPACE: &str = "electrostore-store";

/// Errors that can occur while reading or writing the durable record.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the state failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// The durable subset of store state.
///
/// Field-for-field this is the partialized slice of the in-memory store:
/// everything a reload must survive, nothing that is transient UI state.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct PersistedState {
    pub user: Option<Profile>,
    pub is_authenticated: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub role: Option<Role>,
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub theme: Theme,
}

/// Reads and writes the namespaced store record under a state directory.
#[derive(Debug, Clone)]
pub struct StatePersister {
    path: PathBuf,
}

impl StatePersister {
    /// Create a persister rooted at `state_dir`.
    ///
    /// The directory is created lazily on first write.
    #[must_use]
    pub fn new(state_dir: impl Into<PathBuf>) -> Self {
        Self {
            path: state_dir.into().join(format!("{STORE_NAMESPACE}.json")),
        }
    }

    /// Path of the durable record.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the durable record, if one exists.
    ///
    /// A missing record is not an error. An unreadable or corrupt record is
    /// logged and treated as absent: startup must never fail on bad state.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures other than the record being
    /// absent.
    pub fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        match serde_json::from_str(&raw) {
            Ok(state) => Ok(Some(state)),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "discarding corrupt store record"
                );
                Ok(None)
            }
        }
    }

    /// Overwrite the durable record with `state`.
    ///
    /// # Errors
    ///
    /// Returns an error if the state directory cannot be created or the
    /// record cannot be written.
    pub fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let serialized = serde_json::to_string_pretty(state)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serialized)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Delete the durable record (logout).
    ///
    /// A record that is already absent is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error for any other I/O failure.
    pub fn clear(&self) -> Result<(), PersistError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
